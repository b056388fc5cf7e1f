// Adapters layer: concrete directory service implementations.

pub mod http;
pub mod memory;

pub use http::HttpDirectoryService;
pub use memory::InMemoryDirectory;
