pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod shell;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Backend, CliConfig};
pub use config::TomlConfig;

pub use adapters::{HttpDirectoryService, InMemoryDirectory};
pub use self::core::{fallback::FallbackTable, normalizer::normalize, resolver::Resolver};
pub use domain::model::{
    AddressRecord, DigitalAddress, FallbackEntry, InvalidInput, MatchPolicy, OutcomeKind,
    PostalCode, ResolutionOutcome,
};
pub use domain::ports::{ConfigProvider, DirectoryService, LookupReply};
pub use utils::error::{ResolverError, Result};
