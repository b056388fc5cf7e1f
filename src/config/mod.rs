#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{Backend, CliConfig};
pub use toml_config::TomlConfig;
