pub mod fallback;
pub mod normalizer;
pub mod resolver;

pub use crate::domain::model::{AddressRecord, DigitalAddress, MatchPolicy, ResolutionOutcome};
pub use crate::domain::ports::{ConfigProvider, DirectoryService, LookupReply};
pub use crate::utils::error::Result;
