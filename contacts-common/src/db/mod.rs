//! Database models and queries

pub mod contacts;
pub mod duplicates;
pub mod init;
pub mod models;
pub mod search;

pub use duplicates::{create_unique, find_duplicate, CreateOutcome};
pub use init::*;
pub use models::*;
pub use search::{search, SearchResult};
