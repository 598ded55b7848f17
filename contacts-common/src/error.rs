//! Error type shared by the store, search, duplicate guard and config loading

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure: unreachable file, lock timeout, constraint
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the data folder or reading the config file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write would give a second contact the phone number or address of
    /// an existing one
    #[error("Contact {conflicting_id} already uses this phone number or address")]
    Conflict { conflicting_id: i64 },
}
