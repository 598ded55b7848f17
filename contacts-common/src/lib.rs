//! # Contacts Common Library
//!
//! Shared code for the contact manager including:
//! - Database initialization and the `contacts` schema
//! - Contact model, store operations, search and duplicate guard
//! - Status vocabularies
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod status;

pub use db::models::{Contact, ContactFields};
pub use error::{Error, Result};
pub use status::StatusVocabularies;
