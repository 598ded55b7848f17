//! Database models

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Every column of a contact except `id`
///
/// Used as the input of create and update. Update overwrites all columns,
/// so a field left as `None` is written as NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_status: Option<String>,
    #[serde(default)]
    pub response_status: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A stored contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Assigned by the store, never reused
    pub id: i64,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Contact {
    pub(crate) fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            fields: ContactFields {
                last_name: row.get("last_name"),
                first_name: row.get("first_name"),
                phone_number: row.get("phone_number"),
                address: row.get("address"),
                contact_status: row.get("contact_status"),
                response_status: row.get("response_status"),
                note: row.get("note"),
            },
        }
    }
}
