//! Duplicate guard
//!
//! A new contact is refused when an existing one has the same phone number
//! or the same address. Comparison is exact and case-sensitive; blank values
//! (empty or whitespace only) never count as a match.
//!
//! The insert and the check run in one transaction, insert first: the
//! transaction's first statement is a write, so SQLite takes the writer lock
//! up front and concurrent creates queue on the busy timeout instead of
//! failing a read-to-write upgrade. The check then looks for any other row
//! sharing the phone number or address and rolls the insert back if one
//! exists. The unique indexes created by [`crate::db::init`] reject most
//! duplicates before the check runs. Either way the caller gets
//! [`CreateOutcome::Duplicate`], not an error.

use crate::db::contacts::{insert, is_unique_violation};
use crate::db::models::ContactFields;
use crate::{Error, Result};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::warn;

/// Result of a guarded create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreateOutcome {
    /// Row inserted under this id
    Created { id: i64 },
    /// Nothing inserted; this existing contact shares the phone or address
    Duplicate { conflicting_id: i64 },
}

/// Id of an existing contact sharing the candidate's phone number or address
pub async fn find_duplicate(pool: &SqlitePool, fields: &ContactFields) -> Result<Option<i64>> {
    let mut conn = pool.acquire().await?;
    conflicting_id(&mut conn, fields, None).await
}

/// Create a contact unless it duplicates an existing one
pub async fn create_unique(pool: &SqlitePool, fields: &ContactFields) -> Result<CreateOutcome> {
    let mut tx = pool.begin().await?;

    let id = match insert(&mut *tx, fields).await {
        Ok(id) => id,
        Err(Error::Database(e)) if is_unique_violation(&e) => {
            tx.rollback().await?;
            return match find_duplicate(pool, fields).await? {
                Some(conflicting_id) => {
                    warn!(conflicting_id, "Refused duplicate contact (same phone number or address)");
                    Ok(CreateOutcome::Duplicate { conflicting_id })
                }
                None => Err(Error::Database(e)),
            };
        }
        Err(e) => return Err(e),
    };

    // Covers databases whose unique indexes could not be created
    if let Some(conflicting_id) = conflicting_id(&mut *tx, fields, Some(id)).await? {
        tx.rollback().await?;
        warn!(conflicting_id, "Refused duplicate contact (same phone number or address)");
        return Ok(CreateOutcome::Duplicate { conflicting_id });
    }

    tx.commit().await?;
    Ok(CreateOutcome::Created { id })
}

/// Lowest id sharing a non-blank phone number or address with `fields`,
/// ignoring `exclude_id`
pub(crate) async fn conflicting_id(
    conn: &mut SqliteConnection,
    fields: &ContactFields,
    exclude_id: Option<i64>,
) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id FROM contacts
        WHERE ((phone_number = ? AND trim(phone_number) <> '')
            OR (address = ? AND trim(address) <> ''))
          AND (? IS NULL OR id <> ?)
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(&fields.phone_number)
    .bind(&fields.address)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}
