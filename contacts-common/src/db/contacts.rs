//! Contact store
//!
//! Single-statement CRUD over the `contacts` table. Missing ids are not
//! errors: reads return `None` and writes report zero affected rows.

use crate::db::duplicates::conflicting_id;
use crate::db::models::{Contact, ContactFields};
use crate::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

/// Column list shared by every SELECT on the table
pub(crate) const CONTACT_COLUMNS: &str =
    "id, last_name, first_name, phone_number, address, contact_status, response_status, note";

/// Insert a contact without any duplicate check, returning its new id
///
/// Fails with a unique-constraint error if the indexes reject the row; use
/// [`crate::db::create_unique`] to get that reported as a duplicate.
pub async fn create(pool: &SqlitePool, fields: &ContactFields) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    insert(&mut conn, fields).await
}

pub(crate) async fn insert(conn: &mut SqliteConnection, fields: &ContactFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO contacts
            (last_name, first_name, phone_number, address, contact_status, response_status, note)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.last_name)
    .bind(&fields.first_name)
    .bind(&fields.phone_number)
    .bind(&fields.address)
    .bind(&fields.contact_status)
    .bind(&fields.response_status)
    .bind(&fields.note)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, "Inserted contact");
    Ok(id)
}

/// Load one contact by id
pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Contact>> {
    let row = sqlx::query(&format!("SELECT {} FROM contacts WHERE id = ?", CONTACT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(Contact::from_row))
}

/// Load every contact in id (insertion) order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Contact>> {
    let rows = sqlx::query(&format!("SELECT {} FROM contacts ORDER BY id ASC", CONTACT_COLUMNS))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(Contact::from_row).collect())
}

/// Count all contacts
pub async fn count_all(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Overwrite every column of contact `id`
///
/// Returns the number of rows changed (0 when `id` does not exist). If the
/// new phone number or address belongs to another contact the unique
/// indexes reject the write and [`Error::Conflict`] names that contact.
pub async fn update(pool: &SqlitePool, id: i64, fields: &ContactFields) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE contacts SET
            last_name = ?,
            first_name = ?,
            phone_number = ?,
            address = ?,
            contact_status = ?,
            response_status = ?,
            note = ?
        WHERE id = ?
        "#,
    )
    .bind(&fields.last_name)
    .bind(&fields.first_name)
    .bind(&fields.phone_number)
    .bind(&fields.address)
    .bind(&fields.contact_status)
    .bind(&fields.response_status)
    .bind(&fields.note)
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Ok(done) => {
            debug!(id, changes = done.rows_affected(), "Updated contact");
            Ok(done.rows_affected())
        }
        Err(e) if is_unique_violation(&e) => {
            let mut conn = pool.acquire().await?;
            match conflicting_id(&mut conn, fields, Some(id)).await? {
                Some(conflicting_id) => Err(Error::Conflict { conflicting_id }),
                None => Err(Error::Database(e)),
            }
        }
        Err(e) => Err(Error::Database(e)),
    }
}

/// Set the response status of every contact with this phone number
///
/// The number is compared exactly, like the duplicate guard does. A blank
/// phone number is rejected: it would otherwise hit every contact saved
/// without one.
pub async fn update_status_by_phone(
    pool: &SqlitePool,
    phone_number: &str,
    response_status: &str,
) -> Result<u64> {
    if phone_number.trim().is_empty() {
        return Err(Error::InvalidInput("phone_number is required".to_string()));
    }

    let result = sqlx::query("UPDATE contacts SET response_status = ? WHERE phone_number = ?")
        .bind(response_status)
        .bind(phone_number)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete contact `id`; returns 0 when it did not exist
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    debug!(id, changes = result.rows_affected(), "Deleted contact");
    Ok(result.rows_affected())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
