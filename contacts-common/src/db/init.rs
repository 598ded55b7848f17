//! Database initialization
//!
//! Opens (or creates) the SQLite file and makes sure the `contacts` table and
//! its uniqueness indexes exist. Safe to run on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// How long a connection waits for another writer before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the database at `db_path`, creating file, folder and schema as needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Set per connection: every pooled connection waits on the writer lock
    // and WAL lets list/search readers proceed while a write is in flight
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the contacts table and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_contacts_table(pool).await?;
    create_unique_indexes(pool).await;
    Ok(())
}

/// Create the contacts table
///
/// AUTOINCREMENT keeps SQLite from handing out the id of a deleted row again.
pub async fn create_contacts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            last_name TEXT,
            first_name TEXT,
            phone_number TEXT,
            address TEXT,
            contact_status TEXT,
            response_status TEXT,
            note TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Unique indexes on non-blank phone number and address
///
/// A database written before these indexes existed may already hold
/// duplicates, in which case index creation fails. That is logged and
/// startup continues: the duplicate guard still checks before inserting.
async fn create_unique_indexes(pool: &SqlitePool) {
    let indexes = [
        (
            "idx_contacts_phone_number",
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_phone_number
            ON contacts(phone_number)
            WHERE trim(phone_number) <> ''
            "#,
        ),
        (
            "idx_contacts_address",
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_address
            ON contacts(address)
            WHERE trim(address) <> ''
            "#,
        ),
    ];

    for (name, sql) in indexes {
        if let Err(e) = sqlx::query(sql).execute(pool).await {
            warn!(
                index = name,
                error = %e,
                "Could not create unique index (existing duplicates?); relying on duplicate check only"
            );
        }
    }
}
