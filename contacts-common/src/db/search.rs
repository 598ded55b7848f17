//! Free-text contact search
//!
//! The query is trimmed and lowercased, then matched as a plain substring
//! against seven text columns, any of which may hit. An empty query matches
//! everything. `%` and `_` are ordinary characters: matching uses `instr`,
//! not `LIKE`.
//!
//! Lowercasing on both sides is ASCII-only, so accented capitals only match
//! themselves.

use crate::db::contacts::{self, CONTACT_COLUMNS};
use crate::db::models::Contact;
use crate::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

/// Columns the search looks into
pub const SEARCHABLE_COLUMNS: [&str; 7] = [
    "last_name",
    "first_name",
    "phone_number",
    "address",
    "contact_status",
    "response_status",
    "note",
];

/// Matching contacts plus how many there are
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub items: Vec<Contact>,
    pub total: i64,
}

/// Normalize a raw query; `None` means "no filter"
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}

/// `WHERE` clause ORing a containment test per searchable column
///
/// Takes one bind parameter per column, all bound to the same needle.
fn match_clause() -> String {
    let tests: Vec<String> = SEARCHABLE_COLUMNS
        .iter()
        .map(|col| format!("instr(lower({}), ?) > 0", col))
        .collect();
    format!("WHERE {}", tests.join(" OR "))
}

/// Search contacts
///
/// Items and total come from two separate queries over the same predicate.
pub async fn search(pool: &SqlitePool, raw_query: &str) -> Result<SearchResult> {
    let Some(needle) = normalize_query(raw_query) else {
        let items = contacts::get_all(pool).await?;
        let total = contacts::count_all(pool).await?;
        return Ok(SearchResult { items, total });
    };

    let clause = match_clause();

    let items_sql = format!(
        "SELECT {} FROM contacts {} ORDER BY id ASC",
        CONTACT_COLUMNS, clause
    );
    let mut items_query = sqlx::query(&items_sql);
    for _ in SEARCHABLE_COLUMNS {
        items_query = items_query.bind(needle.as_str());
    }
    let rows = items_query.fetch_all(pool).await?;
    let items: Vec<Contact> = rows.iter().map(Contact::from_row).collect();

    let count_sql = format!("SELECT COUNT(*) FROM contacts {}", clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for _ in SEARCHABLE_COLUMNS {
        count_query = count_query.bind(needle.as_str());
    }
    let total = count_query.fetch_one(pool).await?;

    debug!(query = %needle, total, "Contact search");

    Ok(SearchResult { items, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_query("  DuRand "), Some("durand".to_string()));
        assert_eq!(normalize_query("0601"), Some("0601".to_string()));
    }

    #[test]
    fn test_blank_query_is_no_filter() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query(" \t\n"), None);
    }

    #[test]
    fn test_match_clause_covers_every_column() {
        let clause = match_clause();
        for col in SEARCHABLE_COLUMNS {
            assert!(clause.contains(&format!("lower({})", col)), "missing {}", col);
        }
        assert_eq!(clause.matches('?').count(), SEARCHABLE_COLUMNS.len());
        assert_eq!(clause.matches(" OR ").count(), SEARCHABLE_COLUMNS.len() - 1);
    }
}
