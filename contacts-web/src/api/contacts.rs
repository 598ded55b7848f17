//! Contact CRUD endpoints
//!
//! Thin wrappers over the contacts-common store. Unknown ids on update and
//! delete answer `{"changes": 0}`, not an error; a duplicate on create is a
//! 200 with a notice pointing at the existing contact.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contacts_common::db::{self, contacts, CreateOutcome, SearchResult};
use contacts_common::{Contact, ContactFields, StatusVocabularies};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Free-text filter; blank or missing lists everything
    #[serde(default)]
    pub q: Option<String>,
}

/// Rows touched by a write
#[derive(Debug, Serialize)]
pub struct ChangesResponse {
    pub changes: u64,
}

/// Body of the status shortcut
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub phone_number: String,
    pub response_status: String,
}

/// GET /api/contacts?q=
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<SearchResult>> {
    let result = db::search(&state.db, query.q.as_deref().unwrap_or("")).await?;
    Ok(Json(result))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Contact>> {
    contacts::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("contact {}", id)))
}

/// POST /api/contacts
///
/// 201 `{"id": n}` when created, 200 `{"duplicate": {...}}` when an existing
/// contact already has this phone number or address.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(fields): Json<ContactFields>,
) -> ApiResult<Response> {
    log_unlisted_statuses(&state.statuses, &fields);

    let response = match db::create_unique(&state.db, &fields).await? {
        CreateOutcome::Created { id } => {
            info!(id, "Created contact");
            (StatusCode::CREATED, Json(json!({ "id": id }))).into_response()
        }
        CreateOutcome::Duplicate { conflicting_id } => (
            StatusCode::OK,
            Json(json!({
                "duplicate": {
                    "conflicting_id": conflicting_id,
                    "message": "This contact already exists (same phone number or address). Edit it instead?",
                }
            })),
        )
            .into_response(),
    };

    Ok(response)
}

/// PUT /api/contacts/:id
///
/// Full overwrite: fields missing from the body are cleared.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<ContactFields>,
) -> ApiResult<Json<ChangesResponse>> {
    log_unlisted_statuses(&state.statuses, &fields);

    let changes = contacts::update(&state.db, id, &fields).await?;
    Ok(Json(ChangesResponse { changes }))
}

/// DELETE /api/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ChangesResponse>> {
    let changes = contacts::delete(&state.db, id).await?;
    if changes > 0 {
        info!(id, "Deleted contact");
    }
    Ok(Json(ChangesResponse { changes }))
}

/// POST /api/contacts/status
///
/// Sets the response status of the contact(s) holding a phone number.
pub async fn update_status_by_phone(
    State(state): State<AppState>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<ChangesResponse>> {
    if !state.statuses.is_response_status(&update.response_status) {
        debug!(
            status = %update.response_status,
            "Response status outside the configured vocabulary"
        );
    }

    let changes =
        contacts::update_status_by_phone(&state.db, &update.phone_number, &update.response_status).await?;
    Ok(Json(ChangesResponse { changes }))
}

/// Status values the form would not offer; stored anyway
fn unlisted_statuses<'a>(statuses: &StatusVocabularies, fields: &'a ContactFields) -> Vec<&'a str> {
    let mut unlisted = Vec::new();
    if let Some(value) = fields.contact_status.as_deref() {
        if !value.is_empty() && !statuses.is_contact_status(value) {
            unlisted.push(value);
        }
    }
    if let Some(value) = fields.response_status.as_deref() {
        if !value.is_empty() && !statuses.is_response_status(value) {
            unlisted.push(value);
        }
    }
    unlisted
}

fn log_unlisted_statuses(statuses: &StatusVocabularies, fields: &ContactFields) {
    let unlisted = unlisted_statuses(statuses, fields);
    if !unlisted.is_empty() {
        debug!(?unlisted, "Statuses outside the configured vocabulary");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlisted_statuses() {
        let statuses = StatusVocabularies::default();

        let listed = ContactFields {
            contact_status: Some("Door-to-door".to_string()),
            response_status: Some("Accepted".to_string()),
            ..Default::default()
        };
        assert!(unlisted_statuses(&statuses, &listed).is_empty());

        // Each list is checked against its own vocabulary
        let swapped = ContactFields {
            contact_status: Some("Accepted".to_string()),
            response_status: Some("Phone".to_string()),
            ..Default::default()
        };
        assert_eq!(unlisted_statuses(&statuses, &swapped), vec!["Accepted", "Phone"]);

        let empty = ContactFields {
            contact_status: Some(String::new()),
            ..Default::default()
        };
        assert!(unlisted_statuses(&statuses, &empty).is_empty());
    }
}
