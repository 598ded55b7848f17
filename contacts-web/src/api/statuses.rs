//! Status vocabularies for the contact form

use axum::{extract::State, Json};
use contacts_common::StatusVocabularies;

use crate::AppState;

/// GET /api/statuses
pub async fn get_statuses(State(state): State<AppState>) -> Json<StatusVocabularies> {
    Json(state.statuses.as_ref().clone())
}
