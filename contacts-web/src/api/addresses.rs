//! Address autocomplete endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;

/// Query parameters for suggestions
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/address-suggestions?q=
///
/// Empty input, and any upstream failure, answer `[]`.
pub async fn suggest_addresses(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<Vec<String>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Json(Vec::new());
    }

    match state.suggester.suggest(q).await {
        Ok(labels) => Json(labels),
        Err(e) => {
            warn!(query = q, error = %e, "Address suggestion failed");
            Json(Vec::new())
        }
    }
}
