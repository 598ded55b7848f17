//! Reverse phone lookup endpoint
//!
//! Always answers 200: a failed lookup just means nothing to pre-fill.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::services::reverse_lookup::{LookupError, LookupResult};
use crate::AppState;

/// Query parameters for lookup
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub phone: String,
}

/// Lookup response; fields are empty when `found` is false
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub found: bool,
    #[serde(flatten)]
    pub result: LookupResult,
}

impl LookupResponse {
    fn not_found() -> Self {
        Self {
            found: false,
            result: LookupResult::default(),
        }
    }
}

/// GET /api/lookup?phone=
pub async fn lookup_phone(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Json<LookupResponse> {
    let phone = query.phone.trim();
    if phone.is_empty() {
        return Json(LookupResponse::not_found());
    }

    match state.lookup.lookup_by_phone(phone).await {
        Ok(result) => {
            info!(phone, "Reverse lookup found a listing");
            Json(LookupResponse {
                found: true,
                result,
            })
        }
        Err(LookupError::Disabled) => Json(LookupResponse::not_found()),
        Err(e) => {
            warn!(phone, error = %e, "Reverse lookup failed");
            Json(LookupResponse::not_found())
        }
    }
}
