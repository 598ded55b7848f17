//! contacts-web library - contact manager HTTP service
//!
//! JSON API over the contact store plus the bundled browser UI, the
//! address autocomplete proxy and the reverse phone lookup.

use std::sync::Arc;

use axum::Router;
use contacts_common::StatusVocabularies;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;

use services::geocoder::{AddressSuggester, DisabledSuggester};
use services::reverse_lookup::{DisabledLookup, ReverseLookupProvider};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, opened once at startup
    pub db: SqlitePool,
    /// Status lists offered by the contact form
    pub statuses: Arc<StatusVocabularies>,
    /// Phone number -> name/address
    pub lookup: Arc<dyn ReverseLookupProvider>,
    /// Partial address -> suggestions
    pub suggester: Arc<dyn AddressSuggester>,
}

impl AppState {
    /// State with default vocabularies and both collaborators disabled
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            statuses: Arc::new(StatusVocabularies::default()),
            lookup: Arc::new(DisabledLookup),
            suggester: Arc::new(DisabledSuggester),
        }
    }

    pub fn with_statuses(mut self, statuses: StatusVocabularies) -> Self {
        self.statuses = Arc::new(statuses);
        self
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn ReverseLookupProvider>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn AddressSuggester>) -> Self {
        self.suggester = suggester;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route(
            "/api/contacts",
            get(api::list_contacts).post(api::create_contact),
        )
        .route("/api/contacts/status", post(api::update_status_by_phone))
        .route(
            "/api/contacts/:id",
            get(api::get_contact)
                .put(api::update_contact)
                .delete(api::delete_contact),
        )
        .route("/api/statuses", get(api::get_statuses))
        .route("/api/lookup", get(api::lookup_phone))
        .route("/api/address-suggestions", get(api::suggest_addresses))
        .route("/api/buildinfo", get(api::get_build_info));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js));

    Router::new()
        .merge(api)
        .merge(ui)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
