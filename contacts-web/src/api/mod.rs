//! HTTP API handlers for contacts-web

pub mod addresses;
pub mod buildinfo;
pub mod contacts;
pub mod health;
pub mod lookup;
pub mod statuses;
pub mod ui;

pub use addresses::suggest_addresses;
pub use buildinfo::get_build_info;
pub use contacts::{
    create_contact, delete_contact, get_contact, list_contacts, update_contact,
    update_status_by_phone,
};
pub use health::health_routes;
pub use lookup::lookup_phone;
pub use statuses::get_statuses;
pub use ui::{serve_app_js, serve_index};
