//! Outbound collaborators
//!
//! Both are best-effort: handlers log their failures and answer with an
//! empty result, never an error status.

pub mod geocoder;
pub mod reverse_lookup;

/// User-Agent sent to third-party services
pub(crate) const USER_AGENT: &str = concat!("contacts-web/", env!("CARGO_PKG_VERSION"));
