//! Status vocabularies
//!
//! Two closed, ordered lists used to categorize contacts: how the contact
//! was reached and how they answered. The lists only populate the UI; writes
//! are never validated against them.

use serde::{Deserialize, Serialize};

/// Default contact-channel statuses, in display order
pub const DEFAULT_CONTACT_STATUSES: &[&str] =
    &["Pending", "Mass-market outlet", "Door-to-door", "Phone"];

/// Default response statuses, in display order
pub const DEFAULT_RESPONSE_STATUSES: &[&str] = &[
    "Pending",
    "Possible",
    "Accepted",
    "Declined",
    "To be recontacted",
];

/// Both vocabularies as served to the UI
///
/// Either list can be replaced from the `[statuses]` table of the TOML
/// config; a missing key keeps the default list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusVocabularies {
    #[serde(alias = "contact", default = "default_contact")]
    pub contact_status: Vec<String>,
    #[serde(alias = "response", default = "default_response")]
    pub response_status: Vec<String>,
}

fn default_contact() -> Vec<String> {
    DEFAULT_CONTACT_STATUSES.iter().map(|s| s.to_string()).collect()
}

fn default_response() -> Vec<String> {
    DEFAULT_RESPONSE_STATUSES.iter().map(|s| s.to_string()).collect()
}

impl Default for StatusVocabularies {
    fn default() -> Self {
        Self {
            contact_status: default_contact(),
            response_status: default_response(),
        }
    }
}

impl StatusVocabularies {
    /// Whether `value` is one of the contact-channel statuses
    pub fn is_contact_status(&self, value: &str) -> bool {
        self.contact_status.iter().any(|s| s == value)
    }

    /// Whether `value` is one of the response statuses
    pub fn is_response_status(&self, value: &str) -> bool {
        self.response_status.iter().any(|s| s == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabularies_order() {
        let v = StatusVocabularies::default();
        assert_eq!(
            v.contact_status,
            vec!["Pending", "Mass-market outlet", "Door-to-door", "Phone"]
        );
        assert_eq!(v.response_status.first().map(String::as_str), Some("Pending"));
        assert_eq!(
            v.response_status.last().map(String::as_str),
            Some("To be recontacted")
        );
    }

    #[test]
    fn test_membership_is_exact() {
        let v = StatusVocabularies::default();
        assert!(v.is_contact_status("Door-to-door"));
        assert!(!v.is_contact_status("door-to-door"));
        assert!(v.is_response_status("Declined"));
        assert!(!v.is_response_status("Phone"));
    }

    #[test]
    fn test_partial_override_keeps_other_default() {
        let v: StatusVocabularies = toml::from_str(r#"response = ["Yes", "No"]"#).unwrap();
        assert_eq!(v.response_status, vec!["Yes", "No"]);
        assert_eq!(v.contact_status, StatusVocabularies::default().contact_status);
    }

    #[test]
    fn test_serializes_for_ui() {
        let json = serde_json::to_value(StatusVocabularies::default()).unwrap();
        assert_eq!(json["contact_status"][3], "Phone");
        assert_eq!(json["response_status"][1], "Possible");
    }
}
