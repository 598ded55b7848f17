//! Reverse phone-number lookup
//!
//! Finds the name and address listed for a phone number in an online
//! directory. The result only pre-fills the contact form, so every failure
//! is tolerated by the caller.
//!
//! [`DirectoryLookup`] fetches one results page and reads the first element
//! matching each of two CSS selectors (name, address). Directories print the
//! family name first, so the first word of the name becomes the last name.

use std::time::Duration;

use async_trait::async_trait;
use contacts_common::config::LookupConfig;
use reqwest::{header, Client};
use scraper::{Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::USER_AGENT;

/// What the directory knows about a number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub address: Option<String>,
}

/// Reverse lookup failures
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Reverse lookup is disabled")]
    Disabled,

    #[error("Reverse lookup is enabled but no url_template is configured")]
    MissingUrlTemplate,

    #[error("Invalid CSS selector {0}")]
    Selector(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory returned status {0}")]
    Status(u16),

    #[error("No listing found")]
    NoListing,
}

/// Phone number -> best-effort name and address
#[async_trait]
pub trait ReverseLookupProvider: Send + Sync {
    async fn lookup_by_phone(&self, phone_number: &str) -> Result<LookupResult, LookupError>;
}

/// Provider used when no directory is configured
pub struct DisabledLookup;

#[async_trait]
impl ReverseLookupProvider for DisabledLookup {
    async fn lookup_by_phone(&self, _phone_number: &str) -> Result<LookupResult, LookupError> {
        Err(LookupError::Disabled)
    }
}

/// Scrapes a directory results page
pub struct DirectoryLookup {
    http_client: Client,
    url_template: String,
    name_selector: String,
    address_selector: String,
}

impl DirectoryLookup {
    /// Build from config, validating the URL template and both selectors
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let url_template = config
            .url_template
            .clone()
            .ok_or(LookupError::MissingUrlTemplate)?;

        // Selectors are re-parsed per lookup; fail fast on typos here
        parse_selector(&config.name_selector)?;
        parse_selector(&config.address_selector)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            url_template,
            name_selector: config.name_selector.clone(),
            address_selector: config.address_selector.clone(),
        })
    }

    /// Results page URL for a number
    pub fn url_for(&self, phone_number: &str) -> String {
        self.url_template
            .replace("{phone}", &encode_phone(phone_number))
    }

    /// Extract name and address from a results page
    pub fn parse_listing(&self, html: &str) -> Result<LookupResult, LookupError> {
        let document = Html::parse_document(html);
        let name = first_text(&document, &parse_selector(&self.name_selector)?);
        let address = first_text(&document, &parse_selector(&self.address_selector)?);

        if name.is_none() && address.is_none() {
            return Err(LookupError::NoListing);
        }

        let (last_name, first_name) = match name {
            Some(name) => split_name(&name),
            None => (None, None),
        };

        Ok(LookupResult {
            last_name,
            first_name,
            address,
        })
    }
}

#[async_trait]
impl ReverseLookupProvider for DirectoryLookup {
    async fn lookup_by_phone(&self, phone_number: &str) -> Result<LookupResult, LookupError> {
        let url = self.url_for(phone_number);
        debug!(%url, "Reverse lookup request");

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        self.parse_listing(&body)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, LookupError> {
    Selector::parse(selector).map_err(|e| LookupError::Selector(format!("{:?}: {:?}", selector, e)))
}

/// Whitespace-collapsed text of the first matching element, if non-empty
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

/// Keep digits and a leading `+` (percent-encoded) so the number is URL-safe
fn encode_phone(phone_number: &str) -> String {
    phone_number
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect::<String>()
        .replace('+', "%2B")
}

/// "DURAND Jean Pierre" -> (Some("DURAND"), Some("Jean Pierre"))
pub fn split_name(full_name: &str) -> (Option<String>, Option<String>) {
    let mut words = full_name.split_whitespace();
    let last_name = words.next().map(str::to_string);
    let rest = words.collect::<Vec<_>>().join(" ");
    let first_name = if rest.is_empty() { None } else { Some(rest) };
    (last_name, first_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> DirectoryLookup {
        DirectoryLookup::new(&LookupConfig {
            enabled: true,
            url_template: Some("https://directory.example/search?number={phone}".to_string()),
            name_selector: ".listing .name".to_string(),
            address_selector: ".listing .address".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("  DURAND   Jean Pierre "),
            (Some("DURAND".to_string()), Some("Jean Pierre".to_string()))
        );
        assert_eq!(split_name("Durand"), (Some("Durand".to_string()), None));
        assert_eq!(split_name("   "), (None, None));
    }

    #[test]
    fn test_url_for_strips_formatting() {
        let l = lookup();
        assert_eq!(
            l.url_for("06 01.02-03 04"),
            "https://directory.example/search?number=0601020304"
        );
        assert_eq!(
            l.url_for("+33601020304"),
            "https://directory.example/search?number=%2B33601020304"
        );
    }

    #[test]
    fn test_parse_listing_takes_first_match() {
        let html = r#"
            <html><body>
              <div class="listing">
                <a class="name">DURAND
                   Jean</a>
                <p class="address"><span>1 Rue A</span>, <span>75001 Paris</span></p>
              </div>
              <div class="listing">
                <a class="name">MARTIN Paul</a>
              </div>
            </body></html>
        "#;

        let result = lookup().parse_listing(html).unwrap();
        assert_eq!(result.last_name.as_deref(), Some("DURAND"));
        assert_eq!(result.first_name.as_deref(), Some("Jean"));
        assert_eq!(result.address.as_deref(), Some("1 Rue A , 75001 Paris"));
    }

    #[test]
    fn test_parse_listing_without_match() {
        let err = lookup()
            .parse_listing("<html><body><p>No result</p></body></html>")
            .unwrap_err();
        assert!(matches!(err, LookupError::NoListing));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = LookupConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(matches!(
            DirectoryLookup::new(&config),
            Err(LookupError::MissingUrlTemplate)
        ));

        config.url_template = Some("https://directory.example/{phone}".to_string());
        config.name_selector = "[[[".to_string();
        assert!(matches!(
            DirectoryLookup::new(&config),
            Err(LookupError::Selector(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_lookup() {
        let err = DisabledLookup.lookup_by_phone("0601020304").await.unwrap_err();
        assert!(matches!(err, LookupError::Disabled));
    }
}
