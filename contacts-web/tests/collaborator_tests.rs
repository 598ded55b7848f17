//! Address suggestion and reverse lookup clients against a mock HTTP server

use contacts_common::config::{GeocoderConfig, LookupConfig};
use contacts_web::services::geocoder::{AddressSuggester, GeocoderClient, SuggestError};
use contacts_web::services::reverse_lookup::{DirectoryLookup, LookupError, ReverseLookupProvider};
use mockito::Matcher;

fn geocoder(base_url: String) -> GeocoderClient {
    GeocoderClient::new(&GeocoderConfig {
        base_url,
        limit: 3,
        timeout_secs: 5,
    })
    .expect("Should build geocoder client")
}

fn directory(server_url: &str) -> DirectoryLookup {
    DirectoryLookup::new(&LookupConfig {
        enabled: true,
        url_template: Some(format!("{}/annuaire?number={{phone}}", server_url)),
        name_selector: ".denomination-links".to_string(),
        address_selector: ".bi-address a".to_string(),
        timeout_secs: 5,
    })
    .expect("Should build directory lookup")
}

// =============================================================================
// Address suggestions
// =============================================================================

#[tokio::test]
async fn test_geocoder_returns_labels_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "8 bd du port".into()),
            Matcher::UrlEncoded("limit".into(), "3".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"label": "8 Boulevard du Port 80000 Amiens", "score": 0.9}},
                    {"type": "Feature", "properties": {"score": 0.5}},
                    {"type": "Feature", "properties": {"label": "8 Boulevard du Port 95000 Cergy"}}
                ]
            }"#,
        )
        .create_async()
        .await;

    let client = geocoder(format!("{}/search/", server.url()));
    let labels = client.suggest("  8 bd du port ").await.unwrap();

    assert_eq!(
        labels,
        vec![
            "8 Boulevard du Port 80000 Amiens".to_string(),
            "8 Boulevard du Port 95000 Cergy".to_string(),
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_geocoder_blank_query_skips_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = geocoder(format!("{}/search/", server.url()));
    assert!(client.suggest("   ").await.unwrap().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_geocoder_upstream_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = geocoder(format!("{}/search/", server.url()));
    let err = client.suggest("1 rue").await.unwrap_err();
    assert!(matches!(err, SuggestError::Status(503)));
}

#[tokio::test]
async fn test_geocoder_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = geocoder(format!("{}/search/", server.url()));
    let err = client.suggest("1 rue").await.unwrap_err();
    assert!(matches!(err, SuggestError::Http(_)));
}

// =============================================================================
// Reverse lookup
// =============================================================================

#[tokio::test]
async fn test_directory_lookup_parses_listing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/annuaire")
        .match_query(Matcher::UrlEncoded("number".into(), "0601020304".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            r#"<html><body>
                <article>
                  <a class="denomination-links">DURAND Jean</a>
                  <div class="bi-address"><a href="/map">1 Rue A 75001 Paris</a></div>
                </article>
            </body></html>"#,
        )
        .create_async()
        .await;

    let lookup = directory(&server.url());
    let result = lookup.lookup_by_phone("06 01 02 03 04").await.unwrap();

    assert_eq!(result.last_name.as_deref(), Some("DURAND"));
    assert_eq!(result.first_name.as_deref(), Some("Jean"));
    assert_eq!(result.address.as_deref(), Some("1 Rue A 75001 Paris"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_directory_lookup_without_listing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/annuaire")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body><p>Aucun résultat</p></body></html>")
        .create_async()
        .await;

    let lookup = directory(&server.url());
    let err = lookup.lookup_by_phone("0999").await.unwrap_err();
    assert!(matches!(err, LookupError::NoListing));
}

#[tokio::test]
async fn test_directory_lookup_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/annuaire")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let lookup = directory(&server.url());
    let err = lookup.lookup_by_phone("0601020304").await.unwrap_err();
    assert!(matches!(err, LookupError::Status(404)));
}
