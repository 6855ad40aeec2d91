#![cfg(feature = "live_rates")]

use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use webtools_core::currency::client::ExchangeRateClient;
use webtools_core::currency::{self, CurrencyCode, CurrencyConversionInput};
use webtools_core::{ErrorKind, WebToolsError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

async fn client_for(server: &MockServer) -> ExchangeRateClient {
    ExchangeRateClient::new(format!("{}/v4/", server.uri()), Duration::from_secs(5)).unwrap()
}

// ===========================================================================
// Successful fetch
// ===========================================================================

#[tokio::test]
async fn test_latest_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2024-05-01",
            "time_last_updated": 1714521601,
            "rates": { "USD": 1, "EUR": 0.92, "GBP": 0.79, "JPY": 151.2, "CHF": 0.905 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server).await.latest(&CurrencyCode::usd()).await.unwrap();
    assert_eq!(snapshot.base, CurrencyCode::usd());
    assert_eq!(snapshot.rates.len(), 5);
    assert_eq!(snapshot.rate(&code("EUR")).unwrap(), dec!(0.92));
    assert!(snapshot.fetched_at.is_some());
    assert_eq!(snapshot.date.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));

    let out = currency::convert_currency(&CurrencyConversionInput {
        amount: dec!(100),
        from: code("USD"),
        to: code("EUR"),
        snapshot,
    })
    .unwrap()
    .result;
    assert_eq!(out.converted, dec!(92));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": "EUR",
            "rates": { "USD": 1.087 }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(!client.base_url().ends_with('/'));
    let snapshot = client.latest(&code("eur")).await.unwrap();
    assert_eq!(snapshot.base, code("EUR"));
}

// ===========================================================================
// Failures
// ===========================================================================

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).await.latest(&CurrencyCode::usd()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.latest(&CurrencyCode::usd()).await.unwrap_err();
    assert!(matches!(err, WebToolsError::Serialization(_)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Processing);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = ExchangeRateClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let err = client.latest(&CurrencyCode::usd()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
