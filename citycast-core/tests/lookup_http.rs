//! Network-level tests for the lookup operation, driven through the
//! session against a local mock server.

use citycast_core::{LookupSession, OpenWeatherProvider};
use httpmock::prelude::*;
use serde_json::json;

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_endpoint(format!("{}/data/2.5/weather", server.base_url()))
}

#[tokio::test]
async fn successful_lookup_maps_response_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/data/2.5/weather")
            .query_param("q", "Paris")
            .query_param("units", "metric")
            .query_param("appid", "KEY");
        then.status(200).json_body(json!({
            "name": "Paris",
            "sys": {"country": "FR"},
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60}
        }));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "Paris", Some("KEY")).await;

    mock.assert();
    assert!(!session.is_loading());
    assert_eq!(session.error(), None);

    let snapshot = session.snapshot().expect("snapshot should be present");
    assert_eq!(snapshot.location, "Paris, FR");
    assert_eq!(snapshot.description, "clear sky");
    assert_eq!(snapshot.temperature, Some(18.4));
    assert_eq!(snapshot.feels_like, Some(17.9));
    assert_eq!(snapshot.humidity, Some(60));
}

#[tokio::test]
async fn city_with_spaces_is_escaped_into_the_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/data/2.5/weather")
            .query_param("q", "New York");
        then.status(200).json_body(json!({
            "name": "New York",
            "sys": {"country": "US"},
            "weather": [{"description": "mist"}],
            "main": {"temp": 9.0}
        }));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "New York", Some("KEY")).await;

    mock.assert();
    assert_eq!(
        session.snapshot().map(|s| s.location.as_str()),
        Some("New York, US")
    );
}

#[tokio::test]
async fn rejection_with_message_surfaces_the_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather");
        then.status(404)
            .json_body(json!({"cod": "404", "message": "city not found"}));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "Nowhere", Some("KEY")).await;

    assert_eq!(session.error(), Some("city not found"));
    assert!(session.snapshot().is_none());
}

#[tokio::test]
async fn rejection_without_message_uses_the_fallback() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather");
        then.status(500).body("internal error");
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "Paris", Some("KEY")).await;

    assert_eq!(session.error(), Some("Unable to fetch weather data."));
    assert!(session.snapshot().is_none());
}

#[tokio::test]
async fn transport_failure_uses_the_generic_message() {
    // Port 0 is never connectable, so the request fails before any response.
    let provider = OpenWeatherProvider::with_endpoint("http://127.0.0.1:0/data/2.5/weather");
    let mut session = LookupSession::new();
    session.submit(&provider, "Paris", Some("KEY")).await;

    assert_eq!(session.error(), Some("Something went wrong."));
    assert!(session.snapshot().is_none());
}

#[tokio::test]
async fn malformed_success_body_uses_the_generic_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather");
        then.status(200).body("<html>definitely not json</html>");
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "Paris", Some("KEY")).await;

    assert_eq!(session.error(), Some("Something went wrong."));
    assert!(session.snapshot().is_none());
}

#[tokio::test]
async fn blank_city_never_issues_a_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather");
        then.status(200).json_body(json!({"name": "Paris"}));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();
    session.submit(&provider, "   ", Some("KEY")).await;

    assert_eq!(mock.calls(), 0);
    assert_eq!(session.error(), Some("Please enter a city name."));
}

#[tokio::test]
async fn missing_key_never_issues_a_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather");
        then.status(200).json_body(json!({"name": "Paris"}));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();

    session.submit(&provider, "Paris", None).await;
    assert_eq!(session.error(), Some("Missing API key configuration."));

    session.submit(&provider, "Paris", Some("  ")).await;
    assert_eq!(session.error(), Some("Missing API key configuration."));

    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn failed_submission_clears_the_previous_snapshot() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather").query_param("q", "Paris");
        then.status(200).json_body(json!({
            "name": "Paris",
            "sys": {"country": "FR"},
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 18.4}
        }));
    });
    server.mock(|when, then| {
        when.method(Method::GET).path("/data/2.5/weather").query_param("q", "Nowhere");
        then.status(404)
            .json_body(json!({"cod": "404", "message": "city not found"}));
    });

    let provider = provider_for(&server);
    let mut session = LookupSession::new();

    session.submit(&provider, "Paris", Some("KEY")).await;
    assert!(session.snapshot().is_some());

    session.submit(&provider, "Nowhere", Some("KEY")).await;
    assert_eq!(session.error(), Some("city not found"));
    assert!(session.snapshot().is_none());
}
