//! Authenticated client: bearer header, refresh-and-retry, error kinds.

mod common;

use serde_json::json;

use bike_rental::domain::{BikeType, QueryState};
use bike_rental::http::{ApiClient, AuthPolicy, Method};
use bike_rental::storage::TokenStore;
use bike_rental::ApiError;
use common::{bike, listing, logged_in_store, logged_out_store, query_param, MockTransport, BASE_URL};

#[test]
fn sends_bearer_token_and_json_content_type() {
    let transport = MockTransport::new();
    transport.reply(200, json!({"ok": true}));
    let client = ApiClient::new(BASE_URL, transport.clone(), logged_in_store());

    let response = client.request(Method::Get, "rentals/", None).unwrap();

    assert_eq!(response.body["ok"], true);
    let sent = transport.last_request();
    assert_eq!(sent.url, "https://api.test/api/v1/rentals/");
    assert_eq!(sent.header("authorization"), Some("Bearer access-1"));
    assert_eq!(sent.header("content-type"), Some("application/json"));
}

#[test]
fn missing_token_fails_locally_when_required() {
    let transport = MockTransport::new();
    let client = ApiClient::new(BASE_URL, transport.clone(), logged_out_store());

    let err = client.request(Method::Get, "rentals/", None).unwrap_err();

    assert!(err.is_auth());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn optional_auth_omits_header_without_token() {
    let transport = MockTransport::new();
    transport.reply(200, json!([]));
    let client = ApiClient::new(BASE_URL, transport.clone(), logged_out_store());

    client
        .request_with(AuthPolicy::Optional, Method::Get, "bikes/", None)
        .unwrap();

    assert_eq!(transport.last_request().header("Authorization"), None);
}

#[test]
fn unauthorized_refreshes_and_retries_once() {
    let transport = MockTransport::new();
    transport
        .reply(401, json!({"detail": "token expired"}))
        .reply(200, json!({"access": "access-2"}))
        .reply(201, json!({"id": 9}));
    let store = logged_in_store();
    let client = ApiClient::new(BASE_URL, transport.clone(), store.clone());

    let response = client
        .request(Method::Post, "rentals/", Some(json!({"bike": 1})))
        .unwrap();

    assert_eq!(response.status, 201);
    let sent = transport.requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[1].url, "https://api.test/api/v1/token/refresh/");
    assert_eq!(sent[1].body, Some(json!({"refresh": "refresh-1"})));
    assert_eq!(sent[2].header("Authorization"), Some("Bearer access-2"));
    assert_eq!(sent[2].body, Some(json!({"bike": 1})));
    assert_eq!(store.borrow().access_token().unwrap().as_deref(), Some("access-2"));
}

#[test]
fn second_unauthorized_clears_tokens() {
    let transport = MockTransport::new();
    transport
        .reply(401, json!({}))
        .reply(200, json!({"access": "access-2"}))
        .reply(401, json!({}));
    let store = logged_in_store();
    let client = ApiClient::new(BASE_URL, transport.clone(), store.clone());

    let err = client.request(Method::Get, "rentals/", None).unwrap_err();

    assert!(err.is_auth());
    assert_eq!(transport.request_count(), 3);
    assert!(!store.borrow().tokens().unwrap().is_logged_in());
}

#[test]
fn failed_refresh_clears_tokens_and_reports_auth() {
    let transport = MockTransport::new();
    transport
        .reply(401, json!({"detail": "expired"}))
        .reply(401, json!({"detail": "refresh expired"}));
    let store = logged_in_store();
    let client = ApiClient::new(BASE_URL, transport.clone(), store.clone());

    let err = client.request(Method::Get, "rentals/", None).unwrap_err();

    assert_eq!(err.user_message(), "Authentication failed. Please log in again.");
    assert_eq!(transport.request_count(), 2);
    assert!(store.borrow().access_token().unwrap().is_none());
    assert!(store.borrow().refresh_token().unwrap().is_none());
}

#[test]
fn refresh_failure_returns_none_and_clears_tokens() {
    let transport = MockTransport::new();
    transport.reply(401, json!({"detail": "Token is invalid or expired"}));
    let store = logged_in_store();
    let client = ApiClient::new(BASE_URL, transport.clone(), store.clone());

    assert_eq!(client.refresher().refresh(), None);
    assert!(!store.borrow().tokens().unwrap().is_logged_in());
}

#[test]
fn forbidden_does_not_refresh() {
    let transport = MockTransport::new();
    transport.reply(403, json!({"detail": "not allowed"}));
    let store = logged_in_store();
    let client = ApiClient::new(BASE_URL, transport.clone(), store.clone());

    assert!(client.request(Method::Delete, "bikes/1/", None).unwrap_err().is_auth());
    assert_eq!(transport.request_count(), 1);
    assert!(store.borrow().tokens().unwrap().is_logged_in());
}

#[test]
fn errors_are_classified() {
    let transport = MockTransport::new();
    transport
        .fail()
        .reply(503, json!({}))
        .reply(400, json!({"message": "bad dates", "detail": "ignored"}))
        .reply_raw(404, "<html>not found</html>");
    let client = ApiClient::new(BASE_URL, transport, logged_in_store());

    let network = client.request(Method::Get, "a/", None).unwrap_err();
    assert_eq!(network.user_message(), "Network error. Please check your connection.");

    let server = client.request(Method::Get, "a/", None).unwrap_err();
    assert_eq!(server.user_message(), "Server error. Please try again later.");

    let validation = client.request(Method::Get, "a/", None).unwrap_err();
    assert_eq!(validation.user_message(), "bad dates");

    let not_found = client.request(Method::Get, "a/", None).unwrap_err();
    assert_eq!(
        not_found,
        ApiError::Validation {
            status: 404,
            message: "HTTP 404 - Not Found".into()
        }
    );
}

#[test]
fn fetch_bikes_sends_api_parameters() {
    let transport = MockTransport::new();
    transport.reply(200, listing(vec![bike(1, "Ridge", "Mountain"), bike(2, "Peak", "Mountain")], 2));
    let client = ApiClient::new(BASE_URL, transport.clone(), logged_out_store());

    let query = QueryState {
        search_term: "trail bike".into(),
        type_filter: Some(BikeType::Mountain),
        ..QueryState::default()
    };
    let page = client.fetch_bikes(&query).unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages(), 1);

    let url = transport.last_request().url;
    assert!(url.starts_with("https://api.test/api/v1/bikes/?"));
    assert_eq!(query_param(&url, "search").as_deref(), Some("trail bike"));
    assert_eq!(query_param(&url, "bike_type").as_deref(), Some("Mountain"));
    assert_eq!(query_param(&url, "page").as_deref(), Some("1"));
    assert_eq!(query_param(&url, "status"), None);
    assert_eq!(query_param(&url, "ordering"), None);
}

#[test]
fn fetch_bikes_accepts_bare_array() {
    let transport = MockTransport::new();
    transport.reply(200, json!([bike(1, "A", "Road"), bike(2, "B", "Road"), bike(3, "C", "Road")]));
    let client = ApiClient::new(BASE_URL, transport, logged_out_store());

    let page = client.fetch_bikes(&QueryState::default()).unwrap();
    assert_eq!(page.total_count, 3);
}

#[test]
fn fetch_bikes_rejects_unexpected_shape() {
    let transport = MockTransport::new();
    transport.reply(200, json!({"bikes": []}));
    let client = ApiClient::new(BASE_URL, transport, logged_out_store());

    assert!(matches!(
        client.fetch_bikes(&QueryState::default()),
        Err(ApiError::Decode(_))
    ));
}

#[test]
fn base_url_gets_trailing_slash() {
    let transport = MockTransport::new();
    let client = ApiClient::new("https://api.test/api/v1", transport, logged_out_store());
    assert_eq!(client.base_url(), BASE_URL);
}
