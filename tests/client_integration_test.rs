use ankiweb_bridge::config::{UpstreamSettings, DEFAULT_USER_AGENT};
use ankiweb_bridge::core::encoding::encode_payload;
use ankiweb_bridge::core::CardSink;
use ankiweb_bridge::{AnkiWebClient, BridgeError, Card, DeckRegistry};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const EDITOR_PATH: &str = "/svc/editor/add-or-update";
const COOKIE: &str = "has_auth=1; ankiweb=test-token";

fn settings(endpoint: String) -> UpstreamSettings {
    UpstreamSettings {
        endpoint,
        cookie: COOKIE.to_string(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
        origin: "https://ankiuser.net".to_string(),
        referer: "https://ankiuser.net/add".to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn client_for(endpoint: String) -> AnkiWebClient {
    AnkiWebClient::new(&settings(endpoint), Arc::new(DeckRegistry::builtin())).unwrap()
}

#[tokio::test]
async fn test_add_card_sends_captured_headers() {
    let server = MockServer::start();
    let registry = DeckRegistry::builtin();
    let expected_len = encode_payload("Front", "Back", registry.resolve("test")).len();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(EDITOR_PATH)
            .header("content-type", "application/octet-stream")
            .header("cookie", COOKIE)
            .header("origin", "https://ankiuser.net")
            .header("referer", "https://ankiuser.net/add")
            .header("user-agent", DEFAULT_USER_AGENT)
            .header("content-length", expected_len.to_string());
        then.status(200).body("");
    });

    let client = client_for(server.url(EDITOR_PATH));
    let receipt = assert_ok!(client.add_card(&Card::new("Front", "Back"), "test").await);

    api_mock.assert();
    assert_eq!(receipt.status_code, 200);
    assert_eq!(receipt.payload_len, expected_len);
    assert_eq!(receipt.message, "Card successfully added to deck 'test'");
}

/// Body the editor expects for ("Front", "Back") in the "it" deck.
fn is_front_back_it_deck(req: &HttpMockRequest) -> bool {
    let mut expected = vec![0x0A, 5];
    expected.extend_from_slice(b"Front");
    expected.extend_from_slice(&[0x0A, 4]);
    expected.extend_from_slice(b"Back");
    expected.extend_from_slice(&[
        26, 14, 8, 177, 246, 164, 207, 197, 50, 16, 255, 146, 136, 170, 198, 50,
    ]);
    req.body.as_deref() == Some(expected.as_slice())
}

#[tokio::test]
async fn test_add_card_sends_exact_payload_bytes() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(EDITOR_PATH)
            .matches(is_front_back_it_deck);
        then.status(200);
    });

    let client = client_for(server.url(EDITOR_PATH));
    assert_ok!(client.add_card(&Card::new("Front", "Back"), "it").await);
    api_mock.assert();
}

#[tokio::test]
async fn test_non_200_status_is_surfaced_unchanged() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(EDITOR_PATH);
        then.status(403).body("session expired");
    });

    let client = client_for(server.url(EDITOR_PATH));
    let err = assert_err!(client.add_card(&Card::new("a", "b"), "default").await);

    api_mock.assert();
    match err {
        BridgeError::RejectedError { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "session expired");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_other_success_codes_count_as_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(EDITOR_PATH);
        then.status(201);
    });

    let client = client_for(server.url(EDITOR_PATH));
    let err = assert_err!(client.add_card(&Card::new("a", "b"), "default").await);
    assert_eq!(err.status_code(), Some(201));
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    // nothing listens on port 1
    let client = client_for("http://127.0.0.1:1/svc/editor/add-or-update".to_string());
    let err = assert_err!(client.add_card(&Card::new("a", "b"), "default").await);

    assert!(matches!(err, BridgeError::TransportError(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_unknown_deck_sends_default_suffix() {
    let server = MockServer::start();
    let registry = DeckRegistry::builtin();
    let default_len = encode_payload("x", "y", registry.resolve("default")).len();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(EDITOR_PATH)
            .header("content-length", default_len.to_string());
        then.status(200);
    });

    let client = client_for(server.url(EDITOR_PATH));
    assert_ok!(client.add_card(&Card::new("x", "y"), "no_such_deck").await);
    api_mock.assert();
}

#[test]
fn test_invalid_cookie_header_is_rejected() {
    let mut bad = settings("http://localhost/".to_string());
    bad.cookie = "line\nbreak".to_string();

    let result = AnkiWebClient::new(&bad, Arc::new(DeckRegistry::builtin()));
    assert!(matches!(
        result,
        Err(BridgeError::InvalidConfigValueError { .. })
    ));
}
