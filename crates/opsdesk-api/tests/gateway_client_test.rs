// Integration tests for `GatewayClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdesk_api::{Error, GatewayClient, TransportConfig};

#[derive(Debug, serde::Deserialize)]
struct TicketRow {
    id: String,
    title: String,
    #[serde(default)]
    status: Option<String>,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let client = GatewayClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_ordered() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": "t2", "title": "VPN down", "status": "open" },
        { "id": "t1", "title": "Printer jam", "status": "resolved" },
    ]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let rows: Vec<TicketRow> = client.fetch_ordered("tickets").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "t2");
    assert_eq!(rows[0].title, "VPN down");
    assert_eq!(rows[1].id, "t1");
    assert_eq!(rows[1].status.as_deref(), Some("resolved"));
}

#[tokio::test]
async fn test_fetch_ordered_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rows: Vec<TicketRow> = client.fetch_ordered("tickets").await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_insert_returning() {
    let (server, client) = setup().await;

    let stored = json!([{
        "id": "t1",
        "title": "Printer jam",
        "status": "open",
    }]);

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({ "title": "Printer jam" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&stored))
        .mount(&server)
        .await;

    let row: TicketRow = client
        .insert_returning("tickets", &json!({ "title": "Printer jam" }))
        .await
        .unwrap();

    assert_eq!(row.id, "t1");
    assert_eq!(row.title, "Printer jam");
    assert_eq!(row.status.as_deref(), Some("open"));
}

#[tokio::test]
async fn test_insert_returning_empty_array() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result: Result<TicketRow, _> = client
        .insert_returning("tickets", &json!({ "title": "Printer jam" }))
        .await;

    match result {
        Err(Error::NoRepresentation { ref collection }) => {
            assert_eq!(collection, "tickets");
        }
        other => panic!("expected NoRepresentation, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_by_id_sends_only_given_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.t1"))
        .and(body_json(json!({ "status": "resolved" })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .update_by_id("tickets", "t1", &json!({ "status": "resolved" }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_by_id() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/customers"))
        .and(query_param("id", "eq.c7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_by_id("customers", "c7").await.unwrap();
}

#[tokio::test]
async fn test_api_key_headers() {
    let server = MockServer::start().await;

    let client = GatewayClient::from_api_key(
        &server.uri(),
        &SecretString::from("sk-test"),
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(header("apikey", "sk-test"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rows: Vec<TicketRow> = client.fetch_ordered("tickets").await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_base_url_already_prefixed() {
    let server = MockServer::start().await;

    let base = format!("{}/rest/v1", server.uri());
    let client = GatewayClient::from_reqwest(&base, reqwest::Client::new()).unwrap();

    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rows: Vec<TicketRow> = client.fetch_ordered("tickets").await.unwrap();

    assert!(rows.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result: Result<Vec<TicketRow>, _> = client.fetch_ordered("tickets").await;

    let err = result.unwrap_err();
    assert!(err.is_auth());
    assert!(
        matches!(err, Error::InvalidApiKey),
        "expected InvalidApiKey, got: {err:?}"
    );
}

#[tokio::test]
async fn test_error_403_permission_denied() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "permission denied for table tickets"
        })))
        .mount(&server)
        .await;

    let result = client.delete_by_id("tickets", "t1").await;

    match result {
        Err(Error::PermissionDenied { ref message }) => {
            assert_eq!(message, "permission denied for table tickets");
        }
        other => panic!("expected PermissionDenied, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })),
        )
        .mount(&server)
        .await;

    let result: Result<Vec<TicketRow>, _> = client.fetch_ordered("nonexistent").await;

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Gateway {
            status, ref message, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected Gateway 404 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_409_conflict_with_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint",
            "code": "23505"
        })))
        .mount(&server)
        .await;

    let result: Result<TicketRow, _> = client
        .insert_returning("tickets", &json!({ "title": "dup" }))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.gateway_error_code(), Some("23505"));
    match err {
        Error::Gateway { status, .. } => assert_eq!(status, 409),
        other => panic!("expected Gateway 409 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_bare() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result: Result<Vec<TicketRow>, _> = client.fetch_ordered("tickets").await;

    match result {
        Err(Error::Gateway {
            status, ref code, ..
        }) => {
            assert_eq!(status, 500);
            assert!(code.is_none());
        }
        other => panic!("expected Gateway 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result: Result<Vec<TicketRow>, _> = client.fetch_ordered("tickets").await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "not json");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
