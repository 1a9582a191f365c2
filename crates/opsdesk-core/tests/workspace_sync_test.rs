#![allow(clippy::unwrap_used)]
// Scenario tests for `Workspace` and its entity stores using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdesk_core::model::requests::{
    CustomerPatch, IntegrationPatch, NewCustomer, NewIntegration, NewTicket, TicketPatch,
};
use opsdesk_core::{
    CloudProvider, CoreError, GatewayConfig, RecordId, Severity, StoreState, TicketPriority,
    TicketStatus, Workspace,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn workspace_for(server: &MockServer) -> Workspace {
    let url = Url::parse(&server.uri()).unwrap();
    let api_key: SecretString = "sk-test".to_string().into();
    Workspace::new(GatewayConfig::new(url, api_key)).unwrap()
}

async fn mount_collection(server: &MockServer, collection: &str, rows: &serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{collection}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

async fn mount_empty_collections(server: &MockServer) {
    for collection in ["customers", "tickets", "cloud_integrations"] {
        mount_collection(server, collection, &json!([])).await;
    }
}

fn ticket_t1() -> serde_json::Value {
    json!({
        "id": "t1",
        "ticket_number": "INC-1001",
        "title": "Printer jam",
        "status": "open",
        "priority": "low",
        "created_at": "2026-03-01T09:00:00Z",
        "updated_at": "2026-03-01T09:00:00Z",
    })
}

fn ticket(id: &str, number: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "ticket_number": number,
        "title": title,
        "status": "open",
        "priority": "medium",
    })
}

fn customer(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "company": format!("{name} LLC"),
        "email": format!("{id}@example.com"),
        "status": "active",
    })
}

fn integration(
    id: &str,
    customer_id: &str,
    provider: &str,
    connected: bool,
) -> serde_json::Value {
    json!({
        "id": id,
        "customer_id": customer_id,
        "provider": provider,
        "connected": connected,
        "resources": 7,
        "monthly_spend": 1200.5,
        "region": "us-east-1",
    })
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_ticket_prepends_gateway_row() {
    let server = MockServer::start().await;
    mount_empty_collections(&server).await;
    let workspace = workspace_for(&server);

    assert_eq!(workspace.tickets().state(), StoreState::Loading);
    workspace.connect().await;
    assert_eq!(workspace.tickets().state(), StoreState::Ready);

    // The payload carries only the caller's fields plus the injected
    // open status; ids, numbers, and timestamps come back assigned.
    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({
            "title": "Printer jam",
            "status": "open",
            "priority": "low",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([ticket_t1()])))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    let created = workspace
        .tickets()
        .create(NewTicket {
            title: "Printer jam".into(),
            description: None,
            status: None,
            priority: Some(TicketPriority::Low),
            customer_id: None,
            assigned_to: None,
            due_date: None,
            created_by: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id, RecordId::from("t1"));
    assert_eq!(created.ticket_number, "INC-1001");
    assert_eq!(created.status, TicketStatus::Open);
    assert!(created.created_at.is_some());

    let list = workspace.tickets().list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, RecordId::from("t1"));

    let found = workspace.tickets().get_by_id(&RecordId::from("t1")).unwrap();
    assert_eq!(found.title, "Printer jam");

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Success);
    assert_eq!(notice.message, "Ticket created successfully");
}

#[tokio::test]
async fn test_failed_create_leaves_list_untouched() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "insert failed",
            "code": "XX000",
        })))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    let result = workspace
        .tickets()
        .create(NewTicket {
            title: "Doomed".into(),
            description: None,
            status: None,
            priority: None,
            customer_id: None,
            assigned_to: None,
            due_date: None,
            created_by: None,
        })
        .await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, CoreError::Gateway { status: Some(500), .. }),
        "expected Gateway error, got: {err:?}"
    );

    let list = workspace.tickets().list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, RecordId::from("t1"));

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.message, "Failed to create ticket");

    // Failures never knock the store out of Ready.
    assert_eq!(workspace.tickets().state(), StoreState::Ready);
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_merges_patch_in_place() {
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "tickets",
        &json!([ticket("t2", "INC-1002", "VPN down"), ticket_t1()]),
    )
    .await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.t1"))
        .and(body_json(json!({"status": "resolved"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let patch = TicketPatch {
        status: Some(TicketStatus::Resolved),
        ..TicketPatch::default()
    };
    workspace
        .tickets()
        .update(&RecordId::from("t1"), patch.clone())
        .await
        .unwrap();

    // Patched field reflected, everything else untouched, position kept.
    let list = workspace.tickets().list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, RecordId::from("t2"));
    assert_eq!(list[0].status, TicketStatus::Open);
    assert_eq!(list[1].id, RecordId::from("t1"));
    assert_eq!(list[1].status, TicketStatus::Resolved);
    assert_eq!(list[1].title, "Printer jam");
    assert_eq!(list[1].priority, TicketPriority::Low);

    // Re-applying the same patch lands in the same place.
    workspace
        .tickets()
        .update(&RecordId::from("t1"), patch)
        .await
        .unwrap();
    let list = workspace.tickets().list();
    assert_eq!(list[1].status, TicketStatus::Resolved);
    assert_eq!(list[1].title, "Printer jam");
}

#[tokio::test]
async fn test_update_unknown_id_succeeds_without_local_change() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    // Zero matched rows is still 204 on the gateway side.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.ghost"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    workspace
        .tickets()
        .update(
            &RecordId::from("ghost"),
            TicketPatch {
                status: Some(TicketStatus::Closed),
                ..TicketPatch::default()
            },
        )
        .await
        .unwrap();

    let list = workspace.tickets().list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].status, TicketStatus::Open);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.severity, Severity::Success);
    assert_eq!(notice.message, "Ticket updated successfully");
}

#[tokio::test]
async fn test_concurrent_updates_last_response_wins() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    // First update's response is held back; the second lands first.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.t1"))
        .and(body_json(json!({"status": "in-progress"})))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.t1"))
        .and(body_json(json!({"status": "resolved"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let id = RecordId::from("t1");
    let slow = workspace.tickets().update(
        &id,
        TicketPatch {
            status: Some(TicketStatus::InProgress),
            ..TicketPatch::default()
        },
    );
    let fast = workspace.tickets().update(
        &id,
        TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..TicketPatch::default()
        },
    );

    let (slow_res, fast_res) = tokio::join!(slow, fast);
    slow_res.unwrap();
    fast_res.unwrap();

    // Merge order is response arrival order, not issue order.
    let final_ticket = workspace.tickets().get_by_id(&id).unwrap();
    assert_eq!(final_ticket.status, TicketStatus::InProgress);
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_removes_matching_row() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("id", "eq.t1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    workspace.tickets().delete(&RecordId::from("t1")).await.unwrap();

    assert!(workspace.tickets().get_by_id(&RecordId::from("t1")).is_none());
    assert!(workspace.tickets().list().is_empty());

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.message, "Ticket deleted successfully");
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_replaces_list_wholesale() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;
    assert_eq!(workspace.tickets().list().len(), 1);

    // The gateway now knows a different world.
    server.reset().await;
    mount_collection(
        &server,
        "tickets",
        &json!([ticket("t3", "INC-1003", "Disk full"), ticket("t2", "INC-1002", "VPN down")]),
    )
    .await;

    workspace.tickets().refresh().await.unwrap();

    let list = workspace.tickets().list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, RecordId::from("t3"));
    assert_eq!(list[1].id, RecordId::from("t2"));
    assert!(workspace.tickets().get_by_id(&RecordId::from("t1")).is_none());

    // Refreshing against a stable gateway changes nothing.
    workspace.tickets().refresh().await.unwrap();
    let list = workspace.tickets().list();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, RecordId::from("t3"));
}

#[tokio::test]
async fn test_loading_flips_to_ready_even_when_fetches_fail() {
    // No mocks mounted: every fetch 404s.
    let server = MockServer::start().await;
    let workspace = workspace_for(&server);

    assert_eq!(workspace.customers().state(), StoreState::Loading);
    assert_eq!(workspace.tickets().state(), StoreState::Loading);
    assert_eq!(workspace.integrations().state(), StoreState::Loading);

    let mut notices = workspace.notices();
    workspace.connect().await;

    assert_eq!(workspace.customers().state(), StoreState::Ready);
    assert_eq!(workspace.tickets().state(), StoreState::Ready);
    assert_eq!(workspace.integrations().state(), StoreState::Ready);
    assert!(workspace.tickets().list().is_empty());

    // One error notice per store; arrival order tracks fetch completion.
    let mut messages: Vec<String> = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        assert_eq!(notice.severity, Severity::Error);
        messages.push(notice.message);
    }
    messages.sort();
    assert_eq!(
        messages,
        vec![
            "Failed to load cloud integrations",
            "Failed to load customers",
            "Failed to load tickets",
        ]
    );
}

// ── Customer lifecycle ──────────────────────────────────────────────

#[tokio::test]
async fn test_customer_create_update_delete_round() {
    let server = MockServer::start().await;
    mount_empty_collections(&server).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/customers"))
        .and(body_json(json!({
            "name": "Dana Reyes",
            "company": "Acme Corp",
            "email": "dana@acme.example",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([customer("c9", "Dana Reyes")])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/customers"))
        .and(query_param("id", "eq.c9"))
        .and(body_json(json!({"phone": "555-0100"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/customers"))
        .and(query_param("id", "eq.c9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();

    let created = workspace
        .customers()
        .create(NewCustomer {
            name: "Dana Reyes".into(),
            company: "Acme Corp".into(),
            email: "dana@acme.example".into(),
            phone: None,
            location: None,
            status: None,
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, RecordId::from("c9"));

    workspace
        .customers()
        .update(
            &RecordId::from("c9"),
            CustomerPatch {
                phone: Some("555-0100".into()),
                ..CustomerPatch::default()
            },
        )
        .await
        .unwrap();
    let updated = workspace.customers().get_by_id(&RecordId::from("c9")).unwrap();
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(updated.name, "Dana Reyes");

    workspace.customers().delete(&RecordId::from("c9")).await.unwrap();
    assert!(workspace.customers().list().is_empty());

    let expected = [
        "Customer created successfully",
        "Customer updated successfully",
        "Customer deleted successfully",
    ];
    for message in expected {
        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.message, message);
    }
}

// ── Cloud provider lifecycle ────────────────────────────────────────

#[tokio::test]
async fn test_connect_provider_inserts_then_syncs() {
    let server = MockServer::start().await;
    mount_empty_collections(&server).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    // Inventory figures are nondeterministic; match on the stable part.
    Mock::given(method("POST"))
        .and(path("/rest/v1/cloud_integrations"))
        .and(body_partial_json(json!({
            "customer_id": "c1",
            "provider": "aws",
            "connected": true,
            "region": "us-east-1",
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([integration("ci1", "c1", "aws", true)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/cloud_integrations"))
        .and(query_param("id", "eq.ci1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    let connected = workspace
        .integrations()
        .connect_provider(&RecordId::from("c1"), CloudProvider::Aws)
        .await
        .unwrap();

    assert_eq!(connected.id, RecordId::from("ci1"));
    assert!(connected.connected);
    assert_eq!(connected.region.as_deref(), Some("us-east-1"));
    // The chained sync merged fresh simulated figures over the row.
    assert!((1..=50).contains(&connected.resources));
    assert!((500.0..10_500.0).contains(&connected.monthly_spend));

    let list = workspace.integrations().list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, RecordId::from("ci1"));

    let first = notices.try_recv().unwrap();
    assert_eq!(first.message, "AWS integration connected successfully");
    let second = notices.try_recv().unwrap();
    assert_eq!(second.message, "Resources synced successfully");
}

#[tokio::test]
async fn test_disconnect_provider_flips_connected_flag() {
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "cloud_integrations",
        &json!([integration("ci1", "c1", "aws", true)]),
    )
    .await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "tickets", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/cloud_integrations"))
        .and(query_param("id", "eq.ci1"))
        .and(body_json(json!({"connected": false})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut notices = workspace.notices();
    workspace
        .integrations()
        .disconnect_provider(&RecordId::from("ci1"))
        .await
        .unwrap();

    let row = workspace.integrations().get_by_id(&RecordId::from("ci1")).unwrap();
    assert!(!row.connected);
    assert_eq!(row.resources, 7);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.message, "Cloud provider disconnected successfully");
}

#[tokio::test]
async fn test_integration_create_and_update_directly() {
    let server = MockServer::start().await;
    mount_empty_collections(&server).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    // Unlike connect_provider, plain create sends the row exactly as given.
    Mock::given(method("POST"))
        .and(path("/rest/v1/cloud_integrations"))
        .and(body_json(json!({
            "customer_id": "c1",
            "provider": "gcp",
            "connected": false,
            "resources": 0,
            "monthly_spend": 0.0,
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([integration("ci7", "c1", "gcp", false)])),
        )
        .mount(&server)
        .await;

    let created = workspace
        .integrations()
        .create(NewIntegration {
            customer_id: RecordId::from("c1"),
            provider: CloudProvider::Gcp,
            connected: false,
            resources: 0,
            monthly_spend: 0.0,
            region: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, RecordId::from("ci7"));
    assert!(!created.connected);

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/cloud_integrations"))
        .and(query_param("id", "eq.ci7"))
        .and(body_json(json!({"region": "europe-west1"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    workspace
        .integrations()
        .update(
            &RecordId::from("ci7"),
            IntegrationPatch {
                region: Some("europe-west1".into()),
                ..IntegrationPatch::default()
            },
        )
        .await
        .unwrap();

    let row = workspace
        .integrations()
        .get_by_id(&RecordId::from("ci7"))
        .unwrap();
    assert_eq!(row.region.as_deref(), Some("europe-west1"));
    assert_eq!(row.resources, 7);
}

// ── Cross-store queries ─────────────────────────────────────────────

#[tokio::test]
async fn test_customers_with_provider_requires_connected_integration() {
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "customers",
        &json!([customer("c1", "Acme"), customer("c2", "Globex")]),
    )
    .await;
    mount_collection(
        &server,
        "cloud_integrations",
        &json!([
            integration("i1", "c1", "aws", true),
            integration("i2", "c2", "aws", false),
            integration("i3", "c2", "gcp", true),
        ]),
    )
    .await;
    mount_collection(&server, "tickets", &json!([])).await;
    let workspace = workspace_for(&server);
    workspace.connect().await;

    let aws = workspace.customers_with_provider(CloudProvider::Aws);
    assert_eq!(aws.len(), 1);
    assert_eq!(aws[0].id, RecordId::from("c1"));

    let gcp = workspace.customers_with_provider(CloudProvider::Gcp);
    assert_eq!(gcp.len(), 1);
    assert_eq!(gcp[0].id, RecordId::from("c2"));

    assert!(workspace.customers_with_provider(CloudProvider::Azure).is_empty());

    let owned = workspace.integrations().for_customer(&RecordId::from("c2"));
    assert_eq!(owned.len(), 2);
    assert_eq!(owned[0].id, RecordId::from("i2"));
    assert_eq!(owned[1].id, RecordId::from("i3"));
}

// ── One-shot ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_oneshot_loads_then_runs_closure() {
    let server = MockServer::start().await;
    mount_collection(&server, "tickets", &json!([ticket_t1()])).await;
    mount_collection(&server, "customers", &json!([])).await;
    mount_collection(&server, "cloud_integrations", &json!([])).await;

    let url = Url::parse(&server.uri()).unwrap();
    let api_key: SecretString = "sk-test".to_string().into();
    let config = GatewayConfig::new(url, api_key);

    let count = Workspace::oneshot(config, |workspace| async move {
        Ok(workspace.tickets().list().len())
    })
    .await
    .unwrap();

    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_oneshot_fails_hard_on_unreachable_gateway() {
    // Bind a port, then free it so the connection gets refused. A
    // `MockServer` cannot stand in here: pooled servers keep listening
    // for the whole test process, and even an exclusive server closes
    // its listener asynchronously after drop, so an immediate connect
    // can still be accepted instead of refused.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    };

    let url = Url::parse(&uri).unwrap();
    let api_key: SecretString = "sk-test".to_string().into();
    let config = GatewayConfig::new(url, api_key);

    let result = Workspace::oneshot(config, |_workspace| async move { Ok(()) }).await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, CoreError::ConnectionFailed { .. }),
        "expected ConnectionFailed, got: {err:?}"
    );
}
