//! Integration tests for `ApiClient` and `ReportView` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infleval_client::{ApiClient, ApiError, Credential, ReportState, ReportView, Session};
use infleval_core::{BriefId, BriefInput, InfluencerInput, KpiWeights};

fn authed_client(base_url: &str) -> ApiClient {
    let session = Arc::new(Session::with_credential(Credential::new("test-token")));
    ApiClient::with_base_url(session, 5, base_url).expect("client construction should not fail")
}

fn anonymous_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(Arc::new(Session::new()), 5, base_url)
        .expect("client construction should not fail")
}

fn report_json(brief_id: i64, handles: &[(&str, f64)]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = handles
        .iter()
        .enumerate()
        .map(|(i, (handle, trust))| {
            json!({
                "influencer_id": i + 1,
                "brief_id": brief_id,
                "handle": handle,
                "authenticity": 70.0,
                "relevance": 60.0,
                "resonance": 50.0,
                "expected_roas": 2.5,
                "trust_index": trust,
                "top_signals": ["consistent posting cadence"]
            })
        })
        .collect();
    json!(rows)
}

fn brief_id(id: u64) -> BriefId {
    BriefId::new(id).expect("non-zero id")
}

#[tokio::test]
async fn fetch_report_sends_bearer_and_parses_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/7"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(report_json(7, &[("alice", 80.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let rows = client
        .fetch_report(brief_id(7))
        .await
        .expect("should parse report");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].handle, "alice");
    assert_eq!(rows[0].brief_id, 7);
    assert_eq!(rows[0].top_signals, ["consistent posting cadence"]);
}

#[tokio::test]
async fn error_detail_surfaces_in_the_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/3"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Brief not found" })),
        )
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let mut view = ReportView::new();
    assert!(view.load(&client, Some("3")).await);
    assert_eq!(view.state(), &ReportState::Failed("Brief not found".to_string()));
}

#[tokio::test]
async fn server_error_without_detail_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let mut view = ReportView::new();
    view.load(&client, Some("3")).await;
    assert_eq!(view.error(), Some("Failed to load report"));
}

#[tokio::test]
async fn unauthorized_response_invalidates_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/brief"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Invalid or expired token" })),
        )
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let mut events = client.session().subscribe();
    let _ = events.borrow_and_update();

    let err = client.list_briefs().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.detail(), Some("Invalid or expired token"));
    assert!(!client.session().is_authenticated());
    assert!(events.has_changed().unwrap());
    assert!(events.borrow_and_update().is_none());
}

#[tokio::test]
async fn protected_call_without_credential_skips_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = anonymous_client(&format!("{}/api", server.uri()));
    let err = client.fetch_report(brief_id(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
}

#[tokio::test]
async fn login_posts_password_form_and_stores_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=ana%40brand.com"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "jwt-abc", "token_type": "bearer" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&format!("{}/api", server.uri()));
    let credential = client
        .login("ana@brand.com", "hunter2")
        .await
        .expect("login should succeed");

    assert_eq!(credential.expose(), "jwt-abc");
    assert_eq!(client.session().credential(), Some(credential));
}

#[tokio::test]
async fn login_failure_reports_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let client = anonymous_client(&format!("{}/api", server.uri()));
    let err = client.login("ana@brand.com", "wrong").await.unwrap_err();
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn signup_sends_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(query_param("email", "new@brand.com"))
        .and(query_param("password", "s3cret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "jwt-new" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&format!("{}/api", server.uri()));
    let credential = client.signup("new@brand.com", "s3cret").await.unwrap();
    assert_eq!(credential.expose(), "jwt-new");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn create_brief_posts_json_payload() {
    let server = MockServer::start().await;

    let input = BriefInput::new(" Glow ", "skincare, serum", KpiWeights::default()).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/brief"))
        .and(body_json(json!({
            "brand": "Glow",
            "keywords": ["skincare", "serum"],
            "kpi_weights": {
                "authenticity": 0.25,
                "relevance": 0.25,
                "resonance": 0.25,
                "return": 0.25
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "brand": "Glow",
            "keywords": ["skincare", "serum"],
            "kpi_weights": {
                "authenticity": 0.25,
                "relevance": 0.25,
                "resonance": 0.25,
                "return": 0.25
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let brief = client.create_brief(&input).await.unwrap();
    assert_eq!(brief.id, 11);
    assert_eq!(brief.kpi_weights.get("return"), Some(&0.25));
}

#[tokio::test]
async fn list_and_get_briefs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/brief"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "brand": "Glow", "keywords": [], "kpi_weights": {} },
            { "id": 2, "brand": "Dew", "keywords": ["spf"], "kpi_weights": {} }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/brief/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "id": 2, "brand": "Dew", "keywords": ["spf"], "kpi_weights": {} }),
        ))
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let briefs = client.list_briefs().await.unwrap();
    assert_eq!(briefs.len(), 2);
    let brief = client.get_brief(brief_id(2)).await.unwrap();
    assert_eq!(brief.brand, "Dew");
    assert_eq!(brief.keywords, ["spf"]);
}

#[tokio::test]
async fn add_influencers_posts_handles() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/influencers"))
        .and(body_json(json!([
            { "handle": "alice", "platform": "instagram" },
            { "handle": "bob", "platform": "instagram" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "handle": "alice", "platform": "instagram" },
            { "id": 6, "handle": "bob", "platform": "instagram" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let items: Vec<InfluencerInput> = ["alice", "bob"]
        .into_iter()
        .map(|h| InfluencerInput::new(h, "instagram"))
        .collect();
    let created = client.add_influencers(&items).await.unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].id, 6);
}

#[tokio::test]
async fn health_is_read_from_host_root() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "service": "influencer-eval-mvp",
            "version": "0.0.1",
            "commit": null,
            "started_at": "2025-01-01T00:00:00Z",
            "uptime_seconds": 12.5
        })))
        .mount(&server)
        .await;

    let client = anonymous_client(&format!("{}/api", server.uri()));
    let health = client.health().await.unwrap();
    assert!(health.ok);
    assert_eq!(health.service.as_deref(), Some("influencer-eval-mvp"));
    assert!(health.commit.is_none());
}

#[tokio::test]
async fn malformed_report_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "rows": [] })))
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    let err = client.fetch_report(brief_id(4)).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialize { .. }));
}

#[tokio::test]
async fn null_report_body_loads_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = authed_client(&format!("{}/api", server.uri()));
    assert!(client.fetch_report(brief_id(6)).await.unwrap().is_empty());

    let mut view = ReportView::new();
    assert!(view.load(&client, Some("6")).await);
    assert_eq!(view.state(), &ReportState::Loaded(Vec::new()));
    assert!(view.error().is_none());
}

#[tokio::test]
async fn slow_response_for_a_previous_brief_does_not_win() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(report_json(1, &[("stale", 99.0)]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_json(2, &[("fresh", 50.0)])))
        .mount(&server)
        .await;

    let client = Arc::new(authed_client(&format!("{}/api", server.uri())));
    let mut view = ReportView::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    for raw in ["1", "2"] {
        let ticket = view.begin(Some(raw)).expect("new brief needs a fetch");
        let client = Arc::clone(&client);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_report(ticket.brief_id()).await;
            let _ = tx.send((ticket, result));
        });
    }
    drop(tx);

    while let Some((ticket, result)) = rx.recv().await {
        view.complete(ticket, result);
    }

    assert_eq!(view.brief_id(), Some(brief_id(2)));
    let handles: Vec<&str> = view.sorted().iter().map(|r| r.handle.as_str()).collect();
    assert_eq!(handles, ["fresh"]);
}
