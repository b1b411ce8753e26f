//! Integration tests for the glass-table module against a mock ITSI API.

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use itsictl::config::Config;
use itsictl::error::ItsiError;
use itsictl::itsi_client::ItsiClient;
use itsictl::modules::glass_table::{run, GlassTableParams, Sharing, State};

const GT_PATH: &str = "/servicesNS/nobody/SA-ITOA/itoa_interface/glass_table";

fn client_for(server: &MockServer) -> ItsiClient {
    let config = Config {
        base_url: server.uri(),
        token: "test-token".to_string(),
    };
    ItsiClient::new(&config).unwrap()
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

fn sample_current() -> Value {
    json!({
        "_key": "abc123",
        "title": "My GT",
        "description": "desc",
        "definition": {"title": "My GT", "description": "desc", "layout": {"tabs": []}},
        "acl": {"sharing": "user"},
        "gt_version": "beta",
        "_owner": "nobody",
    })
}

async fn mount_get_current(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// -- update --

#[tokio::test]
async fn update_description_sends_minimal_stamped_payload() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("POST"))
        .and(path(format!("{GT_PATH}/abc123")))
        .and(query_param("is_partial_data", "1"))
        .and(body_json(json!({
            "description": "updated",
            "_owner": "nobody",
            "_user": "nobody",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_key": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        description: Some("updated".to_string()),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.before, obj(json!({"description": "desc"})));
    assert_eq!(result.after, obj(json!({"description": "updated"})));
    assert_eq!(result.diff, obj(json!({"description": "updated"})));
    assert_eq!(result.response, obj(json!({"_key": "abc123"})));
}

#[tokio::test]
async fn update_matching_state_is_a_no_op() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        description: Some("desc".to_string()),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(!result.changed);
    assert_eq!(result.before, result.after);
    assert!(result.diff.is_empty());
    assert!(result.response.is_empty());
}

#[tokio::test]
async fn update_is_idempotent_across_two_runs() {
    // First run changes the description; a second run against a document
    // already carrying the first run's result reports no change.
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;
    Mock::given(method("POST"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_key": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        description: Some("updated".to_string()),
        ..Default::default()
    };
    let first = run(&client_for(&server), &params, false).await.unwrap();
    assert!(first.changed);

    let converged = MockServer::start().await;
    let mut current = sample_current();
    current["description"] = json!("updated");
    mount_get_current(&converged, current).await;

    let second = run(&client_for(&converged), &params, false).await.unwrap();
    assert!(!second.changed);
    assert!(second.diff.is_empty());
}

#[tokio::test]
async fn update_sharing_merges_over_existing_acl() {
    let server = MockServer::start().await;
    let mut current = sample_current();
    current["acl"] = json!({"sharing": "user", "owner": "admin"});
    mount_get_current(&server, current).await;

    Mock::given(method("POST"))
        .and(path(format!("{GT_PATH}/abc123")))
        .and(body_json(json!({
            "acl": {"sharing": "app", "owner": "admin"},
            "_owner": "nobody",
            "_user": "nobody",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_key": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        sharing: Some(Sharing::App),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.diff, obj(json!({"sharing": "app"})));
}

#[tokio::test]
async fn update_missing_glass_table_is_a_named_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/missing")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("missing".to_string()),
        title: Some("T".to_string()),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    assert!(matches!(err, ItsiError::NotFound { ref id } if id == "missing"));
}

#[tokio::test]
async fn update_without_desired_fields_changes_nothing() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(!result.changed);
    assert!(result.diff.is_empty());
}

#[tokio::test]
async fn update_check_mode_reports_diff_without_writing() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, true).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.diff, obj(json!({"title": "Renamed"})));
    assert_eq!(result.before, obj(json!({"title": "My GT"})));
    assert_eq!(result.after, obj(json!({"title": "Renamed"})));
    assert!(result.response.is_empty());
}

#[tokio::test]
async fn update_detects_nested_definition_change() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("POST"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_key": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        definition: Some(json!({
            "title": "My GT",
            "description": "desc",
            "layout": {"tabs": [{"layoutId": "layout_1"}]},
        })),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(result.changed);
    // Deep diff: only the nested key that differs is reported
    assert_eq!(
        result.diff,
        obj(json!({"definition": {"layout": {"tabs": [{"layoutId": "layout_1"}]}}}))
    );
}

// -- create --

#[tokio::test]
async fn create_posts_stamped_payload_with_synced_definition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GT_PATH))
        .and(body_json(json!({
            "title": "New GT",
            "description": "D",
            "definition": {"title": "New GT", "description": "D", "layout": {}},
            "gt_version": "beta",
            "_owner": "nobody",
            "_user": "nobody",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_key": "new123"})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        title: Some("New GT".to_string()),
        description: Some("D".to_string()),
        definition: Some(json!({"title": "stale", "layout": {}})),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.after["title"], json!("New GT"));
    assert_eq!(result.after, result.diff);
    assert_eq!(result.response, obj(json!({"_key": "new123"})));
}

#[tokio::test]
async fn create_without_title_fails_before_any_network_call() {
    let server = MockServer::start().await;

    let params = GlassTableParams {
        definition: Some(json!({"layout": {}})),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    assert!(matches!(err, ItsiError::Validation(ref msg) if msg.contains("title")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_without_definition_fails_before_any_network_call() {
    let server = MockServer::start().await;

    let params = GlassTableParams {
        title: Some("T".to_string()),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    assert!(matches!(err, ItsiError::Validation(ref msg) if msg.contains("definition")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_check_mode_skips_the_write() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        title: Some("T".to_string()),
        definition: Some(json!({"layout": {}})),
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, true).await.unwrap();

    assert!(result.changed);
    assert_eq!(result.after, result.diff);
    assert!(result.response.is_empty());
}

// -- delete --

#[tokio::test]
async fn delete_existing_glass_table() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("DELETE"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        state: State::Absent,
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(result.changed);
    // Before snapshot covers all tracked fields, sharing read from acl
    assert_eq!(result.before["title"], json!("My GT"));
    assert_eq!(result.before["sharing"], json!("user"));
    assert_eq!(result.diff, result.before);
}

#[tokio::test]
async fn delete_missing_glass_table_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/gone")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("gone".to_string()),
        state: State::Absent,
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, false).await.unwrap();

    assert!(!result.changed);
    assert!(result.before.is_empty());
}

#[tokio::test]
async fn delete_without_id_fails_before_any_network_call() {
    let server = MockServer::start().await;

    let params = GlassTableParams {
        state: State::Absent,
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    assert!(matches!(err, ItsiError::Validation(ref msg) if msg.contains("glass_table_id")));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_check_mode_skips_the_delete_call() {
    let server = MockServer::start().await;
    mount_get_current(&server, sample_current()).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        state: State::Absent,
        ..Default::default()
    };
    let result = run(&client_for(&server), &params, true).await.unwrap();

    assert!(result.changed);
    assert!(result.response.is_empty());
}

// -- transport failures --

#[tokio::test]
async fn authentication_failure_is_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        title: Some("T".to_string()),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    assert!(matches!(err, ItsiError::Authentication));
}

#[tokio::test]
async fn server_error_with_multibyte_body_is_truncated_cleanly() {
    // Localized splunkd error text: a two-byte char straddles the
    // truncation cut point and must not break the error path.
    let server = MockServer::start().await;
    let mut body = "x".repeat(499);
    body.push('é');
    body.push_str(&"y".repeat(200));
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(ResponseTemplate::new(500).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        title: Some("T".to_string()),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("500"));
    assert!(msg.contains("...[truncated]"));
}

#[tokio::test]
async fn server_error_body_is_sanitized_and_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{GT_PATH}/abc123")))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("splunkd exploded with token test-token"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = GlassTableParams {
        glass_table_id: Some("abc123".to_string()),
        title: Some("T".to_string()),
        ..Default::default()
    };
    let err = run(&client_for(&server), &params, false).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("500"));
    assert!(!msg.contains("test-token"));
    assert!(msg.contains("[REDACTED]"));
}
