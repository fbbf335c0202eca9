//! End-to-end tests of the reqwest transport against a local mock server

use serde_json::json;
use stackport::{ApiError, Client, ClientConfig};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::new(format!("{}/3/", server.uri()))
        .with_access_token("secret-token")
        .with_user_agent("stackport-tests/1.0")
        .with_request_timeout(Duration::from_secs(5));
    Client::new(config).unwrap()
}

#[tokio::test]
async fn test_list_sends_auth_and_page_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/stacks/abc/settings.json"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("user-agent", "stackport-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"key": "git.branch", "value": "main", "readonly": false}],
            "count": 1,
            "pagination": {"previous": null, "current": 1, "next": 2, "per_page": 1, "pages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/stacks/abc/settings.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"key": "stack.name", "value": "shop", "readonly": true}],
            "count": 1,
            "pagination": {"previous": 1, "current": 2, "next": null, "per_page": 1, "pages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = client_for(&server).stack_settings("abc").await.unwrap();

    let keys: Vec<&str> = settings.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["git.branch", "stack.name"]);
    assert!(settings[1].readonly);
}

#[tokio::test]
async fn test_mutation_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/3/stacks/abc/settings/git-branch.json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"value": "develop"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"id": "a-1", "action": "settings_update"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client_for(&server)
        .set_setting("abc", "git.branch", "develop")
        .await
        .unwrap();

    assert_eq!(handle.id.to_string(), "a-1");
    assert_eq!(handle.action.as_deref(), Some("settings_update"));
}

#[tokio::test]
async fn test_error_description_surfaces_in_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/stacks/missing.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "not_found",
            "error_description": "Stack not found"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .find_stack_by_uid("missing")
        .await
        .unwrap_err();

    match err {
        ApiError::Http {
            status, message, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Stack not found");
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/3/stacks/abc/deployments.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .redeploy_stack("abc", "main", "")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert!(err.is_transport());
    assert!(err.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // bind to get a free port, then release it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new(format!("http://127.0.0.1:{}/3", port))
        .with_request_timeout(Duration::from_secs(2));
    let err = Client::new(config).unwrap().stack_list().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_reserved_characters_stay_in_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/3/stacks/abc/environments/A%23B.json"))
        .and(body_json(json!({"value": "v"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"id": 5, "action": "env_update"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client_for(&server)
        .stack_env_var_set("abc", "A#B", "v")
        .await
        .unwrap();

    assert_eq!(handle.id.to_string(), "5");
}
