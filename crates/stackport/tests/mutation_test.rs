mod common;

use common::*;
use serde_json::json;
use stackport::{LeaseOptions, Method, RawResponse};

fn accepted() -> RawResponse {
    ok(json!({"id": 77, "action": "queued"}))
}

#[tokio::test]
async fn test_set_setting_normalizes_dotted_key() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client.set_setting("abc", "a.b.c", "xyz").await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::PUT);
    assert_eq!(path_of(req), "/stacks/abc/settings/a-b-c.json");
    assert_eq!(req.json_body().unwrap(), json!({"value": "xyz"}));
}

#[tokio::test]
async fn test_set_setting_keeps_value_type() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client.set_setting("abc", "maintenance", true).await.unwrap();
    client.set_setting("abc", "workers", 4i64).await.unwrap();

    let bodies: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.json_body().unwrap())
        .collect();
    assert_eq!(bodies, vec![json!({"value": true}), json!({"value": 4})]);
}

#[tokio::test]
async fn test_env_var_new_and_set_endpoints() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client.stack_env_var_new("abc", "FOO", "1").await.unwrap();
    client.stack_env_var_set("abc", "FOO", "2").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(path_of(&requests[0]), "/stacks/abc/environments.json");
    assert_eq!(requests[0].json_body().unwrap(), json!({"key": "FOO", "value": "1"}));

    assert_eq!(requests[1].method, Method::PUT);
    assert_eq!(path_of(&requests[1]), "/stacks/abc/environments/FOO.json");
    assert_eq!(requests[1].json_body().unwrap(), json!({"value": "2"}));
}

#[tokio::test]
async fn test_reserved_characters_are_percent_encoded() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client.stack_env_var_set("abc", "A#B", "v").await.unwrap();
    client.set_setting("abc", "feature#x.y", "on").await.unwrap();
    client.stack_env_var_new("a/b", "FOO", "1").await.unwrap();

    let requests = transport.requests();
    assert_eq!(path_of(&requests[0]), "/stacks/abc/environments/A%23B.json");
    assert_eq!(path_of(&requests[1]), "/stacks/abc/settings/feature%23x-y.json");
    assert_eq!(path_of(&requests[2]), "/stacks/a%2Fb/environments.json");
    assert!(requests.iter().all(|r| !r.url.contains('#')));
}

fn env_server() -> std::sync::Arc<ScriptedTransport> {
    ScriptedTransport::new(|req| {
        if req.method == Method::GET {
            page(json!([{"key": "EXISTING", "value": "old", "readonly": false}]), 1, Some(1))
        } else {
            accepted()
        }
    })
}

#[tokio::test]
async fn test_upsert_updates_existing_key() {
    let transport = env_server();
    let client = client(transport.clone());

    client.stack_env_var_upsert("abc", "EXISTING", "new").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::PUT);
    assert_eq!(path_of(&requests[1]), "/stacks/abc/environments/EXISTING.json");
}

#[tokio::test]
async fn test_upsert_creates_missing_key() {
    let transport = env_server();
    let client = client(transport.clone());

    client.stack_env_var_upsert("abc", "FRESH", "v").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, Method::POST);
    assert_eq!(path_of(&requests[1]), "/stacks/abc/environments.json");
    assert_eq!(requests[1].json_body().unwrap(), json!({"key": "FRESH", "value": "v"}));
}

#[tokio::test]
async fn test_lease_sends_defaults() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    let handle = client.lease("abc", &LeaseOptions::default()).await.unwrap();

    assert_eq!(handle.id.to_string(), "77");
    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(path_of(req), "/stacks/abc/firewalls.json");
    assert_eq!(
        req.json_body().unwrap(),
        json!({"ttl": 20, "from_ip": "AUTO", "port": 22, "server_id": ""})
    );
}

#[tokio::test]
async fn test_lease_with_overrides() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    let options = LeaseOptions::default()
        .with_from_ip("10.0.0.1")
        .with_port(5432)
        .with_ttl(600)
        .with_server_id("srv-1");
    client.lease("abc", &options).await.unwrap();

    assert_eq!(
        transport.requests()[0].json_body().unwrap(),
        json!({"ttl": 600, "from_ip": "10.0.0.1", "port": 5432, "server_id": "srv-1"})
    );
}

#[tokio::test]
async fn test_redeploy_body() {
    let transport =
        ScriptedTransport::new(|_| ok(json!({"ok": true, "message": "Redeployment queued"})));
    let client = client(transport.clone());

    let res = client.redeploy_stack("abc", "v1.2.0", "web,worker").await.unwrap();

    assert!(res.ok);
    assert_eq!(res.message, "Redeployment queued");
    let req = &transport.requests()[0];
    assert_eq!(path_of(req), "/stacks/abc/deployments.json");
    assert_eq!(
        req.json_body().unwrap(),
        json!({"git_ref": "v1.2.0", "services_filter": "web,worker"})
    );
}

#[tokio::test]
async fn test_stack_action_command() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client.invoke_stack_action("abc", "restart").await.unwrap();

    let req = &transport.requests()[0];
    assert_eq!(path_of(req), "/stacks/abc/actions.json");
    assert_eq!(req.json_body().unwrap(), json!({"command": "restart"}));
}

#[tokio::test]
async fn test_db_action_omits_absent_db_type() {
    let transport = ScriptedTransport::new(|_| accepted());
    let client = client(transport.clone());

    client
        .invoke_db_stack_action("abc", "srv-9", None, "backup")
        .await
        .unwrap();
    client
        .invoke_db_stack_action("abc", "srv-9", Some("postgresql"), "backup")
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(
        requests[0].json_body().unwrap(),
        json!({"command": "backup", "server_uid": "srv-9"})
    );
    assert_eq!(
        requests[1].json_body().unwrap(),
        json!({"command": "backup", "server_uid": "srv-9", "db_type": "postgresql"})
    );
}

#[tokio::test]
async fn test_mutation_http_error_surfaces_status() {
    let transport = ScriptedTransport::new(|_| {
        RawResponse::new(422, r#"{"error":"invalid","error_description":"Key is read-only"}"#)
    });
    let client = client(transport.clone());

    let err = client.set_setting("abc", "git.branch", "dev").await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("Key is read-only"));
}
