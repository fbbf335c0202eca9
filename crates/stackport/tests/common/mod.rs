#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use stackport::{ApiRequest, Client, ClientConfig, RawResponse, Transport};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&ApiRequest) -> RawResponse + Send + Sync>;

/// In-memory transport that answers from a closure and records every request
pub struct ScriptedTransport {
    responder: Responder,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&ApiRequest) -> RawResponse + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> stackport::Result<RawResponse> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

pub const BASE_URL: &str = "https://api.example.com/3";

pub fn client(transport: Arc<ScriptedTransport>) -> Client {
    Client::with_transport(
        ClientConfig::new(BASE_URL).with_access_token("test-token"),
        transport,
    )
}

/// Path of a request relative to the base URL
pub fn path_of(request: &ApiRequest) -> &str {
    request.url.strip_prefix(BASE_URL).unwrap_or(&request.url)
}

pub fn ok(payload: Value) -> RawResponse {
    RawResponse::new(200, json!({ "response": payload }).to_string())
}

pub fn page(items: Value, current: u32, next: Option<u32>) -> RawResponse {
    RawResponse::new(
        200,
        json!({
            "response": items,
            "count": items.as_array().map(|a| a.len()).unwrap_or(0),
            "pagination": { "previous": null, "current": current, "next": next, "per_page": 2 }
        })
        .to_string(),
    )
}

pub fn stack_json(uid: &str, name: &str, environment: &str, status: i32, health: i32) -> Value {
    json!({
        "uid": uid,
        "name": name,
        "git": "git@github.com:example/app.git",
        "git_branch": "main",
        "environment": environment,
        "cloud": "aws",
        "fqdn": format!("{}.example.net", uid),
        "language": "ruby",
        "framework": "rails",
        "status": status,
        "health": health,
        "maintenance_mode": false,
        "has_loadbalancer": false,
        "redeploy_hook": null,
        "last_activity_iso": null,
        "updated_at_iso": "2024-04-01T00:00:00Z",
        "created_at_iso": "2024-01-01T00:00:00Z",
        "deploy_directory": "/var/deploy/app"
    })
}

pub fn page_param(request: &ApiRequest) -> Option<u32> {
    request.query_param("page").and_then(|p| p.parse().ok())
}
