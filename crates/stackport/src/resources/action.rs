//! Asynchronous actions, redeploys and the generic response shape

use crate::client::Client;
use crate::error::Result;
use crate::request::encode_segment;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::{info, instrument};

/// Opaque identifier of a server-side action.
///
/// The API sends it as a number; it is kept as text so callers never do
/// arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl<'de> Deserialize<'de> for ActionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        string_or_number(deserializer).map(ActionId)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        ActionId(value.to_string())
    }
}

/// Ids arrive as either JSON strings or numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(raw: StringOrNumber) -> Self {
        match raw {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

/// Handle for a mutating call whose work completes server-side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncResult {
    pub id: ActionId,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub started_via: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_success: Option<bool>,
    #[serde(default)]
    pub finished_message: Option<String>,
}

impl AsyncResult {
    /// The server has recorded a completion time
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Collapse a finished action into its outcome
    pub fn outcome(&self) -> GenericResponse {
        GenericResponse {
            ok: self.finished_success.unwrap_or(false),
            message: self.finished_message.clone().unwrap_or_default(),
        }
    }

    /// Short description of the current state for progress output
    pub fn state_label(&self) -> String {
        match (&self.action, self.is_finished()) {
            (Some(action), false) => format!("{} running", action),
            (Some(action), true) => format!("{} finished", action),
            (None, false) => "running".to_string(),
            (None, true) => "finished".to_string(),
        }
    }
}

/// `{ok, message}` reply of synchronous mutations and finished actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub ok: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct RedeployRequest<'a> {
    git_ref: &'a str,
    services_filter: &'a str,
}

#[derive(Debug, Serialize)]
struct StackActionRequest<'a> {
    command: &'a str,
}

#[derive(Debug, Serialize)]
struct DbStackActionRequest<'a> {
    command: &'a str,
    server_uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_type: Option<&'a str>,
}

impl Client {
    /// Trigger a redeploy of `git_ref`, optionally limited to some services
    #[instrument(skip(self))]
    pub async fn redeploy_stack(
        &self,
        stack_uid: &str,
        git_ref: &str,
        services_filter: &str,
    ) -> Result<GenericResponse> {
        let body = RedeployRequest {
            git_ref,
            services_filter,
        };
        let res: GenericResponse = self
            .send_json(
                Method::POST,
                &format!("/stacks/{}/deployments.json", encode_segment(stack_uid)),
                &body,
            )
            .await?;
        info!(ok = res.ok, "redeploy requested: {}", res.message);
        Ok(res)
    }

    /// Run a named stack action (e.g. `restart`, `clear_caches`)
    #[instrument(skip(self))]
    pub async fn invoke_stack_action(&self, stack_uid: &str, action: &str) -> Result<AsyncResult> {
        let body = StackActionRequest { command: action };
        self.send_json(
            Method::POST,
            &format!("/stacks/{}/actions.json", encode_segment(stack_uid)),
            &body,
        )
        .await
    }

    /// Run a database action against one server of the stack
    #[instrument(skip(self))]
    pub async fn invoke_db_stack_action(
        &self,
        stack_uid: &str,
        server_uid: &str,
        db_type: Option<&str>,
        action: &str,
    ) -> Result<AsyncResult> {
        let body = DbStackActionRequest {
            command: action,
            server_uid,
            db_type,
        };
        self.send_json(
            Method::POST,
            &format!("/stacks/{}/actions.json", encode_segment(stack_uid)),
            &body,
        )
        .await
    }

    /// Current state of an asynchronous action
    pub async fn stack_async_action(
        &self,
        stack_uid: &str,
        action_id: &ActionId,
    ) -> Result<AsyncResult> {
        self.get(&format!(
            "/stacks/{}/actions/{}.json",
            encode_segment(stack_uid),
            encode_segment(&action_id.0)
        ))
        .await
    }
}
