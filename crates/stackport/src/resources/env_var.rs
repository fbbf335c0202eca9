//! Stack environment variables

use crate::client::Client;
use crate::error::Result;
use crate::request::encode_segment;
use crate::resources::action::AsyncResult;
use crate::value::SettingValue;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEnvVar {
    pub key: String,
    #[serde(default)]
    pub value: SettingValue,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Serialize)]
struct NewEnvVarRequest<'a> {
    key: &'a str,
    value: &'a SettingValue,
}

#[derive(Debug, Serialize)]
struct SetEnvVarRequest<'a> {
    value: &'a SettingValue,
}

impl Client {
    #[instrument(skip(self))]
    pub async fn stack_env_vars(&self, stack_uid: &str) -> Result<Vec<StackEnvVar>> {
        let path = format!("/stacks/{}/environments.json", encode_segment(stack_uid));
        self.list_all(&path).await
    }

    /// Create a variable that does not exist yet
    #[instrument(skip(self, value))]
    pub async fn stack_env_var_new(
        &self,
        stack_uid: &str,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<AsyncResult> {
        let value = value.into();
        self.send_json(
            Method::POST,
            &format!("/stacks/{}/environments.json", encode_segment(stack_uid)),
            &NewEnvVarRequest { key, value: &value },
        )
        .await
    }

    /// Update an existing variable
    #[instrument(skip(self, value))]
    pub async fn stack_env_var_set(
        &self,
        stack_uid: &str,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<AsyncResult> {
        let value = value.into();
        self.send_json(
            Method::PUT,
            &format!(
                "/stacks/{}/environments/{}.json",
                encode_segment(stack_uid),
                encode_segment(key)
            ),
            &SetEnvVarRequest { value: &value },
        )
        .await
    }

    /// Create or update, depending on whether `key` is already defined
    pub async fn stack_env_var_upsert(
        &self,
        stack_uid: &str,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<AsyncResult> {
        let exists = self
            .stack_env_vars(stack_uid)
            .await?
            .iter()
            .any(|v| v.key == key);

        debug!(key, exists, "upserting environment variable");
        if exists {
            self.stack_env_var_set(stack_uid, key, value).await
        } else {
            self.stack_env_var_new(stack_uid, key, value).await
        }
    }
}
