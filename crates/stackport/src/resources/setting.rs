//! Stack settings

use crate::client::Client;
use crate::error::Result;
use crate::request::encode_segment;
use crate::resources::action::AsyncResult;
use crate::value::SettingValue;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSetting {
    pub key: String,
    #[serde(default)]
    pub value: SettingValue,
    #[serde(default)]
    pub readonly: bool,
}

#[derive(Debug, Serialize)]
struct SetValueRequest<'a> {
    value: &'a SettingValue,
}

/// Setting keys are dotted (`git.branch`) but the URL form uses dashes
pub fn normalize_setting_key(key: &str) -> String {
    key.replace('.', "-")
}

impl Client {
    #[instrument(skip(self))]
    pub async fn stack_settings(&self, stack_uid: &str) -> Result<Vec<StackSetting>> {
        self.list_all(&format!("/stacks/{}/settings.json", encode_segment(stack_uid)))
            .await
    }

    /// Change a stack setting; applying it happens server-side
    #[instrument(skip(self, value))]
    pub async fn set_setting(
        &self,
        stack_uid: &str,
        key: &str,
        value: impl Into<SettingValue>,
    ) -> Result<AsyncResult> {
        let value = value.into();
        let path = format!(
            "/stacks/{}/settings/{}.json",
            encode_segment(stack_uid),
            encode_segment(&normalize_setting_key(key))
        );
        self.send_json(Method::PUT, &path, &SetValueRequest { value: &value })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_setting_key() {
        assert_eq!(normalize_setting_key("a.b.c"), "a-b-c");
        assert_eq!(normalize_setting_key("git-branch"), "git-branch");
        assert_eq!(normalize_setting_key(""), "");
    }

    #[test]
    fn test_setting_with_numeric_value() {
        let s: StackSetting =
            serde_json::from_str(r#"{"key":"allowed.web.source","value":8080,"readonly":true}"#)
                .unwrap();
        assert_eq!(s.value, SettingValue::from(8080));
        assert!(s.readonly);
    }
}
