//! Managed database backups

use crate::client::Client;
use crate::error::Result;
use crate::request::encode_segment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A backup record as the API returns it.
///
/// Only a few commonly present fields are typed; everything else is kept
/// verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedBackup {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub server_uid: Option<String>,
    #[serde(default)]
    pub db_type: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default, rename = "backup_date_iso")]
    pub backup_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Client {
    #[instrument(skip(self))]
    pub async fn managed_backups(&self, stack_uid: &str) -> Result<Vec<ManagedBackup>> {
        self.list_all(&format!("/stacks/{}/backups.json", encode_segment(stack_uid)))
            .await
    }
}
