//! Stacks: listing, lookup and creation

use crate::client::Client;
use crate::error::{ApiError, Result};
use crate::request::encode_segment;
use crate::resources::action::AsyncResult;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

/// Deployment outcome of a stack (`status` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackStatus {
    QueuedForAnalysis,
    DeploySucceeded,
    DeployFailed,
    Analyzing,
    Analyzed,
    QueuedForDeploy,
    Deploying,
    TerminalFailure,
}

impl StackStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(StackStatus::QueuedForAnalysis),
            1 => Some(StackStatus::DeploySucceeded),
            2 => Some(StackStatus::DeployFailed),
            3 => Some(StackStatus::Analyzing),
            4 => Some(StackStatus::Analyzed),
            5 => Some(StackStatus::QueuedForDeploy),
            6 => Some(StackStatus::Deploying),
            7 => Some(StackStatus::TerminalFailure),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            StackStatus::QueuedForAnalysis => 0,
            StackStatus::DeploySucceeded => 1,
            StackStatus::DeployFailed => 2,
            StackStatus::Analyzing => 3,
            StackStatus::Analyzed => 4,
            StackStatus::QueuedForDeploy => 5,
            StackStatus::Deploying => 6,
            StackStatus::TerminalFailure => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StackStatus::QueuedForAnalysis => "Pending analysis",
            StackStatus::DeploySucceeded => "Deployed successfully",
            StackStatus::DeployFailed => "Deployment failed",
            StackStatus::Analyzing => "Analyzing",
            StackStatus::Analyzed => "Analyzed",
            StackStatus::QueuedForDeploy => "Queued for deployment",
            StackStatus::Deploying => "Deploying",
            StackStatus::TerminalFailure => "Unable to analyze",
        }
    }

    /// A build has finished, one way or the other
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            StackStatus::DeploySucceeded | StackStatus::DeployFailed | StackStatus::TerminalFailure
        )
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runtime wellness of a stack (`health` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Unknown,
    Building,
    Partial,
    Healthy,
    Broken,
}

impl HealthStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(HealthStatus::Unknown),
            1 => Some(HealthStatus::Building),
            2 => Some(HealthStatus::Partial),
            3 => Some(HealthStatus::Healthy),
            4 => Some(HealthStatus::Broken),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            HealthStatus::Unknown => 0,
            HealthStatus::Building => 1,
            HealthStatus::Partial => 2,
            HealthStatus::Healthy => 3,
            HealthStatus::Broken => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "Unknown",
            HealthStatus::Building => "Building",
            HealthStatus::Partial => "Impaired",
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Broken => "Failed",
        }
    }

    /// Health has been assessed after a build
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            HealthStatus::Partial | HealthStatus::Healthy | HealthStatus::Broken
        )
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const UNKNOWN_LABEL: &str = "Unknown";

/// Snapshot of a stack as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub git: String,
    #[serde(default)]
    pub git_branch: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub cloud: String,
    #[serde(default)]
    pub fqdn: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub framework: String,
    #[serde(rename = "status")]
    pub status_code: i32,
    #[serde(rename = "health")]
    pub health_code: i32,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default, rename = "has_loadbalancer")]
    pub has_load_balancer: bool,
    #[serde(default)]
    pub redeploy_hook: Option<String>,
    #[serde(default, rename = "last_activity_iso")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default, rename = "updated_at_iso")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "created_at_iso")]
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "deploy_directory")]
    pub deploy_dir: String,
}

impl Stack {
    pub fn status_kind(&self) -> Option<StackStatus> {
        StackStatus::from_code(self.status_code)
    }

    pub fn health_kind(&self) -> Option<HealthStatus> {
        HealthStatus::from_code(self.health_code)
    }

    /// Human-readable status, `Unknown` for unmapped codes
    pub fn status(&self) -> &'static str {
        self.status_kind().map_or(UNKNOWN_LABEL, |s| s.label())
    }

    /// Human-readable health, `Unknown` for unmapped codes
    pub fn health(&self) -> &'static str {
        self.health_kind().map_or(UNKNOWN_LABEL, |h| h.label())
    }

    /// The build has finished and health has been assessed
    pub fn is_build_complete(&self) -> bool {
        self.status_kind().is_some_and(|s| s.is_settled())
            && self.health_kind().is_some_and(|h| h.is_settled())
    }

    /// Case-insensitive name match, optionally restricted to one environment
    pub fn matches(&self, name: &str, environment: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && (environment.is_empty() || self.environment == environment)
    }
}

/// Deployment target for a new stack
#[derive(Debug, Clone, Default)]
pub struct TargetOptions {
    pub cloud: String,
    pub region: String,
    pub size: String,
    pub build_type: String,
}

/// Parameters for [`Client::create_stack`]
#[derive(Debug, Clone, Default)]
pub struct CreateStackOptions {
    pub name: String,
    pub environment: String,
    pub service_yaml: String,
    pub manifest_yaml: String,
    pub target: TargetOptions,
}

impl CreateStackOptions {
    pub fn new(name: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            environment: environment.into(),
            ..Self::default()
        }
    }

    pub fn with_service_yaml(mut self, yaml: impl Into<String>) -> Self {
        self.service_yaml = yaml.into();
        self
    }

    pub fn with_manifest_yaml(mut self, yaml: impl Into<String>) -> Self {
        self.manifest_yaml = yaml.into();
        self
    }

    pub fn with_target(mut self, target: TargetOptions) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Serialize)]
struct CreateStackRequest<'a> {
    name: &'a str,
    environment: &'a str,
    service_yaml: &'a str,
    manifest_yaml: &'a str,
    cloud: &'a str,
    region: &'a str,
    size: &'a str,
    build_type: &'a str,
}

impl Client {
    /// List every stack visible to the account
    #[instrument(skip(self))]
    pub async fn stack_list(&self) -> Result<Vec<Stack>> {
        self.list_all("/stacks.json").await
    }

    /// List every stack, then keep those matching `filter`
    pub async fn stack_list_with_filter<F>(&self, filter: F) -> Result<Vec<Stack>>
    where
        F: Fn(&Stack) -> bool,
    {
        self.list_filtered("/stacks.json", filter).await
    }

    #[instrument(skip(self))]
    pub async fn find_stack_by_uid(&self, stack_uid: &str) -> Result<Stack> {
        self.get(&format!("/stacks/{}.json", encode_segment(stack_uid))).await
    }

    /// Find a stack by name (case-insensitive). An empty `environment`
    /// matches any environment; otherwise it must match exactly.
    #[instrument(skip(self))]
    pub async fn find_stack_by_name(&self, stack_name: &str, environment: &str) -> Result<Stack> {
        self.stack_list()
            .await?
            .into_iter()
            .find(|s| s.matches(stack_name, environment))
            .ok_or_else(|| ApiError::NotFound {
                kind: "Stack",
                name: stack_name.to_string(),
            })
    }

    /// Resolve a stack by name and return a fresh snapshot of it
    pub async fn stack_info(&self, stack_name: &str) -> Result<Stack> {
        self.stack_info_with_environment(stack_name, "").await
    }

    pub async fn stack_info_with_environment(
        &self,
        stack_name: &str,
        environment: &str,
    ) -> Result<Stack> {
        let stack = self.find_stack_by_name(stack_name, environment).await?;
        self.find_stack_by_uid(&stack.uid).await
    }

    /// Create a stack; the build continues server-side
    #[instrument(
        skip(self, options),
        fields(name = %options.name, environment = %options.environment)
    )]
    pub async fn create_stack(&self, options: &CreateStackOptions) -> Result<AsyncResult> {
        let body = CreateStackRequest {
            name: &options.name,
            environment: &options.environment,
            service_yaml: &options.service_yaml,
            manifest_yaml: &options.manifest_yaml,
            cloud: &options.target.cloud,
            region: &options.target.region,
            size: &options.target.size,
            build_type: &options.target.build_type,
        };
        let result: AsyncResult = self.send_json(Method::POST, "/stacks", &body).await?;
        info!(action_id = %result.id, "stack creation queued");
        Ok(result)
    }
}
