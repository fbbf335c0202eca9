//! Temporary firewall leases

use crate::client::Client;
use crate::error::Result;
use crate::request::encode_segment;
use crate::resources::action::{AsyncResult, GenericResponse};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_LEASE_FROM_IP: &str = "AUTO";
pub const DEFAULT_LEASE_TTL: u32 = 20;
pub const DEFAULT_LEASE_PORT: u16 = 22;

const LEASE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const LEASE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Lease parameters; anything left `None` takes the server-friendly default
#[derive(Debug, Clone, Default)]
pub struct LeaseOptions {
    /// Source address to allow; `AUTO` lets the server use the caller's IP
    pub from_ip: Option<String>,
    /// Time to live, in seconds
    pub ttl: Option<u32>,
    pub port: Option<u16>,
    /// Restrict the lease to one server; empty means every server
    pub server_id: Option<String>,
}

/// Wire body of a lease request, every field populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaseRequest {
    pub ttl: u32,
    pub from_ip: String,
    pub port: u16,
    pub server_id: String,
}

impl LeaseOptions {
    pub fn with_from_ip(mut self, ip: impl Into<String>) -> Self {
        self.from_ip = Some(ip.into());
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }

    /// Fill in defaults
    pub fn resolve(&self) -> LeaseRequest {
        LeaseRequest {
            ttl: self.ttl.unwrap_or(DEFAULT_LEASE_TTL),
            from_ip: self
                .from_ip
                .clone()
                .unwrap_or_else(|| DEFAULT_LEASE_FROM_IP.to_string()),
            port: self.port.unwrap_or(DEFAULT_LEASE_PORT),
            server_id: self.server_id.clone().unwrap_or_default(),
        }
    }
}

impl Client {
    /// Open a temporary firewall hole on the stack
    #[instrument(skip(self, options))]
    pub async fn lease(&self, stack_uid: &str, options: &LeaseOptions) -> Result<AsyncResult> {
        let body = options.resolve();
        info!(
            from_ip = %body.from_ip,
            port = body.port,
            ttl = body.ttl,
            "requesting firewall lease"
        );
        self.send_json(
            Method::POST,
            &format!("/stacks/{}/firewalls.json", encode_segment(stack_uid)),
            &body,
        )
        .await
    }

    /// Open a lease and wait until the server has applied it
    pub async fn lease_sync(
        &self,
        stack_uid: &str,
        options: &LeaseOptions,
    ) -> Result<GenericResponse> {
        let handle = self.lease(stack_uid, options).await?;
        self.wait_stack_async_action(
            &handle.id,
            stack_uid,
            LEASE_POLL_INTERVAL,
            LEASE_TIMEOUT,
            false,
        )
        .await
    }
}
