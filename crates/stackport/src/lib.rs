//! stackport
//!
//! Client library for a stack management REST API: deployable application
//! stacks with their settings, environment variables, backups, firewall
//! leases and deployment actions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Resource accessors                  │
//! │  stacks · settings · env vars · backups ·        │
//! │  firewall leases · actions                       │
//! └───────┬─────────────────────────────┬───────────┘
//!         │                             │
//! ┌───────▼───────────────┐   ┌─────────▼───────────┐
//! │ request → transport → │   │   Async waiters     │
//! │ decode (+ pagination) │◄──┤ action · stack build│
//! └───────────────────────┘   └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stackport::{Client, ClientConfig, LeaseOptions};
//!
//! let config = ClientConfig::new("https://api.example.com/3").with_access_token(token);
//! let client = Client::new(config)?;
//!
//! let stack = client.stack_info_with_environment("web", "production").await?;
//! println!("{}: {} / {}", stack.name, stack.status(), stack.health());
//!
//! // Open SSH for 20 seconds from the caller's address and wait for it
//! let res = client.lease_sync(&stack.uid, &LeaseOptions::default()).await?;
//! assert!(res.ok);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod progress;
pub mod request;
pub mod resources;
pub mod response;
pub mod transport;
pub mod value;
pub mod waiter;

// Re-exports
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use progress::{NoProgress, PollTick, ProgressObserver, TracingProgress};
pub use request::ApiRequest;
pub use resources::action::{ActionId, AsyncResult, GenericResponse};
pub use resources::backup::ManagedBackup;
pub use resources::env_var::StackEnvVar;
pub use resources::firewall::{LeaseOptions, LeaseRequest};
pub use resources::setting::{StackSetting, normalize_setting_key};
pub use resources::stack::{
    CreateStackOptions, HealthStatus, Stack, StackStatus, TargetOptions,
};
pub use response::{Decoded, Pagination};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use value::SettingValue;
pub use waiter::PollOptions;

pub use reqwest::Method;
