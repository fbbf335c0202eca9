pub mod actions;
pub mod backups;
pub mod env_vars;
pub mod lease;
pub mod settings;
pub mod stacks;

use stackport::{Client, Stack};

/// Resolve a stack by name, optionally pinned to one environment
pub async fn find_stack(client: &Client, name: &str, environment: &str) -> anyhow::Result<Stack> {
    Ok(client.stack_info_with_environment(name, environment).await?)
}
