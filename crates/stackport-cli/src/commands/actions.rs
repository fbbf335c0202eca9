use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::Client;
use std::time::Duration;

const ACTION_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct DbTarget {
    pub server_uid: String,
    pub db_type: Option<String>,
}

pub async fn redeploy(
    client: &Client,
    name: &str,
    environment: &str,
    git_ref: &str,
    services: &str,
) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    let res = client.redeploy_stack(&stack.uid, git_ref, services).await?;

    if !res.ok {
        anyhow::bail!("redeploy rejected: {}", res.message);
    }
    println!(
        "{} Redeploying {}: {}",
        "✓".green(),
        utils::describe_target(&stack.name, &stack.environment).cyan(),
        res.message
    );
    Ok(())
}

pub async fn run(
    client: &Client,
    name: &str,
    environment: &str,
    action: &str,
    db: Option<DbTarget>,
    wait: bool,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;

    let handle = match &db {
        Some(target) => {
            client
                .invoke_db_stack_action(
                    &stack.uid,
                    &target.server_uid,
                    target.db_type.as_deref(),
                    action,
                )
                .await?
        }
        None => client.invoke_stack_action(&stack.uid, action).await?,
    };
    println!(
        "{} {} started on {} (action {})",
        "✓".green(),
        action.cyan(),
        utils::describe_target(&stack.name, &stack.environment),
        handle.id
    );

    if !wait {
        return Ok(());
    }

    let res = client
        .wait_stack_async_action(
            &handle.id,
            &stack.uid,
            ACTION_POLL_INTERVAL,
            Duration::from_secs(timeout_secs),
            true,
        )
        .await?;
    if res.ok {
        println!("{} {} finished: {}", "✓".green(), action, res.message);
        Ok(())
    } else {
        anyhow::bail!("{} failed: {}", action, res.message)
    }
}
