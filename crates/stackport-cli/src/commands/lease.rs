use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::{Client, LeaseOptions};

pub async fn handle(
    client: &Client,
    name: &str,
    environment: &str,
    options: &LeaseOptions,
    wait: bool,
) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    let request = options.resolve();
    println!(
        "Opening port {} on {} for {}s from {}",
        request.port,
        utils::describe_target(&stack.name, &stack.environment).cyan(),
        request.ttl,
        request.from_ip
    );

    if !wait {
        let handle = client.lease(&stack.uid, options).await?;
        println!("{} Lease requested (action {})", "✓".green(), handle.id);
        return Ok(());
    }

    let res = client.lease_sync(&stack.uid, options).await?;
    if res.ok {
        println!("{} Lease applied", "✓".green());
        Ok(())
    } else {
        anyhow::bail!("lease failed: {}", res.message)
    }
}
