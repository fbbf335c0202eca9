use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::Client;

pub async fn list(client: &Client, name: &str, environment: &str) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    let vars = client.stack_env_vars(&stack.uid).await?;

    if vars.is_empty() {
        println!("{}", "No environment variables".dimmed());
    }
    for var in vars {
        println!("{}={}", var.key.cyan(), var.value);
    }
    Ok(())
}

pub async fn set(
    client: &Client,
    name: &str,
    environment: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    // env vars are always strings on the server
    let handle = client.stack_env_var_upsert(&stack.uid, key, value).await?;
    println!(
        "{} {} set on {} (action {})",
        "✓".green(),
        key.cyan(),
        utils::describe_target(&stack.name, &stack.environment),
        handle.id
    );
    Ok(())
}
