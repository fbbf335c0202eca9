use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::Client;

pub async fn list(client: &Client, name: &str, environment: &str) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    let settings = client.stack_settings(&stack.uid).await?;

    for setting in settings {
        let marker = if setting.readonly { " (read-only)".dimmed() } else { "".normal() };
        println!("{} = {}{}", setting.key.cyan(), setting.value, marker);
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
    let handle = client
        .set_setting(&stack.uid, key, utils::parse_value(value))
        .await?;
    println!(
        "{} {} updated on {} (action {})",
        "✓".green(),
        key.cyan(),
        utils::describe_target(&stack.name, &stack.environment),
        handle.id
    );
    Ok(())
}
