use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::Client;

pub async fn list(client: &Client, name: &str, environment: &str) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    let backups = client.managed_backups(&stack.uid).await?;

    if backups.is_empty() {
        println!("{}", "No managed backups".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<22} {:<12} {:<20} {:<16}", "DATE", "TYPE", "DATABASE", "SERVER").bold()
    );
    for backup in &backups {
        println!(
            "{:<22} {:<12} {:<20} {:<16}",
            utils::format_time(backup.backup_date.as_ref()),
            backup.db_type.as_deref().unwrap_or("-"),
            backup.database_name.as_deref().unwrap_or("-"),
            backup.server_uid.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
