use crate::commands::find_stack;
use crate::utils;
use colored::Colorize;
use stackport::{Client, CreateStackOptions, PollOptions, TargetOptions};
use std::path::Path;
use std::time::Duration;

pub struct TargetArgs {
    pub cloud: Option<String>,
    pub region: Option<String>,
    pub size: Option<String>,
    pub build_type: Option<String>,
}

pub async fn list(client: &Client, environment: &str) -> anyhow::Result<()> {
    let stacks = client
        .stack_list_with_filter(|s| environment.is_empty() || s.environment == environment)
        .await?;

    if stacks.is_empty() {
        println!("{}", "No stacks found".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<12} {:<24} {:<14} {:<24} {:<10}",
            "UID", "NAME", "ENVIRONMENT", "STATUS", "HEALTH"
        )
        .bold()
    );
    println!("{}", "─".repeat(88).dimmed());
    for stack in &stacks {
        println!(
            "{:<12} {:<24} {:<14} {:<24} {:<10}",
            stack.uid,
            stack.name,
            stack.environment,
            utils::colored_status(stack),
            utils::colored_health(stack)
        );
    }
    Ok(())
}

pub async fn show(client: &Client, name: &str, environment: &str) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;

    println!("{}", stack.name.bold());
    println!("  uid:          {}", stack.uid.cyan());
    println!("  environment:  {}", stack.environment);
    println!("  status:       {}", utils::colored_status(&stack));
    println!("  health:       {}", utils::colored_health(&stack));
    println!("  cloud:        {}", stack.cloud);
    println!("  fqdn:         {}", stack.fqdn);
    println!("  git:          {} ({})", stack.git, stack.git_branch);
    println!("  framework:    {} / {}", stack.language, stack.framework);
    println!("  maintenance:  {}", stack.maintenance_mode);
    println!("  created:      {}", utils::format_time(Some(&stack.created_at)));
    println!("  updated:      {}", utils::format_time(stack.updated_at.as_ref()));
    println!("  last active:  {}", utils::format_time(stack.last_activity.as_ref()));
    Ok(())
}

fn read_optional(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    path.map(|p| {
        std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", p.display(), e))
    })
    .transpose()
}

pub async fn create(
    client: &Client,
    name: &str,
    environment: &str,
    service_yaml: Option<&Path>,
    manifest_yaml: Option<&Path>,
    target: TargetArgs,
) -> anyhow::Result<()> {
    let mut options = CreateStackOptions::new(name, environment).with_target(TargetOptions {
        cloud: target.cloud.unwrap_or_default(),
        region: target.region.unwrap_or_default(),
        size: target.size.unwrap_or_default(),
        build_type: target.build_type.unwrap_or_default(),
    });
    if let Some(yaml) = read_optional(service_yaml)? {
        options = options.with_service_yaml(yaml);
    }
    if let Some(yaml) = read_optional(manifest_yaml)? {
        options = options.with_manifest_yaml(yaml);
    }

    let handle = client.create_stack(&options).await?;
    println!(
        "{} Creating {} (action {})",
        "✓".green(),
        utils::describe_target(name, environment).cyan(),
        handle.id
    );
    println!(
        "  Run {} to follow the build",
        format!("stackport stacks wait {} -e {}", name, environment).cyan()
    );
    Ok(())
}

pub async fn wait(
    client: &Client,
    name: &str,
    environment: &str,
    interval_secs: u64,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let stack = find_stack(client, name, environment).await?;
    println!(
        "Waiting for {} to settle...",
        utils::describe_target(&stack.name, &stack.environment).cyan()
    );

    let options = PollOptions::new(
        Duration::from_secs(interval_secs),
        Duration::from_secs(timeout_secs),
    );
    let settled = client.wait_stack_build_with(&stack.uid, options).await?;

    println!(
        "{} {} / {}",
        "✓".green(),
        utils::colored_status(&settled),
        utils::colored_health(&settled)
    );
    Ok(())
}
