use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use stackport::{HealthStatus, SettingValue, Stack, StackStatus};

/// Interpret a command-line value the way a settings form would
pub fn parse_value(raw: &str) -> SettingValue {
    match raw {
        "true" => SettingValue::Bool(true),
        "false" => SettingValue::Bool(false),
        "null" => SettingValue::Null,
        _ => match raw.parse::<i64>() {
            Ok(n) => SettingValue::from(n),
            Err(_) => SettingValue::from(raw),
        },
    }
}

pub fn colored_status(stack: &Stack) -> ColoredString {
    let label = stack.status();
    match stack.status_kind() {
        Some(StackStatus::DeploySucceeded) => label.green(),
        Some(StackStatus::DeployFailed | StackStatus::TerminalFailure) => label.red(),
        Some(_) => label.yellow(),
        None => label.dimmed(),
    }
}

pub fn colored_health(stack: &Stack) -> ColoredString {
    let label = stack.health();
    match stack.health_kind() {
        Some(HealthStatus::Healthy) => label.green(),
        Some(HealthStatus::Partial) => label.yellow(),
        Some(HealthStatus::Broken) => label.red(),
        _ => label.dimmed(),
    }
}

pub fn format_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `name` or `name (environment)` for messages
pub fn describe_target(name: &str, environment: &str) -> String {
    if environment.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, environment)
    }
}
