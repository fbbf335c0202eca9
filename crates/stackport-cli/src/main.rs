mod commands;
mod progress;
mod utils;

use clap::{Parser, Subcommand};
use stackport::{Client, ProgressObserver, TracingProgress};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stackport")]
#[command(about = "Manage application stacks from the terminal", long_about = None)]
struct Cli {
    /// API root URL (overrides STACKPORT_API_URL and the profile file)
    #[arg(long, global = true, env = "STACKPORT_API_URL")]
    api_url: Option<String>,

    /// Access token (overrides STACKPORT_ACCESS_TOKEN and the profile file)
    #[arg(long, global = true, env = "STACKPORT_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log HTTP traffic to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, inspect, create and wait for stacks
    #[command(subcommand)]
    Stacks(StacksCommand),

    /// Read and change stack settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Read and change stack environment variables
    #[command(name = "env-vars", subcommand)]
    EnvVars(EnvVarsCommand),

    /// List managed database backups
    Backups {
        /// Stack name
        stack: String,
        /// Environment name (any environment when omitted)
        #[arg(short, long, default_value = "")]
        env: String,
    },

    /// Open a temporary firewall hole on a stack
    Lease {
        /// Stack name
        stack: String,
        #[arg(short, long, default_value = "")]
        env: String,
        /// Source address to allow (server uses the caller's address by default)
        #[arg(long)]
        from_ip: Option<String>,
        /// Lease lifetime in seconds
        #[arg(long)]
        ttl: Option<u32>,
        #[arg(long)]
        port: Option<u16>,
        /// Only open the port on this server
        #[arg(long)]
        server_id: Option<String>,
        /// Return as soon as the lease is requested
        #[arg(long)]
        no_wait: bool,
    },

    /// Redeploy a stack
    Redeploy {
        /// Stack name
        stack: String,
        #[arg(short, long, default_value = "")]
        env: String,
        /// Git ref to deploy (branch default when omitted)
        #[arg(long, default_value = "")]
        git_ref: String,
        /// Comma-separated services to redeploy
        #[arg(long, default_value = "")]
        services: String,
    },

    /// Run a stack action such as `restart` or `clear_caches`
    Action {
        /// Stack name
        stack: String,
        /// Action command
        action: String,
        #[arg(short, long, default_value = "")]
        env: String,
        /// Run a database action against this server
        #[arg(long)]
        server_uid: Option<String>,
        /// Database type for database actions
        #[arg(long, requires = "server_uid")]
        db_type: Option<String>,
        /// Wait for the action to finish
        #[arg(short, long)]
        wait: bool,
        /// Give up waiting after this many seconds
        #[arg(long, default_value = "600")]
        timeout_secs: u64,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum StacksCommand {
    /// List stacks
    List {
        /// Only show stacks in this environment
        #[arg(short, long, default_value = "")]
        env: String,
    },
    /// Show one stack
    Show {
        /// Stack name (case-insensitive)
        name: String,
        #[arg(short, long, default_value = "")]
        env: String,
    },
    /// Create a stack
    Create {
        name: String,
        environment: String,
        /// services.yml to upload
        #[arg(long)]
        service_yaml: Option<PathBuf>,
        /// manifest.yml to upload
        #[arg(long)]
        manifest_yaml: Option<PathBuf>,
        #[arg(long)]
        cloud: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        build_type: Option<String>,
    },
    /// Wait until a stack build has settled
    Wait {
        name: String,
        #[arg(short, long, default_value = "")]
        env: String,
        /// Seconds between polls
        #[arg(long, default_value = "60")]
        interval_secs: u64,
        /// Give up after this many seconds
        #[arg(long, default_value = "10800")]
        timeout_secs: u64,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// List settings of a stack
    List {
        stack: String,
        #[arg(short, long, default_value = "")]
        env: String,
    },
    /// Change one setting (dotted keys such as git.branch are accepted)
    Set {
        stack: String,
        key: String,
        value: String,
        #[arg(short, long, default_value = "")]
        env: String,
    },
}

#[derive(Subcommand)]
enum EnvVarsCommand {
    /// List environment variables of a stack
    List {
        stack: String,
        #[arg(short, long, default_value = "")]
        env: String,
    },
    /// Create or update an environment variable
    Set {
        stack: String,
        key: String,
        value: String,
        #[arg(short, long, default_value = "")]
        env: String,
    },
}

fn init_logging(verbose: bool) {
    // poll progress stays visible when stderr is not a terminal
    let default_level = if verbose {
        "stackport=debug"
    } else {
        "warn,stackport::progress=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(cli: &Cli) -> anyhow::Result<Client> {
    let overrides = stackport_config::Profile {
        api_url: cli.api_url.clone(),
        access_token: cli.token.clone(),
        ..Default::default()
    };
    let config = stackport_config::resolve_client_config(overrides)?;
    tracing::debug!(base_url = %config.base_url, "client configured");
    Ok(Client::new(config)?.with_progress(progress_observer(std::io::stderr().is_terminal())))
}

/// Colored poll lines for an interactive terminal, log events otherwise
fn progress_observer(interactive: bool) -> Arc<dyn ProgressObserver> {
    if interactive {
        Arc::new(progress::TerminalProgress)
    } else {
        Arc::new(TracingProgress)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // version needs no configuration
    if matches!(cli.command, Commands::Version) {
        println!("stackport {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let client = build_client(&cli)?;

    match cli.command {
        Commands::Stacks(cmd) => match cmd {
            StacksCommand::List { env } => commands::stacks::list(&client, &env).await,
            StacksCommand::Show { name, env } => commands::stacks::show(&client, &name, &env).await,
            StacksCommand::Create {
                name,
                environment,
                service_yaml,
                manifest_yaml,
                cloud,
                region,
                size,
                build_type,
            } => {
                let target = commands::stacks::TargetArgs {
                    cloud,
                    region,
                    size,
                    build_type,
                };
                commands::stacks::create(
                    &client,
                    &name,
                    &environment,
                    service_yaml.as_deref(),
                    manifest_yaml.as_deref(),
                    target,
                )
                .await
            }
            StacksCommand::Wait {
                name,
                env,
                interval_secs,
                timeout_secs,
            } => commands::stacks::wait(&client, &name, &env, interval_secs, timeout_secs).await,
        },
        Commands::Settings(cmd) => match cmd {
            SettingsCommand::List { stack, env } => {
                commands::settings::list(&client, &stack, &env).await
            }
            SettingsCommand::Set {
                stack,
                key,
                value,
                env,
            } => commands::settings::set(&client, &stack, &env, &key, &value).await,
        },
        Commands::EnvVars(cmd) => match cmd {
            EnvVarsCommand::List { stack, env } => {
                commands::env_vars::list(&client, &stack, &env).await
            }
            EnvVarsCommand::Set {
                stack,
                key,
                value,
                env,
            } => commands::env_vars::set(&client, &stack, &env, &key, &value).await,
        },
        Commands::Backups { stack, env } => commands::backups::list(&client, &stack, &env).await,
        Commands::Lease {
            stack,
            env,
            from_ip,
            ttl,
            port,
            server_id,
            no_wait,
        } => {
            let options = stackport::LeaseOptions {
                from_ip,
                ttl,
                port,
                server_id,
            };
            commands::lease::handle(&client, &stack, &env, &options, !no_wait).await
        }
        Commands::Redeploy {
            stack,
            env,
            git_ref,
            services,
        } => commands::actions::redeploy(&client, &stack, &env, &git_ref, &services).await,
        Commands::Action {
            stack,
            action,
            env,
            server_uid,
            db_type,
            wait,
            timeout_secs,
        } => {
            let db = server_uid.map(|server_uid| commands::actions::DbTarget {
                server_uid,
                db_type,
            });
            commands::actions::run(&client, &stack, &env, &action, db, wait, timeout_secs).await
        }
        Commands::Version => Ok(()),
    }
}
