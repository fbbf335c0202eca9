use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "API URL is not configured. Set it in one of:\n\
        - the --api-url flag\n\
        - the STACKPORT_API_URL environment variable\n\
        - api_url in stackport.yaml, .stackport.yaml or ~/.config/stackport/config.yaml"
    )]
    MissingApiUrl,

    #[error("STACKPORT_CONFIG_PATH points to a missing file: {}", .0.display())]
    ExplicitPathMissing(PathBuf),

    #[error("Invalid request timeout {value:?}: {reason}")]
    InvalidTimeout { value: String, reason: String },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Client(#[from] stackport::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
