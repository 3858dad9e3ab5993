use thiserror::Error;

/// Core error type for mailsub.
/// Every failure of `add_subscriber` surfaces to the caller as one of these;
/// nothing is retried or swallowed on the way out.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// Malformed credential or provider configuration. Raised at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The subscriber record is unusable. Raised before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("provider rejected request with status {status}: {body}")]
    RemoteRejection { status: u16, body: String },

    #[error("response body is not valid json: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SubscribeError {
    /// Stable short name, used as the telemetry error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SubscribeError::Configuration(_) => "configuration",
            SubscribeError::Validation(_) => "validation",
            SubscribeError::Transport(_) => "transport",
            SubscribeError::RemoteRejection { .. } => "remote_rejection",
            SubscribeError::Decode(_) => "decode",
            SubscribeError::Io(_) => "io",
            SubscribeError::Other(_) => "other",
        }
    }

    /// Short description safe to hand to telemetry: no response bodies,
    /// urls or other caller data, only the kind and status.
    pub fn summary(&self) -> String {
        match self {
            SubscribeError::RemoteRejection { status, .. } => format!("status {status}"),
            SubscribeError::Transport(e) if e.is_timeout() => "timed out".to_string(),
            SubscribeError::Transport(e) if e.is_connect() => "connection failed".to_string(),
            other => other.kind().to_string(),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, SubscribeError>;
