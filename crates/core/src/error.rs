use thiserror::Error;

pub type MarketMateResult<T> = Result<T, MarketMateError>;

#[derive(Error, Debug)]
pub enum MarketMateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A remote call failed: transport error, non-2xx status, or an
    /// undecodable success body. `message` carries the server's
    /// `body.message` when one could be extracted.
    #[error("Remote call failed: {}", .message.as_deref().unwrap_or("no server message"))]
    Remote {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl MarketMateError {
    /// User-facing text for a failed operation: the server-supplied message
    /// when present and non-empty, otherwise the fixed per-operation default.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Remote {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            Self::Validation(m) => m.clone(),
            _ => default.to_string(),
        }
    }
}
