use thiserror::Error;

/// Failure taxonomy for everything that crosses the orchestrator boundary.
///
/// Errors travel inside UI messages, so the payload is captured as text
/// rather than holding the source error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LearnError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    EmptyInput(&'static str),
}

impl From<reqwest::Error> for LearnError {
    fn from(err: reqwest::Error) -> Self {
        LearnError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LearnError>;
