use thiserror::Error;

#[derive(Debug, Error)]
pub enum AIError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("Rate limit error: {0}")]
    RateLimit(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AIError {
    /// Prefixes the message while keeping the error kind.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            Self::Network(msg) => Self::Network(format!("{prefix}: {msg}")),
            Self::Parse(msg) => Self::Parse(format!("{prefix}: {msg}")),
            Self::Authentication(msg) => Self::Authentication(format!("{prefix}: {msg}")),
            Self::RateLimit(msg) => Self::RateLimit(format!("{prefix}: {msg}")),
            Self::Api(msg) => Self::Api(format!("{prefix}: {msg}")),
            Self::Configuration(msg) => Self::Configuration(format!("{prefix}: {msg}")),
        }
    }
}

impl From<serde_json::Error> for AIError {
    fn from(error: serde_json::Error) -> Self {
        AIError::Parse(format!("JSON serialization error: {}", error))
    }
}

impl From<reqwest::Error> for AIError {
    fn from(error: reqwest::Error) -> Self {
        AIError::Network(error.to_string())
    }
}
