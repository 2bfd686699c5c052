use thiserror::Error;

pub type Result<T> = std::result::Result<T, MixCheckError>;

/// Failures while turning raw model output into an `AnalysisRecord`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("malformed JSON in model output: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Names the first missing or invalid field, checked in schema order.
    #[error("model output missing or invalid field: {0}")]
    SchemaViolation(&'static str),
}

#[derive(Debug, Error)]
pub enum MixCheckError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not reach completion endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx from the completion endpoint. Displays as the upstream
    /// message alone so the user sees the service's own wording.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl MixCheckError {
    pub fn failure_kind(&self) -> crate::models::FailureKind {
        use crate::models::FailureKind;
        match self {
            MixCheckError::Configuration(_) => FailureKind::Configuration,
            MixCheckError::Transport(_) => FailureKind::Transport,
            MixCheckError::Upstream { .. } => FailureKind::Upstream,
            MixCheckError::Parse(_) => FailureKind::Parse,
            MixCheckError::Validation(_) => FailureKind::Validation,
        }
    }
}
