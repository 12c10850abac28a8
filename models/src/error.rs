use thiserror::Error;

/// Problems caught in a form draft before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} must be a numeric id, got '{value}'")]
    InvalidId { field: &'static str, value: String },

    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Form field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::InvalidId { field, .. }
            | Self::InvalidDate { field, .. } => field,
        }
    }
}
