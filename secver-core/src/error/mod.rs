use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("secret {secret_id:?} version {version:?} not found")]
    NotFound { secret_id: String, version: String },
    #[error("reading secret version: {message}")]
    Upstream { message: String },
    #[error("reading secret {secret_id:?}: lookup cancelled")]
    Cancelled { secret_id: String },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// A resolved field could not be stored in the caller's attribute store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("setting {attribute}: {message}")]
pub struct AssignmentError {
    pub attribute: String,
    pub message: String,
}

impl AssignmentError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error("missing required attribute {0:?}")]
    MissingAttribute(String),
    #[error("invalid attribute {attribute}: {message}")]
    InvalidAttribute { attribute: String, message: String },
}
