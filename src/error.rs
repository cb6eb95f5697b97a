use thirtyfour::error::WebDriverError;
use thiserror::Error;

use crate::credentials::CredentialError;

/// Rules the portals enforce that make a step pointless to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRule {
    RequisitionExpired,
    AlreadyDenied,
}

impl std::fmt::Display for BusinessRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessRule::RequisitionExpired => f.write_str("requisition has expired"),
            BusinessRule::AlreadyDenied => f.write_str("reservation note is already denied"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StepError {
    #[error("browser interaction failed: {0}")]
    Driver(#[from] WebDriverError),

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("business rule: {0}")]
    Business(BusinessRule),

    #[error("missing required data: {0}")]
    MissingData(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("credential cache error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse classification used when reporting a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Element not found, not clickable, or a wait ran out.
    Interaction,
    Business,
    MissingData,
    /// Local filesystem, JSON, crypto or a malformed URL.
    Local,
}

impl StepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StepError::Driver(_) | StepError::Timeout(_) => ErrorKind::Interaction,
            StepError::Business(_) => ErrorKind::Business,
            StepError::MissingData(_) => ErrorKind::MissingData,
            StepError::Io(_)
            | StepError::Json(_)
            | StepError::Credentials(_)
            | StepError::Url(_) => ErrorKind::Local,
        }
    }
}

pub type StepResult<T> = std::result::Result<T, StepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors_by_taxonomy() {
        assert_eq!(
            StepError::Timeout("dashboard".into()).kind(),
            ErrorKind::Interaction
        );
        assert_eq!(
            StepError::Business(BusinessRule::AlreadyDenied).kind(),
            ErrorKind::Business
        );
        assert_eq!(
            StepError::MissingData("R#").kind(),
            ErrorKind::MissingData
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(StepError::from(io).kind(), ErrorKind::Local);
    }

    #[test]
    fn messages_name_the_cause() {
        let err = StepError::Business(BusinessRule::RequisitionExpired);
        assert_eq!(err.to_string(), "business rule: requisition has expired");
        assert_eq!(
            StepError::MissingData("GL Account").to_string(),
            "missing required data: GL Account"
        );
    }
}
