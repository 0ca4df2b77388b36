/// Fallback text when the server gives no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors raised while synchronizing a conversation with the chat API
///
/// Every variant is surfaced to the user as a single bot message via
/// [`SyncError::diagnostic`]. Recommendation parse failures are not errors and
/// never appear here.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// No known user identity, the server is never contacted
    #[error("You're not logged in or email is missing.")]
    Identity,

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The request could not be sent or the response could not be read
    #[error("HTTP client error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape the API promises
    #[error("Invalid response (status {status}): {detail}")]
    Protocol { status: u16, detail: String },

    /// The server answered with `success: false` or a non-success status
    #[error("Application error (status {status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Application {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

impl SyncError {
    /// User-visible text for the diagnostic bot message
    pub fn diagnostic(&self) -> String {
        match self {
            SyncError::Identity | SyncError::Validation(_) => self.to_string(),
            SyncError::Transport(detail) => format!("Network error: {}", detail),
            SyncError::Protocol { status, .. } => {
                format!("Error {}: Unexpected response from server.", status)
            }
            SyncError::Application {
                status,
                code,
                message,
            } => {
                let message = message
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(GENERIC_FAILURE_MESSAGE);
                match code.as_deref().filter(|c| !c.is_empty()) {
                    Some(code) => format!("Error {} ({}): {}", status, code, message),
                    None => format!("Error {}: {}", status, message),
                }
            }
        }
    }

    /// HTTP status attached to the failure, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Protocol { status, .. } | SyncError::Application { status, .. } => {
                Some(*status)
            }
            SyncError::Identity | SyncError::Validation(_) | SyncError::Transport(_) => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_diagnostic_with_code() {
        let err = SyncError::Application {
            status: 500,
            code: Some("DB_ERR".to_string()),
            message: Some("db down".to_string()),
        };
        assert_eq!(err.diagnostic(), "Error 500 (DB_ERR): db down");
    }

    #[test]
    fn test_application_diagnostic_without_code() {
        let err = SyncError::Application {
            status: 404,
            code: None,
            message: Some("Conversation not found".to_string()),
        };
        assert_eq!(err.diagnostic(), "Error 404: Conversation not found");
    }

    #[test]
    fn test_application_diagnostic_falls_back_to_generic_message() {
        let err = SyncError::Application {
            status: 502,
            code: None,
            message: None,
        };
        assert_eq!(
            err.diagnostic(),
            format!("Error 502: {}", GENERIC_FAILURE_MESSAGE)
        );
    }

    #[test]
    fn test_identity_diagnostic() {
        assert_eq!(
            SyncError::Identity.diagnostic(),
            "You're not logged in or email is missing."
        );
        assert_eq!(SyncError::Identity.status(), None);
    }

    #[test]
    fn test_validation_diagnostic_is_the_message() {
        let err = SyncError::Validation("Rating must be between 0 and 10.".to_string());
        assert_eq!(err.diagnostic(), "Rating must be between 0 and 10.");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_protocol_diagnostic_carries_status() {
        let err = SyncError::Protocol {
            status: 200,
            detail: "expected value at line 1".to_string(),
        };
        assert_eq!(err.status(), Some(200));
        assert!(err.diagnostic().starts_with("Error 200"));
    }
}
