//! Client error types.

use thiserror::Error;

/// Error returned by [`crate::ApiClient`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered and refused the operation.
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The outcome is unknown: connection failure, timeout or an unreadable
    /// response. The mutation may or may not have been applied.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A server error that did not come from the API itself, such as a
    /// gateway timeout. The mutation may or may not have been applied.
    #[error("Server error ({status})")]
    Unconfirmed { status: u16 },

    /// The client could not be constructed.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl ClientError {
    /// Whether the server confirmed that the operation did not happen.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The message to show the user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::Transport(_) | Self::Unconfirmed { .. } | Self::Setup(_) => {
                "Something went wrong, please try again"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_passes_message_through() {
        let err = ClientError::Rejected {
            status: 403,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "Unauthorized");
    }

    #[test]
    fn test_gateway_error_is_not_a_rejection() {
        let err = ClientError::Unconfirmed { status: 504 };
        assert!(!err.is_rejection());
        assert_eq!(err.user_message(), "Something went wrong, please try again");
    }

    #[test]
    fn test_setup_is_not_a_rejection() {
        let err = ClientError::Setup("bad base url".to_string());
        assert!(!err.is_rejection());
        assert_eq!(err.user_message(), "Something went wrong, please try again");
    }
}
