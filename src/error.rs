// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types shared by the session, store and API layers.

/// Error type for every fallible client operation.
///
/// Only [`ClientError::Unauthorized`] affects session state: the session
/// manager clears the session and emits a redirect when it sees one. All
/// other variants are transient and leave local state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials rejected by login or register.
    #[error("{0}")]
    Auth(String),

    /// 401 on an authenticated call, or no stored token.
    #[error("Session expired: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Invalid server response: {0}")]
    MalformedResponse(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Whether this error must invalidate the current session.
    pub fn is_session_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Whether this error came back from the remote service (as opposed to
    /// transport, parsing or local validation failures).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::Remote { .. } | ClientError::NotFound(_) | ClientError::Unauthorized(_)
        )
    }

    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Could not reach the workout service. Check your connection and try again."
                    .to_string()
            }
            ClientError::Unauthorized(_) => "Please log in again.".to_string(),
            ClientError::MalformedResponse(_) => {
                "The workout service sent an unexpected response.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Map a non-success HTTP status and server message to an error.
    ///
    /// `fallback` is used when the server did not provide a message.
    pub fn from_status(status: u16, message: Option<String>, fallback: &str) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        match status {
            401 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            400 | 422 => ClientError::Validation(message),
            _ => ClientError::Remote { status, message },
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
