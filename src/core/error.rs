//! Error types for nogo-router
//!
//! Every failure is local to a single submission attempt. The variants map
//! one-to-one onto what the user is shown: validation problems become an
//! immediate alert, everything else ends up in the request status line.

use std::fmt;

/// Status text shown when the backend fails without saying why.
pub const GENERIC_BACKEND_FAILURE: &str = "backend failed to find a route";

/// Status text shown when no reply could be obtained at all.
pub const TRANSPORT_FAILURE: &str = "error occurred";

/// Main error type for nogo-router operations
#[derive(Debug)]
pub enum Error {
    /// Start or destination address is blank; nothing was sent
    Validation(String),

    /// The backend answered but reported a failure
    Backend {
        /// HTTP status of the reply, when it was not a 2xx
        status: Option<u16>,
        /// Server-supplied message, if any
        message: Option<String>,
    },

    /// The reply body could not be understood
    Decode(String),

    /// No reply reachable (connection refused, timeout, ...)
    Transport(String),

    /// Invalid configuration (bad base URL and the like)
    InvalidInput(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl Error {
    /// The message a failed submission leaves in the request status.
    pub fn status_message(&self) -> String {
        match self {
            Error::Backend { message: Some(msg), .. } => msg.clone(),
            Error::Backend { message: None, .. } | Error::Decode(_) => {
                GENERIC_BACKEND_FAILURE.to_string()
            }
            Error::Transport(_) => TRANSPORT_FAILURE.to_string(),
            Error::Validation(msg) | Error::InvalidInput(msg) => msg.clone(),
            Error::IoError(err) => err.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => {
                write!(f, "Invalid route request: {}", msg)
            }
            Error::Backend { status: Some(status), message } => {
                let msg = message.as_deref().unwrap_or(GENERIC_BACKEND_FAILURE);
                write!(f, "Backend error (HTTP {}): {}", status, msg)
            }
            Error::Backend { status: None, message } => {
                let msg = message.as_deref().unwrap_or(GENERIC_BACKEND_FAILURE);
                write!(f, "Backend error: {}", msg)
            }
            Error::Decode(msg) => {
                write!(f, "Could not decode backend reply: {}", msg)
            }
            Error::Transport(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else if err.is_builder() {
            Error::InvalidInput(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

/// Convenience result type for nogo-router operations
pub type Result<T> = std::result::Result<T, Error>;
