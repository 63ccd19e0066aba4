use thiserror::Error;

use crate::config::StatusPolicy;

/// Failure of a single GET against the result portal.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("GET {url} timed out")]
    Timeout { url: String },

    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// Connection and timeout failures are always retried. Status failures
    /// only when the policy asks for it.
    pub fn is_retryable(&self, policy: StatusPolicy) -> bool {
        match self {
            Self::Connect { .. } | Self::Timeout { .. } => true,
            Self::Status { .. } => policy == StatusPolicy::Retry,
            Self::Transport { .. } => false,
        }
    }

    /// True when the error must end the whole run instead of one student.
    pub fn is_fatal(&self, policy: StatusPolicy) -> bool {
        matches!(self, Self::Status { .. }) && policy == StatusPolicy::Abort
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SemesterError {
    #[error("unknown semester id {code:?}: expected one of the generated codes for {start_year}-{end_year}")]
    Unknown {
        code: String,
        start_year: u16,
        end_year: u16,
    },

    #[error("invalid semester year range {start_year}-{end_year}: years must lie within 2000-2099")]
    InvalidRange { start_year: u16, end_year: u16 },
}
