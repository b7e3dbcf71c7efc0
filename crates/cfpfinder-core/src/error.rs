//! Error types for the CFP Finder core library.
//!
//! This module defines the error types used throughout the core crate,
//! providing structured error handling with context.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CfpResult<T> = Result<T, CfpError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone)]
pub enum CfpError {
    /// A caller-supplied date that is not a valid `YYYY-MM-DD` calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A month header that does not name one of the twelve calendar months.
    #[error("Invalid month name: {name}")]
    InvalidMonth {
        /// The offending month name.
        name: String,
    },

    /// An entry date token that does not follow the `D`, `D-D` or `D-D/M` grammar,
    /// or names a day that does not exist.
    #[error("Invalid date token '{token}': {reason}")]
    InvalidDateToken {
        /// The raw token.
        token: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The agenda document does not exist.
    #[error(
        "Conference data not found at {}. Please ensure the agenda submodule is initialized: \
         git submodule update --init --recursive",
        path.display()
    )]
    DocumentNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading a file or directory failed.
    #[error("I/O error on {}: {reason}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// A matching backend returned something that could not be decoded.
    #[error("Could not decode model output: {reason}")]
    Decode {
        /// Description of the failure.
        reason: String,
    },

    /// The sampling backend failed or refused the request.
    #[error("Sampling failed: {reason}")]
    Sampling {
        /// Description of the failure.
        reason: String,
    },
}

impl CfpError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid date token error.
    #[must_use]
    pub fn invalid_date_token(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDateToken {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Creates an I/O error for `path`.
    #[must_use]
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Creates a sampling error.
    #[must_use]
    pub fn sampling(reason: impl Into<String>) -> Self {
        Self::Sampling {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CfpError::invalid_date("Cannot parse: 2026-02-30");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_document_not_found_mentions_submodule() {
        let err = CfpError::DocumentNotFound {
            path: PathBuf::from("data/README.md"),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/README.md"));
        assert!(msg.contains("git submodule update"));
    }

    #[test]
    fn test_date_token_error() {
        let err = CfpError::invalid_date_token("5/6", "slash without range");
        assert!(err.to_string().contains("'5/6'"));
    }
}
