//! Error types and error code constants for tugport.
//!
//! `TugportError` is the single error type rendered by the CLI. Subsystem
//! errors (configuration, records, ledger, rules, rename tables) are bridged
//! into it with `From` impls so callers can use `?` all the way up.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller, malformed config or records)
//! - `3`: Resolution errors (unknown type, file not found)
//! - `4`: Apply errors (failed to write an auxiliary file or record)
//! - `10`: Internal errors (broken tree invariants, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::records::RecordError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (type not declared, file not found).
    ResolutionError = 3,
    /// Apply errors (failed to write changes).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum TugportError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A fully qualified type name could not be resolved.
    #[error("type not found: {name}")]
    TypeNotFound { name: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to apply changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&TugportError> for OutputErrorCode {
    fn from(err: &TugportError) -> Self {
        match err {
            TugportError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugportError::TypeNotFound { .. } => OutputErrorCode::ResolutionError,
            TugportError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            TugportError::ApplyError { .. } => OutputErrorCode::ApplyError,
            TugportError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<TugportError> for OutputErrorCode {
    fn from(err: TugportError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<ConfigError> for TugportError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                TugportError::FileNotFound {
                    path: path.to_string_lossy().into_owned(),
                }
            }
            other => TugportError::invalid_args(other.to_string()),
        }
    }
}

impl From<RecordError> for TugportError {
    fn from(err: RecordError) -> Self {
        TugportError::invalid_args_with_details(
            err.to_string(),
            serde_json::json!({ "line": err.line }),
        )
    }
}

impl From<LedgerError> for TugportError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyExists { ref path } => TugportError::ApplyError {
                message: err.to_string(),
                file: Some(path.to_string_lossy().into_owned()),
            },
            LedgerError::Io { ref path, .. } => TugportError::ApplyError {
                message: err.to_string(),
                file: Some(path.to_string_lossy().into_owned()),
            },
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TugportError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugportError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        TugportError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a type-not-found error.
    pub fn type_not_found(name: impl Into<String>) -> Self {
        TugportError::TypeNotFound { name: name.into() }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        TugportError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugportError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
