//! Errors raised while running rules.

use std::io;

use thiserror::Error;
use tugport_core::ledger::LedgerError;

/// Error type for rule execution.
///
/// Skips (wrong shape, feature unavailable, file already present) are not
/// errors; rules report them as [`Outcome::Unchanged`](crate::Outcome).
#[derive(Debug, Error)]
pub enum RuleError {
    /// A rule produced a tree that breaks a structural invariant.
    #[error("{rule}: structural invariant violated: {message}")]
    StructuralInvariant { rule: String, message: String },

    /// A rule was configured with something it cannot use.
    #[error("{rule}: invalid configuration: {message}")]
    InvalidConfiguration { rule: String, message: String },

    /// The auxiliary file ledger refused a file.
    #[error("auxiliary file ledger: {0}")]
    Ledger(#[from] LedgerError),

    /// Writing to the record sink failed.
    #[error("record sink: {0}")]
    Sink(#[from] io::Error),
}

impl RuleError {
    pub fn structural(rule: &str, message: impl Into<String>) -> Self {
        RuleError::StructuralInvariant {
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_configuration(rule: &str, message: impl Into<String>) -> Self {
        RuleError::InvalidConfiguration {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}
