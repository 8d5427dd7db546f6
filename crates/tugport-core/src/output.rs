//! JSON output types and serialization for CLI responses.
//!
//! Every response has `status` as its first field and carries the schema
//! version. Structured output goes to stdout; logs go to stderr.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tugport_ast::NodeKind;

use crate::error::{OutputErrorCode, TugportError};
use crate::records::RenameEntry;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a TugportError.
    pub fn from_error(err: &TugportError) -> Self {
        let details = match err {
            TugportError::InvalidArguments { details, .. } => details.clone(),
            TugportError::TypeNotFound { name } => Some(serde_json::json!({ "type": name })),
            TugportError::ApplyError {
                file: Some(file), ..
            } => Some(serde_json::json!({ "file": file })),
            _ => None,
        };
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Response for failed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a TugportError.
    pub fn from_error(err: &TugportError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Response for `tugport renames`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamesResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Record file that was read.
    pub records: String,
    /// Module directory that was scanned.
    pub module: String,
    /// Entries retained, in record-file order.
    pub renames: Vec<RenameEntry>,
}

impl RenamesResponse {
    pub fn new(records: &Path, module: &Path, renames: Vec<RenameEntry>) -> Self {
        RenamesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            records: records.display().to_string(),
            module: module.display().to_string(),
            renames,
        }
    }
}

/// One catalog entry in `tugport rules` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInfo {
    pub name: String,
    pub description: String,
    pub node_kinds: Vec<NodeKind>,
    /// Whether the loaded configuration runs this rule.
    pub enabled: bool,
}

/// Response for `tugport rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Target language version.
    pub php_version: String,
    pub rules: Vec<RuleInfo>,
}

impl RulesResponse {
    pub fn new(php_version: impl Into<String>, rules: Vec<RuleInfo>) -> Self {
        RulesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            php_version: php_version.into(),
            rules,
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
