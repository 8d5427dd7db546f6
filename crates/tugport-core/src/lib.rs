//! Core infrastructure for tugport.
//!
//! This crate provides the pieces shared by the rules and the CLI:
//! - Error types and error codes
//! - Configuration (`tugport.toml`) and the rule-facing `RuleConfig`
//! - Rename records, their CSV codec and the append-only record sink
//! - The auxiliary file ledger
//! - JSON output types for CLI responses

pub mod config;
pub mod error;
pub mod ledger;
pub mod output;
pub mod records;
pub mod sink;
