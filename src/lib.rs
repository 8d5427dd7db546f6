//! Tugport: rule-driven PHP source migration.
//!
//! Rewrites PHP syntax trees through an ordered pipeline of rules (match to
//! switch lowering, docblock annotations to native attributes, route name
//! constants, underscored method collection) and builds rename tables from
//! collected records.

// Core infrastructure - re-exported from tugport-core
pub use tugport_core::config;
pub use tugport_core::error;
pub use tugport_core::ledger;
pub use tugport_core::output;
pub use tugport_core::records;

// Tree model and rules
pub use tugport_ast as ast;
pub use tugport_rules as rules;

// Front door for the binary
pub mod cli;
