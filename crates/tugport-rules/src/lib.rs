//! Rewrite rules for tugport.
//!
//! - [`engine`]: the node dispatch engine. A [`Pipeline`] of [`Stage`]s walks a
//!   [`Module`](tugport_ast::Module) and offers each node to the rules
//!   registered for its kind.
//! - [`rules`]: the built-in PHP migration rules.
//! - [`catalog`]: the named rule registry and pipeline assembly from
//!   configuration.
//! - [`renames`]: the rename-table builder.
//!
//! # Example
//!
//! ```
//! use tugport_ast::{MatchArm, Module, Node, NodeKind, PhpVersion, VersionTable};
//! use tugport_core::ledger::MemoryLedger;
//! use tugport_rules::rules::DowngradeMatchToSwitch;
//! use tugport_rules::{PassContext, Pipeline, Stage};
//!
//! let mut module = Module::new(vec![Node::return_of(Node::match_expr(
//!     Node::variable("code"),
//!     vec![MatchArm::default_arm(Node::string("unknown"))],
//! ))]);
//!
//! let mut pipeline =
//!     Pipeline::new().with_stage(Stage::new().with_rule(Box::new(DowngradeMatchToSwitch::new())));
//! let mut ledger = MemoryLedger::new();
//! let ctx = PassContext::new(PhpVersion::V7_4, &VersionTable, &mut ledger);
//! let report = pipeline.run(&mut module, ctx).unwrap();
//!
//! assert_eq!(module.stmts[0].kind(), NodeKind::Switch);
//! assert_eq!(report.changes_for("downgrade_match_to_switch"), 1);
//! ```

pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
mod error_bridges;
pub mod renames;
pub mod rule;
pub mod rules;

pub use catalog::RuleSet;
pub use context::{PassContext, PassOutput};
pub use engine::{PassReport, Pipeline, Stage};
pub use error::RuleError;
pub use renames::{RenameTableBuilder, RenameTableError};
pub use rule::{Outcome, Rule};
