//! The rule contract.

use tugport_ast::{Node, NodeKind};
use tugport_core::config::RuleConfig;

use crate::context::PassContext;
use crate::error::RuleError;

/// A rule's verdict on one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Leave the node as it is; later rules may still look at it.
    Unchanged,
    /// Put this node in place of the visited one.
    Replaced(Node),
    /// Drop the node. Only valid where the parent allows the child to be absent.
    Removed,
}

impl Outcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged)
    }
}

/// A unit of transformation.
///
/// The engine offers a rule only nodes whose kind is in [`Rule::node_kinds`].
/// `refactor` must not mutate the node it is given; it builds a replacement
/// instead. Any state a rule keeps between calls must be reset in
/// [`Rule::begin_pass`].
pub trait Rule {
    /// Stable identifier used in configuration and reports.
    fn name(&self) -> &'static str;

    /// One-line summary for `tugport rules`.
    fn description(&self) -> &'static str;

    /// The node kinds this rule wants to see.
    fn node_kinds(&self) -> &'static [NodeKind];

    fn configure(&mut self, _config: &RuleConfig) -> Result<(), RuleError> {
        Ok(())
    }

    fn begin_pass(&mut self) {}

    fn refactor(&mut self, node: &Node, ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError>;

    /// Called once the whole tree has been walked for this rule's stage.
    fn finish_pass(&mut self, _ctx: &mut PassContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }
}
