// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree node types.
//!
//! Statements and expressions share the single [`Node`] enum so that a rule can
//! replace any node with any other node. Structural parts that are never
//! dispatched on their own ([`Case`], [`MatchArm`], [`Arg`], [`Param`],
//! [`AttributeGroup`]) are plain structs owned by their parent node.

mod expression;
mod kind;
mod node;
mod statement;

pub use expression::*;
pub use kind::NodeKind;
pub use node::{ChildSlot, Node};
pub use statement::*;

/// A byte range in the original source (start inclusive, end exclusive).
///
/// Nodes synthesized by rules carry [`Span::detached`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u64,
    /// End byte offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span. `end` is clamped so the span is never inverted.
    pub fn new(start: u64, end: u64) -> Self {
        Span {
            start,
            end: end.max(start),
        }
    }

    /// The span given to nodes that do not come from source text.
    pub fn detached() -> Self {
        Span::default()
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The root of a parsed file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    /// Top-level statements in source order.
    pub stmts: Vec<Node>,
}

impl Module {
    /// Create a module from top-level statements.
    pub fn new(stmts: Vec<Node>) -> Self {
        Module { stmts }
    }
}
