// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind tag of a [`Node`](super::Node) variant.
///
/// Rules declare their interest set as a slice of kinds; the dispatch engine
/// keys its tables on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Namespace,
    Class,
    ClassMethod,
    Property,
    ClassConst,
    Function,
    Expression,
    Return,
    Switch,
    Break,
    Assign,
    Match,
    Closure,
    ArrowFunction,
    Call,
    Variable,
    Name,
    Literal,
    Array,
    ClassConstFetch,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 20] = [
        NodeKind::Namespace,
        NodeKind::Class,
        NodeKind::ClassMethod,
        NodeKind::Property,
        NodeKind::ClassConst,
        NodeKind::Function,
        NodeKind::Expression,
        NodeKind::Return,
        NodeKind::Switch,
        NodeKind::Break,
        NodeKind::Assign,
        NodeKind::Match,
        NodeKind::Closure,
        NodeKind::ArrowFunction,
        NodeKind::Call,
        NodeKind::Variable,
        NodeKind::Name,
        NodeKind::Literal,
        NodeKind::Array,
        NodeKind::ClassConstFetch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::ClassMethod => "class_method",
            NodeKind::Property => "property",
            NodeKind::ClassConst => "class_const",
            NodeKind::Function => "function",
            NodeKind::Expression => "expression",
            NodeKind::Return => "return",
            NodeKind::Switch => "switch",
            NodeKind::Break => "break",
            NodeKind::Assign => "assign",
            NodeKind::Match => "match",
            NodeKind::Closure => "closure",
            NodeKind::ArrowFunction => "arrow_function",
            NodeKind::Call => "call",
            NodeKind::Variable => "variable",
            NodeKind::Name => "name",
            NodeKind::Literal => "literal",
            NodeKind::Array => "array",
            NodeKind::ClassConstFetch => "class_const_fetch",
        }
    }

    /// Kinds that carry a docblock and attribute groups.
    pub fn is_attributable(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::ClassMethod
                | NodeKind::Property
                | NodeKind::Function
                | NodeKind::Closure
                | NodeKind::ArrowFunction
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
