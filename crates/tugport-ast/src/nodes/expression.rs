// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.

use super::{AttributeGroup, Node, Param, Span};
use crate::docblock::DocBlock;

/// `<var> = <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub var: Box<Node>,
    pub expr: Box<Node>,
    pub span: Span,
}

/// `match (<subject>) { <arms> }`
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub subject: Box<Node>,
    pub arms: Vec<MatchArm>,
    pub span: Span,
}

/// One arm of a [`Match`].
///
/// An arm with no conditions is the `default` arm. Every arm has a body.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub conds: Vec<Node>,
    pub body: Box<Node>,
    pub span: Span,
}

impl MatchArm {
    pub fn new(conds: Vec<Node>, body: Node) -> Self {
        MatchArm {
            conds,
            body: Box::new(body),
            span: Span::detached(),
        }
    }

    /// `default => <body>`
    pub fn default_arm(body: Node) -> Self {
        MatchArm::new(Vec::new(), body)
    }

    pub fn is_default(&self) -> bool {
        self.conds.is_empty()
    }
}

/// `function (...) use (...) { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub params: Vec<Param>,
    pub is_static: bool,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl Closure {
    pub fn new(stmts: Vec<Node>) -> Self {
        Closure {
            params: Vec::new(),
            is_static: false,
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            stmts,
            span: Span::detached(),
        }
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }
}

/// `fn (...) => <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    pub params: Vec<Param>,
    pub is_static: bool,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    pub expr: Box<Node>,
    pub span: Span,
}

impl ArrowFunction {
    pub fn new(expr: Node) -> Self {
        ArrowFunction {
            params: Vec::new(),
            is_static: false,
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            expr: Box::new(expr),
            span: Span::detached(),
        }
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }
}

/// A function call (`<callee>(<args>)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Node>,
    pub args: Vec<Arg>,
    pub span: Span,
}

/// A call or attribute argument, optionally named (`name: <value>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Node,
}

impl Arg {
    pub fn positional(value: Node) -> Self {
        Arg { name: None, value }
    }

    pub fn named(name: impl Into<String>, value: Node) -> Self {
        Arg {
            name: Some(name.into()),
            value,
        }
    }
}

/// `$name`
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub span: Span,
}

/// A (possibly qualified) name such as `Foo\Bar` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub value: String,
    pub span: Span,
}

impl Name {
    pub fn new(value: impl Into<String>) -> Self {
        Name {
            value: value.into(),
            span: Span::detached(),
        }
    }

    /// The last namespace segment (`Bar` for `Foo\Bar`).
    pub fn short(&self) -> &str {
        let trimmed = self.value.trim_start_matches('\\');
        trimmed.rsplit('\\').next().unwrap_or(trimmed)
    }

    /// Compare ignoring a leading namespace separator.
    pub fn is(&self, qualified: &str) -> bool {
        self.value.trim_start_matches('\\') == qualified.trim_start_matches('\\')
    }
}

/// Scalar literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// A literal (`200`, `'not found'`, `true`, `null`).
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Scalar,
    pub span: Span,
}

impl Literal {
    /// The string payload if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

/// `[<items>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub items: Vec<ArrayItem>,
    pub span: Span,
}

/// One `key => value` (or bare `value`) entry of an [`Array`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub key: Option<Box<Node>>,
    pub value: Box<Node>,
}

/// `Class::CONSTANT`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstFetch {
    pub class: Name,
    pub constant: String,
    pub span: Span,
}
