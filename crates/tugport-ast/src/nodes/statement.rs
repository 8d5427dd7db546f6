// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement and declaration nodes.

use super::{Arg, Name, Node, Span};
use crate::docblock::DocBlock;

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// `namespace Foo\Bar;` or `namespace Foo\Bar { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Namespace name, `None` for the global namespace block.
    pub name: Option<Name>,
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl Namespace {
    pub fn new(name: impl Into<String>, stmts: Vec<Node>) -> Self {
        Namespace {
            name: Some(Name::new(name)),
            stmts,
            span: Span::detached(),
        }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Short class name as written.
    pub name: String,
    /// Fully qualified name resolved by the tree provider, if known.
    pub namespaced_name: Option<String>,
    pub is_final: bool,
    pub is_abstract: bool,
    pub extends: Option<Name>,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    /// Class members (methods, properties, constants).
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Class {
            name: name.into(),
            namespaced_name: None,
            is_final: false,
            is_abstract: false,
            extends: None,
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            stmts: Vec::new(),
            span: Span::detached(),
        }
    }

    /// Set the resolved fully qualified name.
    pub fn with_namespaced_name(mut self, name: impl Into<String>) -> Self {
        self.namespaced_name = Some(name.into());
        self
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }

    pub fn with_member(mut self, member: Node) -> Self {
        self.stmts.push(member);
        self
    }

    /// The fully qualified name when resolved, otherwise the short name.
    pub fn qualified_name(&self) -> &str {
        self.namespaced_name.as_deref().unwrap_or(&self.name)
    }

    /// Iterate over the class methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &ClassMethod> {
        self.stmts.iter().filter_map(|stmt| match stmt {
            Node::ClassMethod(method) => Some(method),
            _ => None,
        })
    }

    /// Iterate mutably over the class methods in declaration order.
    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut ClassMethod> {
        self.stmts.iter_mut().filter_map(|stmt| match stmt {
            Node::ClassMethod(method) => Some(method),
            _ => None,
        })
    }
}

/// A method declared inside a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethod {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: Vec<Param>,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl ClassMethod {
    pub fn new(name: impl Into<String>) -> Self {
        ClassMethod {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            params: Vec::new(),
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            stmts: Vec::new(),
            span: Span::detached(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }

    pub fn with_attr_group(mut self, group: AttributeGroup) -> Self {
        self.attr_groups.push(group);
        self
    }

    pub fn with_stmts(mut self, stmts: Vec<Node>) -> Self {
        self.stmts = stmts;
        self
    }
}

/// A class property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub visibility: Visibility,
    pub default: Option<Box<Node>>,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    pub span: Span,
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            visibility: Visibility::Public,
            default: None,
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            span: Span::detached(),
        }
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }
}

/// A class constant (`public const NAME = 'value';`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassConst {
    pub name: String,
    pub visibility: Visibility,
    pub value: Box<Node>,
    pub doc: DocBlock,
    pub span: Span,
}

impl ClassConst {
    pub fn new(name: impl Into<String>, value: Node) -> Self {
        ClassConst {
            name: name.into(),
            visibility: Visibility::Public,
            value: Box::new(value),
            doc: DocBlock::new(),
            span: Span::detached(),
        }
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }
}

/// A top-level function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub attr_groups: Vec<AttributeGroup>,
    pub doc: DocBlock,
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            params: Vec::new(),
            attr_groups: Vec::new(),
            doc: DocBlock::new(),
            stmts: Vec::new(),
            span: Span::detached(),
        }
    }

    pub fn with_doc(mut self, doc: DocBlock) -> Self {
        self.doc = doc;
        self
    }

    pub fn with_stmts(mut self, stmts: Vec<Node>) -> Self {
        self.stmts = stmts;
        self
    }
}

/// An expression used as a statement (`$x = 1;`).
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub expr: Box<Node>,
    pub span: Span,
}

/// `return;` or `return <expr>;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub expr: Option<Box<Node>>,
    pub span: Span,
}

/// `switch (<subject>) { case ...: ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub subject: Box<Node>,
    pub cases: Vec<Case>,
    pub span: Span,
}

impl Switch {
    pub fn new(subject: Node, cases: Vec<Case>) -> Self {
        Switch {
            subject: Box::new(subject),
            cases,
            span: Span::detached(),
        }
    }
}

/// One label of a [`Switch`]. A `None` condition is the `default:` label.
///
/// A case with an empty body falls through to the next case.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub cond: Option<Box<Node>>,
    pub stmts: Vec<Node>,
    pub span: Span,
}

impl Case {
    pub fn new(cond: Node, stmts: Vec<Node>) -> Self {
        Case {
            cond: Some(Box::new(cond)),
            stmts,
            span: Span::detached(),
        }
    }

    pub fn default_case(stmts: Vec<Node>) -> Self {
        Case {
            cond: None,
            stmts,
            span: Span::detached(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.cond.is_none()
    }
}

/// `break;`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Break {
    pub span: Span,
}

/// A function, method or closure parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Option<Name>,
    pub default: Option<Box<Node>>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: None,
            default: None,
        }
    }
}

/// `#[A, B(...)]`: one attribute group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeGroup {
    pub attrs: Vec<Attribute>,
}

impl AttributeGroup {
    pub fn new(attrs: Vec<Attribute>) -> Self {
        AttributeGroup { attrs }
    }
}

/// A native attribute (`Route(path: '/path')`).
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Name,
    pub args: Vec<Arg>,
    pub span: Span,
}

impl Attribute {
    pub fn new(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Attribute {
            name: Name::new(name),
            args,
            span: Span::detached(),
        }
    }

    /// The named argument `name`, if present.
    pub fn arg_named(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.name.as_deref() == Some(name))
    }
}
