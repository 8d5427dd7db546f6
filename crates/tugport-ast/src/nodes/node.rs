// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{
    Array, ArrowFunction, Assign, AttributeGroup, Break, Call, Class, ClassConst, ClassConstFetch,
    ClassMethod, Closure, Expression, Function, Literal, Match, MatchArm, Name, Namespace,
    NodeKind, Param, Property, Return, Scalar, Span, Switch, Variable,
};
use crate::docblock::DocBlock;

/// A syntax tree node.
///
/// Each variant exclusively owns its children. Replacing a node drops the old
/// subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Declarations
    Namespace(Namespace),
    Class(Class),
    ClassMethod(ClassMethod),
    Property(Property),
    ClassConst(ClassConst),
    Function(Function),
    // Statements
    Expression(Expression),
    Return(Return),
    Switch(Switch),
    Break(Break),
    // Expressions
    Assign(Assign),
    Match(Match),
    Closure(Closure),
    ArrowFunction(ArrowFunction),
    Call(Call),
    Variable(Variable),
    Name(Name),
    Literal(Literal),
    Array(Array),
    ClassConstFetch(ClassConstFetch),
}

/// A mutable reference to one child position of a node.
///
/// The walker in `tugport-rules` uses the slot shape to decide what a
/// "removed" verdict means: list entries are dropped, optional children become
/// `None`, and single children cannot be removed at all.
#[derive(Debug)]
pub enum ChildSlot<'a> {
    /// A required child.
    Single(&'a mut Node),
    /// An optional child.
    Optional(&'a mut Option<Box<Node>>),
    /// An ordered list of children.
    List(&'a mut Vec<Node>),
}

impl Node {
    /// The kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Namespace(_) => NodeKind::Namespace,
            Node::Class(_) => NodeKind::Class,
            Node::ClassMethod(_) => NodeKind::ClassMethod,
            Node::Property(_) => NodeKind::Property,
            Node::ClassConst(_) => NodeKind::ClassConst,
            Node::Function(_) => NodeKind::Function,
            Node::Expression(_) => NodeKind::Expression,
            Node::Return(_) => NodeKind::Return,
            Node::Switch(_) => NodeKind::Switch,
            Node::Break(_) => NodeKind::Break,
            Node::Assign(_) => NodeKind::Assign,
            Node::Match(_) => NodeKind::Match,
            Node::Closure(_) => NodeKind::Closure,
            Node::ArrowFunction(_) => NodeKind::ArrowFunction,
            Node::Call(_) => NodeKind::Call,
            Node::Variable(_) => NodeKind::Variable,
            Node::Name(_) => NodeKind::Name,
            Node::Literal(_) => NodeKind::Literal,
            Node::Array(_) => NodeKind::Array,
            Node::ClassConstFetch(_) => NodeKind::ClassConstFetch,
        }
    }

    /// Source position of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Namespace(n) => n.span,
            Node::Class(n) => n.span,
            Node::ClassMethod(n) => n.span,
            Node::Property(n) => n.span,
            Node::ClassConst(n) => n.span,
            Node::Function(n) => n.span,
            Node::Expression(n) => n.span,
            Node::Return(n) => n.span,
            Node::Switch(n) => n.span,
            Node::Break(n) => n.span,
            Node::Assign(n) => n.span,
            Node::Match(n) => n.span,
            Node::Closure(n) => n.span,
            Node::ArrowFunction(n) => n.span,
            Node::Call(n) => n.span,
            Node::Variable(n) => n.span,
            Node::Name(n) => n.span,
            Node::Literal(n) => n.span,
            Node::Array(n) => n.span,
            Node::ClassConstFetch(n) => n.span,
        }
    }

    /// Child positions in source order.
    ///
    /// Attribute arguments and parameter defaults come before bodies, matching
    /// the order in which they appear in source.
    pub fn child_slots(&mut self) -> Vec<ChildSlot<'_>> {
        let mut slots = Vec::new();
        match self {
            Node::Namespace(n) => slots.push(ChildSlot::List(&mut n.stmts)),
            Node::Class(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                slots.push(ChildSlot::List(&mut n.stmts));
            }
            Node::ClassMethod(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                push_param_slots(&mut n.params, &mut slots);
                slots.push(ChildSlot::List(&mut n.stmts));
            }
            Node::Property(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                slots.push(ChildSlot::Optional(&mut n.default));
            }
            Node::ClassConst(n) => slots.push(ChildSlot::Single(n.value.as_mut())),
            Node::Function(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                push_param_slots(&mut n.params, &mut slots);
                slots.push(ChildSlot::List(&mut n.stmts));
            }
            Node::Expression(n) => slots.push(ChildSlot::Single(n.expr.as_mut())),
            Node::Return(n) => slots.push(ChildSlot::Optional(&mut n.expr)),
            Node::Switch(n) => {
                slots.push(ChildSlot::Single(n.subject.as_mut()));
                for case in &mut n.cases {
                    slots.push(ChildSlot::Optional(&mut case.cond));
                    slots.push(ChildSlot::List(&mut case.stmts));
                }
            }
            Node::Assign(n) => {
                slots.push(ChildSlot::Single(n.var.as_mut()));
                slots.push(ChildSlot::Single(n.expr.as_mut()));
            }
            Node::Match(n) => {
                slots.push(ChildSlot::Single(n.subject.as_mut()));
                for arm in &mut n.arms {
                    slots.push(ChildSlot::List(&mut arm.conds));
                    slots.push(ChildSlot::Single(arm.body.as_mut()));
                }
            }
            Node::Closure(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                push_param_slots(&mut n.params, &mut slots);
                slots.push(ChildSlot::List(&mut n.stmts));
            }
            Node::ArrowFunction(n) => {
                push_attribute_slots(&mut n.attr_groups, &mut slots);
                push_param_slots(&mut n.params, &mut slots);
                slots.push(ChildSlot::Single(n.expr.as_mut()));
            }
            Node::Call(n) => {
                slots.push(ChildSlot::Single(n.callee.as_mut()));
                for arg in &mut n.args {
                    slots.push(ChildSlot::Single(&mut arg.value));
                }
            }
            Node::Array(n) => {
                for item in &mut n.items {
                    slots.push(ChildSlot::Optional(&mut item.key));
                    slots.push(ChildSlot::Single(item.value.as_mut()));
                }
            }
            Node::Break(_)
            | Node::Variable(_)
            | Node::Name(_)
            | Node::Literal(_)
            | Node::ClassConstFetch(_) => {}
        }
        slots
    }

    /// The docblock attached to this node, for kinds that carry one.
    pub fn docblock(&self) -> Option<&DocBlock> {
        match self {
            Node::Class(n) => Some(&n.doc),
            Node::ClassMethod(n) => Some(&n.doc),
            Node::Property(n) => Some(&n.doc),
            Node::ClassConst(n) => Some(&n.doc),
            Node::Function(n) => Some(&n.doc),
            Node::Closure(n) => Some(&n.doc),
            Node::ArrowFunction(n) => Some(&n.doc),
            _ => None,
        }
    }

    /// The attribute groups of this node, for kinds that carry them.
    pub fn attr_groups(&self) -> Option<&[AttributeGroup]> {
        match self {
            Node::Class(n) => Some(&n.attr_groups),
            Node::ClassMethod(n) => Some(&n.attr_groups),
            Node::Property(n) => Some(&n.attr_groups),
            Node::Function(n) => Some(&n.attr_groups),
            Node::Closure(n) => Some(&n.attr_groups),
            Node::ArrowFunction(n) => Some(&n.attr_groups),
            _ => None,
        }
    }

    /// Borrow the docblock and attribute groups together so tags can be moved
    /// into attributes in one step.
    pub fn doc_and_attributes_mut(&mut self) -> Option<(&mut DocBlock, &mut Vec<AttributeGroup>)> {
        match self {
            Node::Class(n) => Some((&mut n.doc, &mut n.attr_groups)),
            Node::ClassMethod(n) => Some((&mut n.doc, &mut n.attr_groups)),
            Node::Property(n) => Some((&mut n.doc, &mut n.attr_groups)),
            Node::Function(n) => Some((&mut n.doc, &mut n.attr_groups)),
            Node::Closure(n) => Some((&mut n.doc, &mut n.attr_groups)),
            Node::ArrowFunction(n) => Some((&mut n.doc, &mut n.attr_groups)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Constructors for synthesized nodes
    // ------------------------------------------------------------------------

    pub fn variable(name: impl Into<String>) -> Node {
        Node::Variable(Variable {
            name: name.into(),
            span: Span::detached(),
        })
    }

    pub fn name(value: impl Into<String>) -> Node {
        Node::Name(Name::new(value))
    }

    pub fn int(value: i64) -> Node {
        Node::scalar(Scalar::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Node {
        Node::scalar(Scalar::String(value.into()))
    }

    pub fn bool(value: bool) -> Node {
        Node::scalar(Scalar::Bool(value))
    }

    pub fn null() -> Node {
        Node::scalar(Scalar::Null)
    }

    pub fn scalar(value: Scalar) -> Node {
        Node::Literal(Literal {
            value,
            span: Span::detached(),
        })
    }

    /// `<var> = <expr>`
    pub fn assign(var: Node, expr: Node) -> Node {
        Node::Assign(Assign {
            var: Box::new(var),
            expr: Box::new(expr),
            span: Span::detached(),
        })
    }

    /// `<expr>;`
    pub fn expression(expr: Node) -> Node {
        Node::Expression(Expression {
            expr: Box::new(expr),
            span: Span::detached(),
        })
    }

    /// `return <expr>;`
    pub fn return_of(expr: Node) -> Node {
        Node::Return(Return {
            expr: Some(Box::new(expr)),
            span: Span::detached(),
        })
    }

    /// `break;`
    pub fn break_stmt() -> Node {
        Node::Break(Break::default())
    }

    /// `match (<subject>) { <arms> }`
    pub fn match_expr(subject: Node, arms: Vec<MatchArm>) -> Node {
        Node::Match(Match {
            subject: Box::new(subject),
            arms,
            span: Span::detached(),
        })
    }

    /// `<callee>(<args>)` with positional arguments.
    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Node {
        Node::Call(Call {
            callee: Box::new(Node::name(callee)),
            args: args.into_iter().map(super::Arg::positional).collect(),
            span: Span::detached(),
        })
    }

    /// `<class>::<constant>`
    pub fn class_const_fetch(class: impl Into<String>, constant: impl Into<String>) -> Node {
        Node::ClassConstFetch(ClassConstFetch {
            class: Name::new(class),
            constant: constant.into(),
            span: Span::detached(),
        })
    }
}

fn push_attribute_slots<'a>(groups: &'a mut [AttributeGroup], slots: &mut Vec<ChildSlot<'a>>) {
    for group in groups {
        for attr in &mut group.attrs {
            for arg in &mut attr.args {
                slots.push(ChildSlot::Single(&mut arg.value));
            }
        }
    }
}

fn push_param_slots<'a>(params: &'a mut [Param], slots: &mut Vec<ChildSlot<'a>>) {
    for param in params {
        slots.push(ChildSlot::Optional(&mut param.default));
    }
}

impl From<Class> for Node {
    fn from(value: Class) -> Self {
        Node::Class(value)
    }
}

impl From<ClassMethod> for Node {
    fn from(value: ClassMethod) -> Self {
        Node::ClassMethod(value)
    }
}

impl From<Property> for Node {
    fn from(value: Property) -> Self {
        Node::Property(value)
    }
}

impl From<ClassConst> for Node {
    fn from(value: ClassConst) -> Self {
        Node::ClassConst(value)
    }
}

impl From<Function> for Node {
    fn from(value: Function) -> Self {
        Node::Function(value)
    }
}

impl From<Closure> for Node {
    fn from(value: Closure) -> Self {
        Node::Closure(value)
    }
}

impl From<ArrowFunction> for Node {
    fn from(value: ArrowFunction) -> Self {
        Node::ArrowFunction(value)
    }
}

impl From<Namespace> for Node {
    fn from(value: Namespace) -> Self {
        Node::Namespace(value)
    }
}

impl From<Switch> for Node {
    fn from(value: Switch) -> Self {
        Node::Switch(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Case;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Node::variable("x").kind(), NodeKind::Variable);
        assert_eq!(Node::break_stmt().kind(), NodeKind::Break);
        assert_eq!(
            Node::expression(Node::assign(Node::variable("x"), Node::int(1))).kind(),
            NodeKind::Expression
        );
        assert_eq!(Node::from(Class::new("Foo")).kind(), NodeKind::Class);
    }

    #[test]
    fn test_leaf_nodes_have_no_slots() {
        assert!(Node::variable("x").child_slots().is_empty());
        assert!(Node::int(3).child_slots().is_empty());
        assert!(Node::class_const_fetch("A", "B").child_slots().is_empty());
    }

    #[test]
    fn test_assign_slots_in_source_order() {
        let mut node = Node::assign(Node::variable("x"), Node::int(1));
        let slots = node.child_slots();
        assert_eq!(slots.len(), 2);
        match &slots[0] {
            ChildSlot::Single(child) => assert_eq!(child.kind(), NodeKind::Variable),
            other => panic!("unexpected slot {:?}", other),
        }
        match &slots[1] {
            ChildSlot::Single(child) => assert_eq!(child.kind(), NodeKind::Literal),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_switch_slots_cover_every_case() {
        let mut node = Node::from(Switch::new(
            Node::variable("v"),
            vec![
                Case::new(Node::int(1), vec![Node::break_stmt()]),
                Case::default_case(vec![]),
            ],
        ));
        // subject + (cond, body) per case
        assert_eq!(node.child_slots().len(), 5);
    }

    #[test]
    fn test_docblock_only_on_declarations() {
        assert!(Node::from(ClassMethod::new("run")).docblock().is_some());
        assert!(Node::variable("x").docblock().is_none());
        assert!(Node::variable("x").attr_groups().is_none());
        let mut closure = Node::Closure(Closure::new(vec![]));
        assert!(closure.doc_and_attributes_mut().is_some());
    }

    #[test]
    fn test_name_short() {
        assert_eq!(Name::new("App\\MyShop").short(), "MyShop");
        assert_eq!(Name::new("\\Foo").short(), "Foo");
        assert_eq!(Name::new("Foo").short(), "Foo");
        assert!(Name::new("\\App\\MyShop").is("App\\MyShop"));
    }
}
