// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Construction of native attribute groups from docblock annotations.

use crate::docblock::{AnnotationArg, AnnotationPayload, AnnotationValue};
use crate::nodes::{Arg, Array, ArrayItem, Attribute, AttributeGroup, Node, Span};

/// Builds `#[...]` attribute groups.
pub struct AttributeGroupFactory;

impl AttributeGroupFactory {
    /// `#[<attribute_class>]` with no arguments, for bare tags such as `@required`.
    pub fn from_simple_tag(attribute_class: &str) -> AttributeGroup {
        AttributeGroup::new(vec![Attribute::new(attribute_class, Vec::new())])
    }

    /// `#[<attribute_class>(<args>)]` carrying over every annotation argument.
    ///
    /// Keyed annotation arguments become named arguments; positional ones stay
    /// positional.
    pub fn from_annotation(payload: &AnnotationPayload, attribute_class: &str) -> AttributeGroup {
        let args = payload
            .args
            .iter()
            .map(|arg| match &arg.key {
                Some(key) => Arg::named(key.clone(), value_to_node(&arg.value)),
                None => Arg::positional(value_to_node(&arg.value)),
            })
            .collect();
        AttributeGroup::new(vec![Attribute::new(attribute_class, args)])
    }
}

fn value_to_node(value: &AnnotationValue) -> Node {
    match value {
        AnnotationValue::String(s) => Node::string(s.clone()),
        AnnotationValue::Int(i) => Node::int(*i),
        AnnotationValue::Bool(b) => Node::bool(*b),
        AnnotationValue::Null => Node::null(),
        AnnotationValue::Constant { class, name } => Node::class_const_fetch(class.clone(), name.clone()),
        AnnotationValue::Array(items) => Node::Array(Array {
            items: items.iter().map(array_item).collect(),
            span: Span::detached(),
        }),
    }
}

fn array_item(arg: &AnnotationArg) -> ArrayItem {
    ArrayItem {
        key: arg.key.as_ref().map(|key| Box::new(Node::string(key.clone()))),
        value: Box::new(value_to_node(&arg.value)),
    }
}
