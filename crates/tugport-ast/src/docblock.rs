// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Docblock tags: the legacy comment-embedded metadata attached to declarations.
//!
//! A [`DocBlock`] is an ordered list of [`Tag`]s. Each tag gets a [`TagId`]
//! when it is added to a docblock. Ids are never reused within a docblock, so a
//! rule can hold on to an id, remove other tags, and still tell whether "the
//! same tag" is present. Two tags with the same name and payload are still
//! different tags.
//!
//! Tag payloads come in two shapes:
//!
//! - [`TagValue::Text`]: the raw text after the tag name (`@deprecated since 7.0`).
//! - [`TagValue::Annotation`]: a Doctrine-style annotation whose class name has
//!   been resolved by the tree provider (`@Route("/path", name="action")`).

use std::collections::HashMap;

/// Identity of a tag within its docblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// A single docblock tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    id: TagId,
    name: String,
    value: TagValue,
}

impl Tag {
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Tag name without the leading `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    /// The raw text payload, if this is a text tag.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TagValue::Text(text) => Some(text),
            TagValue::Annotation(_) => None,
        }
    }

    /// The structured payload, if this is an annotation tag.
    pub fn annotation(&self) -> Option<&AnnotationPayload> {
        match &self.value {
            TagValue::Annotation(payload) => Some(payload),
            TagValue::Text(_) => None,
        }
    }
}

/// Payload of a [`Tag`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Unstructured text (possibly empty for bare tags like `@required`).
    Text(String),
    /// A Doctrine-style annotation.
    Annotation(AnnotationPayload),
}

/// A Doctrine-style annotation payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationPayload {
    /// Fully qualified annotation class.
    pub class: String,
    pub args: Vec<AnnotationArg>,
}

impl AnnotationPayload {
    pub fn new(class: impl Into<String>) -> Self {
        AnnotationPayload {
            class: class.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn with_value(mut self, value: AnnotationValue) -> Self {
        self.args.push(AnnotationArg { key: None, value });
        self
    }

    /// Append a keyed argument (`name="action"`).
    pub fn with_arg(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.args.push(AnnotationArg {
            key: Some(key.into()),
            value,
        });
        self
    }

    /// Whether `class` names this annotation, ignoring a leading separator.
    pub fn is_class(&self, class: &str) -> bool {
        self.class.trim_start_matches('\\') == class.trim_start_matches('\\')
    }
}

/// One argument of an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArg {
    pub key: Option<String>,
    pub value: AnnotationValue,
}

/// Values that can appear inside an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
    /// `Foo::BAR`
    Constant { class: String, name: String },
    /// `{"a", key="b"}`
    Array(Vec<AnnotationArg>),
}

impl AnnotationValue {
    pub fn string(value: impl Into<String>) -> Self {
        AnnotationValue::String(value.into())
    }
}

/// The tags of one docblock, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocBlock {
    tags: Vec<Tag>,
    next_id: u32,
}

impl DocBlock {
    pub fn new() -> Self {
        DocBlock::default()
    }

    /// Builder form of [`DocBlock::push_text`].
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.push_text(name, text);
        self
    }

    /// Builder form of [`DocBlock::push_annotation`].
    pub fn with_annotation(mut self, name: impl Into<String>, payload: AnnotationPayload) -> Self {
        self.push_annotation(name, payload);
        self
    }

    /// Append a text tag and return its id.
    pub fn push_text(&mut self, name: impl Into<String>, text: impl Into<String>) -> TagId {
        self.push(name.into(), TagValue::Text(text.into()))
    }

    /// Append an annotation tag and return its id.
    pub fn push_annotation(&mut self, name: impl Into<String>, payload: AnnotationPayload) -> TagId {
        self.push(name.into(), TagValue::Annotation(payload))
    }

    fn push(&mut self, name: String, value: TagValue) -> TagId {
        let id = TagId(self.next_id);
        self.next_id += 1;
        let name = name.trim_start_matches('@').to_string();
        self.tags.push(Tag { id, name, value });
        id
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Ids of all tags, in source order.
    pub fn ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id).collect()
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.get(id).is_some()
    }

    /// Tags with the given name, in source order.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        let name = name.trim_start_matches('@');
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    /// The first annotation tag whose resolved class is `class`.
    pub fn by_annotation_class(&self, class: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|tag| tag.annotation().is_some_and(|payload| payload.is_class(class)))
    }

    /// Canonical annotation index: for each annotation class, the id of the
    /// first tag carrying it.
    ///
    /// Later tags with the same class are not in the index.
    pub fn annotation_index(&self) -> HashMap<String, TagId> {
        let mut index = HashMap::new();
        for tag in &self.tags {
            if let Some(payload) = tag.annotation() {
                index
                    .entry(payload.class.trim_start_matches('\\').to_string())
                    .or_insert(tag.id);
            }
        }
        index
    }

    /// Remove a tag by id.
    pub fn remove(&mut self, id: TagId) -> Option<Tag> {
        let position = self.tags.iter().position(|tag| tag.id == id)?;
        Some(self.tags.remove(position))
    }

    /// Remove every text tag named `name`. Returns how many were removed.
    pub fn remove_text_tags_named(&mut self, name: &str) -> usize {
        let name = name.trim_start_matches('@');
        let before = self.tags.len();
        self.tags
            .retain(|tag| !(tag.name == name && matches!(tag.value, TagValue::Text(_))));
        before - self.tags.len()
    }
}
