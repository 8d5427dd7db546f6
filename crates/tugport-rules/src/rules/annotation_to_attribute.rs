//! Move docblock tags into native attributes.
//!
//! ```text
//! /** @required */                      #[Required]
//! public function setFoo() {}     =>     public function setFoo() {}
//! ```
//!
//! Each configured [`MappingRecord`] can match a tag two ways:
//!
//! - **Bare name**: a text tag whose name equals the mapping's tag. Every text
//!   tag with that name is removed and one argument-less attribute is added.
//! - **Annotation**: an annotation tag whose resolved class is the mapping's
//!   tag, *and* which is the tag the docblock's canonical index returns for that
//!   class. Other tags of the same class are left in place. The annotation's
//!   arguments are copied onto the attribute.
//!
//! Mappings are tried in configuration order; the first one that converts a
//! tag ends the search for that tag.

use std::collections::HashMap;

use tracing::{debug, trace};
use tugport_ast::{
    AttributeGroup, AttributeGroupFactory, DocBlock, Feature, Node, NodeKind, TagId, TagValue,
};
use tugport_core::config::{MappingRecord, RuleConfig};

use crate::context::PassContext;
use crate::error::RuleError;
use crate::rule::{Outcome, Rule};

const NAME: &str = "annotation_to_attribute";

/// Converts docblock tags to attributes for targets that support them.
#[derive(Debug, Default)]
pub struct AnnotationToAttribute {
    mappings: Vec<MappingRecord>,
}

impl AnnotationToAttribute {
    pub fn new() -> Self {
        AnnotationToAttribute::default()
    }

    pub fn with_mappings(mappings: Vec<MappingRecord>) -> Self {
        AnnotationToAttribute { mappings }
    }

    pub fn mappings(&self) -> &[MappingRecord] {
        &self.mappings
    }
}

impl Rule for AnnotationToAttribute {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Change docblock tags and annotations to native attributes"
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[
            NodeKind::Class,
            NodeKind::Property,
            NodeKind::ClassMethod,
            NodeKind::Function,
            NodeKind::Closure,
            NodeKind::ArrowFunction,
        ]
    }

    fn configure(&mut self, config: &RuleConfig) -> Result<(), RuleError> {
        let mappings = config.get(RuleConfig::ANNOTATION_TO_ATTRIBUTE);
        if let Some(empty) = mappings.iter().find(|mapping| mapping.tag.trim().is_empty()) {
            return Err(RuleError::invalid_configuration(
                NAME,
                format!("mapping with empty tag (attribute {:?})", empty.attribute),
            ));
        }
        self.mappings = mappings.to_vec();
        Ok(())
    }

    fn refactor(&mut self, node: &Node, ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
        if !ctx.supports(Feature::Attributes) {
            trace!(php_version = %ctx.target(), "attributes unavailable");
            return Ok(Outcome::Unchanged);
        }
        if self.mappings.is_empty() || node.docblock().is_none_or(DocBlock::is_empty) {
            return Ok(Outcome::Unchanged);
        }

        let mut updated = node.clone();
        let Some((doc, groups)) = updated.doc_and_attributes_mut() else {
            return Ok(Outcome::Unchanged);
        };

        let canonical = doc.annotation_index();
        let mut converted = 0;
        for id in doc.ids() {
            for mapping in &self.mappings {
                if convert_tag(doc, groups, id, &canonical, mapping) {
                    converted += 1;
                    break;
                }
            }
        }

        if converted == 0 {
            return Ok(Outcome::Unchanged);
        }
        debug!(kind = %node.kind(), converted, "moved docblock tags to attributes");
        Ok(Outcome::Replaced(updated))
    }
}

/// Try one mapping against one tag. Returns whether the tag was converted.
fn convert_tag(
    doc: &mut DocBlock,
    groups: &mut Vec<AttributeGroup>,
    id: TagId,
    canonical: &HashMap<String, TagId>,
    mapping: &MappingRecord,
) -> bool {
    // Already removed together with an earlier same-named tag.
    let Some(tag) = doc.get(id) else {
        return false;
    };

    match tag.value() {
        TagValue::Text(_) => {
            if tag.name() != mapping.tag.trim_start_matches('@') {
                return false;
            }
            let name = tag.name().to_string();
            doc.remove_text_tags_named(&name);
            groups.push(AttributeGroupFactory::from_simple_tag(mapping.attribute()));
            true
        }
        TagValue::Annotation(payload) => {
            if canonical.get(mapping.tag.trim_start_matches('\\')) != Some(&id) {
                trace!(class = %payload.class, "annotation is not the canonical instance");
                return false;
            }
            let group = AttributeGroupFactory::from_annotation(payload, mapping.attribute());
            doc.remove(id);
            groups.push(group);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugport_ast::{
        AnnotationPayload, AnnotationValue, ClassMethod, Closure, PhpVersion, Property,
        VersionTable,
    };
    use tugport_core::ledger::MemoryLedger;

    const ROUTE: &str = "Symfony\\Component\\Routing\\Annotation\\Route";
    const REQUIRED: &str = "Symfony\\Contracts\\Service\\Attribute\\Required";

    fn rule() -> AnnotationToAttribute {
        AnnotationToAttribute::with_mappings(vec![
            MappingRecord::with_attribute("required", REQUIRED),
            MappingRecord::new(ROUTE),
        ])
    }

    fn refactor_at(rule: &mut AnnotationToAttribute, node: &Node, target: PhpVersion) -> Outcome {
        let mut ledger = MemoryLedger::new();
        let mut ctx = PassContext::new(target, &VersionTable, &mut ledger);
        rule.refactor(node, &mut ctx).unwrap()
    }

    fn replaced(outcome: Outcome) -> Node {
        match outcome {
            Outcome::Replaced(node) => node,
            other => panic!("expected a replacement, got {:?}", other),
        }
    }

    fn route(path: &str) -> AnnotationPayload {
        AnnotationPayload::new(ROUTE).with_value(AnnotationValue::string(path))
    }

    #[test]
    fn test_bare_tag_becomes_simple_attribute() {
        let node: Node = ClassMethod::new("setLogger")
            .with_doc(DocBlock::new().with_text("required", ""))
            .into();
        let node = replaced(refactor_at(&mut rule(), &node, PhpVersion::V8_0));

        assert!(node.docblock().unwrap().is_empty());
        let groups = node.attr_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].attrs[0].name.is(REQUIRED));
        assert!(groups[0].attrs[0].args.is_empty());
    }

    #[test]
    fn test_annotation_arguments_are_carried_over() {
        let payload = route("/path").with_arg("name", AnnotationValue::string("action"));
        let node: Node = ClassMethod::new("action")
            .with_doc(DocBlock::new().with_annotation("Route", payload))
            .into();
        let node = replaced(refactor_at(&mut rule(), &node, PhpVersion::V8_0));

        let attr = &node.attr_groups().unwrap()[0].attrs[0];
        assert!(attr.name.is(ROUTE));
        assert_eq!(attr.args.len(), 2);
        assert!(attr.arg_named("name").is_some());
    }

    #[test]
    fn test_unsupported_target_is_unchanged() {
        let node: Node = ClassMethod::new("setLogger")
            .with_doc(DocBlock::new().with_text("required", ""))
            .into();
        assert_eq!(
            refactor_at(&mut rule(), &node, PhpVersion::V7_4),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_unmapped_tags_stay() {
        let node: Node = Property::new("logger")
            .with_doc(DocBlock::new().with_text("var", "LoggerInterface"))
            .into();
        assert_eq!(
            refactor_at(&mut rule(), &node, PhpVersion::V8_0),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut rule = rule();
        let node: Node = Closure::new(Vec::new())
            .with_doc(
                DocBlock::new()
                    .with_text("required", "")
                    .with_annotation("Route", route("/a"))
                    .with_text("return", "void"),
            )
            .into();
        let once = replaced(refactor_at(&mut rule, &node, PhpVersion::V8_0));
        assert_eq!(once.attr_groups().unwrap().len(), 2);
        assert_eq!(once.docblock().unwrap().len(), 1);

        assert_eq!(
            refactor_at(&mut rule, &once, PhpVersion::V8_0),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_only_canonical_instance_is_converted() {
        let node: Node = ClassMethod::new("both")
            .with_doc(
                DocBlock::new()
                    .with_annotation("Route", route("/first"))
                    .with_annotation("Route", route("/second")),
            )
            .into();
        let node = replaced(refactor_at(&mut rule(), &node, PhpVersion::V8_0));

        let groups = node.attr_groups().unwrap();
        assert_eq!(groups.len(), 1);
        let remaining = node.docblock().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining.tags()[0].annotation().unwrap().args[0].value,
            AnnotationValue::string("/second")
        );
    }

    #[test]
    fn test_first_matching_mapping_wins() {
        let mut rule = AnnotationToAttribute::with_mappings(vec![
            MappingRecord::with_attribute("required", "First"),
            MappingRecord::with_attribute("required", "Second"),
        ]);
        let node: Node = ClassMethod::new("setLogger")
            .with_doc(DocBlock::new().with_text("required", ""))
            .into();
        let node = replaced(refactor_at(&mut rule, &node, PhpVersion::V8_0));
        let groups = node.attr_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].attrs[0].name.is("First"));
    }

    #[test]
    fn test_configure_reads_mapping_key() {
        let mut rule = AnnotationToAttribute::new();
        let config = RuleConfig::new()
            .with(RuleConfig::ANNOTATION_TO_ATTRIBUTE, vec![MappingRecord::new(ROUTE)])
            .with("unrelated", vec![MappingRecord::new("ignored")]);
        rule.configure(&config).unwrap();
        assert_eq!(rule.mappings(), &[MappingRecord::new(ROUTE)]);

        let bad = RuleConfig::new().with(RuleConfig::ANNOTATION_TO_ATTRIBUTE, vec![MappingRecord::new(" ")]);
        assert!(matches!(
            rule.configure(&bad),
            Err(RuleError::InvalidConfiguration { .. })
        ));
    }
}
