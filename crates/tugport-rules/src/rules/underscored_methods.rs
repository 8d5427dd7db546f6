//! Collect methods deprecated for their underscore prefix.
//!
//! ```text
//! /**
//!  * @deprecated underscore prefix violates PSR12, will be renamed to "getParent"
//!  */
//! public function _getParent()
//! ```
//!
//! The `@deprecated` tag is removed and `(declaring class, _getParent, getParent)`
//! is recorded. The recorded rows are the input of the rename-table builder.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tugport_ast::{ClassMethod, Node, NodeKind, TagId};
use tugport_core::records::RenameEntry;

use crate::context::PassContext;
use crate::error::RuleError;
use crate::rule::{Outcome, Rule};

const NAME: &str = "collect_underscored_methods";

pub const DEPRECATED_TAG: &str = "deprecated";
pub const PSR12_NOTICE: &str = "underscore prefix violates PSR12, will be renamed to";

static QUOTED_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

/// Strips underscore deprecation notices and records the planned renames.
#[derive(Debug, Default)]
pub struct CollectUnderscoredMethods;

impl CollectUnderscoredMethods {
    pub fn new() -> Self {
        CollectUnderscoredMethods
    }
}

impl Rule for CollectUnderscoredMethods {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Remove PSR12 underscore deprecation notices and record the method renames"
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Class]
    }

    fn refactor(&mut self, node: &Node, ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
        let Node::Class(class) = node else {
            return Ok(Outcome::Unchanged);
        };
        if !class.methods().any(|method| !notices(method).is_empty()) {
            return Ok(Outcome::Unchanged);
        }

        let mut updated = class.clone();
        let declaring_type = updated.qualified_name().to_string();
        for method in updated.methods_mut() {
            let found = notices(method);
            let Some((_, target)) = found.first() else {
                continue;
            };
            let entry = RenameEntry::new(declaring_type.clone(), method.name.clone(), target.clone());
            for (id, _) in &found {
                method.doc.remove(*id);
            }
            debug!(
                class = %declaring_type,
                method = %entry.old_member,
                new_name = %entry.new_member,
                "collected underscored method"
            );
            ctx.record_rename(entry)?;
        }
        Ok(Outcome::Replaced(Node::Class(updated)))
    }
}

/// Matching deprecation tags on `method` with the new name each one implies.
fn notices(method: &ClassMethod) -> Vec<(TagId, String)> {
    method
        .doc
        .by_name(DEPRECATED_TAG)
        .filter_map(|tag| {
            let text = tag.text()?.trim_start();
            let rest = text.strip_prefix(PSR12_NOTICE)?;
            Some((tag.id(), new_name(rest, &method.name)))
        })
        .collect()
}

/// The first quoted word after the notice, or `method` without leading underscores.
pub fn new_name(rest: &str, method: &str) -> String {
    match QUOTED_WORD.captures(rest).and_then(|caps| caps.get(1)) {
        Some(word) => word.as_str().to_string(),
        None => method.trim_start_matches('_').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugport_ast::{Class, DocBlock, PhpVersion, VersionTable};
    use tugport_core::ledger::MemoryLedger;
    use tugport_core::records::parse_records;
    use tugport_core::sink::RecordSink;

    fn notice(suffix: &str) -> String {
        format!("{} {}", PSR12_NOTICE, suffix)
    }

    fn shop() -> Node {
        Class::new("MyShop")
            .with_namespaced_name("App\\MyShop")
            .with_member(
                ClassMethod::new("_getParent")
                    .with_doc(
                        DocBlock::new()
                            .with_text(DEPRECATED_TAG, notice("\"getParent\""))
                            .with_text("return", "self"),
                    )
                    .into(),
            )
            .with_member(
                ClassMethod::new("__loadAll")
                    .with_doc(DocBlock::new().with_text(DEPRECATED_TAG, notice("the plain name")))
                    .into(),
            )
            .with_member(
                ClassMethod::new("_legacy")
                    .with_doc(DocBlock::new().with_text(DEPRECATED_TAG, "use something else"))
                    .into(),
            )
            .into()
    }

    #[test]
    fn test_new_name() {
        assert_eq!(new_name(" \"getParent\"", "_getParent"), "getParent");
        assert_eq!(new_name("", "__loadAll"), "loadAll");
    }

    #[test]
    fn test_notices_are_removed_and_renames_recorded() {
        let mut ledger = MemoryLedger::new();
        let mut ctx = PassContext::new(PhpVersion::V7_4, &VersionTable, &mut ledger);
        let outcome = CollectUnderscoredMethods::new()
            .refactor(&shop(), &mut ctx)
            .unwrap();
        let Outcome::Replaced(Node::Class(class)) = outcome else {
            panic!("expected a replaced class");
        };

        let docs: Vec<usize> = class.methods().map(|method| method.doc.len()).collect();
        assert_eq!(docs, vec![1, 0, 1]);
        assert_eq!(
            ctx.recorded(),
            &[
                RenameEntry::new("App\\MyShop", "_getParent", "getParent"),
                RenameEntry::new("App\\MyShop", "__loadAll", "loadAll"),
            ]
        );
    }

    #[test]
    fn test_class_without_notices_is_unchanged() {
        let mut ledger = MemoryLedger::new();
        let mut ctx = PassContext::new(PhpVersion::V7_4, &VersionTable, &mut ledger);
        let node: Node = Class::new("Plain")
            .with_member(ClassMethod::new("_private").into())
            .into();
        assert_eq!(
            CollectUnderscoredMethods::new().refactor(&node, &mut ctx).unwrap(),
            Outcome::Unchanged
        );
        assert!(ctx.recorded().is_empty());
    }

    #[test]
    fn test_renames_reach_the_sink() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("renames.csv");
        let mut ledger = MemoryLedger::new();
        {
            let sink = RecordSink::open(&path).unwrap();
            let mut ctx =
                PassContext::new(PhpVersion::V7_4, &VersionTable, &mut ledger).with_sink(sink);
            CollectUnderscoredMethods::new()
                .refactor(&shop(), &mut ctx)
                .unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let records = parse_records(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].new_member, "getParent");
    }
}
