//! Extract `#[Route(name: '...')]` strings into a `RouteName` constants class.
//!
//! ```text
//! #[Route(path: '/path', name: 'action')]   =>   #[Route(path: '/path', name: RouteName::ROUTE_ACTION)]
//! ```
//!
//! The constants class is written once per pass, next to the processed file,
//! as `src/ValueObject/Routing/RouteName.php`. It is never overwritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use tugport_ast::{Class, ClassConst, DocBlock, Module, Namespace, Node, NodeKind};
use tugport_core::ledger::AuxiliaryFile;

use crate::context::PassContext;
use crate::error::RuleError;
use crate::rule::{Outcome, Rule};

const NAME: &str = "extract_route_name_constants";

pub const ROUTE_ATTRIBUTE: &str = "Symfony\\Component\\Routing\\Annotation\\Route";
pub const ROUTE_NAME_NAMESPACE: &str = "App\\ValueObject\\Routing";
pub const ROUTE_NAME_CLASS: &str = "App\\ValueObject\\Routing\\RouteName";
pub const ROUTE_NAME_FILE: &str = "src/ValueObject/Routing/RouteName.php";

/// Replaces route name strings with constants and emits the constants class.
#[derive(Debug, Default)]
pub struct ExtractRouteNameConstants {
    /// Constant name to route name, for the current pass.
    constants: BTreeMap<String, String>,
    emitted: bool,
}

impl ExtractRouteNameConstants {
    pub fn new() -> Self {
        ExtractRouteNameConstants::default()
    }
}

impl Rule for ExtractRouteNameConstants {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Extract #[Route] name arguments into RouteName class constants"
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Class, NodeKind::ClassMethod]
    }

    fn begin_pass(&mut self) {
        self.constants.clear();
        self.emitted = false;
    }

    fn refactor(&mut self, node: &Node, _ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
        let has_named_route = node.attr_groups().is_some_and(|groups| {
            groups
                .iter()
                .flat_map(|group| &group.attrs)
                .filter(|attr| attr.name.is(ROUTE_ATTRIBUTE))
                .any(|attr| route_name(attr.arg_named("name").map(|arg| &arg.value)).is_some())
        });
        if !has_named_route {
            return Ok(Outcome::Unchanged);
        }

        let mut updated = node.clone();
        let Some((_, groups)) = updated.doc_and_attributes_mut() else {
            return Ok(Outcome::Unchanged);
        };
        let mut replaced = 0;
        for attr in groups.iter_mut().flat_map(|group| &mut group.attrs) {
            if !attr.name.is(ROUTE_ATTRIBUTE) {
                continue;
            }
            for arg in &mut attr.args {
                if arg.name.as_deref() != Some("name") {
                    continue;
                }
                let Some(value) = route_name(Some(&arg.value)).map(str::to_string) else {
                    continue;
                };
                let constant = constant_name(&value);
                if let Some(existing) = self.constants.get(&constant) {
                    if *existing != value {
                        trace!(%constant, %value, "constant already holds another route name");
                        continue;
                    }
                }
                arg.value = Node::class_const_fetch(ROUTE_NAME_CLASS, constant.clone());
                self.constants.insert(constant, value);
                replaced += 1;
            }
        }
        if replaced == 0 {
            return Ok(Outcome::Unchanged);
        }
        Ok(Outcome::Replaced(updated))
    }

    fn finish_pass(&mut self, ctx: &mut PassContext<'_>) -> Result<(), RuleError> {
        if self.emitted || self.constants.is_empty() {
            return Ok(());
        }
        self.emitted = true;

        let path = ctx
            .file()
            .and_then(Path::parent)
            .map(|dir| dir.join(ROUTE_NAME_FILE))
            .unwrap_or_else(|| PathBuf::from(ROUTE_NAME_FILE));
        let file = AuxiliaryFile::new(path, route_name_module(&self.constants));
        if ctx.emit_file(file) {
            debug!(constants = self.constants.len(), "requested RouteName class");
        }
        Ok(())
    }
}

fn route_name(value: Option<&Node>) -> Option<&str> {
    match value {
        Some(Node::Literal(literal)) => literal.as_str(),
        _ => None,
    }
}

/// `ROUTE_` plus the upper-cased name, with anything not alphanumeric as `_`.
pub fn constant_name(route_name: &str) -> String {
    let mut constant = String::from("ROUTE_");
    constant.extend(route_name.chars().map(|c| {
        if c.is_ascii_alphanumeric() {
            c.to_ascii_uppercase()
        } else {
            '_'
        }
    }));
    constant
}

fn route_name_module(constants: &BTreeMap<String, String>) -> Module {
    let mut class = Class::new("RouteName").with_namespaced_name(ROUTE_NAME_CLASS);
    class.is_final = true;
    for (constant, value) in constants {
        class.stmts.push(
            ClassConst::new(constant.clone(), Node::string(value.clone()))
                .with_doc(DocBlock::new().with_text("var", "string"))
                .into(),
        );
    }
    Module::new(vec![Namespace::new(ROUTE_NAME_NAMESPACE, vec![class.into()]).into()])
}
