//! Node dispatch engine.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Each stage walks the tree
//! once, top-down and in source order, offering every node to the stage's rules
//! registered for that node's kind:
//!
//! - Rules are consulted in registration order; the first verdict other than
//!   [`Outcome::Unchanged`] wins and no later rule sees that node in this stage.
//! - A replacement is installed in place and the walk continues into the
//!   replacement's children. The replacement itself is not offered again.
//! - A removed node is dropped from a list, cleared from an optional slot, and
//!   rejected in a required slot.
//!
//! Stages run one after another, each seeing the previous stage's output.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};
use tugport_ast::{ChildSlot, Module, Node, NodeKind};
use tugport_core::config::RuleConfig;
use tugport_core::records::RenameEntry;

use crate::context::PassContext;
use crate::error::RuleError;
use crate::rule::{Outcome, Rule};

// ============================================================================
// Pass report
// ============================================================================

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    /// Nodes changed, per rule name.
    pub changes: BTreeMap<&'static str, usize>,
    /// Auxiliary files handed to the ledger.
    pub emitted: Vec<PathBuf>,
    /// Renames recorded during the pass.
    pub renames: Vec<RenameEntry>,
}

impl PassReport {
    pub fn changes_for(&self, rule: &str) -> usize {
        self.changes.get(rule).copied().unwrap_or(0)
    }

    pub fn total_changes(&self) -> usize {
        self.changes.values().sum()
    }
}

// ============================================================================
// Stage
// ============================================================================

/// Rules that share one walk over the tree.
#[derive(Default)]
pub struct Stage {
    rules: Vec<Box<dyn Rule>>,
    table: HashMap<NodeKind, Vec<usize>>,
}

impl Stage {
    pub fn new() -> Self {
        Stage::default()
    }

    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.add_rule(rule);
        self
    }

    /// Register a rule after the ones already present.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        let index = self.rules.len();
        for kind in rule.node_kinds() {
            self.table.entry(*kind).or_default().push(index);
        }
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn configure(&mut self, config: &RuleConfig) -> Result<(), RuleError> {
        for rule in &mut self.rules {
            rule.configure(config)?;
        }
        Ok(())
    }

    fn run(
        &mut self,
        module: &mut Module,
        ctx: &mut PassContext<'_>,
        report: &mut PassReport,
    ) -> Result<(), RuleError> {
        for rule in &mut self.rules {
            rule.begin_pass();
        }
        let mut walker = Walker {
            rules: &mut self.rules,
            table: &self.table,
            ctx: &mut *ctx,
            report: &mut *report,
        };
        walker.walk_list(&mut module.stmts)?;
        for rule in &mut self.rules {
            rule.finish_pass(ctx)?;
        }
        Ok(())
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline::default()
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Hand `config` to every rule.
    pub fn configure(&mut self, config: &RuleConfig) -> Result<(), RuleError> {
        for stage in &mut self.stages {
            stage.configure(config)?;
        }
        Ok(())
    }

    /// Run every stage over `module`, then complete the pass.
    ///
    /// Auxiliary files reach the ledger only if every stage succeeds. On error
    /// the context is dropped, which still flushes the record sink.
    pub fn run(
        &mut self,
        module: &mut Module,
        mut ctx: PassContext<'_>,
    ) -> Result<PassReport, RuleError> {
        let mut report = PassReport::default();
        for stage in &mut self.stages {
            stage.run(module, &mut ctx, &mut report)?;
        }
        let output = ctx.finish()?;
        report.emitted = output.emitted;
        report.renames = output.renames;
        info!(
            changes = report.total_changes(),
            emitted = report.emitted.len(),
            renames = report.renames.len(),
            "pass complete"
        );
        Ok(report)
    }
}

// ============================================================================
// Walk
// ============================================================================

enum Visit {
    Kept,
    Removed(&'static str),
}

struct Walker<'w, 'c, 'a> {
    rules: &'w mut [Box<dyn Rule>],
    table: &'w HashMap<NodeKind, Vec<usize>>,
    ctx: &'c mut PassContext<'a>,
    report: &'w mut PassReport,
}

impl Walker<'_, '_, '_> {
    fn walk_list(&mut self, list: &mut Vec<Node>) -> Result<(), RuleError> {
        let mut index = 0;
        while index < list.len() {
            match self.visit(&mut list[index])? {
                Visit::Kept => index += 1,
                Visit::Removed(_) => {
                    list.remove(index);
                }
            }
        }
        Ok(())
    }

    fn visit(&mut self, node: &mut Node) -> Result<Visit, RuleError> {
        match self.offer(node)? {
            (Outcome::Unchanged, _) => {}
            (Outcome::Replaced(replacement), _) => *node = replacement,
            (Outcome::Removed, rule) => return Ok(Visit::Removed(rule)),
        }
        self.walk_children(node)?;
        Ok(Visit::Kept)
    }

    /// Ask the rules registered for this kind, stopping at the first change.
    fn offer(&mut self, node: &Node) -> Result<(Outcome, &'static str), RuleError> {
        let table = self.table;
        let Some(indices) = table.get(&node.kind()) else {
            return Ok((Outcome::Unchanged, ""));
        };
        for &index in indices {
            let rule = &mut self.rules[index];
            let outcome = rule.refactor(node, self.ctx)?;
            if outcome.is_unchanged() {
                continue;
            }
            let name = rule.name();
            debug!(rule = name, kind = %node.kind(), "rule changed node");
            *self.report.changes.entry(name).or_insert(0) += 1;
            return Ok((outcome, name));
        }
        Ok((Outcome::Unchanged, ""))
    }

    fn walk_children(&mut self, node: &mut Node) -> Result<(), RuleError> {
        for slot in node.child_slots() {
            match slot {
                ChildSlot::Single(child) => {
                    if let Visit::Removed(rule) = self.visit(child)? {
                        return Err(RuleError::structural(
                            rule,
                            format!("removed a required {} child", child.kind()),
                        ));
                    }
                }
                ChildSlot::Optional(slot) => {
                    let removed = match slot.as_mut() {
                        Some(child) => matches!(self.visit(child)?, Visit::Removed(_)),
                        None => false,
                    };
                    if removed {
                        *slot = None;
                    }
                }
                ChildSlot::List(list) => self.walk_list(list)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tugport_ast::{Class, ClassMethod, PhpVersion, Return, Span, VersionTable};
    use tugport_core::ledger::{AuxiliaryFile, MemoryLedger};

    /// Renames every variable it sees.
    struct RenameVariables {
        to: &'static str,
    }

    impl Rule for RenameVariables {
        fn name(&self) -> &'static str {
            "rename_variables"
        }
        fn description(&self) -> &'static str {
            ""
        }
        fn node_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::Variable]
        }
        fn refactor(&mut self, node: &Node, _ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
            match node {
                Node::Variable(var) if var.name != self.to => {
                    Ok(Outcome::Replaced(Node::variable(self.to)))
                }
                _ => Ok(Outcome::Unchanged),
            }
        }
    }

    /// Removes every node of one kind.
    struct RemoveKind(NodeKind);

    impl Rule for RemoveKind {
        fn name(&self) -> &'static str {
            "remove_kind"
        }
        fn description(&self) -> &'static str {
            ""
        }
        fn node_kinds(&self) -> &'static [NodeKind] {
            &NodeKind::ALL
        }
        fn refactor(&mut self, node: &Node, _ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
            if node.kind() == self.0 {
                Ok(Outcome::Removed)
            } else {
                Ok(Outcome::Unchanged)
            }
        }
    }

    /// Emits one auxiliary file per visited class.
    struct EmitPerClass;

    impl Rule for EmitPerClass {
        fn name(&self) -> &'static str {
            "emit_per_class"
        }
        fn description(&self) -> &'static str {
            ""
        }
        fn node_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::Class]
        }
        fn refactor(&mut self, _node: &Node, ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
            ctx.emit_file(AuxiliaryFile::new("src/Shared.php", Module::default()));
            Ok(Outcome::Unchanged)
        }
    }

    /// Replaces every assignment and variable, logging each node it is offered.
    struct ReplaceEverything {
        offered: Rc<RefCell<Vec<NodeKind>>>,
    }

    impl Rule for ReplaceEverything {
        fn name(&self) -> &'static str {
            "replace_everything"
        }
        fn description(&self) -> &'static str {
            ""
        }
        fn node_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::Assign, NodeKind::Variable]
        }
        fn refactor(&mut self, node: &Node, _ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
            self.offered.borrow_mut().push(node.kind());
            match node {
                Node::Variable(var) => Ok(Outcome::Replaced(Node::variable(format!("{}_", var.name)))),
                other => Ok(Outcome::Replaced(other.clone())),
            }
        }
    }

    fn run(pipeline: &mut Pipeline, module: &mut Module) -> Result<PassReport, RuleError> {
        let mut ledger = MemoryLedger::new();
        let ctx = PassContext::new(PhpVersion::V8_0, &VersionTable, &mut ledger);
        pipeline.run(module, ctx)
    }

    fn assign_stmt() -> Node {
        Node::expression(Node::assign(Node::variable("a"), Node::variable("b")))
    }

    #[test]
    fn test_first_changing_rule_wins() {
        let mut pipeline = Pipeline::new().with_stage(
            Stage::new()
                .with_rule(Box::new(RenameVariables { to: "x" }))
                .with_rule(Box::new(RenameVariables { to: "y" })),
        );
        let mut module = Module::new(vec![assign_stmt()]);
        let report = run(&mut pipeline, &mut module).unwrap();

        assert_eq!(
            module.stmts[0],
            Node::expression(Node::assign(Node::variable("x"), Node::variable("x")))
        );
        assert_eq!(report.changes_for("rename_variables"), 2);
    }

    #[test]
    fn test_each_node_offered_once_and_replacements_not_reoffered() {
        let offered = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = Pipeline::new().with_stage(Stage::new().with_rule(Box::new(
            ReplaceEverything {
                offered: Rc::clone(&offered),
            },
        )));
        let mut module = Module::new(vec![assign_stmt()]);
        let report = run(&mut pipeline, &mut module).unwrap();

        assert_eq!(
            *offered.borrow(),
            vec![NodeKind::Assign, NodeKind::Variable, NodeKind::Variable]
        );
        assert_eq!(
            module.stmts[0],
            Node::expression(Node::assign(Node::variable("a_"), Node::variable("b_")))
        );
        assert_eq!(report.changes_for("replace_everything"), 3);
    }

    #[test]
    fn test_each_stage_offers_nodes_once() {
        let offered = Rc::new(RefCell::new(Vec::new()));
        let stage = || {
            Stage::new().with_rule(Box::new(ReplaceEverything {
                offered: Rc::clone(&offered),
            }))
        };
        let mut pipeline = Pipeline::new().with_stage(stage()).with_stage(stage());
        let mut module = Module::new(vec![assign_stmt()]);
        run(&mut pipeline, &mut module).unwrap();

        assert_eq!(offered.borrow().len(), 6);
        assert_eq!(
            module.stmts[0],
            Node::expression(Node::assign(Node::variable("a__"), Node::variable("b__")))
        );
    }

    #[test]
    fn test_report_serializes_per_rule_counts() {
        let mut pipeline =
            Pipeline::new().with_stage(Stage::new().with_rule(Box::new(RenameVariables { to: "x" })));
        let mut module = Module::new(vec![assign_stmt()]);
        let report = run(&mut pipeline, &mut module).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["changes"]["rename_variables"], 2);
        assert_eq!(json["emitted"], serde_json::json!([]));
    }

    #[test]
    fn test_later_stage_sees_earlier_output() {
        let mut pipeline = Pipeline::new()
            .with_stage(Stage::new().with_rule(Box::new(RenameVariables { to: "x" })))
            .with_stage(Stage::new().with_rule(Box::new(RenameVariables { to: "y" })));
        let mut module = Module::new(vec![assign_stmt()]);
        run(&mut pipeline, &mut module).unwrap();
        assert_eq!(
            module.stmts[0],
            Node::expression(Node::assign(Node::variable("y"), Node::variable("y")))
        );
    }

    #[test]
    fn test_unregistered_kinds_are_not_offered() {
        let mut pipeline =
            Pipeline::new().with_stage(Stage::new().with_rule(Box::new(RenameVariables { to: "x" })));
        let mut module = Module::new(vec![Node::return_of(Node::int(1))]);
        let report = run(&mut pipeline, &mut module).unwrap();
        assert_eq!(report.total_changes(), 0);
    }

    #[test]
    fn test_removed_list_entries_are_dropped() {
        let class = Class::new("Shop")
            .with_member(ClassMethod::new("a").into())
            .with_member(ClassMethod::new("b").into());
        let mut pipeline =
            Pipeline::new().with_stage(Stage::new().with_rule(Box::new(RemoveKind(NodeKind::ClassMethod))));
        let mut module = Module::new(vec![class.into()]);
        let report = run(&mut pipeline, &mut module).unwrap();
        match &module.stmts[0] {
            Node::Class(class) => assert!(class.stmts.is_empty()),
            other => panic!("unexpected node {:?}", other),
        }
        assert_eq!(report.changes_for("remove_kind"), 2);
    }

    #[test]
    fn test_removed_optional_child_is_cleared() {
        let mut pipeline =
            Pipeline::new().with_stage(Stage::new().with_rule(Box::new(RemoveKind(NodeKind::Literal))));
        let mut module = Module::new(vec![Node::return_of(Node::int(1))]);
        run(&mut pipeline, &mut module).unwrap();
        assert_eq!(
            module.stmts[0],
            Node::Return(Return {
                expr: None,
                span: Span::detached(),
            })
        );
    }

    #[test]
    fn test_removing_required_child_is_structural_error() {
        let mut pipeline =
            Pipeline::new().with_stage(Stage::new().with_rule(Box::new(RemoveKind(NodeKind::Assign))));
        let mut module = Module::new(vec![assign_stmt()]);
        let err = run(&mut pipeline, &mut module).unwrap_err();
        assert!(matches!(err, RuleError::StructuralInvariant { ref rule, .. } if rule == "remove_kind"));
    }

    #[test]
    fn test_aux_files_are_deduplicated_within_pass() {
        let mut pipeline = Pipeline::new().with_stage(Stage::new().with_rule(Box::new(EmitPerClass)));
        let mut module = Module::new(vec![Class::new("A").into(), Class::new("B").into()]);
        let mut ledger = MemoryLedger::new();
        let ctx = PassContext::new(PhpVersion::V8_0, &VersionTable, &mut ledger);
        let report = pipeline.run(&mut module, ctx).unwrap();
        assert_eq!(report.emitted, vec![PathBuf::from("src/Shared.php")]);
        assert_eq!(ledger.files().len(), 1);
    }

    #[test]
    fn test_existing_aux_file_is_skipped() {
        let mut pipeline = Pipeline::new().with_stage(Stage::new().with_rule(Box::new(EmitPerClass)));
        let mut module = Module::new(vec![Class::new("A").into()]);
        let mut ledger = MemoryLedger::new().with_existing("src/Shared.php");
        let ctx = PassContext::new(PhpVersion::V8_0, &VersionTable, &mut ledger);
        let report = pipeline.run(&mut module, ctx).unwrap();
        assert!(report.emitted.is_empty());
        assert!(ledger.files().is_empty());
    }
}
