//! Lower `match` expressions to `switch` statements.
//!
//! Two statement shapes are recognized:
//!
//! ```text
//! $x = match ($v) { 200, 300 => A, default => B };   // assignment
//! return match ($v) { 200 => A, default => B };      // return
//! ```
//!
//! Each arm becomes one case label per condition. All labels but the last
//! have empty bodies so they fall through to the last one. A `default` arm
//! becomes a `default:` label at the arm's own position.

use tugport_ast::{Case, Match, MatchArm, Node, NodeKind, Switch};

use crate::context::PassContext;
use crate::error::RuleError;
use crate::rule::{Outcome, Rule};

const NAME: &str = "downgrade_match_to_switch";

/// Downgrades `match` to `switch`. The migration target is not consulted.
#[derive(Debug, Default)]
pub struct DowngradeMatchToSwitch;

impl DowngradeMatchToSwitch {
    pub fn new() -> Self {
        DowngradeMatchToSwitch
    }
}

/// What the match result flowed into.
enum Sink<'n> {
    Assign(&'n Node),
    Return,
}

impl Rule for DowngradeMatchToSwitch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Lower match expressions assigned or returned to switch statements"
    }

    fn node_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Expression, NodeKind::Return]
    }

    fn refactor(&mut self, node: &Node, _ctx: &mut PassContext<'_>) -> Result<Outcome, RuleError> {
        let Some((matched, sink)) = recognize(node) else {
            return Ok(Outcome::Unchanged);
        };

        let mut cases = Vec::with_capacity(matched.arms.len());
        for arm in &matched.arms {
            cases.extend(lower_arm(arm, &sink)?);
        }

        let mut switch = Switch::new(matched.subject.as_ref().clone(), cases);
        switch.span = node.span();
        Ok(Outcome::Replaced(Node::Switch(switch)))
    }
}

fn recognize(node: &Node) -> Option<(&Match, Sink<'_>)> {
    match node {
        Node::Expression(stmt) => match stmt.expr.as_ref() {
            Node::Assign(assign) => match assign.expr.as_ref() {
                Node::Match(matched) => Some((matched, Sink::Assign(assign.var.as_ref()))),
                _ => None,
            },
            _ => None,
        },
        Node::Return(ret) => match ret.expr.as_deref() {
            Some(Node::Match(matched)) => Some((matched, Sink::Return)),
            _ => None,
        },
        _ => None,
    }
}

fn lower_arm(arm: &MatchArm, sink: &Sink<'_>) -> Result<Vec<Case>, RuleError> {
    let body = translate_body(arm.body.as_ref(), sink);

    if arm.is_default() {
        let mut case = Case::default_case(body);
        case.span = arm.span;
        return Ok(vec![case]);
    }

    let mut cases: Vec<Case> = arm
        .conds
        .iter()
        .map(|cond| Case::new(cond.clone(), Vec::new()))
        .collect();
    let last = cases
        .last_mut()
        .ok_or_else(|| RuleError::structural(NAME, "match arm produced no case labels"))?;
    last.stmts = body;
    last.span = arm.span;
    Ok(cases)
}

fn translate_body(body: &Node, sink: &Sink<'_>) -> Vec<Node> {
    match sink {
        Sink::Assign(target) => vec![
            Node::expression(Node::assign((*target).clone(), body.clone())),
            Node::break_stmt(),
        ],
        Sink::Return => vec![Node::return_of(body.clone())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugport_ast::{PhpVersion, VersionTable};
    use tugport_core::ledger::MemoryLedger;

    fn lower(node: &Node) -> Outcome {
        let mut ledger = MemoryLedger::new();
        let mut ctx = PassContext::new(PhpVersion::V7_4, &VersionTable, &mut ledger);
        DowngradeMatchToSwitch::new().refactor(node, &mut ctx).unwrap()
    }

    fn lowered_switch(node: &Node) -> Switch {
        match lower(node) {
            Outcome::Replaced(Node::Switch(switch)) => switch,
            other => panic!("expected a switch, got {:?}", other),
        }
    }

    fn assign_match(arms: Vec<MatchArm>) -> Node {
        Node::expression(Node::assign(
            Node::variable("x"),
            Node::match_expr(Node::variable("v"), arms),
        ))
    }

    fn assign_x(value: Node) -> Vec<Node> {
        vec![
            Node::expression(Node::assign(Node::variable("x"), value)),
            Node::break_stmt(),
        ]
    }

    #[test]
    fn test_multi_condition_arm_falls_through() {
        let node = assign_match(vec![
            MatchArm::new(vec![Node::int(200), Node::int(300)], Node::string("A")),
            MatchArm::new(vec![Node::int(400)], Node::string("B")),
            MatchArm::default_arm(Node::string("C")),
        ]);
        let switch = lowered_switch(&node);

        assert_eq!(*switch.subject, Node::variable("v"));
        assert_eq!(switch.cases.len(), 4);
        assert_eq!(switch.cases[0].cond.as_deref(), Some(&Node::int(200)));
        assert!(switch.cases[0].stmts.is_empty());
        assert_eq!(switch.cases[1].cond.as_deref(), Some(&Node::int(300)));
        assert_eq!(switch.cases[1].stmts, assign_x(Node::string("A")));
        assert_eq!(switch.cases[2].cond.as_deref(), Some(&Node::int(400)));
        assert_eq!(switch.cases[2].stmts, assign_x(Node::string("B")));
        assert!(switch.cases[3].is_default());
        assert_eq!(switch.cases[3].stmts, assign_x(Node::string("C")));
    }

    #[test]
    fn test_default_keeps_source_position() {
        let node = assign_match(vec![
            MatchArm::new(vec![Node::int(1)], Node::string("one")),
            MatchArm::default_arm(Node::string("other")),
            MatchArm::new(vec![Node::int(2)], Node::string("two")),
        ]);
        let switch = lowered_switch(&node);
        let defaults: Vec<bool> = switch.cases.iter().map(Case::is_default).collect();
        assert_eq!(defaults, vec![false, true, false]);
    }

    #[test]
    fn test_single_condition_arms_plus_default() {
        let arms: Vec<MatchArm> = (0..5)
            .map(|n| MatchArm::new(vec![Node::int(n)], Node::int(n * 10)))
            .chain(std::iter::once(MatchArm::default_arm(Node::null())))
            .collect();
        let switch = lowered_switch(&assign_match(arms));
        assert_eq!(switch.cases.len(), 6);
        for case in &switch.cases {
            assert_eq!(case.stmts.last(), Some(&Node::break_stmt()));
        }
    }

    #[test]
    fn test_return_shape_has_single_return_per_body() {
        let node = Node::return_of(Node::match_expr(
            Node::variable("statusCode"),
            vec![
                MatchArm::new(vec![Node::int(200), Node::int(300)], Node::null()),
                MatchArm::new(vec![Node::int(400)], Node::string("not found")),
                MatchArm::default_arm(Node::string("unknown status code")),
            ],
        ));
        let switch = lowered_switch(&node);
        assert_eq!(switch.cases.len(), 4);
        assert!(switch.cases[0].stmts.is_empty());
        for case in &switch.cases[1..] {
            assert_eq!(case.stmts.len(), 1);
            assert_eq!(case.stmts[0].kind(), NodeKind::Return);
        }
        assert_eq!(
            switch.cases[2].stmts,
            vec![Node::return_of(Node::string("not found"))]
        );
    }

    #[test]
    fn test_other_shapes_are_unchanged() {
        let bare_match = Node::expression(Node::match_expr(
            Node::variable("v"),
            vec![MatchArm::default_arm(Node::int(1))],
        ));
        assert_eq!(lower(&bare_match), Outcome::Unchanged);

        let plain_assign = Node::expression(Node::assign(Node::variable("x"), Node::int(1)));
        assert_eq!(lower(&plain_assign), Outcome::Unchanged);

        assert_eq!(lower(&Node::return_of(Node::int(1))), Outcome::Unchanged);
    }

    #[test]
    fn test_match_without_arms_lowers_to_empty_switch() {
        let switch = lowered_switch(&assign_match(Vec::new()));
        assert!(switch.cases.is_empty());
    }
}
