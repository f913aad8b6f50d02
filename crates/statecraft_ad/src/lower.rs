//! AST to control flow graph.
//!
//! Each statement is lowered from the node control currently sits on and
//! returns the node control leaves from, or `None` when flow does not
//! continue (`stop`, `goto`, `break`). Statements after such a point are
//! unreachable and skipped, except labels, which `goto` can still reach.

use statecraft_foundation::{Error, ErrorKind, Result};
use statecraft_machine::{CfGraph, CfgBuilder, CfgCond, CfgNodeKind, NodeId};
use tracing::{debug, warn};

use crate::ast::{Ast, AstKind, CondBody, Condition, Diagram, IfElseBlock, Loop};

/// Lowers a diagram into a control flow graph.
///
/// Control falling off the end of the diagram reaches the shared end node.
///
/// # Errors
/// Returns an error for a `goto` to an undefined label, a label defined
/// twice, or a `break` outside any loop.
pub fn lower(diagram: &Diagram) -> Result<CfGraph> {
    let mut lowering = Lowering {
        b: CfgBuilder::new(),
    };
    let start = lowering.b.start();
    if let Some(exit) = lowering.block(&diagram.body, Some(start))? {
        let end = lowering.b.end();
        lowering.b.link(exit, end);
    }
    let cfg = lowering.b.finish()?;
    debug!(
        nodes = cfg.node_count(),
        edges = cfg.edges().len(),
        "lowered activity diagram"
    );
    Ok(cfg)
}

struct Lowering {
    b: CfgBuilder,
}

impl Lowering {
    fn block(&mut self, stmts: &[Ast], entry: Option<NodeId>) -> Result<Option<NodeId>> {
        let mut current = entry;
        for stmt in stmts {
            current = match current {
                Some(at) => self.statement(stmt, at)?,
                None => {
                    if let AstKind::Label(name) = &stmt.kind {
                        Some(self.label(name, None)?)
                    } else {
                        warn!(line = stmt.span.line, "skipping unreachable statement");
                        None
                    }
                }
            };
        }
        Ok(current)
    }

    fn statement(&mut self, stmt: &Ast, at: NodeId) -> Result<Option<NodeId>> {
        match &stmt.kind {
            AstKind::Action(text) => Ok(Some(self.action(text.clone(), at))),
            AstKind::ActivityRef(name) => Ok(Some(self.action(format!("call {name}"), at))),
            AstKind::Label(name) => self.label(name, Some(at)).map(Some),
            AstKind::Goto(name) => {
                self.b.goto(at, name.as_str());
                Ok(None)
            }
            AstKind::Break => {
                let exit = self.b.loop_exit().ok_or_else(|| {
                    Error::new(ErrorKind::BreakOutsideLoop {
                        line: stmt.span.line,
                    })
                })?;
                self.b.link(at, exit);
                Ok(None)
            }
            AstKind::Stop => {
                let end = self.b.end();
                self.b.link(at, end);
                Ok(None)
            }
            AstKind::Arrow(label) => {
                if let Some(label) = label {
                    self.b.annotate_label(label.as_str());
                }
                Ok(Some(at))
            }
            AstKind::IfElse(block) => self.if_else(block, at),
            AstKind::Case { expr, cases } => self.switch(expr, cases, at),
            AstKind::While(lp) => self.while_loop(lp, at),
            AstKind::Repeat(lp) => self.repeat_loop(lp, at),
        }
    }

    fn action(&mut self, text: String, at: NodeId) -> NodeId {
        let node = self.b.node(CfgNodeKind::Action(text));
        self.b.link(at, node);
        node
    }

    /// A label names a merge point so that later statements and gotos share
    /// one target.
    fn label(&mut self, name: &str, at: Option<NodeId>) -> Result<NodeId> {
        let merge = self.b.node(CfgNodeKind::Merge);
        match at {
            Some(at) => self.b.link(at, merge),
            None => self.b.clear_annotation(),
        }
        self.b.define_label(name, merge)?;
        Ok(merge)
    }

    /// Lowers `body` as the branch of `decision` taken under `cond`, joining
    /// at `merge`.
    fn branch(
        &mut self,
        decision: NodeId,
        merge: NodeId,
        cond: CfgCond,
        label: Option<String>,
        body: &[Ast],
    ) -> Result<()> {
        self.b.annotate(cond, label);
        if let Some(exit) = self.block(body, Some(decision))? {
            self.b.link(exit, merge);
        }
        Ok(())
    }

    fn joined(&self, merge: NodeId) -> Option<NodeId> {
        self.b.has_incoming(merge).then_some(merge)
    }

    fn if_else(&mut self, block: &IfElseBlock, at: NodeId) -> Result<Option<NodeId>> {
        let test = block
            .branches
            .first()
            .map_or_else(String::new, |b| b.cond.to_string());
        let decision = self.b.node(CfgNodeKind::Decision(test));
        self.b.link(at, decision);
        let merge = self.b.node(CfgNodeKind::Merge);

        let mut seq = 0;
        for branch in &block.branches {
            let cond = CfgCond::new(seq, branch.cond.to_string());
            self.branch(decision, merge, cond, branch.label.clone(), &branch.body)?;
            seq += 1;
        }
        let (label, body) = match &block.else_branch {
            Some((label, body)) => (label.clone(), body.as_slice()),
            None => (None, [].as_slice()),
        };
        self.branch(decision, merge, CfgCond::new(seq, "else"), label, body)?;
        Ok(self.joined(merge))
    }

    fn switch(&mut self, expr: &Condition, cases: &[CondBody], at: NodeId) -> Result<Option<NodeId>> {
        let decision = self.b.node(CfgNodeKind::Decision(expr.to_string()));
        self.b.link(at, decision);
        let merge = self.b.node(CfgNodeKind::Merge);
        if cases.is_empty() {
            self.b.link(decision, merge);
        }
        for (seq, case) in (0..).zip(cases) {
            let cond = CfgCond::new(seq, case.cond.to_string());
            self.branch(decision, merge, cond, case.label.clone(), &case.body)?;
        }
        Ok(self.joined(merge))
    }

    /// `while`: the decision comes first; the body loops back to it.
    fn while_loop(&mut self, lp: &Loop, at: NodeId) -> Result<Option<NodeId>> {
        let test = lp.cond.as_ref().map_or_else(|| "true".to_string(), ToString::to_string);
        let decision = self.b.node(CfgNodeKind::Decision(test.clone()));
        self.b.link(at, decision);
        let exit = self.b.node(CfgNodeKind::Merge);

        self.b.push_loop(exit);
        self.b.annotate(CfgCond::new(0, test.as_str()), lp.label.clone());
        let tail = self.block(&lp.body, Some(decision));
        self.b.pop_loop();
        if let Some(tail) = tail? {
            self.b.link(tail, decision);
        }

        self.b
            .annotate(CfgCond::new(1, format!("not ({test})")), lp.exit_label.clone());
        self.b.link(decision, exit);
        Ok(Some(exit))
    }

    /// `repeat`: the body runs once before the decision at its end.
    fn repeat_loop(&mut self, lp: &Loop, at: NodeId) -> Result<Option<NodeId>> {
        let head = self.b.node(CfgNodeKind::Merge);
        self.b.link(at, head);
        let exit = self.b.node(CfgNodeKind::Merge);

        self.b.push_loop(exit);
        let tail = self.block(&lp.body, Some(head));
        self.b.pop_loop();

        if let Some(tail) = tail? {
            match &lp.cond {
                Some(cond) => {
                    let test = cond.to_string();
                    let decision = self.b.node(CfgNodeKind::Decision(test.clone()));
                    self.b.link(tail, decision);
                    self.b.annotate(CfgCond::new(0, test.as_str()), lp.label.clone());
                    self.b.link(decision, head);
                    self.b
                        .annotate(CfgCond::new(1, format!("not ({test})")), lp.exit_label.clone());
                    self.b.link(decision, exit);
                }
                None => self.b.link(tail, head),
            }
        }
        Ok(self.joined(exit))
    }
}

#[cfg(test)]
mod tests {
    use statecraft_foundation::Span;
    use statecraft_machine::CfgEdge;

    use super::*;

    fn at(line: u32) -> Span {
        Span::new(0, 0, line, 1)
    }

    fn act(text: &str) -> Ast {
        Ast::new(AstKind::Action(text.into()), at(1))
    }

    fn stmt(kind: AstKind) -> Ast {
        Ast::new(kind, at(1))
    }

    fn diagram(body: Vec<Ast>) -> Diagram {
        Diagram { title: None, body }
    }

    fn text(s: &str) -> Condition {
        Condition::Text(s.into())
    }

    /// Edges as `(from, to, condition)` using node ids.
    fn edges(cfg: &CfGraph) -> Vec<(usize, usize, Option<String>)> {
        cfg.edges()
            .iter()
            .map(|e| (e.from.0, e.to.0, e.condition()))
            .collect()
    }

    #[test]
    fn sequence_falls_through_to_end() {
        let cfg = lower(&diagram(vec![act("a"), act("b")])).expect("lowers");
        assert_eq!(cfg.node(NodeId(3)), Some(&CfgNodeKind::End));
        assert_eq!(
            cfg.edges(),
            &[
                CfgEdge::plain(NodeId(0), NodeId(1)),
                CfgEdge::plain(NodeId(1), NodeId(2)),
                CfgEdge::plain(NodeId(2), NodeId(3)),
            ]
        );
    }

    #[test]
    fn empty_diagram_goes_straight_to_end() {
        let cfg = lower(&Diagram::default()).expect("lowers");
        assert_eq!(edges(&cfg), vec![(0, 1, None)]);
    }

    #[test]
    fn if_with_implicit_else() {
        let block = IfElseBlock {
            branches: vec![CondBody::new(text("x"), Some("yes".into()), vec![act("a")])],
            else_branch: None,
        };
        let cfg = lower(&diagram(vec![stmt(AstKind::IfElse(block))])).expect("lowers");
        // 0 start, 1 decision, 2 merge, 3 a, 4 end
        assert_eq!(
            edges(&cfg),
            vec![
                (0, 1, None),
                (1, 3, Some("x [yes]".into())),
                (3, 2, None),
                (1, 2, Some("else".into())),
                (2, 4, None),
            ]
        );
    }

    #[test]
    fn if_where_every_branch_stops_has_no_exit() {
        let block = IfElseBlock {
            branches: vec![CondBody::new(text("x"), None, vec![stmt(AstKind::Stop)])],
            else_branch: Some((None, vec![stmt(AstKind::Stop)])),
        };
        let body = vec![stmt(AstKind::IfElse(block)), act("never")];
        let cfg = lower(&diagram(body)).expect("lowers");
        assert!(
            cfg.nodes()
                .all(|(_, k)| *k != CfgNodeKind::Action("never".into()))
        );
    }

    #[test]
    fn while_loop_edges() {
        let lp = Loop {
            cond: Some(text("more")),
            label: Some("yes".into()),
            exit_label: Some("no".into()),
            body: vec![act("work")],
        };
        let cfg = lower(&diagram(vec![stmt(AstKind::While(lp))])).expect("lowers");
        // 0 start, 1 decision, 2 exit merge, 3 work, 4 end
        assert_eq!(
            edges(&cfg),
            vec![
                (0, 1, None),
                (1, 3, Some("more [yes]".into())),
                (3, 1, None),
                (1, 2, Some("not (more) [no]".into())),
                (2, 4, None),
            ]
        );
    }

    #[test]
    fn break_leaves_the_loop() {
        let lp = Loop {
            cond: Some(text("x")),
            label: None,
            exit_label: None,
            body: vec![act("a"), stmt(AstKind::Break)],
        };
        let cfg = lower(&diagram(vec![stmt(AstKind::While(lp))])).expect("lowers");
        // 0 start, 1 decision, 2 exit, 3 a
        assert!(edges(&cfg).contains(&(3, 2, None)));
        assert!(!edges(&cfg).contains(&(3, 1, None)));
    }

    #[test]
    fn break_outside_loop_is_an_error() {
        let body = vec![act("a"), Ast::new(AstKind::Break, at(7))];
        let err = lower(&diagram(body)).expect_err("no loop");
        assert!(matches!(err.kind, ErrorKind::BreakOutsideLoop { line: 7 }));
    }

    #[test]
    fn repeat_loop_edges() {
        let lp = Loop {
            cond: Some(text("again")),
            label: None,
            exit_label: Some("done".into()),
            body: vec![act("poll")],
        };
        let cfg = lower(&diagram(vec![stmt(AstKind::Repeat(lp))])).expect("lowers");
        // 0 start, 1 head, 2 exit, 3 poll, 4 decision, 5 end
        assert_eq!(
            edges(&cfg),
            vec![
                (0, 1, None),
                (1, 3, None),
                (3, 4, None),
                (4, 1, Some("again".into())),
                (4, 2, Some("not (again) [done]".into())),
                (2, 5, None),
            ]
        );
    }

    #[test]
    fn switch_cases_in_order() {
        let cases = vec![
            CondBody::new(text("red"), None, vec![act("halt")]),
            CondBody::new(text("green"), None, vec![act("go")]),
        ];
        let body = vec![stmt(AstKind::Case {
            expr: text("light"),
            cases,
        })];
        let cfg = lower(&diagram(body)).expect("lowers");
        assert_eq!(cfg.node(NodeId(1)), Some(&CfgNodeKind::Decision("light".into())));
        let conds: Vec<_> = cfg.edges_from(NodeId(1)).filter_map(CfgEdge::condition).collect();
        assert_eq!(conds, vec!["red", "green"]);
    }

    #[test]
    fn goto_back_to_label() {
        let body = vec![
            stmt(AstKind::Label("top".into())),
            act("a"),
            stmt(AstKind::Goto("top".into())),
        ];
        let cfg = lower(&diagram(body)).expect("lowers");
        // 0 start, 1 label merge, 2 a
        assert_eq!(edges(&cfg), vec![(0, 1, None), (1, 2, None), (2, 1, None)]);
    }

    #[test]
    fn label_after_goto_is_reachable() {
        let body = vec![
            stmt(AstKind::Goto("skip".into())),
            act("dead"),
            stmt(AstKind::Label("skip".into())),
            act("b"),
        ];
        let cfg = lower(&diagram(body)).expect("lowers");
        // 0 start, 1 label merge, 2 b, 3 end
        assert_eq!(
            edges(&cfg),
            vec![(1, 2, None), (2, 3, None), (0, 1, None)]
        );
    }

    #[test]
    fn undefined_label_is_an_error() {
        let body = vec![stmt(AstKind::Goto("nowhere".into()))];
        let err = lower(&diagram(body)).expect_err("undefined");
        assert!(matches!(err.kind, ErrorKind::UndefinedLabel(ref l) if l == "nowhere"));
    }

    #[test]
    fn arrow_label_goes_on_next_edge() {
        let body = vec![act("a"), stmt(AstKind::Arrow(Some("ok".into()))), act("b")];
        let cfg = lower(&diagram(body)).expect("lowers");
        assert_eq!(edges(&cfg)[1], (1, 2, Some("ok".into())));
    }

    #[test]
    fn activity_reference_becomes_call() {
        let body = vec![stmt(AstKind::ActivityRef("Pay".into()))];
        let cfg = lower(&diagram(body)).expect("lowers");
        assert_eq!(cfg.node(NodeId(1)), Some(&CfgNodeKind::Action("call Pay".into())));
    }
}
