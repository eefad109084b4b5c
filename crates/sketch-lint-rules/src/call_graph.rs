//! Call graph over the user routines of the sketch.
//!
//! Nodes are routine names; an edge `a -> b` exists when the body of `a`
//! contains a local call (no receiver or `this`) to `b`. Only routines
//! carrying exactly the user-routine tag take part. Maps are ordered so the
//! traversal, and therefore the reported cycle, is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use sketch_lint_core::{RoleTag, SketchContext, Span};

/// Directed graph of local calls between user routines.
#[derive(Debug, Default)]
pub struct CallGraph {
    edges: BTreeMap<String, BTreeMap<String, Span>>,
}

impl CallGraph {
    /// Builds the graph for the sketch in `ctx`.
    #[must_use]
    pub fn from_context(ctx: &SketchContext<'_>) -> Self {
        let users: BTreeSet<&str> = ctx
            .sketch
            .routines()
            .filter(|t| t.roles == [RoleTag::UserRoutine])
            .map(|t| t.item.name.as_str())
            .collect();

        let mut graph = Self::default();
        for tagged in ctx.sketch.routines().filter(|t| t.roles == [RoleTag::UserRoutine]) {
            let caller = &tagged.item.name;
            graph.edges.entry(caller.clone()).or_default();
            let Some(body) = &tagged.item.body else {
                continue;
            };
            for call in body
                .calls
                .iter()
                .filter(|c| c.receiver.is_local() && users.contains(c.name.as_str()))
            {
                graph.add_edge(caller, &call.name, call.span);
            }
        }
        graph
    }

    /// Adds an edge, creating both nodes.
    pub fn add_edge(&mut self, caller: &str, callee: &str, span: Span) {
        self.edges.entry(callee.to_string()).or_default();
        self.edges
            .entry(caller.to_string())
            .or_default()
            .entry(callee.to_string())
            .or_insert(span);
    }

    /// Number of routines in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true when the graph has no routines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Span of the first call from `caller` to `callee`.
    #[must_use]
    pub fn call_span(&self, caller: &str, callee: &str) -> Option<Span> {
        self.edges.get(caller)?.get(callee).copied()
    }

    /// Finds the first cycle in a depth-first traversal started from each
    /// routine in name order.
    ///
    /// The returned path starts and ends with the same routine, e.g.
    /// `[a, b, a]`; a self-recursive routine yields `[a, a]`.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut done: BTreeSet<&str> = BTreeSet::new();
        for start in self.edges.keys() {
            if done.contains(start.as_str()) {
                continue;
            }
            let mut stack: Vec<&str> = Vec::new();
            if let Some(cycle) = self.visit(start, &mut stack, &mut done) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'g>(
        &'g self,
        node: &'g str,
        stack: &mut Vec<&'g str>,
        done: &mut BTreeSet<&'g str>,
    ) -> Option<Vec<String>> {
        if let Some(pos) = stack.iter().position(|n| *n == node) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(|n| (*n).to_string()).collect();
            cycle.push(node.to_string());
            return Some(cycle);
        }
        if done.contains(node) {
            return None;
        }

        stack.push(node);
        if let Some(targets) = self.edges.get(node) {
            for next in targets.keys() {
                if let Some(cycle) = self.visit(next, stack, done) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        done.insert(node);
        None
    }
}
