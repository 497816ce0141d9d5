//! Lint diagnostics for tree snapshots.
//!
//! Reports data-integrity issues without modifying the snapshot. The tree
//! builder already degrades gracefully on every one of these; the lint pass
//! exists so the issues can be listed instead of silently hidden.

use crate::id::NodeId;
use crate::model::TreeSnapshot;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Data the tree view will drop or show in a surprising place.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "dangling-edge", "cycle").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the snapshot and return diagnostics.
#[must_use]
pub fn lint_snapshot(snapshot: &TreeSnapshot) -> Vec<LintDiagnostic> {
    let known: HashSet<NodeId> = snapshot.nodes.iter().map(|n| n.id).collect();
    let mut diags = Vec::new();
    lint_dangling_edges(snapshot, &known, &mut diags);
    lint_missing_parents(snapshot, &known, &mut diags);
    lint_duplicate_children(snapshot, &mut diags);
    lint_cycles(snapshot, &known, &mut diags);
    lint_unanchored_nodes(snapshot, &mut diags);
    lint_duplicate_order(snapshot, &known, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_dangling_edges(
    snapshot: &TreeSnapshot,
    known: &HashSet<NodeId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    for edge in &snapshot.edges {
        if !known.contains(&edge.child_node_id) {
            diags.push(LintDiagnostic {
                node_id: edge.child_node_id,
                message: format!(
                    "Edge `{}` points at node `{}`, which is not in the snapshot.",
                    edge.id, edge.child_node_id
                ),
                severity: LintSeverity::Warning,
                rule: "dangling-edge",
            });
        }
    }
}

/// A child under an unknown parent is unreachable from any root.
fn lint_missing_parents(
    snapshot: &TreeSnapshot,
    known: &HashSet<NodeId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    for edge in &snapshot.edges {
        if let Some(parent) = edge.parent_node_id
            && !known.contains(&parent)
        {
            diags.push(LintDiagnostic {
                node_id: edge.child_node_id,
                message: format!(
                    "Node `{}` hangs under `{}`, which is not in the snapshot.",
                    edge.child_node_id, parent
                ),
                severity: LintSeverity::Warning,
                rule: "missing-parent",
            });
        }
    }
}

fn lint_duplicate_children(snapshot: &TreeSnapshot, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for edge in &snapshot.edges {
        if !seen.insert(edge.child_node_id) {
            diags.push(LintDiagnostic {
                node_id: edge.child_node_id,
                message: format!(
                    "Node `{}` has more than one incoming edge; extra edge `{}`.",
                    edge.child_node_id, edge.id
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-child",
            });
        }
    }
}

fn lint_cycles(
    snapshot: &TreeSnapshot,
    known: &HashSet<NodeId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    let mut slot = |graph: &mut DiGraph<NodeId, ()>, id: NodeId| {
        *index.entry(id).or_insert_with(|| graph.add_node(id))
    };

    for edge in &snapshot.edges {
        let Some(parent) = edge.parent_node_id else {
            continue;
        };
        if !known.contains(&parent) || !known.contains(&edge.child_node_id) {
            continue;
        }
        let from = slot(&mut graph, parent);
        let to = slot(&mut graph, edge.child_node_id);
        graph.add_edge(from, to, ());
    }

    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&n| graph.find_edge(n, n).is_some());
        if !is_cycle {
            continue;
        }
        let mut members: Vec<&str> = component.iter().map(|&n| graph[n].as_str()).collect();
        members.sort_unstable();
        for &n in &component {
            diags.push(LintDiagnostic {
                node_id: graph[n],
                message: format!("Node `{}` is part of a cycle: {}.", graph[n], members.join(" → ")),
                severity: LintSeverity::Warning,
                rule: "cycle",
            });
        }
    }
}

fn lint_unanchored_nodes(snapshot: &TreeSnapshot, diags: &mut Vec<LintDiagnostic>) {
    let anchored: HashSet<NodeId> = snapshot.edges.iter().map(|e| e.child_node_id).collect();
    for node in &snapshot.nodes {
        if !anchored.contains(&node.id) {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Node `{}` has no edge and will not be shown.", node.id),
                severity: LintSeverity::Info,
                rule: "unanchored-node",
            });
        }
    }
}

fn lint_duplicate_order(
    snapshot: &TreeSnapshot,
    known: &HashSet<NodeId>,
    diags: &mut Vec<LintDiagnostic>,
) {
    let mut seen: HashSet<(Option<NodeId>, i64)> = HashSet::new();
    for edge in &snapshot.edges {
        if !known.contains(&edge.child_node_id) {
            continue;
        }
        if !seen.insert((edge.parent_node_id, edge.order_index)) {
            diags.push(LintDiagnostic {
                node_id: edge.child_node_id,
                message: format!(
                    "Node `{}` shares order index {} with an earlier sibling.",
                    edge.child_node_id, edge.order_index
                ),
                severity: LintSeverity::Info,
                rule: "duplicate-order",
            });
        }
    }
}
