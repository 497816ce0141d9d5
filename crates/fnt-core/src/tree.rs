//! Tree builder: flat snapshot → ordered forest lookup.
//!
//! `TreeIndex` is derived state. It is rebuilt from scratch for every
//! snapshot and never patched in place.

use crate::id::{NodeId, ParentKey};
use crate::model::{Edge, Node, TreeSnapshot};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// One entry of a children list: the child node and the edge that places it.
#[derive(Debug, Clone, Copy)]
pub struct Child<'a> {
    pub node: &'a Node,
    pub edge: &'a Edge,
}

/// `nodeById` + `childrenByParent`, sorted by `order_index`.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    nodes: HashMap<NodeId, Node>,
    /// Edges whose child resolved, in snapshot order.
    edges: Vec<Edge>,
    /// Indices into `edges`, stable-sorted by `order_index`.
    children: HashMap<ParentKey, SmallVec<[usize; 4]>>,
    /// First edge seen for each child.
    edge_by_child: HashMap<NodeId, usize>,
}

impl TreeIndex {
    /// Build the lookup structure.
    ///
    /// Duplicate node ids are last-write-wins. Edges whose child is absent
    /// are skipped without error.
    pub fn build(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let nodes: HashMap<NodeId, Node> = nodes.into_iter().map(|n| (n.id, n)).collect();

        let mut kept = Vec::new();
        let mut children: HashMap<ParentKey, SmallVec<[usize; 4]>> = HashMap::new();
        let mut edge_by_child = HashMap::new();

        for edge in edges {
            if !nodes.contains_key(&edge.child_node_id) {
                log::debug!(
                    "skipping edge {} → missing child {}",
                    edge.id,
                    edge.child_node_id
                );
                continue;
            }
            let idx = kept.len();
            if edge_by_child.contains_key(&edge.child_node_id) {
                log::warn!("node {} has more than one incoming edge", edge.child_node_id);
            } else {
                edge_by_child.insert(edge.child_node_id, idx);
            }
            children
                .entry(ParentKey::from(edge.parent_node_id))
                .or_default()
                .push(idx);
            kept.push(edge);
        }

        for list in children.values_mut() {
            // Stable: ties keep snapshot order.
            list.sort_by_key(|&i| kept[i].order_index);
        }

        Self {
            nodes,
            edges: kept,
            children,
            edge_by_child,
        }
    }

    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Self {
        Self::build(snapshot.nodes.iter().cloned(), snapshot.edges.iter().cloned())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the snapshot, rendered or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when there is nothing at root level to render.
    pub fn is_empty(&self) -> bool {
        self.child_count(ParentKey::Root) == 0
    }

    /// Children under `key`, ascending by `order_index`.
    pub fn children(
        &self,
        key: impl Into<ParentKey>,
    ) -> impl DoubleEndedIterator<Item = Child<'_>> + ExactSizeIterator + '_ {
        self.child_slots(key.into())
            .iter()
            .map(move |&i| self.child_at(i))
    }

    pub fn child_count(&self, key: impl Into<ParentKey>) -> usize {
        self.child_slots(key.into()).len()
    }

    pub fn roots(&self) -> impl DoubleEndedIterator<Item = Child<'_>> + ExactSizeIterator + '_ {
        self.children(ParentKey::Root)
    }

    /// The incoming edge of `id`, if any.
    pub fn edge_of(&self, id: NodeId) -> Option<&Edge> {
        self.edge_by_child.get(&id).map(|&i| &self.edges[i])
    }

    /// Which bucket `id` lives in. `None` when the node has no edge.
    pub fn parent_of(&self, id: NodeId) -> Option<ParentKey> {
        self.edge_of(id).map(|e| ParentKey::from(e.parent_node_id))
    }

    /// The children list `id` belongs to, `id` included. Empty for a node
    /// with no edge.
    pub fn siblings_of(&self, id: NodeId) -> Vec<Child<'_>> {
        match self.parent_of(id) {
            Some(parent) => self.children(parent).collect(),
            None => Vec::new(),
        }
    }

    /// Position of `id` within its parent's children list.
    pub fn position_among_siblings(&self, id: NodeId) -> Option<usize> {
        self.siblings_of(id).iter().position(|c| c.node.id == id)
    }

    /// Every node below `id` (not including `id`), depth-first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut stack: Vec<NodeId> = self.children(id).rev().map(|c| c.node.id).collect();
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).rev().map(|c| c.node.id));
        }
        out
    }

    /// Depth-first visit order with depths, the same order the outline
    /// renders in. Nodes reachable twice (malformed data) appear once.
    pub fn walk_order(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.roots().rev().map(|c| (c.node.id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            out.push((id, depth));
            stack.extend(self.children(id).rev().map(|c| (c.node.id, depth + 1)));
        }
        out
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn child_slots(&self, key: ParentKey) -> &[usize] {
        self.children.get(&key).map_or(&[], |v| v.as_slice())
    }

    fn child_at(&self, idx: usize) -> Child<'_> {
        let edge = &self.edges[idx];
        Child {
            node: &self.nodes[&edge.child_node_id],
            edge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{EdgeId, ProjectId};
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> Node {
        Node::new(NodeId::intern(id), ProjectId::intern("p"), id)
    }

    fn edge(id: &str, parent: Option<&str>, child: &str, order: i64) -> Edge {
        Edge::new(
            EdgeId::intern(id),
            ProjectId::intern("p"),
            parent.map(NodeId::intern),
            NodeId::intern(child),
            order,
        )
    }

    fn ids<'a>(children: impl Iterator<Item = Child<'a>>) -> Vec<&'a str> {
        children.map(|c| c.node.id.as_str()).collect()
    }

    #[test]
    fn children_sorted_by_order_index() {
        let tree = TreeIndex::build(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![
                edge("e1", None, "a", 0),
                edge("e2", Some("a"), "b", 5),
                edge("e3", Some("a"), "c", 1),
                edge("e4", Some("a"), "d", 3),
            ],
        );
        assert_eq!(ids(tree.children(NodeId::intern("a"))), vec!["c", "d", "b"]);
        assert_eq!(ids(tree.roots()), vec!["a"]);
    }

    #[test]
    fn ties_keep_snapshot_order() {
        let tree = TreeIndex::build(
            vec![node("x"), node("y"), node("z")],
            vec![
                edge("e1", None, "y", 1),
                edge("e2", None, "x", 1),
                edge("e3", None, "z", 0),
            ],
        );
        assert_eq!(ids(tree.roots()), vec!["z", "y", "x"]);
    }

    #[test]
    fn edges_to_missing_children_are_skipped() {
        let tree = TreeIndex::build(
            vec![node("a")],
            vec![edge("e1", None, "a", 0), edge("e2", Some("a"), "ghost", 0)],
        );
        assert_eq!(tree.child_count(NodeId::intern("a")), 0);
        assert!(tree.edge_of(NodeId::intern("ghost")).is_none());
        assert_eq!(tree.edges().len(), 1);
    }

    #[test]
    fn multiple_roots_form_a_forest() {
        let tree = TreeIndex::build(
            vec![node("r1"), node("r2")],
            vec![edge("e1", None, "r2", 1), edge("e2", None, "r1", 0)],
        );
        assert_eq!(ids(tree.roots()), vec!["r1", "r2"]);
        assert!(!tree.is_empty());
    }

    #[test]
    fn empty_snapshot_is_empty() {
        let tree = TreeIndex::build(Vec::new(), Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.roots().len(), 0);
    }

    #[test]
    fn duplicate_node_ids_last_write_wins() {
        let mut second = node("dup");
        second.content = "second".into();
        let tree = TreeIndex::build(vec![node("dup"), second], vec![edge("e", None, "dup", 0)]);
        assert_eq!(tree.node(NodeId::intern("dup")).unwrap().content, "second");
    }

    #[test]
    fn position_and_parent_lookup() {
        let tree = TreeIndex::build(
            vec![node("a"), node("b"), node("c")],
            vec![
                edge("e1", None, "a", 0),
                edge("e2", Some("a"), "b", 0),
                edge("e3", Some("a"), "c", 1),
            ],
        );
        let c = NodeId::intern("c");
        assert_eq!(tree.parent_of(c), Some(ParentKey::Node(NodeId::intern("a"))));
        assert_eq!(tree.position_among_siblings(c), Some(1));
        assert_eq!(tree.parent_of(NodeId::intern("a")), Some(ParentKey::Root));
        assert_eq!(ids(tree.siblings_of(c).into_iter()), vec!["b", "c"]);
    }

    #[test]
    fn descendants_and_walk_order() {
        let tree = TreeIndex::build(
            vec![node("a"), node("b"), node("c"), node("d"), node("e")],
            vec![
                edge("e1", None, "a", 0),
                edge("e2", Some("a"), "b", 0),
                edge("e3", Some("b"), "c", 0),
                edge("e4", Some("a"), "d", 1),
                edge("e5", None, "e", 1),
            ],
        );
        let below: Vec<&str> = tree
            .descendants(NodeId::intern("a"))
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(below, vec!["b", "c", "d"]);

        let walk: Vec<(&str, usize)> = tree
            .walk_order()
            .into_iter()
            .map(|(id, depth)| (id.as_str(), depth))
            .collect();
        assert_eq!(
            walk,
            vec![("a", 0), ("b", 1), ("c", 2), ("d", 1), ("e", 0)]
        );
    }

    #[test]
    fn cyclic_edges_do_not_hang_walks() {
        let tree = TreeIndex::build(
            vec![node("r"), node("x"), node("y")],
            vec![
                edge("e1", None, "r", 0),
                edge("e2", Some("r"), "x", 0),
                edge("e3", Some("x"), "y", 0),
                edge("e4", Some("y"), "x", 0),
            ],
        );
        assert_eq!(tree.walk_order().len(), 3);
        assert_eq!(tree.descendants(NodeId::intern("x")), vec![NodeId::intern("y")]);
    }
}
