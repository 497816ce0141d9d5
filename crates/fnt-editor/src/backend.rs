//! Backend seam: snapshot fetch and the mutation calls.
//!
//! The editor never knows how requests travel or how tokens are obtained.
//! It only needs something that implements [`Backend`]. [`MemoryBackend`]
//! is an in-process implementation used by tests and the CLI.

use async_trait::async_trait;
use chrono::Utc;
use fnt_core::validate::{validate_content, validate_relation_label};
use fnt_core::{
    CreateNodeRequest, CreatedNode, Edge, EdgeId, Node, NodeId, Project, ProjectId,
    ReorderRequest, TreeSnapshot, UpdateEdgeRequest, UpdateNodeRequest,
};
use std::cell::RefCell;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },

    #[error("request rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Asynchronous tree storage.
///
/// Every call is a suspend point. Implementations are driven from a single
/// cooperative task, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait Backend {
    async fn fetch_tree(&self, project: ProjectId) -> Result<TreeSnapshot, BackendError>;

    /// Create a node together with its incoming edge.
    async fn create_node(
        &self,
        project: ProjectId,
        request: CreateNodeRequest,
    ) -> Result<CreatedNode, BackendError>;

    async fn update_node(
        &self,
        project: ProjectId,
        node: NodeId,
        request: UpdateNodeRequest,
    ) -> Result<(), BackendError>;

    async fn update_edge(
        &self,
        project: ProjectId,
        edge: EdgeId,
        request: UpdateEdgeRequest,
    ) -> Result<(), BackendError>;

    /// Delete `node` and its whole subtree.
    async fn delete_node(&self, project: ProjectId, node: NodeId) -> Result<(), BackendError>;

    async fn reorder(&self, project: ProjectId, request: ReorderRequest)
    -> Result<(), BackendError>;
}

// ─── In-memory backend ──────────────────────────────────────────────────────

/// One recorded call, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    FetchTree,
    CreateNode(CreateNodeRequest),
    UpdateNode { node_id: NodeId, content: String },
    UpdateEdge { edge_id: EdgeId, request: UpdateEdgeRequest },
    DeleteNode(NodeId),
    Reorder(ReorderRequest),
}

impl BackendCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, BackendCall::FetchTree)
    }
}

#[derive(Debug)]
struct MemoryState {
    project: Project,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    calls: Vec<BackendCall>,
    fail_next: Option<BackendError>,
    fail_create: Option<BackendError>,
}

/// A single-project backend kept in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RefCell<MemoryState>,
}

impl MemoryBackend {
    pub fn new(project: Project) -> Self {
        Self::from_snapshot(TreeSnapshot::empty(project))
    }

    pub fn from_snapshot(snapshot: TreeSnapshot) -> Self {
        Self {
            state: RefCell::new(MemoryState {
                project: snapshot.project,
                nodes: snapshot.nodes,
                edges: snapshot.edges,
                calls: Vec::new(),
                fail_next: None,
                fail_create: None,
            }),
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.state.borrow().project.id
    }

    /// Make the next call (of any kind) fail with `error`.
    pub fn fail_next(&self, error: BackendError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    /// Make the next `create_node` fail with `error`. Other calls go through.
    pub fn fail_next_create(&self, error: BackendError) {
        self.state.borrow_mut().fail_create = Some(error);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.borrow().calls.clone()
    }

    /// Recorded mutation calls, skipping fetches.
    pub fn mutations(&self) -> Vec<BackendCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// What `fetch_tree` would return, without recording a call.
    pub fn snapshot(&self) -> TreeSnapshot {
        self.state.borrow().live_snapshot()
    }

    /// Record `call`, then fail if a failure was armed or the project is wrong.
    fn begin(&self, project: ProjectId, call: BackendCall) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        log::debug!("memory backend: {call:?}");
        state.calls.push(call);
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        if project != state.project.id {
            return Err(BackendError::not_found("project", project));
        }
        Ok(())
    }
}

impl MemoryState {
    fn is_live(&self, id: NodeId) -> bool {
        self.nodes
            .iter()
            .any(|n| n.id == id && n.deleted_at.is_none())
    }

    fn live_snapshot(&self) -> TreeSnapshot {
        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| n.deleted_at.is_none())
            .cloned()
            .collect();
        let live: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        let edges = self
            .edges
            .iter()
            .filter(|e| {
                live.contains(&e.child_node_id)
                    && e.parent_node_id.is_none_or(|p| live.contains(&p))
            })
            .cloned()
            .collect();
        TreeSnapshot {
            project: self.project.clone(),
            nodes,
            edges,
        }
    }

    /// Minted ids may already be taken by a loaded snapshot.
    fn fresh_node_id(&self) -> NodeId {
        loop {
            let id = NodeId::with_prefix("node");
            if !self.nodes.iter().any(|n| n.id == id) {
                return id;
            }
        }
    }

    fn fresh_edge_id(&self) -> EdgeId {
        loop {
            let id = EdgeId::with_prefix("edge");
            if !self.edges.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }

    fn live_node_mut(&mut self, id: NodeId) -> Result<&mut Node, BackendError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id && n.deleted_at.is_none())
            .ok_or_else(|| BackendError::not_found("node", id))
    }

    /// `root` and everything below it.
    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        let mut out = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(
                self.edges
                    .iter()
                    .filter(|e| e.parent_node_id == Some(id))
                    .map(|e| e.child_node_id),
            );
        }
        out
    }
}

fn rejected(error: impl ToString) -> BackendError {
    BackendError::Rejected(error.to_string())
}

#[async_trait(?Send)]
impl Backend for MemoryBackend {
    async fn fetch_tree(&self, project: ProjectId) -> Result<TreeSnapshot, BackendError> {
        self.begin(project, BackendCall::FetchTree)?;
        Ok(self.snapshot())
    }

    async fn create_node(
        &self,
        project: ProjectId,
        request: CreateNodeRequest,
    ) -> Result<CreatedNode, BackendError> {
        self.begin(project, BackendCall::CreateNode(request.clone()))?;
        validate_content(&request.content).map_err(rejected)?;
        validate_relation_label(request.relation, request.relation_label.as_deref())
            .map_err(rejected)?;

        let mut state = self.state.borrow_mut();
        if let Some(error) = state.fail_create.take() {
            return Err(error);
        }
        if let Some(parent) = request.parent_node_id
            && !state.is_live(parent)
        {
            return Err(BackendError::not_found("node", parent));
        }

        let mut node = Node::new(state.fresh_node_id(), project, request.content);
        node.question = request.question.filter(|q| !q.trim().is_empty());

        let mut edge = Edge::new(
            state.fresh_edge_id(),
            project,
            request.parent_node_id,
            node.id,
            request.order_index,
        );
        edge.relation = request.relation;
        edge.relation_label = request.relation_label;

        state.nodes.push(node.clone());
        state.edges.push(edge.clone());
        Ok(CreatedNode { node, edge })
    }

    async fn update_node(
        &self,
        project: ProjectId,
        node: NodeId,
        request: UpdateNodeRequest,
    ) -> Result<(), BackendError> {
        self.begin(
            project,
            BackendCall::UpdateNode {
                node_id: node,
                content: request.content.clone(),
            },
        )?;
        validate_content(&request.content).map_err(rejected)?;

        let mut state = self.state.borrow_mut();
        let stored = state.live_node_mut(node)?;
        stored.content = request.content;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn update_edge(
        &self,
        project: ProjectId,
        edge: EdgeId,
        request: UpdateEdgeRequest,
    ) -> Result<(), BackendError> {
        self.begin(
            project,
            BackendCall::UpdateEdge {
                edge_id: edge,
                request: request.clone(),
            },
        )?;
        validate_relation_label(request.relation, request.relation_label.as_deref())
            .map_err(rejected)?;

        let mut state = self.state.borrow_mut();
        let stored = state
            .edges
            .iter_mut()
            .find(|e| e.id == edge)
            .ok_or_else(|| BackendError::not_found("edge", edge))?;
        stored.relation = request.relation;
        stored.relation_label = request.relation_label;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_node(&self, project: ProjectId, node: NodeId) -> Result<(), BackendError> {
        self.begin(project, BackendCall::DeleteNode(node))?;

        let mut state = self.state.borrow_mut();
        if !state.is_live(node) {
            return Err(BackendError::not_found("node", node));
        }
        let doomed: HashSet<NodeId> = state.subtree(node).into_iter().collect();
        let now = Utc::now();
        for stored in state.nodes.iter_mut().filter(|n| doomed.contains(&n.id)) {
            stored.deleted_at.get_or_insert(now);
        }
        Ok(())
    }

    async fn reorder(
        &self,
        project: ProjectId,
        request: ReorderRequest,
    ) -> Result<(), BackendError> {
        self.begin(project, BackendCall::Reorder(request.clone()))?;

        let mut state = self.state.borrow_mut();
        // Resolve every child before touching any edge: all or nothing.
        let slots = request
            .ordered_child_node_ids
            .iter()
            .map(|child| {
                state
                    .edges
                    .iter()
                    .position(|e| {
                        e.child_node_id == *child && e.parent_node_id == request.parent_node_id
                    })
                    .ok_or_else(|| {
                        BackendError::Rejected(format!(
                            "node `{child}` is not a child of the given parent"
                        ))
                    })
            })
            .collect::<Result<Vec<usize>, BackendError>>()?;
        for (position, slot) in slots.into_iter().enumerate() {
            state.edges[slot].order_index = position as i64;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnt_core::Relation;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(Project::new(ProjectId::intern("mem"), "Memory"))
    }

    fn create(parent: Option<NodeId>, order: i64, content: &str) -> CreateNodeRequest {
        CreateNodeRequest {
            content: content.into(),
            parent_node_id: parent,
            relation: Relation::Neutral,
            relation_label: None,
            order_index: order,
            question: None,
        }
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let b = backend();
        let project = b.project_id();
        let created = b.create_node(project, create(None, 0, "goal")).await.unwrap();
        assert_eq!(created.edge.child_node_id, created.node.id);
        assert_eq!(created.edge.parent_node_id, None);

        let snap = b.fetch_tree(project).await.unwrap();
        assert_eq!(snap.nodes.len(), 1);
        assert_eq!(snap.edges.len(), 1);
    }

    #[tokio::test]
    async fn create_under_missing_parent_fails() {
        let b = backend();
        let err = b
            .create_node(b.project_id(), create(Some(NodeId::intern("nope")), 0, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { kind: "node", .. }));
        assert!(b.snapshot().nodes.is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_to_subtree() {
        let b = backend();
        let p = b.project_id();
        let root = b.create_node(p, create(None, 0, "root")).await.unwrap().node.id;
        let child = b.create_node(p, create(Some(root), 0, "child")).await.unwrap().node.id;
        b.create_node(p, create(Some(child), 0, "grandchild")).await.unwrap();
        let other = b.create_node(p, create(None, 1, "other")).await.unwrap().node.id;

        b.delete_node(p, root).await.unwrap();
        let snap = b.snapshot();
        assert_eq!(snap.nodes.len(), 1);
        assert_eq!(snap.nodes[0].id, other);
        assert_eq!(snap.edges.len(), 1);
    }

    #[tokio::test]
    async fn armed_failure_fires_once() {
        let b = backend();
        b.fail_next(BackendError::Transport("offline".into()));
        assert!(b.fetch_tree(b.project_id()).await.is_err());
        assert!(b.fetch_tree(b.project_id()).await.is_ok());
    }

    #[tokio::test]
    async fn reorder_renumbers_siblings() {
        let b = backend();
        let p = b.project_id();
        let first = b.create_node(p, create(None, 0, "a")).await.unwrap().node.id;
        let second = b.create_node(p, create(None, 1, "b")).await.unwrap().node.id;
        b.reorder(
            p,
            ReorderRequest {
                parent_node_id: None,
                ordered_child_node_ids: vec![second, first],
            },
        )
        .await
        .unwrap();
        let snap = b.snapshot();
        let order_of = |id| {
            snap.edges
                .iter()
                .find(|e| e.child_node_id == id)
                .map(|e| e.order_index)
        };
        assert_eq!(order_of(second), Some(0));
        assert_eq!(order_of(first), Some(1));
    }

    #[tokio::test]
    async fn failed_reorder_changes_nothing() {
        let b = backend();
        let p = b.project_id();
        let first = b.create_node(p, create(None, 0, "a")).await.unwrap().node.id;
        let second = b.create_node(p, create(None, 1, "b")).await.unwrap().node.id;
        let err = b
            .reorder(
                p,
                ReorderRequest {
                    parent_node_id: None,
                    ordered_child_node_ids: vec![second, NodeId::intern("ghost"), first],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));

        let snap = b.snapshot();
        let order_of = |id| {
            snap.edges
                .iter()
                .find(|e| e.child_node_id == id)
                .map(|e| e.order_index)
        };
        assert_eq!(order_of(first), Some(0));
        assert_eq!(order_of(second), Some(1));
    }

    #[tokio::test]
    async fn minted_ids_skip_ones_already_loaded() {
        // Take up the next batch of generated ids, as a snapshot saved by an
        // earlier process would.
        let project = ProjectId::intern("mem");
        let next_node = NodeId::with_prefix("node").as_str()["node_".len()..]
            .parse::<u64>()
            .unwrap();
        let next_edge = EdgeId::with_prefix("edge").as_str()["edge_".len()..]
            .parse::<u64>()
            .unwrap();
        let mut snapshot = TreeSnapshot::empty(Project::new(project, "Memory"));
        for k in 1..=64 {
            let node_id = NodeId::intern(&format!("node_{}", next_node + k));
            snapshot.nodes.push(Node::new(node_id, project, "saved"));
            snapshot.edges.push(Edge::new(
                EdgeId::intern(&format!("edge_{}", next_edge + k)),
                project,
                None,
                node_id,
                k as i64,
            ));
        }
        let b = MemoryBackend::from_snapshot(snapshot);

        let created = b.create_node(project, create(None, 0, "new")).await.unwrap();
        let snap = b.snapshot();
        assert_eq!(snap.nodes.iter().filter(|n| n.id == created.node.id).count(), 1);
        assert_eq!(snap.edges.iter().filter(|e| e.id == created.edge.id).count(), 1);
        assert_eq!(snap.nodes.len(), 65);
    }

    #[tokio::test]
    async fn armed_create_failure_skips_other_calls() {
        let b = backend();
        let p = b.project_id();
        let root = b.create_node(p, create(None, 0, "root")).await.unwrap().node.id;
        b.fail_next_create(BackendError::Transport("offline".into()));
        b.update_node(p, root, UpdateNodeRequest { content: "edited".into() })
            .await
            .unwrap();
        assert!(b.create_node(p, create(None, 1, "later")).await.is_err());
        assert_eq!(b.snapshot().nodes.len(), 1);
    }

    #[tokio::test]
    async fn wrong_project_is_not_found() {
        let b = backend();
        let err = b.fetch_tree(ProjectId::intern("elsewhere")).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { kind: "project", .. }));
    }
}
