//! Core data model for floating note trees.
//!
//! A tree snapshot is a flat list of `Node` content records plus a flat list
//! of `Edge` records. Nodes carry no parent or position of their own: every
//! structural fact (parent, relation, sibling order) lives on the single edge
//! that points at the node. Snapshots are owned by the backend; the client
//! only ever reads them and asks for mutations through the request shapes
//! defined at the bottom of this module.

use crate::id::{EdgeId, NodeId, ProjectId};
use crate::validate::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Project ─────────────────────────────────────────────────────────────

/// The goal a tree is anchored to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(id: ProjectId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: String::new(),
            title: title.into(),
            description: None,
            created_at: now,
            updated_at: now,
            archived_at: None,
        }
    }
}

// ─── Node ────────────────────────────────────────────────────────────────

/// A single editable text fragment. Pure content record, no structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub project_id: ProjectId,
    /// Free text, 0..=200 characters. Empty is a valid state.
    #[serde(default)]
    pub content: String,
    /// "What question led to this branch". Inherited by siblings split off
    /// with Enter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker, owned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Node {
    pub fn new(id: NodeId, project_id: ProjectId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            content: content.into(),
            question: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The question hint, if present and not blank.
    pub fn question_hint(&self) -> Option<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

// ─── Relation ────────────────────────────────────────────────────────────

/// Semantic label on a parent → child edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[default]
    Neutral,
    Why,
    Concrete,
    How,
    What,
    Custom,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Neutral,
        Relation::Why,
        Relation::Concrete,
        Relation::How,
        Relation::What,
        Relation::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Neutral => "neutral",
            Relation::Why => "why",
            Relation::Concrete => "concrete",
            Relation::How => "how",
            Relation::What => "what",
            Relation::Custom => "custom",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRelation(s.to_string()))
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────

/// "`child_node_id` is a child of `parent_node_id` under `relation`".
///
/// A node has at most one incoming edge, so the structure is a forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub project_id: ProjectId,
    /// `None` means the child sits at root level.
    #[serde(default)]
    pub parent_node_id: Option<NodeId>,
    pub child_node_id: NodeId,
    #[serde(default)]
    pub relation: Relation,
    /// Only meaningful when `relation` is `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
    /// Sibling order under the same parent. Not globally unique.
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        project_id: ProjectId,
        parent_node_id: Option<NodeId>,
        child_node_id: NodeId,
        order_index: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            parent_node_id,
            child_node_id,
            relation: Relation::Neutral,
            relation_label: None,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text shown next to the child: custom label, nothing for neutral,
    /// otherwise the relation name.
    pub fn display_label(&self) -> &str {
        match (self.relation, self.relation_label.as_deref()) {
            (Relation::Custom, Some(label)) if !label.is_empty() => label,
            (Relation::Neutral, _) => "",
            (relation, _) => relation.as_str(),
        }
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// Everything the backend returns for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub project: Project,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub edges: Vec<Edge>,
}

impl TreeSnapshot {
    pub fn empty(project: Project) -> Self {
        Self {
            project,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// Backends serialize an empty slice as `null`; treat it as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Requests ────────────────────────────────────────────────────────────

/// Create a node and its incoming edge in one atomic call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNodeRequest {
    pub content: String,
    pub parent_node_id: Option<NodeId>,
    #[serde(default)]
    pub relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
    pub order_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// What a successful create hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedNode {
    pub node: Node,
    pub edge: Edge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateNodeRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEdgeRequest {
    pub relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_label: Option<String>,
}

/// Replace the sibling order under one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub parent_node_id: Option<NodeId>,
    pub ordered_child_node_ids: Vec<NodeId>,
}
