//! Interaction state machine.
//!
//! `Interaction::handle` turns one `InputEvent` into zero or more `Intent`s.
//! Transitions that need no backend (Escape, an unchanged blur, moving the
//! selection) are applied on the spot. Everything that needs a round-trip is
//! returned as an intent, and its effect on selection / edit focus is applied
//! by the controller only after the backend said yes:
//!
//! | Intent | Effect after success |
//! |--------|----------------------|
//! | `UpdateContent` | node leaves edit mode, unless `keep_open` |
//! | `Create` | new node is selected and opened |
//! | `Delete` | references into the subtree are dropped |
//! | `Focus` (no backend call) | applied once every earlier intent succeeded |
//!
//! Intents in one batch run in order and the batch stops at the first
//! failure, so a failed commit never moves focus.

use crate::config::{EditTrigger, EditorConfig};
use crate::error::EditorError;
use crate::input::{InputEvent, KeyInput, Target};
use crate::session::{CommitDecision, EditSession};
use crate::shortcuts::{Mode, ShortcutAction, ShortcutMap};
use fnt_core::validate::validate_relation_label;
use fnt_core::{
    CreateNodeRequest, EdgeId, NodeId, ParentKey, Relation, ReorderRequest, Selection,
    TreeIndex, UpdateEdgeRequest,
};

/// A step for the controller to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    UpdateContent {
        node_id: NodeId,
        content: String,
        /// Set when a create follows in the same batch: the field stays
        /// open until that create succeeds.
        keep_open: bool,
    },
    Create(CreateNodeRequest),
    UpdateEdge {
        edge_id: EdgeId,
        request: UpdateEdgeRequest,
    },
    Delete {
        node_id: NodeId,
        /// Descendants known when the delete was requested.
        subtree: Vec<NodeId>,
    },
    Reorder(ReorderRequest),
    /// Select `node_id`, and open it when `edit` is set. Needs no backend.
    Focus { node_id: NodeId, edit: bool },
}

pub struct Interaction {
    config: EditorConfig,
    tree: TreeIndex,
    selection: Selection,
    session: Option<EditSession>,
    /// Node waiting on the yes/no delete prompt.
    pending_delete: Option<NodeId>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Interaction {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            tree: TreeIndex::default(),
            selection: Selection::new(),
            session: None,
            pending_delete: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// The node the delete prompt is asking about.
    pub fn pending_delete(&self) -> Option<NodeId> {
        self.pending_delete
    }

    pub fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Editing
        } else {
            Mode::Viewing
        }
    }

    // ─── Snapshot refresh ───────────────────────────────────────────────

    /// Swap in a freshly built tree and drop every reference into nodes that
    /// no longer exist.
    pub fn replace_tree(&mut self, tree: TreeIndex) {
        self.tree = tree;
        self.selection.retain_existing(&self.tree);

        let server_content = self
            .session
            .as_ref()
            .map(|s| self.tree.node(s.node_id()).map(|n| n.content.clone()));
        match server_content {
            Some(Some(content)) if self.selection.editing().is_some() => {
                if let Some(session) = self.session.as_mut() {
                    session.sync_committed(&content);
                }
            }
            Some(_) => self.end_session(),
            None => {}
        }

        if self.pending_delete.is_some_and(|id| !self.tree.contains(id)) {
            self.pending_delete = None;
        }
    }

    // ─── Events ─────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: InputEvent) -> Vec<Intent> {
        if let Some(pending) = self.pending_delete {
            return match event {
                InputEvent::ConfirmDelete => {
                    self.pending_delete = None;
                    self.delete(pending)
                }
                InputEvent::CancelDelete => {
                    self.pending_delete = None;
                    Vec::new()
                }
                other => {
                    log::debug!("delete prompt open, ignoring {other:?}");
                    Vec::new()
                }
            };
        }

        match event {
            InputEvent::Key(input) => self.handle_key(&input),
            InputEvent::TextChanged(text) => {
                let max = self.config.max_content_chars;
                if let Some(session) = self.session.as_mut() {
                    session.set_draft(&text, max);
                }
                Vec::new()
            }
            InputEvent::Click(Target::Node(id)) => self.click_node(id),
            InputEvent::Click(Target::Canvas) => self.click_canvas(),
            InputEvent::DoubleClick(Target::Node(id)) => self.open(id),
            InputEvent::DoubleClick(Target::Canvas) => Vec::new(),
            InputEvent::ContextMenu(Target::Node(id)) => {
                self.request_delete(id);
                Vec::new()
            }
            InputEvent::ContextMenu(Target::Canvas) => Vec::new(),
            InputEvent::Blur => self.commit_current(),
            InputEvent::ConfirmDelete | InputEvent::CancelDelete => Vec::new(),
        }
    }

    fn handle_key(&mut self, input: &KeyInput) -> Vec<Intent> {
        let Some(action) = ShortcutMap::resolve(input, self.mode()) else {
            return Vec::new();
        };
        log::debug!("key {:?} → {action:?}", input.key);

        match action {
            ShortcutAction::CommitAndAddSibling => self.commit_and_add_sibling(),
            ShortcutAction::CommitAndAddChild => self.commit_and_add_child(),
            ShortcutAction::CommitAndExit => self.commit_current(),
            ShortcutAction::CancelEdit => {
                self.cancel_edit();
                Vec::new()
            }
            ShortcutAction::BeginEdit => {
                if self.tree.is_empty() {
                    vec![create_root()]
                } else if let Some(id) = self.selection.selected() {
                    self.open(id)
                } else {
                    Vec::new()
                }
            }
            ShortcutAction::RequestDelete => {
                if let Some(id) = self.selection.selected() {
                    self.request_delete(id);
                }
                Vec::new()
            }
            ShortcutAction::SelectPrevious => {
                self.step_selection(false);
                Vec::new()
            }
            ShortcutAction::SelectNext => {
                self.step_selection(true);
                Vec::new()
            }
            ShortcutAction::MoveUp => self.move_selected(false),
            ShortcutAction::MoveDown => self.move_selected(true),
            ShortcutAction::Deselect => {
                self.selection.deselect();
                Vec::new()
            }
        }
    }

    // ─── Editing transitions ────────────────────────────────────────────

    /// Leave the open text field: nothing to send when unchanged or
    /// reverted, otherwise an `UpdateContent` that closes the field on
    /// success.
    fn commit_current(&mut self) -> Vec<Intent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match session.decide(self.config.commit_policy) {
            CommitDecision::Unchanged => {
                self.end_session();
                Vec::new()
            }
            CommitDecision::Revert => {
                session.revert();
                self.end_session();
                Vec::new()
            }
            CommitDecision::Commit(content) => vec![Intent::UpdateContent {
                node_id: session.node_id(),
                content,
                keep_open: false,
            }],
        }
    }

    /// Commit ahead of a create. The field stays open until the create
    /// succeeds, so a failed create leaves the user where they were.
    fn commit_before_create(&mut self) -> Vec<Intent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match session.decide(self.config.commit_policy) {
            CommitDecision::Unchanged => Vec::new(),
            CommitDecision::Revert => {
                session.revert();
                Vec::new()
            }
            CommitDecision::Commit(content) => vec![Intent::UpdateContent {
                node_id: session.node_id(),
                content,
                keep_open: true,
            }],
        }
    }

    fn cancel_edit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.revert();
        }
        self.end_session();
    }

    fn commit_and_add_sibling(&mut self) -> Vec<Intent> {
        let Some(current) = self.editing_in_tree() else {
            return Vec::new();
        };
        let parent = self.tree.parent_of(current).unwrap_or(ParentKey::Root);
        let order_index = self.sibling_insert_index(current);
        let question = self
            .tree
            .node(current)
            .and_then(|n| n.question_hint())
            .map(str::to_string);

        let mut intents = self.commit_before_create();
        intents.push(Intent::Create(CreateNodeRequest {
            content: String::new(),
            parent_node_id: parent.node(),
            relation: Relation::Neutral,
            relation_label: None,
            order_index,
            question,
        }));
        intents
    }

    fn commit_and_add_child(&mut self) -> Vec<Intent> {
        let Some(current) = self.editing_in_tree() else {
            return Vec::new();
        };
        let order_index = self.child_insert_index(current);

        let mut intents = self.commit_before_create();
        intents.push(Intent::Create(CreateNodeRequest {
            content: String::new(),
            parent_node_id: Some(current),
            relation: Relation::Neutral,
            relation_label: None,
            order_index,
            question: None,
        }));
        intents
    }

    /// Where a sibling created after `id` goes: right behind it, or at the
    /// end when `id` cannot be found among its siblings.
    pub fn sibling_insert_index(&self, id: NodeId) -> i64 {
        match self.tree.position_among_siblings(id) {
            Some(pos) => pos as i64 + 1,
            None => {
                let parent = self.tree.parent_of(id).unwrap_or(ParentKey::Root);
                self.tree.child_count(parent) as i64
            }
        }
    }

    /// New children always go at the end.
    pub fn child_insert_index(&self, id: NodeId) -> i64 {
        self.tree.child_count(id) as i64
    }

    // ─── Pointer transitions ────────────────────────────────────────────

    fn click_node(&mut self, id: NodeId) -> Vec<Intent> {
        if self.selection.is_editing(id) || !self.tree.contains(id) {
            return Vec::new();
        }
        let edit = self.config.edit_trigger == EditTrigger::Click;
        let mut intents = self.commit_current();
        self.focus_after(&mut intents, id, edit);
        intents
    }

    fn click_canvas(&mut self) -> Vec<Intent> {
        if self.tree.is_empty() {
            vec![create_root()]
        } else {
            Vec::new()
        }
    }

    /// Open `id` for editing, closing whatever field was open before.
    fn open(&mut self, id: NodeId) -> Vec<Intent> {
        if !self.tree.contains(id) {
            return Vec::new();
        }
        if self.selection.is_editing(id) {
            self.selection.select(id);
            return Vec::new();
        }
        let mut intents = self.commit_current();
        self.focus_after(&mut intents, id, true);
        intents
    }

    fn request_delete(&mut self, id: NodeId) {
        if self.tree.contains(id) {
            self.pending_delete = Some(id);
        }
    }

    fn delete(&self, id: NodeId) -> Vec<Intent> {
        if !self.tree.contains(id) {
            return Vec::new();
        }
        vec![Intent::Delete {
            node_id: id,
            subtree: self.tree.descendants(id),
        }]
    }

    // ─── Selection / ordering ───────────────────────────────────────────

    fn step_selection(&mut self, forward: bool) {
        let order = self.tree.walk_order();
        let Some(last) = order.len().checked_sub(1) else {
            return;
        };
        let current = self
            .selection
            .selected()
            .and_then(|s| order.iter().position(|(id, _)| *id == s));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1),
            (None, true) => 0,
            (None, false) => last,
        };
        self.selection.select(order[next].0);
    }

    /// Swap the selected node with its neighbour among its siblings.
    fn move_selected(&self, down: bool) -> Vec<Intent> {
        let Some(id) = self.selection.selected() else {
            return Vec::new();
        };
        let Some(parent) = self.tree.parent_of(id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self.tree.children(parent).map(|c| c.node.id).collect();
        let Some(pos) = ids.iter().position(|c| *c == id) else {
            return Vec::new();
        };
        let target = if down {
            Some(pos + 1).filter(|&t| t < ids.len())
        } else {
            pos.checked_sub(1)
        };
        let Some(target) = target else {
            return Vec::new();
        };
        ids.swap(pos, target);
        vec![Intent::Reorder(ReorderRequest {
            parent_node_id: parent.node(),
            ordered_child_node_ids: ids,
        })]
    }

    // ─── Edge updates ───────────────────────────────────────────────────

    /// Change the relation on the edge above `node_id`. `Ok(None)` when the
    /// edge already says exactly that.
    pub fn relate(
        &self,
        node_id: NodeId,
        relation: Relation,
        label: Option<String>,
    ) -> Result<Option<Intent>, EditorError> {
        let label = label.filter(|l| !l.is_empty());
        validate_relation_label(relation, label.as_deref())?;

        let edge = self.tree.edge_of(node_id).ok_or_else(|| {
            if self.tree.contains(node_id) {
                EditorError::NoEdge(node_id)
            } else {
                EditorError::UnknownNode(node_id)
            }
        })?;
        if edge.relation == relation && edge.relation_label == label {
            return Ok(None);
        }
        Ok(Some(Intent::UpdateEdge {
            edge_id: edge.id,
            request: UpdateEdgeRequest {
                relation,
                relation_label: label,
            },
        }))
    }

    // ─── Effects (applied by the controller after success) ──────────────

    pub fn on_committed(&mut self, node_id: NodeId, content: &str, keep_open: bool) {
        if let Some(session) = self.session.as_mut()
            && session.node_id() == node_id
        {
            session.mark_committed(content);
            log::debug!("committed {node_id}");
            if !keep_open {
                self.end_session();
            }
        }
    }

    pub fn on_created(&mut self, node_id: NodeId) {
        self.apply_focus(node_id, true);
    }

    pub fn on_deleted(&mut self, node_id: NodeId, subtree: &[NodeId]) {
        let doomed: Vec<NodeId> = std::iter::once(node_id)
            .chain(subtree.iter().copied())
            .collect();
        self.selection.forget(&doomed);
        if self
            .session
            .as_ref()
            .is_some_and(|s| doomed.contains(&s.node_id()))
        {
            self.session = None;
        }
        if self.pending_delete.is_some_and(|p| doomed.contains(&p)) {
            self.pending_delete = None;
        }
    }

    pub fn on_focus(&mut self, node_id: NodeId, edit: bool) {
        self.apply_focus(node_id, edit);
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn editing_in_tree(&self) -> Option<NodeId> {
        self.session
            .as_ref()
            .map(EditSession::node_id)
            .filter(|id| self.tree.contains(*id))
    }

    /// Focus now when nothing is waiting on the backend, otherwise queue it
    /// behind the pending intents.
    fn focus_after(&mut self, intents: &mut Vec<Intent>, node_id: NodeId, edit: bool) {
        if intents.is_empty() {
            self.apply_focus(node_id, edit);
        } else {
            intents.push(Intent::Focus { node_id, edit });
        }
    }

    fn apply_focus(&mut self, node_id: NodeId, edit: bool) {
        let Some(node) = self.tree.node(node_id) else {
            log::warn!("cannot focus {node_id}: not in the current tree");
            return;
        };
        self.selection.select(node_id);
        if edit {
            let session = EditSession::new(node_id, node.content.clone());
            self.selection.begin_edit(node_id);
            self.session = Some(session);
        }
    }

    fn end_session(&mut self) {
        self.session = None;
        self.selection.end_edit();
    }
}

fn create_root() -> Intent {
    Intent::Create(CreateNodeRequest {
        content: String::new(),
        parent_node_id: None,
        relation: Relation::Neutral,
        relation_label: None,
        order_index: 0,
        question: None,
    })
}
