//! Transient selection / edit-focus state.
//!
//! Two independent nullable ids, kept apart from the tree data so a
//! snapshot refresh never has to patch flags on nodes.

use crate::id::NodeId;
use crate::tree::TreeIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<NodeId>,
    editing: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn editing(&self) -> Option<NodeId> {
        self.editing
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_editing(&self, id: NodeId) -> bool {
        self.editing == Some(id)
    }

    pub fn select(&mut self, id: NodeId) {
        self.selected = Some(id);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Put `id` in edit mode. Any other node leaves edit mode; the previous
    /// editing node is returned when it differs.
    pub fn begin_edit(&mut self, id: NodeId) -> Option<NodeId> {
        let previous = self.editing.replace(id);
        previous.filter(|prev| *prev != id)
    }

    pub fn end_edit(&mut self) -> Option<NodeId> {
        self.editing.take()
    }

    /// Select and edit in one step, as done for freshly created nodes.
    pub fn focus(&mut self, id: NodeId) {
        self.selected = Some(id);
        self.editing = Some(id);
    }

    /// Drop every reference to any of `ids`.
    pub fn forget<'a>(&mut self, ids: impl IntoIterator<Item = &'a NodeId>) {
        for id in ids {
            if self.selected == Some(*id) {
                self.selected = None;
            }
            if self.editing == Some(*id) {
                self.editing = None;
            }
        }
    }

    /// Null out references to nodes that are no longer in `tree`.
    pub fn retain_existing(&mut self, tree: &TreeIndex) {
        if self.selected.is_some_and(|id| !tree.contains(id)) {
            log::debug!("selection {:?} no longer in tree", self.selected);
            self.selected = None;
        }
        if self.editing.is_some_and(|id| !tree.contains(id)) {
            log::debug!("edit focus {:?} no longer in tree", self.editing);
            self.editing = None;
        }
    }
}
