//! The text buffer of the one node currently in edit mode.

use crate::config::CommitPolicy;
use fnt_core::NodeId;
use fnt_core::validate::clamp_content;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitDecision {
    /// Draft equals the committed text; no network call.
    Unchanged,
    /// Send this content to the backend.
    Commit(String),
    /// Throw the draft away and show the committed text again.
    Revert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    node_id: NodeId,
    /// Last content known to be stored on the backend.
    committed: String,
    draft: String,
}

impl EditSession {
    pub fn new(node_id: NodeId, committed: impl Into<String>) -> Self {
        let committed = committed.into();
        Self {
            node_id,
            draft: committed.clone(),
            committed,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    pub fn set_draft(&mut self, text: &str, max_chars: usize) {
        self.draft = clamp_content(text, max_chars);
    }

    pub fn revert(&mut self) {
        self.draft.clone_from(&self.committed);
    }

    pub fn decide(&self, policy: CommitPolicy) -> CommitDecision {
        if !self.is_dirty() {
            return CommitDecision::Unchanged;
        }
        match policy {
            CommitPolicy::RevertBlank if self.draft.trim().is_empty() => CommitDecision::Revert,
            _ => CommitDecision::Commit(self.draft.clone()),
        }
    }

    /// The backend accepted `content`.
    pub fn mark_committed(&mut self, content: &str) {
        self.committed = content.to_string();
    }

    /// A fresh snapshot carries `content` for this node. An untouched draft
    /// follows it; a draft the user is typing into is left alone.
    pub fn sync_committed(&mut self, content: &str) {
        if self.committed == content {
            return;
        }
        if !self.is_dirty() {
            self.draft = content.to_string();
        }
        self.committed = content.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(committed: &str, draft: &str) -> EditSession {
        let mut s = EditSession::new(NodeId::intern("session"), committed);
        s.set_draft(draft, 200);
        s
    }

    #[test]
    fn unchanged_draft_is_not_committed() {
        assert_eq!(
            session("same", "same").decide(CommitPolicy::AllowEmpty),
            CommitDecision::Unchanged
        );
    }

    #[test]
    fn allow_empty_commits_blank_drafts() {
        assert_eq!(
            session("text", "").decide(CommitPolicy::AllowEmpty),
            CommitDecision::Commit(String::new())
        );
        assert_eq!(
            session("text", "  ").decide(CommitPolicy::AllowEmpty),
            CommitDecision::Commit("  ".into())
        );
    }

    #[test]
    fn revert_blank_discards_whitespace() {
        assert_eq!(
            session("text", "   ").decide(CommitPolicy::RevertBlank),
            CommitDecision::Revert
        );
        assert_eq!(
            session("text", "new").decide(CommitPolicy::RevertBlank),
            CommitDecision::Commit("new".into())
        );
    }

    #[test]
    fn draft_is_clamped() {
        let mut s = EditSession::new(NodeId::intern("session"), "");
        s.set_draft(&"x".repeat(250), 200);
        assert_eq!(s.draft().chars().count(), 200);
    }

    #[test]
    fn sync_follows_server_only_when_untouched() {
        let mut clean = session("old", "old");
        clean.sync_committed("server");
        assert_eq!(clean.draft(), "server");

        let mut typing = session("old", "mine");
        typing.sync_committed("server");
        assert_eq!(typing.draft(), "mine");
        assert_eq!(typing.committed(), "server");
    }
}
