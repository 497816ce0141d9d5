use fnt_core::MAX_CONTENT_CHARS;
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// Which pointer gesture opens a node's text field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTrigger {
    #[default]
    DoubleClick,
    Click,
}

/// What to do with a changed draft that is empty or whitespace-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Empty is a valid node state and is committed like any other text.
    #[default]
    AllowEmpty,
    /// Blank drafts are discarded and the last committed text comes back.
    RevertBlank,
}

/// Configuration for the interaction state machine.
///
/// Defaults keep "create, then leave empty" working: double-click to edit,
/// empty content commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub edit_trigger: EditTrigger,
    pub commit_policy: CommitPolicy,
    /// Drafts are truncated to this many characters as they are typed.
    pub max_content_chars: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            edit_trigger: EditTrigger::DoubleClick,
            commit_policy: CommitPolicy::AllowEmpty,
            max_content_chars: MAX_CONTENT_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "edit_trigger": "click" }"#).unwrap();
        assert_eq!(config.edit_trigger, EditTrigger::Click);
        assert_eq!(config.commit_policy, CommitPolicy::AllowEmpty);
        assert_eq!(config.max_content_chars, 200);
    }
}
