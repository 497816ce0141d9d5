//! Input abstraction layer.
//!
//! Normalizes keyboard, pointer, and focus events from the host UI into a
//! unified `InputEvent` enum consumed by the interaction state machine.

use fnt_core::NodeId;

/// Modifier key state for a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// The `KeyboardEvent.key` value (e.g. `"Enter"`, `"Tab"`, `"ArrowUp"`).
    pub key: String,
    pub modifiers: Modifiers,
    /// An input method composition is in progress (multi-keystroke scripts).
    pub is_composing: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            is_composing: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn composing(mut self) -> Self {
        self.is_composing = true;
        self
    }
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Node(NodeId),
    /// Empty canvas area.
    Canvas,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),

    /// The text field of the node in edit mode changed.
    TextChanged(String),

    Click(Target),
    DoubleClick(Target),
    /// Secondary click; on a node this asks for deletion.
    ContextMenu(Target),

    /// The text field lost focus.
    Blur,

    /// Answer to the delete confirmation prompt.
    ConfirmDelete,
    CancelDelete,
}

impl InputEvent {
    /// Shorthand for a plain key press.
    pub fn key(key: &str) -> Self {
        Self::Key(KeyInput::new(key))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::TextChanged(text.into())
    }

    pub fn click(id: NodeId) -> Self {
        Self::Click(Target::Node(id))
    }

    pub fn double_click(id: NodeId) -> Self {
        Self::DoubleClick(Target::Node(id))
    }

    pub fn context_menu(id: NodeId) -> Self {
        Self::ContextMenu(Target::Node(id))
    }

    /// The node a pointer event targets, if any.
    pub fn target_node(&self) -> Option<NodeId> {
        match self {
            Self::Click(Target::Node(id))
            | Self::DoubleClick(Target::Node(id))
            | Self::ContextMenu(Target::Node(id)) => Some(*id),
            _ => None,
        }
    }
}
