//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The same key
//! means different things depending on whether a node's text field is open:
//!
//! | Key | Editing | Viewing |
//! |-----|---------|---------|
//! | Enter | commit, add sibling | edit selection / first root |
//! | Shift+Enter | commit, leave edit | - |
//! | Tab | commit, add child | - |
//! | Escape | discard draft | deselect |
//! | F2 | - | edit selection |
//! | Delete / Backspace | - | delete selection (asks first) |
//! | ↑ / ↓ | - | move selection |
//! | Alt+↑ / Alt+↓ | - | move node among siblings |

use crate::input::KeyInput;

/// Whether a text field is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Editing ──
    CommitAndAddSibling,
    CommitAndExit,
    CommitAndAddChild,
    CancelEdit,

    // ── Viewing ──
    BeginEdit,
    RequestDelete,
    SelectPrevious,
    SelectNext,
    MoveUp,
    MoveDown,
    Deselect,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// Returns `None` while an IME composition is in progress, so a confirming
    /// Enter inside the composition never submits the node.
    pub fn resolve(input: &KeyInput, mode: Mode) -> Option<ShortcutAction> {
        if input.is_composing {
            return None;
        }
        let m = input.modifiers;
        let key = input.key.as_str();

        match mode {
            Mode::Editing => match key {
                "Enter" if m.shift => Some(ShortcutAction::CommitAndExit),
                "Enter" => Some(ShortcutAction::CommitAndAddSibling),
                "Tab" => Some(ShortcutAction::CommitAndAddChild),
                "Escape" => Some(ShortcutAction::CancelEdit),
                _ => None,
            },
            Mode::Viewing => {
                if m.ctrl || m.meta {
                    return None;
                }
                if m.alt {
                    return match key {
                        "ArrowUp" => Some(ShortcutAction::MoveUp),
                        "ArrowDown" => Some(ShortcutAction::MoveDown),
                        _ => None,
                    };
                }
                match key {
                    "Enter" if !m.shift => Some(ShortcutAction::BeginEdit),
                    "F2" => Some(ShortcutAction::BeginEdit),
                    "Delete" | "Backspace" => Some(ShortcutAction::RequestDelete),
                    "ArrowUp" => Some(ShortcutAction::SelectPrevious),
                    "ArrowDown" => Some(ShortcutAction::SelectNext),
                    "Escape" => Some(ShortcutAction::Deselect),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(input: KeyInput) -> Option<ShortcutAction> {
        ShortcutMap::resolve(&input, Mode::Editing)
    }

    fn viewing(input: KeyInput) -> Option<ShortcutAction> {
        ShortcutMap::resolve(&input, Mode::Viewing)
    }

    #[test]
    fn resolve_editing_keys() {
        assert_eq!(
            editing(KeyInput::new("Enter")),
            Some(ShortcutAction::CommitAndAddSibling)
        );
        assert_eq!(
            editing(KeyInput::new("Enter").with_shift()),
            Some(ShortcutAction::CommitAndExit)
        );
        assert_eq!(
            editing(KeyInput::new("Tab")),
            Some(ShortcutAction::CommitAndAddChild)
        );
        assert_eq!(
            editing(KeyInput::new("Escape")),
            Some(ShortcutAction::CancelEdit)
        );
    }

    #[test]
    fn composition_suppresses_everything() {
        assert_eq!(editing(KeyInput::new("Enter").composing()), None);
        assert_eq!(editing(KeyInput::new("Tab").composing()), None);
        assert_eq!(editing(KeyInput::new("Escape").composing()), None);
        assert_eq!(viewing(KeyInput::new("Delete").composing()), None);
    }

    #[test]
    fn typing_keys_pass_through_while_editing() {
        assert_eq!(editing(KeyInput::new("a")), None);
        assert_eq!(editing(KeyInput::new("Backspace")), None);
        assert_eq!(editing(KeyInput::new("ArrowUp")), None);
    }

    #[test]
    fn resolve_viewing_keys() {
        assert_eq!(viewing(KeyInput::new("Enter")), Some(ShortcutAction::BeginEdit));
        assert_eq!(viewing(KeyInput::new("F2")), Some(ShortcutAction::BeginEdit));
        assert_eq!(
            viewing(KeyInput::new("Backspace")),
            Some(ShortcutAction::RequestDelete)
        );
        assert_eq!(
            viewing(KeyInput::new("ArrowDown")),
            Some(ShortcutAction::SelectNext)
        );
        assert_eq!(viewing(KeyInput::new("Escape")), Some(ShortcutAction::Deselect));
        assert_eq!(viewing(KeyInput::new("Tab")), None);
    }

    #[test]
    fn alt_arrows_reorder() {
        assert_eq!(
            viewing(KeyInput::new("ArrowUp").with_alt()),
            Some(ShortcutAction::MoveUp)
        );
        assert_eq!(
            viewing(KeyInput::new("ArrowDown").with_alt()),
            Some(ShortcutAction::MoveDown)
        );
        assert_eq!(viewing(KeyInput::new("Enter").with_alt()), None);
    }

    #[test]
    fn shift_enter_does_nothing_while_viewing() {
        assert_eq!(viewing(KeyInput::new("Enter").with_shift()), None);
    }
}
