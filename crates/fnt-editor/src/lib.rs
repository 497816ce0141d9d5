pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod machine;
pub mod session;
pub mod shortcuts;

pub use backend::{Backend, BackendCall, BackendError, MemoryBackend};
pub use config::{CommitPolicy, EditTrigger, EditorConfig};
pub use controller::Controller;
pub use error::EditorError;
pub use input::{InputEvent, KeyInput, Modifiers, Target};
pub use machine::{Intent, Interaction};
pub use session::{CommitDecision, EditSession};
pub use shortcuts::{Mode, ShortcutAction, ShortcutMap};
