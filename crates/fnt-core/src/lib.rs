pub mod id;
pub mod lint;
pub mod model;
pub mod selection;
pub mod tree;
pub mod validate;

pub use id::{EdgeId, NodeId, ParentKey, ProjectId};
pub use lint::{LintDiagnostic, LintSeverity, lint_snapshot};
pub use model::*;
pub use selection::Selection;
pub use tree::{Child, TreeIndex};
pub use validate::{MAX_CONTENT_CHARS, MAX_RELATION_LABEL_CHARS, ValidationError};
