pub mod hit;
pub mod layout;
pub mod outline;
pub mod text;

pub use hit::{hit_test, hit_test_rect};
pub use layout::{LayoutMode, Metrics, RowBox, extent, layout_outline};
pub use outline::{Outline, OutlineRow, Placement, RenderOptions, render_outline};
pub use text::to_text;
