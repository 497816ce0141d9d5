pub mod lint;
pub mod render;
pub mod replay;

use anyhow::{Context, Result};
use fnt_core::TreeSnapshot;
use std::path::Path;

pub fn load_snapshot(path: &Path) -> Result<TreeSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing snapshot {}", path.display()))
}
