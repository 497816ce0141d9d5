//! Optional `--config` file.

use anyhow::{Context, Result};
use fnt_editor::EditorConfig;
use fnt_render::{LayoutMode, Metrics, RenderOptions};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub editor: EditorConfig,
    pub render: RenderOptions,
    pub layout: LayoutMode,
    pub metrics: Metrics,
}

pub fn load(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnt_editor::{CommitPolicy, EditTrigger};
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_config_fills_defaults() {
        let config: CliConfig = serde_json::from_str(
            r#"{
                "editor": { "edit_trigger": "click" },
                "layout": "branching",
                "metrics": { "indent": 32.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.editor.edit_trigger, EditTrigger::Click);
        assert_eq!(config.editor.commit_policy, CommitPolicy::AllowEmpty);
        assert_eq!(config.layout, LayoutMode::Branching);
        assert_eq!(config.metrics.indent, 32.0);
        assert_eq!(config.metrics.row_height, Metrics::default().row_height);
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load(None).unwrap(), CliConfig::default());
    }
}
