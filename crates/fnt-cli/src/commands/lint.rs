//! `fnt lint`: list data-integrity issues in a snapshot.

use anyhow::{Result, bail};
use fnt_core::{LintDiagnostic, LintSeverity, lint_snapshot};
use std::path::Path;

pub fn run(path: &Path, strict: bool) -> Result<()> {
    let snapshot = super::load_snapshot(path)?;
    let diagnostics = lint_snapshot(&snapshot);
    for diagnostic in &diagnostics {
        println!("{}", format_diagnostic(diagnostic));
    }

    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == LintSeverity::Warning)
        .count();
    if diagnostics.is_empty() {
        println!("{}: no issues", path.display());
    }
    if strict && warnings > 0 {
        bail!("{warnings} warning(s) in {}", path.display());
    }
    Ok(())
}

fn format_diagnostic(d: &LintDiagnostic) -> String {
    let level = match d.severity {
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "info",
    };
    format!("{level}[{}] {}: {}", d.rule, d.node_id, d.message)
}
