//! `fnt replay`: drive the editor with a script against an in-memory backend.

use crate::config::CliConfig;
use crate::script::{self, Step};
use anyhow::{Context, Result};
use fnt_editor::{Backend, Controller, MemoryBackend};
use fnt_render::{render_outline, to_text};
use std::path::Path;

pub async fn run(
    snapshot_path: &Path,
    script_path: &Path,
    out: Option<&Path>,
    config: &CliConfig,
) -> Result<()> {
    let snapshot = super::load_snapshot(snapshot_path)?;
    let text = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let steps = script::parse(&text)?;

    let project = snapshot.project.id;
    let mut controller = Controller::new(
        MemoryBackend::from_snapshot(snapshot),
        project,
        config.editor.clone(),
    );
    controller.load().await?;
    replay(&mut controller, steps).await;

    let interaction = controller.interaction();
    let mut outline = render_outline(interaction.tree(), &interaction.selection(), &config.render);
    if let Some(session) = interaction.session() {
        outline = outline.with_draft(session.node_id(), session.draft());
    }
    print!("{}", to_text(&outline));

    let mutations = controller.backend().mutations().len();
    println!("-- {mutations} mutation(s)");

    if let Some(out) = out {
        let final_snapshot = controller.backend().fetch_tree(project).await?;
        let json = serde_json::to_string_pretty(&final_snapshot)?;
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    }
    Ok(())
}

/// Failed steps are reported and skipped, like a user dismissing the error
/// notice and carrying on.
async fn replay(controller: &mut Controller<MemoryBackend>, steps: Vec<Step>) {
    for (i, step) in steps.into_iter().enumerate() {
        let result = match step {
            Step::Event(event) => controller.dispatch(event).await,
            Step::Relate {
                node_id,
                relation,
                label,
            } => controller.update_relation(node_id, relation, label).await,
        };
        if let Err(err) = result {
            eprintln!("step {}: {err}", i + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnt_core::{NodeId, TreeSnapshot};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn demo_session_replays() {
        let snapshot: TreeSnapshot =
            serde_json::from_str(include_str!("../../demos/launch_plan.json")).unwrap();
        let steps = script::parse(include_str!("../../demos/session.txt")).unwrap();
        let project = snapshot.project.id;
        let mut controller = Controller::new(
            MemoryBackend::from_snapshot(snapshot),
            project,
            Default::default(),
        );
        controller.load().await.unwrap();
        replay(&mut controller, steps).await;

        let outline = render_outline(
            controller.interaction().tree(),
            &controller.interaction().selection(),
            &Default::default(),
        );
        let text = to_text(&outline);
        assert_eq!(
            text,
            "\
Launch the public beta
├─ (how) Send 50 invites
└─ (Why does this matter?) Early users keep asking  [selected]
Write the announcement
"
        );
        assert!(!controller.interaction().tree().contains(NodeId::intern("aside")));
    }
}
