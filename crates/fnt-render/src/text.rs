//! Plain-text outline with box-drawing connectors.

use crate::outline::{Outline, OutlineRow};

const EMPTY_TREE: &str = "No nodes yet. Press Enter or click to add one.";

/// Render `outline` one row per line:
///
/// ```text
/// Launch the beta
/// ├─ (why) Early users keep asking
/// └─ (how) Send 50 invites  [selected]
/// ```
pub fn to_text(outline: &Outline) -> String {
    if outline.is_empty() {
        return format!("{EMPTY_TREE}\n");
    }
    let mut out = String::new();
    for row in &outline.rows {
        write_row(&mut out, outline, row);
    }
    out
}

fn write_row(out: &mut String, outline: &Outline, row: &OutlineRow) {
    if !row.is_root {
        for &rail in &row.rails {
            out.push_str(if rail { "│  " } else { "   " });
        }
        out.push_str(if row.placement.continues() { "├─ " } else { "└─ " });
    }
    if !row.label.is_empty() {
        out.push('(');
        out.push_str(&row.label);
        out.push_str(") ");
    }
    out.push_str(outline.display_content(row));
    if row.editing {
        out.push_str("  [editing]");
    } else if row.selected {
        out.push_str("  [selected]");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{RenderOptions, render_outline};
    use fnt_core::{Edge, EdgeId, Node, NodeId, ProjectId, Relation, Selection, TreeIndex};
    use pretty_assertions::assert_eq;

    fn tree() -> TreeIndex {
        let p = ProjectId::intern("text");
        let n = |id: &str, content: &str| Node::new(NodeId::intern(id), p, content);
        let e = |child: &str, parent: Option<&str>, order, relation| {
            let mut edge = Edge::new(
                EdgeId::intern(&format!("te_{child}")),
                p,
                parent.map(NodeId::intern),
                NodeId::intern(child),
                order,
            );
            edge.relation = relation;
            edge
        };
        TreeIndex::build(
            vec![
                n("goal", "Launch the beta"),
                n("why", "Early users keep asking"),
                n("who", ""),
                n("how", "Send 50 invites"),
                n("other", "Rename the repo"),
            ],
            vec![
                e("goal", None, 0, Relation::Neutral),
                e("why", Some("goal"), 0, Relation::Why),
                e("who", Some("why"), 0, Relation::Concrete),
                e("how", Some("goal"), 1, Relation::How),
                e("other", None, 1, Relation::Neutral),
            ],
        )
    }

    #[test]
    fn draws_connectors_and_labels() {
        let mut selection = Selection::new();
        selection.select(NodeId::intern("how"));
        let outline = render_outline(&tree(), &selection, &RenderOptions::default());
        let expected = "\
Launch the beta
├─ (why) Early users keep asking
│  └─ (concrete) …
└─ (how) Send 50 invites  [selected]
Rename the repo
";
        assert_eq!(to_text(&outline), expected);
    }

    #[test]
    fn editing_row_shows_draft() {
        let mut selection = Selection::new();
        selection.focus(NodeId::intern("who"));
        let outline = render_outline(&tree(), &selection, &RenderOptions::default())
            .with_draft(NodeId::intern("who"), "Beta testers");
        assert!(to_text(&outline).contains("│  └─ (concrete) Beta testers  [editing]\n"));
    }

    #[test]
    fn empty_tree_prompts_for_first_node() {
        let outline = render_outline(
            &TreeIndex::default(),
            &Selection::new(),
            &RenderOptions::default(),
        );
        assert_eq!(to_text(&outline), format!("{EMPTY_TREE}\n"));
    }
}
