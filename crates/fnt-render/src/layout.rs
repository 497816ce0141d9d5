//! Outline rows → card rectangles and connector segments.
//!
//! Two arrangements are supported:
//!
//! - **Indented**: one row per line, shifted right by `indent` per depth.
//!   Connectors run down a gutter column left of each card and elbow into it.
//! - **Branching**: depth grows to the right. A parent sits level with its
//!   first child, and a vertical spine joins the children of one parent.
//!
//! All geometry is in canvas units with the origin at the top-left.

use crate::outline::{Outline, OutlineRow, Placement};
use fnt_core::NodeId;
use kurbo::{Line, Point, Rect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Indented,
    Branching,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Horizontal step per depth level, also the connector gutter width.
    pub indent: f64,
    pub row_height: f64,
    pub row_gap: f64,
    pub card_width: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            indent: 24.0,
            row_height: 40.0,
            row_gap: 8.0,
            card_width: 200.0,
        }
    }
}

impl Metrics {
    fn pitch(&self) -> f64 {
        self.row_height + self.row_gap
    }
}

/// Geometry for one outline row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBox {
    pub node_id: NodeId,
    pub card: Rect,
    pub connectors: SmallVec<[Line; 4]>,
}

pub fn layout_outline(outline: &Outline, mode: LayoutMode, metrics: &Metrics) -> Vec<RowBox> {
    match mode {
        LayoutMode::Indented => indented(outline, metrics),
        LayoutMode::Branching => branching(outline, metrics),
    }
}

/// Smallest rectangle holding every card, or `Rect::ZERO` for no rows.
pub fn extent(boxes: &[RowBox]) -> Rect {
    boxes
        .iter()
        .map(|b| b.card)
        .reduce(|acc, r| acc.union(r))
        .unwrap_or(Rect::ZERO)
}

fn indented(outline: &Outline, m: &Metrics) -> Vec<RowBox> {
    let gutter_center = |level: usize| level as f64 * m.indent + m.indent / 2.0;

    outline
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let top = i as f64 * m.pitch();
            let bottom = top + m.row_height;
            let mid = top + m.row_height / 2.0;
            let x0 = (row.depth + 1) as f64 * m.indent;
            let card = Rect::new(x0, top, x0 + m.card_width, bottom);

            let mut connectors = SmallVec::new();
            if !row.is_root {
                // Ancestor lines passing through this row.
                for (k, _) in row.rails.iter().enumerate().filter(|(_, on)| **on) {
                    let x = gutter_center(k + 1);
                    connectors.push(vertical(x, top - m.row_gap, bottom));
                }
                let x = gutter_center(row.depth);
                connectors.push(vertical(x, top - m.row_gap, mid));
                if row.placement.continues() {
                    connectors.push(vertical(x, mid, bottom));
                }
                connectors.push(Line::new((x, mid), (x0, mid)));
            }
            log::trace!("indented {} at {card:?}", row.node_id);
            RowBox {
                node_id: row.node_id,
                card,
                connectors,
            }
        })
        .collect()
}

fn branching(outline: &Outline, m: &Metrics) -> Vec<RowBox> {
    let column = m.card_width + 2.0 * m.indent;
    // Mid-line y of the latest row seen at each depth.
    let mut last_mid: Vec<f64> = Vec::new();
    let mut slot = 0usize;
    let mut boxes = Vec::with_capacity(outline.len());

    for row in &outline.rows {
        let top = slot as f64 * m.pitch();
        let mid = top + m.row_height / 2.0;
        let x0 = row.depth as f64 * column;
        let card = Rect::new(x0, top, x0 + m.card_width, top + m.row_height);

        let mut connectors = SmallVec::new();
        if row.has_children {
            connectors.push(Line::new((card.x1, mid), (card.x1 + m.indent, mid)));
        }
        if !row.is_root {
            let spine = x0 - m.indent;
            let above = match row.placement {
                Placement::First | Placement::Only => parent_mid(&last_mid, row),
                Placement::Middle | Placement::Last => last_mid.get(row.depth).copied(),
            };
            if let Some(from) = above.filter(|y| *y < mid) {
                connectors.push(vertical(spine, from, mid));
            }
            connectors.push(Line::new((spine, mid), (x0, mid)));
        }

        last_mid.truncate(row.depth);
        last_mid.push(mid);
        if !row.has_children {
            slot += 1;
        }
        log::trace!("branching {} at {card:?}", row.node_id);
        boxes.push(RowBox {
            node_id: row.node_id,
            card,
            connectors,
        });
    }
    boxes
}

fn parent_mid(last_mid: &[f64], row: &OutlineRow) -> Option<f64> {
    row.depth.checked_sub(1).and_then(|d| last_mid.get(d).copied())
}

fn vertical(x: f64, y0: f64, y1: f64) -> Line {
    Line::new(Point::new(x, y0), Point::new(x, y1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{RenderOptions, render_outline};
    use fnt_core::{Edge, EdgeId, Node, ProjectId, Selection, TreeIndex};

    /// r ─┬─ a ─── a1
    ///    └─ b
    fn outline() -> Outline {
        let p = ProjectId::intern("layout");
        let n = |id: &str| Node::new(NodeId::intern(id), p, id);
        let e = |child: &str, parent: Option<&str>, order| {
            Edge::new(
                EdgeId::intern(&format!("le_{child}")),
                p,
                parent.map(NodeId::intern),
                NodeId::intern(child),
                order,
            )
        };
        let tree = TreeIndex::build(
            vec![n("lr"), n("la"), n("la1"), n("lb")],
            vec![
                e("lr", None, 0),
                e("la", Some("lr"), 0),
                e("la1", Some("la"), 0),
                e("lb", Some("lr"), 1),
            ],
        );
        render_outline(&tree, &Selection::new(), &RenderOptions::default())
    }

    #[test]
    fn indented_steps_right_per_depth() {
        let m = Metrics::default();
        let boxes = layout_outline(&outline(), LayoutMode::Indented, &m);
        let xs: Vec<f64> = boxes.iter().map(|b| b.card.x0).collect();
        assert_eq!(xs, vec![24.0, 48.0, 72.0, 48.0]);
        assert_eq!(boxes[1].card.y0, 48.0);
        assert!(boxes[0].connectors.is_empty());
    }

    #[test]
    fn indented_connectors_follow_placement() {
        let boxes = layout_outline(&outline(), LayoutMode::Indented, &Metrics::default());
        // `la` is first of two: upper half, lower half, elbow.
        assert_eq!(boxes[1].connectors.len(), 3);
        // `la1` is an only child with `la`'s rail running past it.
        assert_eq!(boxes[2].connectors.len(), 3);
        assert_eq!(boxes[2].connectors[0].p0.x, 36.0);
        // `lb` is last: upper half and elbow only.
        assert_eq!(boxes[3].connectors.len(), 2);
        assert_eq!(boxes[3].connectors[1], Line::new((36.0, 164.0), (48.0, 164.0)));
    }

    #[test]
    fn branching_puts_parent_level_with_first_child() {
        let m = Metrics::default();
        let boxes = layout_outline(&outline(), LayoutMode::Branching, &m);
        let tops: Vec<f64> = boxes.iter().map(|b| b.card.y0).collect();
        assert_eq!(tops, vec![0.0, 0.0, 0.0, 48.0]);
        let xs: Vec<f64> = boxes.iter().map(|b| b.card.x0).collect();
        assert_eq!(xs, vec![0.0, 248.0, 496.0, 248.0]);
    }

    #[test]
    fn branching_spine_joins_siblings() {
        let boxes = layout_outline(&outline(), LayoutMode::Branching, &Metrics::default());
        let lb = &boxes[3];
        assert_eq!(
            lb.connectors.as_slice(),
            &[
                Line::new((224.0, 20.0), (224.0, 68.0)),
                Line::new((224.0, 68.0), (248.0, 68.0)),
            ]
        );
        // Root stub out to the spine.
        assert_eq!(boxes[0].connectors[0], Line::new((200.0, 20.0), (224.0, 20.0)));
    }

    #[test]
    fn extent_covers_all_cards() {
        let boxes = layout_outline(&outline(), LayoutMode::Indented, &Metrics::default());
        assert_eq!(extent(&boxes), Rect::new(24.0, 0.0, 272.0, 184.0));
        assert_eq!(extent(&[]), Rect::ZERO);
    }
}
