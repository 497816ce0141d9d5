//! Hit testing: point → node lookup.

use crate::layout::RowBox;
use fnt_core::NodeId;
use kurbo::{Point, Rect};

/// Find the card under `point`. `None` means the empty canvas.
pub fn hit_test(boxes: &[RowBox], point: Point) -> Option<NodeId> {
    // Later rows are drawn on top.
    boxes
        .iter()
        .rev()
        .find(|b| b.card.contains(point))
        .map(|b| b.node_id)
}

/// Every node whose card overlaps `area`, in row order.
pub fn hit_test_rect(boxes: &[RowBox], area: Rect) -> Vec<NodeId> {
    boxes
        .iter()
        .filter(|b| b.card.overlaps(area))
        .map(|b| b.node_id)
        .collect()
}
