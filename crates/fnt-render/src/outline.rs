//! Tree + selection → flat list of outline rows.
//!
//! The walk is depth-first with children in `order_index` order, and is
//! redone from scratch on every change. Each row carries what a front end
//! needs to draw it: label, content, selection state, and the connector
//! shape (its placement among siblings plus which ancestor rails continue
//! past it).

use fnt_core::{EdgeId, NodeId, ParentKey, Selection, TreeIndex};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

/// Position of a row among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Middle,
    Last,
    Only,
}

impl Placement {
    fn of(index: usize, len: usize) -> Self {
        match (index, len) {
            (_, 1) => Placement::Only,
            (0, _) => Placement::First,
            (i, n) if i + 1 == n => Placement::Last,
            _ => Placement::Middle,
        }
    }

    /// A later sibling follows, so the vertical line keeps going below.
    pub fn continues(self) -> bool {
        matches!(self, Placement::First | Placement::Middle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rows deeper than this are not emitted.
    pub max_depth: usize,
    /// Shown in place of empty content.
    pub placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            placeholder: "…".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub node_id: NodeId,
    pub edge_id: EdgeId,
    pub depth: usize,
    /// Question hint, else the edge's relation label. May be empty.
    pub label: String,
    pub content: String,
    pub is_placeholder: bool,
    pub selected: bool,
    pub editing: bool,
    pub placement: Placement,
    pub is_root: bool,
    /// One flag per ancestor level between the roots and this row's own
    /// connector: set when that ancestor has a later sibling, so its line
    /// passes through this row.
    pub rails: SmallVec<[bool; 8]>,
    pub has_children: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub rows: Vec<OutlineRow>,
    pub placeholder: String,
}

impl Outline {
    /// No root rows: the canvas shows the "add first node" affordance.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, id: NodeId) -> Option<&OutlineRow> {
        self.rows.iter().find(|r| r.node_id == id)
    }

    /// Show the in-progress draft on the row being edited.
    pub fn with_draft(mut self, node_id: NodeId, draft: &str) -> Self {
        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.node_id == node_id && r.editing)
        {
            row.content = draft.to_string();
            row.is_placeholder = draft.is_empty();
        }
        self
    }

    /// Text for a row's content box.
    pub fn display_content<'a>(&'a self, row: &'a OutlineRow) -> &'a str {
        if row.is_placeholder {
            &self.placeholder
        } else {
            &row.content
        }
    }
}

pub fn render_outline(tree: &TreeIndex, selection: &Selection, options: &RenderOptions) -> Outline {
    let mut walk = Walk {
        tree,
        selection,
        options,
        visited: HashSet::new(),
        rows: Vec::with_capacity(tree.node_count()),
    };
    walk.children(ParentKey::Root, 0, &mut SmallVec::new());
    Outline {
        rows: walk.rows,
        placeholder: options.placeholder.clone(),
    }
}

struct Walk<'a> {
    tree: &'a TreeIndex,
    selection: &'a Selection,
    options: &'a RenderOptions,
    visited: HashSet<NodeId>,
    rows: Vec<OutlineRow>,
}

impl Walk<'_> {
    fn children(&mut self, parent: ParentKey, depth: usize, rails: &mut SmallVec<[bool; 8]>) {
        let tree = self.tree;
        let count = tree.child_count(parent);
        for (index, child) in tree.children(parent).enumerate() {
            let id = child.node.id;
            if !self.visited.insert(id) {
                log::warn!("{id} reached twice while rendering, skipping");
                continue;
            }
            let placement = Placement::of(index, count);
            let content = child.node.content.clone();
            let label = child
                .node
                .question_hint()
                .unwrap_or_else(|| child.edge.display_label())
                .to_string();
            log::trace!("row {id} depth {depth} {placement:?}");

            let row_index = self.rows.len();
            self.rows.push(OutlineRow {
                node_id: id,
                edge_id: child.edge.id,
                depth,
                label,
                is_placeholder: content.is_empty(),
                content,
                selected: self.selection.is_selected(id),
                editing: self.selection.is_editing(id),
                placement,
                is_root: depth == 0,
                rails: rails.clone(),
                has_children: false,
            });

            if tree.child_count(id) == 0 {
                continue;
            }
            if depth >= self.options.max_depth {
                log::warn!("{id} is deeper than {}, children not shown", self.options.max_depth);
                continue;
            }
            // Roots draw no connector, so they add no rail.
            let pushed = depth > 0;
            if pushed {
                rails.push(placement.continues());
            }
            self.children(ParentKey::Node(id), depth + 1, rails);
            if pushed {
                rails.pop();
            }
            self.rows[row_index].has_children = self.rows.len() > row_index + 1;
        }
    }
}
