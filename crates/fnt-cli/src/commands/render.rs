//! `fnt render` and `fnt hit`.

use crate::config::CliConfig;
use anyhow::{Result, bail};
use fnt_core::{NodeId, Selection, TreeIndex};
use fnt_render::{Outline, hit_test, layout_outline, render_outline, to_text};
use kurbo::Point;
use std::path::Path;

pub fn run(path: &Path, select: Option<&str>, geometry: bool, config: &CliConfig) -> Result<()> {
    let tree = TreeIndex::from_snapshot(&super::load_snapshot(path)?);
    let mut selection = Selection::new();
    if let Some(id) = select {
        let id = NodeId::intern(id);
        if !tree.contains(id) {
            bail!("node `{id}` is not in {}", path.display());
        }
        selection.select(id);
    }

    let outline = render_outline(&tree, &selection, &config.render);
    if geometry {
        print!("{}", geometry_report(&outline, config));
    } else {
        print!("{}", to_text(&outline));
    }
    Ok(())
}

pub fn run_hit(path: &Path, x: f64, y: f64, config: &CliConfig) -> Result<()> {
    let tree = TreeIndex::from_snapshot(&super::load_snapshot(path)?);
    let outline = render_outline(&tree, &Selection::new(), &config.render);
    let boxes = layout_outline(&outline, config.layout, &config.metrics);
    match hit_test(&boxes, Point::new(x, y)) {
        Some(id) => println!("{id}"),
        None => println!("canvas"),
    }
    Ok(())
}

fn geometry_report(outline: &Outline, config: &CliConfig) -> String {
    let boxes = layout_outline(outline, config.layout, &config.metrics);
    let mut out = String::new();
    for b in &boxes {
        let r = b.card;
        out.push_str(&format!(
            "{} {} {} {} {} connectors={}\n",
            b.node_id,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            b.connectors.len()
        ));
    }
    out
}
