//! Replay scripts: one input event per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! dblclick goal
//! type Launch the beta
//! key Enter
//! key Shift+Enter
//! click reason
//! context reason
//! confirm
//! relate invites custom by way of
//! ```

use anyhow::{Context, Result, anyhow, bail};
use fnt_core::{NodeId, Relation};
use fnt_editor::{InputEvent, KeyInput, Target};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Event(InputEvent),
    Relate {
        node_id: NodeId,
        relation: Relation,
        label: Option<String>,
    },
}

pub fn parse(text: &str) -> Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| parse_line(line).with_context(|| format!("line {number}: `{line}`")))
        .collect()
}

fn parse_line(line: &str) -> Result<Step> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let event = match verb {
        "click" => InputEvent::click(node(rest)?),
        "dblclick" => InputEvent::double_click(node(rest)?),
        "context" => InputEvent::context_menu(node(rest)?),
        "canvas" => InputEvent::Click(Target::Canvas),
        "key" => InputEvent::Key(key(rest)?),
        // `type` with nothing after it clears the field.
        "type" => InputEvent::text(rest),
        "blur" => InputEvent::Blur,
        "confirm" => InputEvent::ConfirmDelete,
        "cancel" => InputEvent::CancelDelete,
        "relate" => return relate(rest),
        other => bail!("unknown command `{other}`"),
    };
    Ok(Step::Event(event))
}

fn node(arg: &str) -> Result<NodeId> {
    if arg.is_empty() || arg.contains(' ') {
        bail!("expected one node id");
    }
    Ok(NodeId::intern(arg))
}

/// `Enter`, `Shift+Enter`, `Alt+ArrowUp`, ...
fn key(arg: &str) -> Result<KeyInput> {
    let mut parts: Vec<&str> = arg.split('+').collect();
    let name = parts
        .pop()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("missing key name"))?;
    let mut input = KeyInput::new(name);
    for modifier in parts {
        match modifier.to_ascii_lowercase().as_str() {
            "shift" => input.modifiers.shift = true,
            "ctrl" => input.modifiers.ctrl = true,
            "alt" => input.modifiers.alt = true,
            "meta" | "cmd" => input.modifiers.meta = true,
            other => bail!("unknown modifier `{other}`"),
        }
    }
    Ok(input)
}

fn relate(rest: &str) -> Result<Step> {
    let mut words = rest.splitn(3, ' ');
    let node_id = node(words.next().unwrap_or_default())?;
    let relation: Relation = words
        .next()
        .ok_or_else(|| anyhow!("missing relation"))?
        .parse()?;
    let label = words.next().map(str::trim).filter(|l| !l.is_empty());
    Ok(Step::Relate {
        node_id,
        relation,
        label: label.map(str::to_string),
    })
}
