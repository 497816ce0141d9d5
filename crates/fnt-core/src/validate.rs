//! Input-boundary validation.
//!
//! Bounds are checked before an intent is issued, never as a backend
//! round-trip failure.

use crate::model::Relation;
use thiserror::Error;

/// Maximum node content length, in characters.
pub const MAX_CONTENT_CHARS: usize = 200;

/// Maximum custom relation label length, in characters.
pub const MAX_RELATION_LABEL_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("content is {len} characters, limit is {max}")]
    ContentTooLong { len: usize, max: usize },

    #[error("relation label is {len} characters, limit is {max}")]
    LabelTooLong { len: usize, max: usize },

    #[error("relation `{0}` does not take a label")]
    LabelOnBuiltinRelation(Relation),

    #[error("unknown relation `{0}`")]
    UnknownRelation(String),
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    validate_content_with_limit(content, MAX_CONTENT_CHARS)
}

pub fn validate_content_with_limit(content: &str, max: usize) -> Result<(), ValidationError> {
    let len = content.chars().count();
    if len > max {
        return Err(ValidationError::ContentTooLong { len, max });
    }
    Ok(())
}

/// Truncate to at most `max` characters, like a text field with `maxLength`.
pub fn clamp_content(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((byte_idx, _)) => content[..byte_idx].to_string(),
        None => content.to_string(),
    }
}

/// A label is only allowed on `Custom`. An empty label counts as no label.
pub fn validate_relation_label(
    relation: Relation,
    label: Option<&str>,
) -> Result<(), ValidationError> {
    let Some(label) = label.filter(|l| !l.is_empty()) else {
        return Ok(());
    };
    if relation != Relation::Custom {
        return Err(ValidationError::LabelOnBuiltinRelation(relation));
    }
    let len = label.chars().count();
    if len > MAX_RELATION_LABEL_CHARS {
        return Err(ValidationError::LabelTooLong {
            len,
            max: MAX_RELATION_LABEL_CHARS,
        });
    }
    Ok(())
}
