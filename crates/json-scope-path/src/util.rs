//! Path formatting and concrete path helpers.

use crate::types::{PathComponent, PathStep};
use serde_json::Value;

/// Render pattern steps back to path syntax.
///
/// Keys are joined with `.`, indices and `[]` are bracketed and `**` is
/// written directly in front of the step it applies to. Keys containing `.`,
/// `[` or `]` cannot be expressed in the grammar and are written as is.
pub fn format_path(steps: &[PathStep]) -> String {
    let mut out = String::new();
    let mut prev: Option<&PathStep> = None;
    for step in steps {
        match step {
            PathStep::Key(key) => {
                if prev.is_some() && prev != Some(&PathStep::Recursive) {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathStep::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            PathStep::AnyIndex => out.push_str("[]"),
            PathStep::Recursive => {
                if prev.is_some() {
                    out.push('.');
                }
                out.push_str("**");
            }
        }
        prev = Some(step);
    }
    out
}

/// Render a concrete path: `.` before keys (none before the first one) and
/// `[i]` for indices, e.g. `users[0].name`.
pub fn format_concrete_path(path: &[PathComponent]) -> String {
    let mut out = String::new();
    for (i, component) in path.iter().enumerate() {
        match component {
            PathComponent::Key(key) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathComponent::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// Parse a rendered concrete path such as `profile.skills[1]`.
///
/// Unlike the pattern parser, dotted numeric segments stay keys. Bracket
/// contents that are not a number are dropped.
pub fn parse_concrete_path(path: &str) -> Vec<PathComponent> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    parts.push(PathComponent::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    parts.push(PathComponent::Key(std::mem::take(&mut current)));
                }
                let index: String = chars.by_ref().take_while(|&c| c != ']').collect();
                if let Ok(index) = index.parse::<usize>() {
                    parts.push(PathComponent::Index(index));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        parts.push(PathComponent::Key(current));
    }
    parts
}

/// Look up a concrete path.
///
/// Numeric keys address array elements and indices address object keys with
/// the same digits, so a rendered path resolves however it was spelled.
pub fn get<'a>(doc: &'a Value, path: &[PathComponent]) -> Option<&'a Value> {
    let mut current = doc;
    for component in path {
        current = match (current, component) {
            (Value::Object(map), PathComponent::Key(key)) => map.get(key)?,
            (Value::Object(map), PathComponent::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(arr), PathComponent::Index(index)) => arr.get(*index)?,
            (Value::Array(arr), PathComponent::Key(key)) => arr.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Look up a rendered concrete path such as `users[0].name`.
pub fn get_value_by_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    get(doc, &parse_concrete_path(path))
}
