//! Pattern expansion against a concrete document.

use crate::matcher::{is_path_match, is_path_prefix_match};
use crate::types::{ConcretePath, FieldPath, PathComponent, PathStep};
use serde_json::Value;

/// Collect every concrete path of `doc` matched by `pattern`.
///
/// The walk is depth-first in document order and tests the root (`[]`) as
/// well. Subtrees that no descendant of the current position could match are
/// skipped.
pub fn collect_matching_paths(doc: &Value, pattern: &[PathStep]) -> Vec<ConcretePath> {
    let mut results = Vec::new();
    let mut current = Vec::new();
    collect_into(doc, pattern, &mut current, &mut results);
    results
}

fn collect_into(
    value: &Value,
    pattern: &[PathStep],
    current: &mut ConcretePath,
    results: &mut Vec<ConcretePath>,
) {
    if !is_path_prefix_match(current, pattern) {
        return;
    }
    if is_path_match(current, pattern) {
        results.push(current.clone());
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                current.push(PathComponent::Key(key.clone()));
                collect_into(child, pattern, current, results);
                current.pop();
            }
        }
        Value::Array(arr) => {
            for (idx, child) in arr.iter().enumerate() {
                current.push(PathComponent::Index(idx));
                collect_into(child, pattern, current, results);
                current.pop();
            }
        }
        _ => {}
    }
}

/// Replace every path containing `**` with the concrete paths it matches in
/// `doc`. Paths without `**` are kept verbatim, in front.
pub fn expand_recursive_paths(doc: &Value, paths: &[FieldPath]) -> Vec<FieldPath> {
    let (recursive, plain): (Vec<&FieldPath>, Vec<&FieldPath>) =
        paths.iter().partition(|path| path.has_recursive());

    let mut expanded: Vec<FieldPath> = plain.into_iter().cloned().collect();
    for pattern in recursive {
        expanded.extend(
            collect_matching_paths(doc, &pattern.steps)
                .into_iter()
                .map(FieldPath::from),
        );
    }
    expanded
}
