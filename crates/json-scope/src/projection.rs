//! Field projection: keep (pick) or drop (omit) the positions named by a set
//! of paths.
//!
//! `**` patterns are expanded once against the input, after which every walk
//! only has to look at the next step of each remaining path.

use json_scope_path::{expand_recursive_paths, parse_path, FieldPath, PathStep};
use json_scope_util::is_container;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::select::{descend, Position};

/// Whether [`project`] keeps or drops the addressed positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectMode {
    #[default]
    Pick,
    Omit,
}

/// Project `value` onto `paths`.
///
/// Scalars and `null` are returned unchanged. The result never shares
/// structure with the input.
pub fn project(value: &Value, paths: &[FieldPath], mode: ProjectMode) -> Value {
    if !is_container(value) {
        return value.clone();
    }

    let expanded = expand_recursive_paths(value, paths);
    let steps: Vec<&[PathStep]> = expanded.iter().map(|path| path.steps.as_slice()).collect();
    log::debug!("project {mode:?} over {} path(s)", steps.len());

    match mode {
        ProjectMode::Pick if steps.iter().any(|path| path.is_empty()) => value.clone(),
        ProjectMode::Pick => pick_children(value, &steps),
        // the root itself cannot be removed
        ProjectMode::Omit => omit_children(value, &steps),
    }
}

/// Parse `paths` and [`project`] with `exclude` selecting omit mode.
pub fn pick_fields_super<S: AsRef<str>>(value: &Value, paths: &[S], exclude: bool) -> Value {
    let parsed: Vec<FieldPath> = paths.iter().map(|path| parse_path(path.as_ref())).collect();
    let mode = if exclude {
        ProjectMode::Omit
    } else {
        ProjectMode::Pick
    };
    project(value, &parsed, mode)
}

/// Picks the children of a container; returns an empty container of the same
/// kind when nothing is selected.
fn pick_children(value: &Value, paths: &[&[PathStep]]) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let tails = descend(paths, Position::Key(key));
                if let Some(picked) = pick_position(child, &tails) {
                    out.insert(key.clone(), picked);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, child)| pick_position(child, &descend(paths, Position::Index(i))))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn pick_position(value: &Value, tails: &[&[PathStep]]) -> Option<Value> {
    if tails.is_empty() {
        return None;
    }
    let terminates = tails.iter().any(|tail| tail.is_empty());
    let continuing: Vec<&[PathStep]> = tails
        .iter()
        .copied()
        .filter(|tail| !tail.is_empty())
        .collect();

    if continuing.is_empty() {
        return Some(value.clone());
    }
    if is_container(value) {
        let narrowed = pick_children(value, &continuing);
        if !is_empty_container(&narrowed) {
            return Some(narrowed);
        }
    }
    terminates.then(|| value.clone())
}

fn omit_children(value: &Value, paths: &[&[PathStep]]) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let tails = descend(paths, Position::Key(key));
                if let Some(kept) = omit_position(child, &tails) {
                    out.insert(key.clone(), kept);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .filter_map(|(i, child)| omit_position(child, &descend(paths, Position::Index(i))))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn omit_position(value: &Value, tails: &[&[PathStep]]) -> Option<Value> {
    if tails.iter().any(|tail| tail.is_empty()) {
        return None;
    }
    if tails.is_empty() || !is_container(value) {
        return Some(value.clone());
    }
    Some(omit_children(value, tails))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pick(value: &Value, paths: &[&str]) -> Value {
        pick_fields_super(value, paths, false)
    }

    fn omit(value: &Value, paths: &[&str]) -> Value {
        pick_fields_super(value, paths, true)
    }

    #[test]
    fn test_pick_keys_and_nested() {
        let doc = json!({"a": 1, "b": {"a": 2, "c": 3}});
        assert_eq!(pick(&doc, &["a", "b.a"]), json!({"a": 1, "b": {"a": 2}}));
        assert_eq!(pick(&doc, &["b"]), json!({"b": {"a": 2, "c": 3}}));
        assert_eq!(pick(&doc, &["missing"]), json!({}));
        assert_eq!(pick(&doc, &[] as &[&str]), json!({}));
    }

    #[test]
    fn test_pick_recursive_wildcard() {
        let doc = json!({
            "a": 1,
            "b": {"a": 2, "c": 3},
            "c": [{"a": 3, "z": 0}, {"b": {"a": 4}}, {"q": 1}],
            "d": 5
        });
        assert_eq!(
            pick(&doc, &["**a"]),
            json!({"a": 1, "b": {"a": 2}, "c": [{"a": 3}, {"b": {"a": 4}}]})
        );
    }

    #[test]
    fn test_pick_arrays() {
        let doc = json!({"arr": [{"n": 1, "m": 2}, {"n": 3}, {"m": 4}]});
        assert_eq!(pick(&doc, &["arr[].n"]), json!({"arr": [{"n": 1}, {"n": 3}]}));
        assert_eq!(pick(&doc, &["arr[1]"]), json!({"arr": [{"n": 3}]}));
        assert_eq!(pick(&doc, &["arr.2.m"]), json!({"arr": [{"m": 4}]}));
        assert_eq!(pick(&doc, &["arr[9]"]), json!({}));
        assert_eq!(pick(&json!([1, 2, 3]), &["[0]", "[2]"]), json!([1, 3]));
    }

    #[test]
    fn test_pick_terminus_wins_over_empty_narrowing() {
        let doc = json!({"a": {"x": 1}});
        assert_eq!(pick(&doc, &["a", "a.y"]), json!({"a": {"x": 1}}));
        assert_eq!(pick(&doc, &["a", "a.x"]), json!({"a": {"x": 1}}));
        assert_eq!(pick(&doc, &["a.y"]), json!({}));
    }

    #[test]
    fn test_pick_root_path_keeps_everything() {
        let doc = json!({"a": 1, "b": [2]});
        assert_eq!(pick(&doc, &["**"]), doc);
        assert_eq!(pick(&doc, &[""]), doc);
    }

    #[test]
    fn test_non_container_input_is_returned() {
        assert_eq!(pick(&json!(5), &["a"]), json!(5));
        assert_eq!(omit(&json!(null), &["a"]), json!(null));
        assert_eq!(pick(&json!("s"), &["**"]), json!("s"));
    }

    #[test]
    fn test_omit_fields() {
        let doc = json!({"a": 1, "b": {"a": 2, "c": 3}, "d": [1, 2, 3]});
        assert_eq!(omit(&doc, &["b.a"]), json!({"a": 1, "b": {"c": 3}, "d": [1, 2, 3]}));
        assert_eq!(omit(&doc, &["a", "d[1]"]), json!({"b": {"a": 2, "c": 3}, "d": [1, 3]}));
        assert_eq!(omit(&doc, &["**a"]), json!({"b": {"c": 3}, "d": [1, 2, 3]}));
        assert_eq!(omit(&doc, &["d[]"]), json!({"a": 1, "b": {"a": 2, "c": 3}, "d": []}));
        assert_eq!(omit(&doc, &["nope.x"]), doc);
    }

    #[test]
    fn test_omit_root_path_is_ignored() {
        let doc = json!({"a": 1});
        assert_eq!(omit(&doc, &[""]), doc);
    }

    #[test]
    fn test_numeric_object_keys() {
        let doc = json!({"m": {"0": "zero", "1": "one"}});
        assert_eq!(pick(&doc, &["m.0"]), json!({"m": {"0": "zero"}}));
        assert_eq!(omit(&doc, &["m[1]"]), json!({"m": {"0": "zero"}}));
    }
}
