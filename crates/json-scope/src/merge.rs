//! Field-scoped merge of a patch into an origin document.
//!
//! Include mode applies only the selected fields of the patch; exclude mode
//! applies everything except them. Conflicting changes outside the scope are
//! reported as [`Warning`]s and the origin value is kept. Fields that exist
//! only in the patch are always added (unless excluded).

use json_scope_path::{
    expand_recursive_paths, format_concrete_path, is_path_match, is_path_prefix_match,
    parse_path, ConcretePath, FieldPath, PathComponent, PathStep,
};
use json_scope_util::{deep_equal, is_container};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::diagnostics::{Diagnostics, Warning};
use crate::select::{descend, Position};

/// A merged document and the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merged {
    pub doc: Value,
    pub warnings: Vec<Warning>,
}

/// Merge `patch` into `origin`.
///
/// With `exclude == false` only `paths` are taken from the patch, otherwise
/// everything but `paths`. If either side is not an object or array, `origin`
/// is returned unchanged.
pub fn merge_fields_super<S: AsRef<str>>(
    origin: &Value,
    patch: &Value,
    paths: &[S],
    exclude: bool,
) -> Merged {
    if !is_container(origin) || !is_container(patch) {
        return Merged {
            doc: origin.clone(),
            warnings: Vec::new(),
        };
    }
    let parsed: Vec<FieldPath> = paths.iter().map(|path| parse_path(path.as_ref())).collect();
    if exclude {
        merge_fields_excluding(origin, patch, &parsed)
    } else {
        merge_fields_deep(origin, patch, &parsed)
    }
}

/// Include-mode merge over parsed paths.
///
/// `**` patterns are expanded against `origin` first. A position is selected
/// when it lies on the way to a path's terminus; at and beneath a terminus the
/// patch wins outright (containers of the same kind are merged, anything else
/// is replaced).
pub fn merge_fields_deep(origin: &Value, patch: &Value, paths: &[FieldPath]) -> Merged {
    let expanded = expand_recursive_paths(origin, paths);
    let steps: Vec<&[PathStep]> = expanded.iter().map(|path| path.steps.as_slice()).collect();
    log::debug!("merge (include) over {} path(s)", steps.len());

    let mut diagnostics = Diagnostics::new();
    let mut current = Vec::new();
    let doc = IncludeMerge {
        diagnostics: &mut diagnostics,
    }
    .merge(origin, Some(patch), &steps, &mut current);

    Merged {
        doc,
        warnings: diagnostics.into_warnings(),
    }
}

/// Exclude-mode merge over parsed paths.
///
/// Patterns are evaluated lazily at every position, so `**` also applies to
/// fields that only exist in the patch.
pub fn merge_fields_excluding(origin: &Value, patch: &Value, paths: &[FieldPath]) -> Merged {
    log::debug!("merge (exclude) over {} path(s)", paths.len());

    let mut diagnostics = Diagnostics::new();
    let mut current = Vec::new();
    let doc = ExcludeMerge {
        patterns: paths,
        diagnostics: &mut diagnostics,
    }
    .merge(origin, Some(patch), &mut current);

    Merged {
        doc,
        warnings: diagnostics.into_warnings(),
    }
}

/// Overlay `patch` onto `origin`: same-kind containers merge recursively,
/// anything else is replaced by the patch.
fn overlay(origin: &Value, patch: &Value) -> Value {
    match (origin, patch) {
        (Value::Object(base), Value::Object(top)) => {
            let mut out = Map::new();
            for (key, value) in base {
                let merged = match top.get(key) {
                    Some(patched) => overlay(value, patched),
                    None => value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            for (key, value) in top {
                if !base.contains_key(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
            Value::Object(out)
        }
        (Value::Array(base), Value::Array(top)) => {
            let mut out: Vec<Value> = base
                .iter()
                .enumerate()
                .map(|(i, value)| match top.get(i) {
                    Some(patched) => overlay(value, patched),
                    None => value.clone(),
                })
                .collect();
            out.extend(top.iter().skip(base.len()).cloned());
            Value::Array(out)
        }
        _ => patch.clone(),
    }
}

fn differs(origin: &Value, patch: Option<&Value>) -> bool {
    patch.is_some_and(|patch| !deep_equal(origin, patch))
}

struct IncludeMerge<'d> {
    diagnostics: &'d mut Diagnostics,
}

impl IncludeMerge<'_> {
    /// Walks one container level. Only the root is entered with no tails, so
    /// that keys new in the patch are still added.
    fn merge(
        &mut self,
        origin: &Value,
        patch: Option<&Value>,
        tails: &[&[PathStep]],
        current: &mut ConcretePath,
    ) -> Value {
        if tails.iter().any(|tail| tail.is_empty()) {
            return match patch {
                Some(patch) => overlay(origin, patch),
                None => origin.clone(),
            };
        }

        match origin {
            Value::Object(map) => {
                let patch_map = patch.and_then(Value::as_object);
                let mut out = Map::new();
                for (key, value) in map {
                    let patched = patch_map.and_then(|p| p.get(key));
                    let child_tails = descend(tails, Position::Key(key));
                    current.push(PathComponent::Key(key.clone()));
                    let merged = self.merge_child(value, patched, &child_tails, current);
                    current.pop();
                    out.insert(key.clone(), merged);
                }
                if let Some(patch_map) = patch_map {
                    for (key, value) in patch_map {
                        if !map.contains_key(key) {
                            out.insert(key.clone(), value.clone());
                        }
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                let patch_items = patch.and_then(Value::as_array);
                let mut out = Vec::with_capacity(items.len());
                for (i, value) in items.iter().enumerate() {
                    let patched = patch_items.and_then(|p| p.get(i));
                    let child_tails = descend(tails, Position::Index(i));
                    current.push(PathComponent::Index(i));
                    out.push(self.merge_child(value, patched, &child_tails, current));
                    current.pop();
                }
                if let Some(patch_items) = patch_items {
                    out.extend(patch_items.iter().skip(items.len()).cloned());
                }
                Value::Array(out)
            }
            // a path continues below a scalar: the scalar itself is selected
            _ => patch.cloned().unwrap_or_else(|| origin.clone()),
        }
    }

    fn merge_child(
        &mut self,
        origin: &Value,
        patch: Option<&Value>,
        tails: &[&[PathStep]],
        current: &mut ConcretePath,
    ) -> Value {
        if tails.is_empty() {
            self.keep_origin(origin, patch, current);
            return origin.clone();
        }
        self.merge(origin, patch, tails, current)
    }

    fn keep_origin(&mut self, origin: &Value, patch: Option<&Value>, current: &ConcretePath) {
        if differs(origin, patch) {
            self.diagnostics.warn(Warning::NotIncludedButModified {
                path: format_concrete_path(current),
            });
        }
    }
}

struct ExcludeMerge<'a, 'd> {
    patterns: &'a [FieldPath],
    diagnostics: &'d mut Diagnostics,
}

impl ExcludeMerge<'_, '_> {
    fn is_excluded(&self, current: &[PathComponent]) -> bool {
        self.patterns
            .iter()
            .any(|pattern| is_path_match(current, &pattern.steps))
    }

    fn leads_to_exclusion(&self, current: &[PathComponent]) -> bool {
        self.patterns
            .iter()
            .any(|pattern| is_path_prefix_match(current, &pattern.steps))
    }

    fn merge(
        &mut self,
        origin: &Value,
        patch: Option<&Value>,
        current: &mut ConcretePath,
    ) -> Value {
        if self.is_excluded(current) {
            if differs(origin, patch) {
                self.diagnostics.warn(Warning::ExcludedButModified {
                    path: format_concrete_path(current),
                });
            }
            return origin.clone();
        }

        match origin {
            Value::Object(map) => {
                let patch_map = patch.and_then(Value::as_object);
                let mut out = Map::new();
                for (key, value) in map {
                    let patched = patch_map.and_then(|p| p.get(key));
                    current.push(PathComponent::Key(key.clone()));
                    let merged = self.merge_child(value, patched, current);
                    current.pop();
                    out.insert(key.clone(), merged);
                }
                if let Some(patch_map) = patch_map {
                    for (key, value) in patch_map {
                        if map.contains_key(key) {
                            continue;
                        }
                        current.push(PathComponent::Key(key.clone()));
                        if let Some(added) = self.strip_excluded(value, current) {
                            out.insert(key.clone(), added);
                        }
                        current.pop();
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                let patch_items = patch.and_then(Value::as_array);
                let mut out = Vec::with_capacity(items.len());
                for (i, value) in items.iter().enumerate() {
                    let patched = patch_items.and_then(|p| p.get(i));
                    current.push(PathComponent::Index(i));
                    out.push(self.merge_child(value, patched, current));
                    current.pop();
                }
                if let Some(patch_items) = patch_items {
                    for (i, value) in patch_items.iter().enumerate().skip(items.len()) {
                        current.push(PathComponent::Index(i));
                        if let Some(added) = self.strip_excluded(value, current) {
                            out.push(added);
                        }
                        current.pop();
                    }
                }
                Value::Array(out)
            }
            _ => patch.cloned().unwrap_or_else(|| origin.clone()),
        }
    }

    fn merge_child(
        &mut self,
        origin: &Value,
        patch: Option<&Value>,
        current: &mut ConcretePath,
    ) -> Value {
        if self.leads_to_exclusion(current) {
            return self.merge(origin, patch, current);
        }
        patch.cloned().unwrap_or_else(|| origin.clone())
    }

    /// Copy of a patch-only value with every excluded position removed;
    /// `None` when the value itself is excluded.
    fn strip_excluded(&self, value: &Value, current: &mut ConcretePath) -> Option<Value> {
        if !self.leads_to_exclusion(current) {
            return Some(value.clone());
        }
        if self.is_excluded(current) {
            return None;
        }
        let stripped = match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, child) in map {
                    current.push(PathComponent::Key(key.clone()));
                    if let Some(kept) = self.strip_excluded(child, current) {
                        out.insert(key.clone(), kept);
                    }
                    current.pop();
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, child) in items.iter().enumerate() {
                    current.push(PathComponent::Index(i));
                    if let Some(kept) = self.strip_excluded(child, current) {
                        out.push(kept);
                    }
                    current.pop();
                }
                Value::Array(out)
            }
            scalar => scalar.clone(),
        };
        Some(stripped)
    }
}
