//! Path-set and value-level differences between two documents.
//!
//! Paths are rendered the way [`format_concrete_path`] prints them
//! (`profile.skills[1]`) and every returned list is sorted.

use std::collections::{BTreeSet, HashSet};

use json_scope_path::{format_concrete_path, get_value_by_path, PathComponent};
use json_scope_util::{deep_clone, deep_equal};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::merge::merge_fields_super;
use crate::projection::pick_fields_super;

/// Set algebra over the concrete paths of two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDiff {
    /// Paths present in both documents.
    pub intersection: Vec<String>,
    /// Paths only in A.
    pub difference_a: Vec<String>,
    /// Paths only in B.
    pub difference_b: Vec<String>,
    pub union: Vec<String>,
}

impl PathDiff {
    pub fn get(&self, kind: PathDiffKind) -> &[String] {
        match kind {
            PathDiffKind::Intersection => &self.intersection,
            PathDiffKind::DifferenceA => &self.difference_a,
            PathDiffKind::DifferenceB => &self.difference_b,
            PathDiffKind::Union => &self.union,
        }
    }
}

/// Selects one of the [`PathDiff`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathDiffKind {
    Intersection,
    DifferenceA,
    DifferenceB,
    Union,
}

/// Which document [`generate_json_from_path_diff`] takes values from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DiffSource {
    A,
    B,
    /// B merged over A.
    #[default]
    #[serde(rename = "both")]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueDiffOptions {
    pub include_added: bool,
    pub include_removed: bool,
    pub include_modified: bool,
}

impl Default for ValueDiffOptions {
    fn default() -> Self {
        Self {
            include_added: true,
            include_removed: true,
            include_modified: true,
        }
    }
}

/// Value-level difference of B against A.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDiff {
    /// Union of the enabled added/removed/modified lists.
    pub changed_paths: Vec<String>,
    /// B projected onto `changed_paths`, `{}` when nothing changed.
    pub changed_object: Value,
    pub added_paths: Vec<String>,
    pub removed_paths: Vec<String>,
    pub modified_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueDiffOutput {
    Paths,
    #[default]
    Object,
}

/// Result of [`generate_value_diff_json`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueDiffJson {
    Paths(Vec<String>),
    Object(Value),
}

/// Every concrete path below the root, in document order (parents before
/// children).
pub fn collect_all_paths(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    collect_into(value, &mut current, &mut out);
    out
}

fn collect_into(value: &Value, current: &mut Vec<PathComponent>, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                current.push(PathComponent::Key(key.clone()));
                out.push(format_concrete_path(current));
                collect_into(child, current, out);
                current.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                current.push(PathComponent::Index(i));
                out.push(format_concrete_path(current));
                collect_into(child, current, out);
                current.pop();
            }
        }
        _ => {}
    }
}

/// Compare the path sets of two documents.
pub fn diff_paths(a: &Value, b: &Value) -> PathDiff {
    let paths_a: BTreeSet<String> = collect_all_paths(a).into_iter().collect();
    let paths_b: BTreeSet<String> = collect_all_paths(b).into_iter().collect();

    PathDiff {
        intersection: paths_a.intersection(&paths_b).cloned().collect(),
        difference_a: paths_a.difference(&paths_b).cloned().collect(),
        difference_b: paths_b.difference(&paths_a).cloned().collect(),
        union: paths_a.union(&paths_b).cloned().collect(),
    }
}

/// Compare the values of two documents path by path.
///
/// A path is added when only B has it, removed when only A has it and
/// modified when both have it with structurally different values. A changed
/// container also reports its changed descendants.
///
/// Paths are looked up again by their rendered form, so a key containing
/// `.`, `[` or `]` cannot be resolved on either side: a value changed below
/// such a key is only reported through its nearest expressible ancestor.
pub fn diff_values(a: &Value, b: &Value, options: &ValueDiffOptions) -> ValueDiff {
    let paths_a: BTreeSet<String> = collect_all_paths(a).into_iter().collect();
    let paths_b: BTreeSet<String> = collect_all_paths(b).into_iter().collect();

    let added_paths: Vec<String> = if options.include_added {
        paths_b.difference(&paths_a).cloned().collect()
    } else {
        Vec::new()
    };
    let removed_paths: Vec<String> = if options.include_removed {
        paths_a.difference(&paths_b).cloned().collect()
    } else {
        Vec::new()
    };
    let modified_paths: Vec<String> = if options.include_modified {
        paths_a
            .intersection(&paths_b)
            .filter(|path| {
                match (get_value_by_path(a, path), get_value_by_path(b, path)) {
                    (Some(x), Some(y)) => !deep_equal(x, y),
                    (x, y) => x.is_some() != y.is_some(),
                }
            })
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let mut changed_paths: Vec<String> = added_paths
        .iter()
        .chain(&removed_paths)
        .chain(&modified_paths)
        .cloned()
        .collect();
    changed_paths.sort();

    let changed_object = if changed_paths.is_empty() {
        Value::Object(Map::new())
    } else {
        pick_fields_super(b, &changed_paths, false)
    };

    ValueDiff {
        changed_paths,
        changed_object,
        added_paths,
        removed_paths,
        modified_paths,
    }
}

/// Materialize one of the [`diff_paths`] sets as a document.
///
/// With [`DiffSource::Both`] the values come from B merged over A across every
/// path of either side. An empty path set yields `{}`.
pub fn generate_json_from_path_diff(
    a: &Value,
    b: &Value,
    kind: PathDiffKind,
    source: DiffSource,
) -> Value {
    let diff = diff_paths(a, b);
    let target = diff.get(kind);
    if target.is_empty() {
        return Value::Object(Map::new());
    }

    match source {
        DiffSource::A => pick_fields_super(a, target, false),
        DiffSource::B => pick_fields_super(b, target, false),
        DiffSource::Both => {
            let mut seen = HashSet::new();
            let all_paths: Vec<String> = collect_all_paths(a)
                .into_iter()
                .chain(collect_all_paths(b))
                .filter(|path| seen.insert(path.clone()))
                .collect();
            let merged = merge_fields_super(&deep_clone(a), b, &all_paths, false);
            pick_fields_super(&merged.doc, target, false)
        }
    }
}

/// [`diff_values`] reduced to either the changed path list or the changed
/// object.
pub fn generate_value_diff_json(
    a: &Value,
    b: &Value,
    output: ValueDiffOutput,
    options: &ValueDiffOptions,
) -> ValueDiffJson {
    let diff = diff_values(a, b, options);
    match output {
        ValueDiffOutput::Paths => ValueDiffJson::Paths(diff.changed_paths),
        ValueDiffOutput::Object => ValueDiffJson::Object(diff.changed_object),
    }
}
