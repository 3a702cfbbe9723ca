//! json-scope - path-scoped operations on JSON documents.
//!
//! Built on the field path language of [`json_scope_path`]:
//!
//! - [`projection`]: keep or drop the fields named by a set of paths
//! - [`merge`]: merge only (or all but) the named fields of a patch
//! - [`diff`]: path-set and value-level differences between two documents
//! - [`readonly`]: byte ranges of read-only fields in JSON text, and change
//!   detection between two snapshots
//!
//! # Example
//!
//! ```
//! use json_scope::{merge_fields_super, pick_fields_super};
//! use serde_json::json;
//!
//! let doc = json!({"a": 1, "b": {"a": 2, "c": 3}});
//! assert_eq!(pick_fields_super(&doc, &["a", "b.a"], false), json!({"a": 1, "b": {"a": 2}}));
//!
//! let patch = json!({"a": 10, "b": {"a": 20, "c": 30}});
//! let merged = merge_fields_super(&doc, &patch, &["b.a"], false);
//! assert_eq!(merged.doc, json!({"a": 1, "b": {"a": 20, "c": 3}}));
//! assert_eq!(merged.warnings.len(), 2);
//! ```

pub mod cst;
pub mod diagnostics;
pub mod diff;
pub mod json_cli;
pub mod merge;
pub mod projection;
pub mod readonly;
mod select;

pub use cst::{Cst, CstError};
pub use diagnostics::{Diagnostics, Warning};
pub use diff::{
    collect_all_paths, diff_paths, diff_values, generate_json_from_path_diff,
    generate_value_diff_json, DiffSource, PathDiff, PathDiffKind, ValueDiff, ValueDiffJson,
    ValueDiffOptions, ValueDiffOutput,
};
pub use merge::{merge_fields_deep, merge_fields_excluding, merge_fields_super, Merged};
pub use projection::{pick_fields_super, project, ProjectMode};
pub use readonly::{
    find_readonly_field_ranges, is_readonly_value_changed, RangeKind, ReadonlyError,
    ReadonlyRange, ReadonlyRangeOptions, ReadonlyRanges,
};

pub use json_scope_path::{
    collect_matching_paths, get_value_by_path, is_path_match, is_path_prefix_match,
    is_path_under_wildcard_pattern, parse_path, FieldPath, PathComponent, PathStep,
};
pub use json_scope_util::{deep_clone, deep_equal as is_equal, is_plain_object};
