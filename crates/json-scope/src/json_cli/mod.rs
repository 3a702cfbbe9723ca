//! Core logic of the command-line tools.
//!
//! - `json-pick`    : keep (or drop) fields of a document
//! - `json-merge`   : merge selected fields of a patch into a document
//! - `json-diff`    : compare two documents
//! - `json-readonly`: byte ranges of read-only fields in JSON text
//!
//! Every function takes JSON text and returns pretty-printed JSON text.

use serde_json::Value;

use crate::diff::{
    diff_paths, diff_values, generate_value_diff_json, ValueDiffOptions, ValueDiffOutput,
};
use crate::merge::merge_fields_super;
use crate::projection::pick_fields_super;
use crate::readonly::{find_readonly_field_ranges, ReadonlyError, ReadonlyRangeOptions};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Json(serde_json::Error),
    Readonly(ReadonlyError),
    UnknownMode(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Json(e) => write!(f, "{e}"),
            CliError::Readonly(e) => write!(f, "{e}"),
            CliError::UnknownMode(mode) => write!(f, "Unknown mode: {mode}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<ReadonlyError> for CliError {
    fn from(e: ReadonlyError) -> Self {
        CliError::Readonly(e)
    }
}

// ── json-pick ─────────────────────────────────────────────────────────────

/// Project a document onto `paths`; `exclude` drops them instead.
pub fn pick(doc_json: &str, paths: &[String], exclude: bool) -> Result<String, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    Ok(serde_json::to_string_pretty(&pick_fields_super(&doc, paths, exclude))?)
}

// ── json-merge ────────────────────────────────────────────────────────────

/// Merge `paths` of a patch into a document (all other fields when
/// `exclude`). Conflicts are logged and the original values kept.
pub fn merge(
    doc_json: &str,
    patch_json: &str,
    paths: &[String],
    exclude: bool,
) -> Result<String, CliError> {
    let doc: Value = serde_json::from_str(doc_json)?;
    let patch: Value = serde_json::from_str(patch_json)?;
    let merged = merge_fields_super(&doc, &patch, paths, exclude);
    Ok(serde_json::to_string_pretty(&merged.doc)?)
}

// ── json-diff ─────────────────────────────────────────────────────────────

/// Compare two documents.
///
/// Modes: `paths` (path-set diff), `values` (full value diff), `changed`
/// (changed path list) and `object` (B narrowed to the changed fields).
pub fn diff(a_json: &str, b_json: &str, mode: &str) -> Result<String, CliError> {
    let a: Value = serde_json::from_str(a_json)?;
    let b: Value = serde_json::from_str(b_json)?;
    let options = ValueDiffOptions::default();
    let out = match mode {
        "paths" => serde_json::to_value(diff_paths(&a, &b))?,
        "values" => serde_json::to_value(diff_values(&a, &b, &options))?,
        "changed" => serde_json::to_value(generate_value_diff_json(
            &a,
            &b,
            ValueDiffOutput::Paths,
            &options,
        ))?,
        "object" => serde_json::to_value(generate_value_diff_json(
            &a,
            &b,
            ValueDiffOutput::Object,
            &options,
        ))?,
        other => return Err(CliError::UnknownMode(other.to_string())),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

// ── json-readonly ─────────────────────────────────────────────────────────

/// Byte ranges of the read-only `paths` in `text`, as a JSON array.
pub fn readonly_ranges(
    text: &str,
    paths: &[String],
    options: &ReadonlyRangeOptions,
) -> Result<String, CliError> {
    let found = find_readonly_field_ranges(text, paths, options)?;
    Ok(serde_json::to_string_pretty(&found.ranges)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────
