//! Locating read-only fields inside JSON text.
//!
//! Paths are resolved against a [`Cst`] of the text, so ranges point at the
//! exact bytes of the original document, comments and formatting included.

use std::collections::HashSet;

use json_scope_path::{parse_path, PathStep};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cst::{Cst, CstError, NodeId, NodeKind};
use crate::diagnostics::{Diagnostics, Warning};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadonlyError {
    #[error("Invalid JSON text: {0}")]
    Parse(#[from] CstError),
    #[error("Previous JSON text is invalid: {0}")]
    Prev(CstError),
    #[error("Next JSON text is invalid: {0}")]
    Next(CstError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    /// A whole `"key": value` member.
    Property,
    Key,
    Value,
}

/// Half-open byte range `[start, end)` into the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReadonlyRange {
    #[serde(rename = "type")]
    pub kind: RangeKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadonlyRangeOptions {
    /// Extend member and element ranges over a following comma.
    pub include_comma: bool,
    /// Emit separate key and value ranges instead of one property range.
    pub split_key_value: bool,
}

impl Default for ReadonlyRangeOptions {
    fn default() -> Self {
        Self {
            include_comma: true,
            split_key_value: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadonlyRanges {
    pub ranges: Vec<ReadonlyRange>,
    pub warnings: Vec<Warning>,
}

/// Value nodes addressed by `steps`, deduplicated, in document order per
/// branch of the pattern.
pub fn resolve_nodes(cst: &Cst, steps: &[PathStep]) -> Vec<NodeId> {
    let mut found = Vec::new();
    expand(cst, cst.root(), steps, &mut found);
    let mut seen = HashSet::new();
    found.retain(|id| seen.insert(*id));
    found
}

fn expand(cst: &Cst, node: NodeId, steps: &[PathStep], out: &mut Vec<NodeId>) {
    let Some((head, tail)) = steps.split_first() else {
        out.push(node);
        return;
    };

    match head {
        PathStep::Recursive => {
            let mut descendants = Vec::new();
            collect_subtree(cst, node, &mut descendants);
            if tail.is_empty() {
                out.extend(descendants);
            } else {
                for descendant in descendants {
                    expand(cst, descendant, tail, out);
                }
            }
        }
        PathStep::AnyIndex => {
            if cst.node(node).kind == NodeKind::Array {
                for element in cst.values(node) {
                    expand(cst, element, tail, out);
                }
            }
        }
        PathStep::Index(index) => {
            let child = match cst.node(node).kind {
                NodeKind::Array => cst.child_by_index(node, *index),
                _ => cst.child_by_key(node, &index.to_string()),
            };
            if let Some(child) = child {
                expand(cst, child, tail, out);
            }
        }
        PathStep::Key(key) => {
            if let Some(child) = cst.child_by_key(node, key) {
                expand(cst, child, tail, out);
            }
        }
    }
}

/// `node` and every value node below it, preorder.
fn collect_subtree(cst: &Cst, node: NodeId, out: &mut Vec<NodeId>) {
    out.push(node);
    for child in cst.values(node) {
        collect_subtree(cst, child, out);
    }
}

/// Byte ranges of the fields addressed by `paths` in `text`.
///
/// Object members yield a `property` range (or `key` and `value` ranges when
/// splitting); array elements yield a `value` range. Paths that resolve to
/// nothing produce a [`Warning::PathNotFound`]. Fails only when `text` is not
/// valid JSON.
pub fn find_readonly_field_ranges<S: AsRef<str>>(
    text: &str,
    paths: &[S],
    options: &ReadonlyRangeOptions,
) -> Result<ReadonlyRanges, ReadonlyError> {
    log::debug!(
        "find_readonly_field_ranges: {} byte(s), {} path(s), {options:?}",
        text.len(),
        paths.len()
    );
    let cst = Cst::parse(text)?;
    let mut diagnostics = Diagnostics::new();
    let mut ranges = Vec::new();
    let mut seen = HashSet::new();

    for raw in paths {
        let raw = raw.as_ref();
        let nodes = resolve_nodes(&cst, &parse_path(raw).steps);
        if nodes.is_empty() {
            diagnostics.warn(Warning::PathNotFound {
                path: raw.to_string(),
            });
        }
        for node in nodes {
            for range in node_ranges(&cst, text, node, options) {
                if seen.insert(range) {
                    ranges.push(range);
                }
            }
        }
    }

    Ok(ReadonlyRanges {
        ranges,
        warnings: diagnostics.into_warnings(),
    })
}

fn node_ranges(
    cst: &Cst,
    text: &str,
    node: NodeId,
    options: &ReadonlyRangeOptions,
) -> Vec<ReadonlyRange> {
    let Some(parent) = cst.node(node).parent else {
        return Vec::new();
    };
    let value = cst.node(node);

    match cst.node(parent).kind {
        NodeKind::Property => {
            let Some((key, _)) = cst.property_parts(parent) else {
                return Vec::new();
            };
            if options.split_key_value {
                let key = cst.node(key);
                return vec![
                    ReadonlyRange {
                        kind: RangeKind::Key,
                        start: key.offset,
                        end: key.end(),
                    },
                    ReadonlyRange {
                        kind: RangeKind::Value,
                        start: value.offset,
                        end: value.end(),
                    },
                ];
            }
            let property = cst.node(parent);
            vec![ReadonlyRange {
                kind: RangeKind::Property,
                start: property.offset,
                end: extend_end(text, property.end(), options.include_comma),
            }]
        }
        NodeKind::Array => {
            let include_comma = options.include_comma && !options.split_key_value;
            vec![ReadonlyRange {
                kind: RangeKind::Value,
                start: value.offset,
                end: extend_end(text, value.end(), include_comma),
            }]
        }
        _ => Vec::new(),
    }
}

/// Extends `end` over whitespace followed by a comma, if present.
fn extend_end(text: &str, end: usize, include_comma: bool) -> usize {
    if !include_comma {
        return end;
    }
    let rest = &text.as_bytes()[end..];
    let spaces = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
    if rest.get(spaces) == Some(&b',') {
        end + spaces + 1
    } else {
        end
    }
}

/// Whether any read-only value differs between two snapshots of a document.
///
/// Each path is resolved in both texts and nodes are compared position by
/// position: a node present in `prev` whose counterpart in `next` is missing
/// or structurally different counts as a change. Paths absent from `prev` are
/// ignored.
pub fn is_readonly_value_changed<S: AsRef<str>>(
    prev: &str,
    next: &str,
    paths: &[S],
) -> Result<bool, ReadonlyError> {
    let prev_cst = Cst::parse(prev).map_err(ReadonlyError::Prev)?;
    let next_cst = Cst::parse(next).map_err(ReadonlyError::Next)?;

    for raw in paths {
        let steps = parse_path(raw.as_ref()).steps;
        let old_nodes = resolve_nodes(&prev_cst, &steps);
        let new_nodes = resolve_nodes(&next_cst, &steps);

        for (i, &old) in old_nodes.iter().enumerate() {
            let unchanged = new_nodes
                .get(i)
                .is_some_and(|&new| prev_cst.node_equal(old, &next_cst, new));
            log::debug!(
                "readonly path {:?} #{i}: {}",
                raw.as_ref(),
                if unchanged { "unchanged" } else { "changed" }
            );
            if !unchanged {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
