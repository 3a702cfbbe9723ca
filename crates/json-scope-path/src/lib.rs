//! Field path language for json-scope.
//!
//! Paths are dot separated keys with optional bracket suffixes:
//!
//! - `a.b.c`: nested keys
//! - `a[0].b`: array index (`a.0.b` is the same path)
//! - `arr[].name` / `arr[*].name`: any array element
//! - `**name`: `name` at any depth, `c[0].**a`: any `a` below `c[0]`
//!
//! # Example
//!
//! ```
//! use json_scope_path::{collect_matching_paths, format_concrete_path, parse_path};
//! use serde_json::json;
//!
//! let doc = json!({"a": 1, "b": {"a": 2, "c": 3}});
//! let pattern = parse_path("**a");
//!
//! let found: Vec<String> = collect_matching_paths(&doc, &pattern.steps)
//!     .iter()
//!     .map(|path| format_concrete_path(path))
//!     .collect();
//! assert_eq!(found, vec!["a", "b.a"]);
//! ```

mod types;
pub use types::*;

mod parser;
pub use parser::{parse_path, parse_path_strict, FieldPathParser, ParseError};

mod matcher;
pub use matcher::{is_path_match, is_path_prefix_match, is_path_under_wildcard_pattern};

mod expand;
pub use expand::{collect_matching_paths, expand_recursive_paths};

mod util;
pub use util::{format_concrete_path, format_path, get, get_value_by_path, parse_concrete_path};
