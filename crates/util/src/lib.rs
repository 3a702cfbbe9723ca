//! json-scope-util - Utility functions for json-scope
//!
//! Structural equality and cloning over plain `serde_json::Value` trees.

pub mod json_clone;
pub mod json_equal;

pub use json_clone::deep_clone;
pub use json_equal::{deep_equal, number_equal};

use serde_json::Value;

/// Whether a value is a plain object (not an array, not a scalar).
pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Whether a value is an object or an array.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
