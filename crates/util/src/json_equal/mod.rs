//! Structural equality for JSON values, with numbers compared by value.

mod deep_equal;

pub use deep_equal::{deep_equal, number_equal};
