//! Deep copies of JSON values that do not recurse on the call stack.

mod clone;

pub use clone::deep_clone;
