//! Non-fatal warnings collected while merging or locating paths.
//!
//! Each recorded warning is also emitted through the `log` facade, so a
//! caller that only cares about the primary result still sees conflicts when
//! a logger is installed.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// Include-mode merge: the patch changes a field that was not selected.
    NotIncludedButModified { path: String },
    /// Exclude-mode merge: the patch changes an excluded field.
    ExcludedButModified { path: String },
    /// A read-only path resolved to no node.
    PathNotFound { path: String },
}

impl Warning {
    pub fn path(&self) -> &str {
        match self {
            Warning::NotIncludedButModified { path }
            | Warning::ExcludedButModified { path }
            | Warning::PathNotFound { path } => path,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NotIncludedButModified { path } => write!(
                f,
                "field \"{}\" is not included but modified, original value kept",
                display_path(path)
            ),
            Warning::ExcludedButModified { path } => write!(
                f,
                "field \"{}\" is excluded but the patch changes it, patch value ignored",
                display_path(path)
            ),
            Warning::PathNotFound { path } => write!(f, "path \"{path}\" not found in JSON"),
        }
    }
}

/// Warning accumulator threaded through a single call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
