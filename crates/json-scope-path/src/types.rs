//! Field path types.

use std::fmt;

/// A single step of a field path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Literal object key: `name`
    Key(String),
    /// Array index: `[0]`, or a purely numeric segment such as `.0`
    Index(usize),
    /// Unindexed array wildcard: `[]`, `[*]`
    AnyIndex,
    /// Recursive wildcard: `**`
    Recursive,
}

impl PathStep {
    /// Whether this step can match more than one concrete component.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathStep::AnyIndex | PathStep::Recursive)
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl From<PathComponent> for PathStep {
    fn from(component: PathComponent) -> Self {
        match component {
            PathComponent::Key(key) => PathStep::Key(key),
            PathComponent::Index(index) => PathStep::Index(index),
        }
    }
}

/// A parsed field path, possibly containing wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    /// Path steps, outermost first.
    pub steps: Vec<PathStep>,
}

impl FieldPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the path contains a `**` step.
    pub fn has_recursive(&self) -> bool {
        self.steps.iter().any(|step| *step == PathStep::Recursive)
    }

    /// Whether the path addresses exactly one location.
    pub fn is_concrete(&self) -> bool {
        !self.steps.iter().any(PathStep::is_wildcard)
    }

    /// Converts a wildcard-free path into its concrete components.
    pub fn to_concrete(&self) -> Option<ConcretePath> {
        self.steps
            .iter()
            .map(|step| match step {
                PathStep::Key(key) => Some(PathComponent::Key(key.clone())),
                PathStep::Index(index) => Some(PathComponent::Index(*index)),
                PathStep::AnyIndex | PathStep::Recursive => None,
            })
            .collect()
    }
}

impl From<Vec<PathStep>> for FieldPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl From<ConcretePath> for FieldPath {
    fn from(path: ConcretePath) -> Self {
        Self {
            steps: path.into_iter().map(PathStep::from).collect(),
        }
    }
}

impl AsRef<[PathStep]> for FieldPath {
    fn as_ref(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::util::format_path(&self.steps))
    }
}

/// A component of a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

impl PathComponent {
    /// Whether this component is addressed by an index step. Object keys
    /// spelled with the canonical digits of `index` count too.
    pub fn is_index(&self, index: usize) -> bool {
        match self {
            PathComponent::Index(i) => *i == index,
            PathComponent::Key(key) => is_index_key(key, index),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathComponent::Key(key) => Some(key),
            PathComponent::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathComponent::Index(index) => Some(*index),
            PathComponent::Key(_) => None,
        }
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathComponent::Key(key) => f.write_str(key),
            PathComponent::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Whether `key` is the canonical decimal spelling of `index` (`"2"`, never
/// `"02"` or `"+2"`).
pub fn is_index_key(key: &str, index: usize) -> bool {
    key.parse::<usize>()
        .is_ok_and(|i| i == index && i.to_string() == key)
}

/// A wildcard-free path addressing exactly one location in a tree.
pub type ConcretePath = Vec<PathComponent>;
