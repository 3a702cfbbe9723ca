//! Concrete path vs. pattern matching.
//!
//! `**` may absorb any number of components, so a plain left-to-right scan is
//! not enough: the matcher backtracks over every split point of the remaining
//! target. Failed `(pattern, target)` cursor pairs are memoized, which keeps
//! patterns with several `**` steps polynomial.

use crate::types::{PathComponent, PathStep};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Pattern and target must be consumed together.
    Exact,
    /// The target may end early: it is a prefix of some matching path.
    Prefix,
}

struct Matcher<'a> {
    target: &'a [PathComponent],
    pattern: &'a [PathStep],
    mode: Mode,
    failed: Vec<bool>,
}

impl<'a> Matcher<'a> {
    fn new(target: &'a [PathComponent], pattern: &'a [PathStep], mode: Mode) -> Self {
        Self {
            target,
            pattern,
            mode,
            failed: vec![false; (pattern.len() + 1) * (target.len() + 1)],
        }
    }

    fn matches(&mut self, pi: usize, ti: usize) -> bool {
        if pi == self.pattern.len() {
            return ti == self.target.len();
        }
        if ti == self.target.len() && self.mode == Mode::Prefix {
            return true;
        }
        let slot = pi * (self.target.len() + 1) + ti;
        if self.failed[slot] {
            return false;
        }

        let pattern = self.pattern;
        let ok = match &pattern[pi] {
            PathStep::Recursive => {
                pi + 1 == pattern.len()
                    || (ti..=self.target.len()).any(|split| self.matches(pi + 1, split))
            }
            PathStep::AnyIndex => {
                matches!(self.target.get(ti), Some(PathComponent::Index(_)))
                    && self.matches(pi + 1, ti + 1)
            }
            PathStep::Index(index) => {
                self.target.get(ti).is_some_and(|c| c.is_index(*index))
                    && self.matches(pi + 1, ti + 1)
            }
            PathStep::Key(key) => {
                matches!(self.target.get(ti), Some(PathComponent::Key(k)) if k == key)
                    && self.matches(pi + 1, ti + 1)
            }
        };

        if !ok {
            self.failed[slot] = true;
        }
        ok
    }
}

/// Check whether a concrete path matches a pattern.
///
/// - a key or index step matches an equal component, and an index step also
///   matches an object key spelled with the same digits;
/// - `[]` matches any index component;
/// - a trailing `**` matches any remaining suffix, including an empty one;
/// - an inner `**` matches zero or more components.
///
/// Both sequences must be consumed completely, so a pattern without a trailing
/// `**` never matches a longer path.
pub fn is_path_match(target: &[PathComponent], pattern: &[PathStep]) -> bool {
    Matcher::new(target, pattern, Mode::Exact).matches(0, 0)
}

/// Check whether `prefix` or one of its descendants could match `pattern`.
///
/// Used to decide whether a walk has to descend below `prefix` to find
/// positions addressed by the pattern.
pub fn is_path_prefix_match(prefix: &[PathComponent], pattern: &[PathStep]) -> bool {
    Matcher::new(prefix, pattern, Mode::Prefix).matches(0, 0)
}

/// Like [`is_path_match`], but only for patterns containing `**`.
pub fn is_path_under_wildcard_pattern(target: &[PathComponent], pattern: &[PathStep]) -> bool {
    pattern.contains(&PathStep::Recursive) && is_path_match(target, pattern)
}
