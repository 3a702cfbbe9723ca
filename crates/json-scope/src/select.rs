//! Narrowing a set of path tails by one tree position.

use json_scope_path::{is_index_key, PathStep};

/// A child position inside an object or an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position<'a> {
    Key(&'a str),
    Index(usize),
}

/// Whether a single non-recursive step accepts a child position.
///
/// Index steps also accept an object key spelled with the same digits, since
/// rendered paths (`a.0`) parse numeric segments as indices.
pub(crate) fn step_accepts(step: &PathStep, at: Position<'_>) -> bool {
    match (step, at) {
        (PathStep::Key(key), Position::Key(name)) => key == name,
        (PathStep::Index(index), Position::Index(i)) => *index == i,
        (PathStep::Index(index), Position::Key(name)) => is_index_key(name, *index),
        (PathStep::AnyIndex, Position::Index(_)) => true,
        _ => false,
    }
}

/// Tails of the paths whose next step accepts `at`.
pub(crate) fn descend<'p>(paths: &[&'p [PathStep]], at: Position<'_>) -> Vec<&'p [PathStep]> {
    paths
        .iter()
        .filter_map(|path| match path.split_first() {
            Some((head, tail)) if step_accepts(head, at) => Some(tail),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_scope_path::parse_path;

    #[test]
    fn test_step_accepts() {
        assert!(step_accepts(&PathStep::from("a"), Position::Key("a")));
        assert!(!step_accepts(&PathStep::from("a"), Position::Index(0)));
        assert!(step_accepts(&PathStep::AnyIndex, Position::Index(7)));
        assert!(!step_accepts(&PathStep::AnyIndex, Position::Key("7")));
        assert!(step_accepts(&PathStep::Index(2), Position::Key("2")));
        assert!(!step_accepts(&PathStep::Index(2), Position::Key("02")));
        assert!(!step_accepts(&PathStep::Recursive, Position::Key("a")));
    }

    #[test]
    fn test_descend_keeps_tails() {
        let a = parse_path("a.b");
        let b = parse_path("a");
        let c = parse_path("x");
        let paths = vec![a.steps.as_slice(), b.steps.as_slice(), c.steps.as_slice()];
        let tails = descend(&paths, Position::Key("a"));
        assert_eq!(tails.len(), 2);
        assert_eq!(tails[0], &[PathStep::from("b")][..]);
        assert!(tails[1].is_empty());
    }
}
