//! Field path parser.
//!
//! Grammar: dot separated segments, each an optional literal key followed by
//! any number of bracket tokens (`[3]`, `[]`, `[*]`). A `**` anywhere in a
//! literal introduces a recursive wildcard, so `**a`, `a.**b` and `a.**` are
//! all valid. Purely numeric literals are read as indices.

use crate::types::{FieldPath, PathStep};
use thiserror::Error;

const RECURSIVE: &str = "**";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty path segment at {0}")]
    EmptySegment(usize),
    #[error("Unclosed bracket opened at {0}")]
    UnclosedBracket(usize),
    #[error("Invalid index in bracket opened at {0}")]
    InvalidIndex(usize),
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, usize),
}

/// Field path parser.
pub struct FieldPathParser<'a> {
    input: &'a str,
    pos: usize,
    steps: Vec<PathStep>,
}

impl<'a> FieldPathParser<'a> {
    /// Parse a path string, rejecting malformed segments and brackets.
    pub fn parse(input: &'a str) -> Result<FieldPath, ParseError> {
        let mut parser = Self {
            input,
            pos: 0,
            steps: Vec::new(),
        };
        parser.parse_strict()?;
        Ok(FieldPath::new(parser.steps))
    }

    /// Parse a path string best-effort. Never fails: characters that do not
    /// form a literal or a well-formed bracket token are dropped.
    pub fn parse_lenient(input: &'a str) -> FieldPath {
        let mut parser = Self {
            input,
            pos: 0,
            steps: Vec::new(),
        };
        parser.parse_best_effort();
        FieldPath::new(parser.steps)
    }

    fn parse_best_effort(&mut self) {
        let mut rest = self.input;
        if let Some(tail) = rest.strip_prefix(RECURSIVE) {
            self.steps.push(PathStep::Recursive);
            rest = tail.strip_prefix('.').unwrap_or(tail);
        }

        for part in split_outside_brackets(rest) {
            if part == RECURSIVE {
                self.steps.push(PathStep::Recursive);
                continue;
            }
            self.tokenize_lenient(part);
        }
    }

    fn tokenize_lenient(&mut self, part: &str) {
        let bytes = part.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'[' => match read_bracket(bytes, i) {
                    Some((step, next)) => {
                        self.steps.push(step);
                        i = next;
                    }
                    None => i += 1,
                },
                b']' => i += 1,
                _ => {
                    let start = i;
                    while i < bytes.len() && bytes[i] != b'[' && bytes[i] != b']' {
                        i += 1;
                    }
                    self.push_literal(&part[start..i]);
                }
            }
        }
    }

    fn parse_strict(&mut self) -> Result<(), ParseError> {
        if self.input.is_empty() {
            return Ok(());
        }
        loop {
            self.parse_segment()?;
            match self.peek() {
                None => return Ok(()),
                Some(b'.') => {
                    self.pos += 1;
                    if self.is_at_end() {
                        return Err(ParseError::EmptySegment(self.pos));
                    }
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn parse_segment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'.' | b'[' | b']') {
                break;
            }
            self.pos += 1;
        }
        let literal = &self.input[start..self.pos];
        if !literal.is_empty() {
            self.push_literal(literal);
        }

        let mut brackets = 0;
        while self.peek() == Some(b'[') {
            self.parse_bracket()?;
            brackets += 1;
        }

        if literal.is_empty() && brackets == 0 {
            return match self.peek() {
                Some(b']') => Err(self.unexpected()),
                _ => Err(ParseError::EmptySegment(start)),
            };
        }
        match self.peek() {
            None | Some(b'.') => Ok(()),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_bracket(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        match read_bracket(self.input.as_bytes(), open) {
            Some((step, next)) => {
                self.steps.push(step);
                self.pos = next;
                Ok(())
            }
            None if !self.input[open..].contains(']') => Err(ParseError::UnclosedBracket(open)),
            None => Err(ParseError::InvalidIndex(open)),
        }
    }

    fn push_literal(&mut self, literal: &str) {
        if literal.contains(RECURSIVE) {
            for (i, sub) in literal.split(RECURSIVE).enumerate() {
                if i > 0 {
                    self.steps.push(PathStep::Recursive);
                }
                if !sub.is_empty() {
                    self.steps.push(normalize_literal(sub));
                }
            }
        } else {
            self.steps.push(normalize_literal(literal));
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn unexpected(&self) -> ParseError {
        let ch = self.input[self.pos..].chars().next().unwrap_or('\0');
        ParseError::UnexpectedChar(ch, self.pos)
    }
}

/// Parse a path string leniently. See [`FieldPathParser::parse_lenient`].
pub fn parse_path(path: &str) -> FieldPath {
    FieldPathParser::parse_lenient(path)
}

/// Parse a path string, rejecting malformed input.
pub fn parse_path_strict(path: &str) -> Result<FieldPath, ParseError> {
    FieldPathParser::parse(path)
}

/// Reads a bracket token starting at `open` (which must point at `[`).
/// Returns the step and the position just past the closing `]`.
fn read_bracket(bytes: &[u8], open: usize) -> Option<(PathStep, usize)> {
    let mut i = open + 1;
    if bytes.get(i) == Some(&b'*') {
        return (bytes.get(i + 1) == Some(&b']')).then_some((PathStep::AnyIndex, i + 2));
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if bytes.get(i) != Some(&b']') {
        return None;
    }
    if i == digits_start {
        return Some((PathStep::AnyIndex, i + 1));
    }
    let digits = std::str::from_utf8(&bytes[digits_start..i]).ok()?;
    let index = digits.parse::<usize>().ok()?;
    Some((PathStep::Index(index), i + 1))
}

fn normalize_literal(literal: &str) -> PathStep {
    if !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = literal.parse::<usize>() {
            return PathStep::Index(index);
        }
    }
    PathStep::Key(literal.to_string())
}

fn split_outside_brackets(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in input.bytes().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
