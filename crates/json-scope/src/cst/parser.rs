//! Byte-cursor parser producing a [`Cst`].

use super::{Cst, CstError, CstNode, NodeId, NodeKind, Scalar};

/// Maximum nesting of objects and arrays.
pub const MAX_DEPTH: usize = 512;

pub(super) struct CstParser<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
    nodes: Vec<CstNode>,
}

impl<'a> CstParser<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            depth: 0,
            nodes: Vec::new(),
        }
    }

    pub(super) fn parse(mut self) -> Result<Cst, CstError> {
        if self.data.starts_with(b"\xEF\xBB\xBF") {
            self.x = 3;
        }
        let root = self.read_any(None)?;
        self.skip_trivia()?;
        if self.x < self.data.len() {
            return Err(CstError::TrailingContent(self.x));
        }
        Ok(Cst {
            nodes: self.nodes,
            root,
        })
    }

    fn push(&mut self, kind: NodeKind, offset: usize, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(CstNode {
            kind,
            offset,
            length: 0,
            parent,
            children: Vec::new(),
            scalar: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn push_leaf(
        &mut self,
        kind: NodeKind,
        offset: usize,
        parent: Option<NodeId>,
        scalar: Scalar,
    ) -> NodeId {
        let id = self.push(kind, offset, parent);
        self.nodes[id].length = self.x - offset;
        self.nodes[id].scalar = Some(scalar);
        id
    }

    fn close(&mut self, id: NodeId) {
        self.nodes[id].length = self.x - self.nodes[id].offset;
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.x).copied()
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), CstError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.x += 1,
                Some(b'/') => match self.data.get(self.x + 1) {
                    Some(b'/') => {
                        while let Some(b) = self.peek() {
                            if b == b'\n' {
                                break;
                            }
                            self.x += 1;
                        }
                    }
                    Some(b'*') => {
                        let body = self.x + 2;
                        let close = self.data[body..]
                            .windows(2)
                            .position(|w| w == b"*/")
                            .ok_or(CstError::UnexpectedEnd)?;
                        self.x = body + close + 2;
                    }
                    _ => return Err(CstError::Invalid(self.x)),
                },
                _ => return Ok(()),
            }
        }
    }

    fn read_any(&mut self, parent: Option<NodeId>) -> Result<NodeId, CstError> {
        self.skip_trivia()?;
        let start = self.x;
        match self.peek() {
            None => Err(CstError::UnexpectedEnd),
            Some(b'{') => self.read_obj(parent),
            Some(b'[') => self.read_arr(parent),
            Some(b'"') => {
                let value = self.read_str()?;
                Ok(self.push_leaf(NodeKind::String, start, parent, Scalar::String(value)))
            }
            Some(b't') => {
                self.expect_literal(b"true")?;
                Ok(self.push_leaf(NodeKind::Boolean, start, parent, Scalar::Boolean(true)))
            }
            Some(b'f') => {
                self.expect_literal(b"false")?;
                Ok(self.push_leaf(NodeKind::Boolean, start, parent, Scalar::Boolean(false)))
            }
            Some(b'n') => {
                self.expect_literal(b"null")?;
                Ok(self.push_leaf(NodeKind::Null, start, parent, Scalar::Null))
            }
            Some(b'-' | b'0'..=b'9') => {
                let value = self.read_num()?;
                Ok(self.push_leaf(NodeKind::Number, start, parent, Scalar::Number(value)))
            }
            Some(_) => Err(CstError::Invalid(start)),
        }
    }

    fn expect_literal(&mut self, literal: &[u8]) -> Result<(), CstError> {
        if !self.data[self.x..].starts_with(literal) {
            return Err(CstError::Invalid(self.x));
        }
        self.x += literal.len();
        Ok(())
    }

    fn enter(&mut self) -> Result<(), CstError> {
        if self.depth >= MAX_DEPTH {
            return Err(CstError::DepthLimitExceeded(self.x));
        }
        self.depth += 1;
        Ok(())
    }

    fn read_obj(&mut self, parent: Option<NodeId>) -> Result<NodeId, CstError> {
        self.enter()?;
        let id = self.push(NodeKind::Object, self.x, parent);
        self.x += 1;
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(CstError::UnexpectedEnd),
                Some(b'}') => break,
                Some(b'"') => {}
                Some(_) => return Err(CstError::Invalid(self.x)),
            }

            let property = self.push(NodeKind::Property, self.x, Some(id));
            let key_start = self.x;
            let key = self.read_str()?;
            self.push_leaf(NodeKind::String, key_start, Some(property), Scalar::String(key));

            self.skip_trivia()?;
            match self.peek() {
                Some(b':') => self.x += 1,
                Some(_) => return Err(CstError::Invalid(self.x)),
                None => return Err(CstError::UnexpectedEnd),
            }
            let value = self.read_any(Some(property))?;
            self.nodes[property].length = self.nodes[value].end() - self.nodes[property].offset;

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.x += 1,
                Some(b'}') => {}
                Some(_) => return Err(CstError::Invalid(self.x)),
                None => return Err(CstError::UnexpectedEnd),
            }
        }
        self.x += 1;
        self.close(id);
        self.depth -= 1;
        Ok(id)
    }

    fn read_arr(&mut self, parent: Option<NodeId>) -> Result<NodeId, CstError> {
        self.enter()?;
        let id = self.push(NodeKind::Array, self.x, parent);
        self.x += 1;
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(CstError::UnexpectedEnd),
                Some(b']') => break,
                Some(b',') => return Err(CstError::Invalid(self.x)),
                Some(_) => {}
            }
            self.read_any(Some(id))?;

            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.x += 1,
                Some(b']') => {}
                Some(_) => return Err(CstError::Invalid(self.x)),
                None => return Err(CstError::UnexpectedEnd),
            }
        }
        self.x += 1;
        self.close(id);
        self.depth -= 1;
        Ok(id)
    }

    /// Read a quoted string starting at the opening quote.
    fn read_str(&mut self) -> Result<String, CstError> {
        let start = self.x;
        let mut i = start + 1;
        let mut escaped = false;
        loop {
            match self.data.get(i) {
                None => return Err(CstError::UnexpectedEnd),
                Some(b'"') => break,
                Some(b'\\') => {
                    escaped = true;
                    i += 2;
                }
                Some(&b) if b < 0x20 => return Err(CstError::InvalidString(start)),
                Some(_) => i += 1,
            }
        }
        self.x = i + 1;

        let raw = &self.data[start..=i];
        if !escaped {
            return std::str::from_utf8(&raw[1..raw.len() - 1])
                .map(str::to_string)
                .map_err(|_| CstError::InvalidUtf8);
        }
        serde_json::from_slice(raw).map_err(|_| CstError::InvalidString(start))
    }

    fn read_num(&mut self) -> Result<f64, CstError> {
        let start = self.x;
        let data = self.data;
        let mut x = start;

        if data.get(x) == Some(&b'-') {
            x += 1;
        }
        let int_start = x;
        while data.get(x).is_some_and(u8::is_ascii_digit) {
            x += 1;
        }
        if x == int_start {
            return Err(CstError::Invalid(start));
        }
        if data.get(x) == Some(&b'.') {
            x += 1;
            let frac_start = x;
            while data.get(x).is_some_and(u8::is_ascii_digit) {
                x += 1;
            }
            if x == frac_start {
                return Err(CstError::Invalid(start));
            }
        }
        if matches!(data.get(x), Some(b'e' | b'E')) {
            x += 1;
            if matches!(data.get(x), Some(b'+' | b'-')) {
                x += 1;
            }
            let exp_start = x;
            while data.get(x).is_some_and(u8::is_ascii_digit) {
                x += 1;
            }
            if x == exp_start {
                return Err(CstError::Invalid(start));
            }
        }
        self.x = x;

        let text = std::str::from_utf8(&data[start..x]).map_err(|_| CstError::InvalidUtf8)?;
        text.parse::<f64>().map_err(|_| CstError::Invalid(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<NodeKind> {
        let cst = Cst::parse(text).unwrap();
        (0..cst.len()).map(|id| cst.node(id).kind).collect()
    }

    #[test]
    fn test_node_order_is_preorder() {
        assert_eq!(
            kinds(r#"{"a": [1, "x"]}"#),
            vec![
                NodeKind::Object,
                NodeKind::Property,
                NodeKind::String,
                NodeKind::Array,
                NodeKind::Number,
                NodeKind::String,
            ]
        );
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let text = "// header\n{\n  /* block */ \"a\": 1, // tail\n  \"b\": [1, 2,],\n}\n";
        let cst = Cst::parse(text).unwrap();
        let b = cst.child_by_key(cst.root(), "b").unwrap();
        assert_eq!(cst.node(b).children.len(), 2);
        let a = cst.child_by_key(cst.root(), "a").unwrap();
        assert_eq!(&text[cst.node(a).offset..cst.node(a).end()], "1");
    }

    #[test]
    fn test_escaped_strings() {
        let cst = Cst::parse(r#"["a\"b", "\u00e9", "plain"]"#).unwrap();
        let values: Vec<Option<Scalar>> = cst
            .values(cst.root())
            .into_iter()
            .map(|id| cst.node(id).scalar.clone())
            .collect();
        assert_eq!(
            values,
            vec![
                Some(Scalar::String("a\"b".into())),
                Some(Scalar::String("\u{e9}".into())),
                Some(Scalar::String("plain".into())),
            ]
        );
    }

    #[test]
    fn test_offsets_are_bytes() {
        let text = "{\"\u{e9}\": \"\u{e9}\", \"k\": 1}";
        let cst = Cst::parse(text).unwrap();
        let k = cst.child_by_key(cst.root(), "k").unwrap();
        assert_eq!(&text[cst.node(k).offset..cst.node(k).end()], "1");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(Cst::parse("").unwrap_err(), CstError::UnexpectedEnd);
        assert_eq!(Cst::parse("  // only\n").unwrap_err(), CstError::UnexpectedEnd);
        assert_eq!(Cst::parse("{\"a\" 1}").unwrap_err(), CstError::Invalid(5));
        assert_eq!(Cst::parse("[1 2]").unwrap_err(), CstError::Invalid(3));
        assert_eq!(Cst::parse("[,]").unwrap_err(), CstError::Invalid(1));
        assert_eq!(Cst::parse("{,}").unwrap_err(), CstError::Invalid(1));
        assert_eq!(Cst::parse("[1,,2]").unwrap_err(), CstError::Invalid(3));
        assert_eq!(Cst::parse("{\"a\": 1").unwrap_err(), CstError::UnexpectedEnd);
        assert_eq!(Cst::parse("tru").unwrap_err(), CstError::Invalid(0));
        assert_eq!(Cst::parse("-").unwrap_err(), CstError::Invalid(0));
        assert_eq!(Cst::parse("1.").unwrap_err(), CstError::Invalid(0));
        assert_eq!(Cst::parse("{} x").unwrap_err(), CstError::TrailingContent(3));
        assert_eq!(Cst::parse("\"a\nb\"").unwrap_err(), CstError::InvalidString(0));
        assert_eq!(Cst::parse("[\"\\x\"]").unwrap_err(), CstError::InvalidString(1));
        assert_eq!(Cst::parse("/* open").unwrap_err(), CstError::UnexpectedEnd);
        assert_eq!(Cst::parse("{'a': 1}").unwrap_err(), CstError::Invalid(1));
    }

    #[test]
    fn test_depth_limit() {
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(Cst::parse(&ok).is_ok());
        let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(
            Cst::parse(&deep).unwrap_err(),
            CstError::DepthLimitExceeded(MAX_DEPTH)
        );
    }
}
