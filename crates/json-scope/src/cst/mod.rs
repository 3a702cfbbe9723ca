//! Concrete syntax tree for JSON text with byte offsets.
//!
//! The tree is an arena: nodes refer to each other by [`NodeId`]. Objects
//! hold `Property` nodes whose two children are the key string and the
//! value. Comments (`//`, `/* */`) and trailing commas are accepted.

mod parser;

pub use parser::MAX_DEPTH;

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub type NodeId = usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CstError {
    #[error("Invalid JSON at byte {0}")]
    Invalid(usize),
    #[error("Unexpected end of JSON input")]
    UnexpectedEnd,
    #[error("Invalid UTF-8")]
    InvalidUtf8,
    #[error("Nesting deeper than {max} levels at byte {0}", max = MAX_DEPTH)]
    DepthLimitExceeded(usize),
    #[error("Unexpected content after the document at byte {0}")]
    TrailingContent(usize),
    #[error("Invalid string literal at byte {0}")]
    InvalidString(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    Property,
    String,
    Number,
    Boolean,
    Null,
}

/// Decoded value of a leaf node.
#[derive(Debug, Clone)]
pub enum Scalar {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a == b,
            (Scalar::Null, Scalar::Null) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CstNode {
    pub kind: NodeKind,
    /// Byte offset of the first character of the node.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Set for `String`, `Number`, `Boolean` and `Null` nodes.
    pub scalar: Option<Scalar>,
}

impl CstNode {
    /// Byte offset just past the node.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Cst {
    nodes: Vec<CstNode>,
    root: NodeId,
}

impl Cst {
    /// Parse JSON text.
    pub fn parse(text: &str) -> Result<Cst, CstError> {
        parser::CstParser::new(text.as_bytes()).parse()
    }

    /// Parse JSON bytes, which must be valid UTF-8.
    pub fn parse_slice(bytes: &[u8]) -> Result<Cst, CstError> {
        let text = std::str::from_utf8(bytes).map_err(|_| CstError::InvalidUtf8)?;
        Self::parse(text)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// If `id` was not produced by this tree. Use [`Cst::get`] for ids of
    /// unknown origin.
    pub fn node(&self, id: NodeId) -> &CstNode {
        &self.nodes[id]
    }

    /// Node by id, `None` when the tree has no such node.
    pub fn get(&self, id: NodeId) -> Option<&CstNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Value node of the first property named `key` of an object node.
    pub fn child_by_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        let node = self.node(id);
        if node.kind != NodeKind::Object {
            return None;
        }
        node.children.iter().find_map(|&property| {
            let (key_id, value_id) = self.property_parts(property)?;
            match &self.node(key_id).scalar {
                Some(Scalar::String(name)) if name == key => Some(value_id),
                _ => None,
            }
        })
    }

    /// Element `index` of an array node.
    pub fn child_by_index(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let node = self.node(id);
        if node.kind != NodeKind::Array {
            return None;
        }
        node.children.get(index).copied()
    }

    /// Value children of a container: property values for objects, elements
    /// for arrays. Leaves have none.
    pub fn values(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        match node.kind {
            NodeKind::Object => node
                .children
                .iter()
                .filter_map(|&property| self.property_parts(property).map(|(_, value)| value))
                .collect(),
            NodeKind::Array => node.children.clone(),
            _ => Vec::new(),
        }
    }

    /// `(key, value)` children of a property node.
    pub fn property_parts(&self, property: NodeId) -> Option<(NodeId, NodeId)> {
        let node = self.node(property);
        match (node.kind, node.children.as_slice()) {
            (NodeKind::Property, [key, value]) => Some((*key, *value)),
            _ => None,
        }
    }

    /// Structural equality of two nodes, possibly from different trees.
    ///
    /// Objects compare by key regardless of order, arrays by position and
    /// numbers numerically with NaN equal to NaN.
    pub fn node_equal(&self, id: NodeId, other: &Cst, other_id: NodeId) -> bool {
        let a = self.node(id);
        let b = other.node(other_id);
        match (a.kind, b.kind) {
            (NodeKind::Object, NodeKind::Object) => {
                a.children.len() == b.children.len()
                    && a.children.iter().all(|&property| {
                        let Some((key_id, value_id)) = self.property_parts(property) else {
                            return false;
                        };
                        let Some(Scalar::String(key)) = &self.node(key_id).scalar else {
                            return false;
                        };
                        other
                            .child_by_key(other_id, key)
                            .is_some_and(|found| self.node_equal(value_id, other, found))
                    })
            }
            (NodeKind::Array, NodeKind::Array) => {
                a.children.len() == b.children.len()
                    && a
                        .children
                        .iter()
                        .zip(&b.children)
                        .all(|(&x, &y)| self.node_equal(x, other, y))
            }
            _ => a.scalar.is_some() && a.scalar == b.scalar,
        }
    }

    /// Convert a node back to a value. Later duplicate keys win, as with
    /// `serde_json`.
    pub fn to_value(&self, id: NodeId) -> Value {
        let node = self.node(id);
        match node.kind {
            NodeKind::Object => {
                let mut map = Map::new();
                for &property in &node.children {
                    if let Some((key_id, value_id)) = self.property_parts(property) {
                        if let Some(Scalar::String(key)) = &self.node(key_id).scalar {
                            map.insert(key.clone(), self.to_value(value_id));
                        }
                    }
                }
                Value::Object(map)
            }
            NodeKind::Array => {
                Value::Array(node.children.iter().map(|&child| self.to_value(child)).collect())
            }
            NodeKind::Property => match self.property_parts(id) {
                Some((_, value)) => self.to_value(value),
                None => Value::Null,
            },
            _ => match &node.scalar {
                Some(Scalar::String(s)) => Value::String(s.clone()),
                Some(Scalar::Boolean(b)) => Value::Bool(*b),
                Some(Scalar::Number(n)) => number_value(*n),
                Some(Scalar::Null) | None => Value::Null,
            },
        }
    }
}

fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_checks_ids() {
        let cst = Cst::parse("[1, 2]").unwrap();
        assert_eq!(cst.len(), 3);
        assert_eq!(cst.get(cst.root()).map(|node| node.kind), Some(NodeKind::Array));
        assert!(cst.get(cst.len()).is_none());
    }

    #[test]
    fn test_offsets_and_properties() {
        let text = r#"{"a": 1, "b": [true, null]}"#;
        let cst = Cst::parse(text).unwrap();
        let root = cst.node(cst.root());
        assert_eq!(root.kind, NodeKind::Object);
        assert_eq!((root.offset, root.length), (0, text.len()));

        let property = root.children[0];
        assert_eq!(cst.node(property).kind, NodeKind::Property);
        assert_eq!(&text[cst.node(property).offset..cst.node(property).end()], r#""a": 1"#);

        let b = cst.child_by_key(cst.root(), "b").unwrap();
        assert_eq!(&text[cst.node(b).offset..cst.node(b).end()], "[true, null]");
        let second = cst.child_by_index(b, 1).unwrap();
        assert_eq!(cst.node(second).kind, NodeKind::Null);
        assert_eq!(cst.node(second).parent, Some(b));
        assert_eq!(cst.child_by_index(b, 2), None);
        assert_eq!(cst.child_by_key(b, "x"), None);
    }

    #[test]
    fn test_values_and_to_value() {
        let cst = Cst::parse(r#"{"s": "x\ny", "n": -1.5e2, "o": {"k": [1, 2.5]}}"#).unwrap();
        assert_eq!(cst.values(cst.root()).len(), 3);
        assert_eq!(
            cst.to_value(cst.root()),
            json!({"s": "x\ny", "n": -150, "o": {"k": [1, 2.5]}})
        );
    }

    #[test]
    fn test_first_duplicate_key_is_found() {
        let cst = Cst::parse(r#"{"a": 1, "a": 2}"#).unwrap();
        let found = cst.child_by_key(cst.root(), "a").unwrap();
        assert_eq!(cst.node(found).scalar, Some(Scalar::Number(1.0)));
    }

    #[test]
    fn test_node_equal_across_trees() {
        let a = Cst::parse(r#"{"x": [1, {"y": "z"}], "w": null}"#).unwrap();
        let b = Cst::parse("{\n  \"w\": null, // moved\n  \"x\": [1.0, {\"y\": \"z\"}]\n}").unwrap();
        let c = Cst::parse(r#"{"x": [1, {"y": "q"}], "w": null}"#).unwrap();
        assert!(a.node_equal(a.root(), &b, b.root()));
        assert!(!a.node_equal(a.root(), &c, c.root()));
        assert!(!a.node_equal(a.root(), &a, a.child_by_key(a.root(), "x").unwrap()));
    }

    #[test]
    fn test_scalar_nan_equality() {
        assert_eq!(Scalar::Number(f64::NAN), Scalar::Number(f64::NAN));
        assert_ne!(Scalar::Number(0.0), Scalar::Null);
    }

    #[test]
    fn test_parse_slice_rejects_bad_utf8() {
        assert_eq!(Cst::parse_slice(b"\"\xff\"").unwrap_err(), CstError::InvalidUtf8);
        assert!(Cst::parse_slice(b"[1]").is_ok());
    }
}
