//! Type expressions used in parameter, return and yield annotations
//!
//! A type list such as `Hash{Symbol=>Array<String>}, nil` parses into a
//! sequence of [`TypeNode`] trees. Nodes whose name matches a known class or
//! module carry the documentation path of that entity.

mod error;
mod parser;

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use error::ParseError;
pub use parser::{parse_types, TypeParser};

/// Structural form of a type node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNodeKind {
    /// A plain name (`String`, `nil`, `#to_s`)
    Basic,
    /// `Name<items>`, or `Name<(items)>` when `ordered`
    Parameterized { items: Vec<TypeNode>, ordered: bool },
    /// `Name{keys=>values}`
    KeyValue {
        keys: Vec<TypeNode>,
        values: Vec<TypeNode>,
    },
}

/// A node in a parsed type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    /// Raw token text
    pub name: String,
    /// Structural form
    pub kind: TypeNodeKind,
    /// Documentation path of the matching entity, if any
    pub resolved_path: Option<String>,
}

impl TypeNode {
    /// A plain, unresolved leaf node
    pub fn basic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeNodeKind::Basic,
            resolved_path: None,
        }
    }

    /// Attach a resolved documentation path
    #[must_use]
    pub fn with_path(mut self, path: Option<String>) -> Self {
        self.resolved_path = path;
        self
    }

    /// Literal names start with a lower-case character (`nil`, `true`, `self`)
    pub fn is_literal(&self) -> bool {
        is_literal_name(&self.name)
    }

    /// Duck-typed method references start with `.` or `#` (`#read`)
    pub fn is_method_reference(&self) -> bool {
        is_method_reference_name(&self.name)
    }

    /// Child types of a parameterized node
    pub fn items(&self) -> &[TypeNode] {
        match &self.kind {
            TypeNodeKind::Parameterized { items, .. } => items,
            _ => &[],
        }
    }

    /// Whether this is an order-dependent (tuple) node
    pub fn is_ordered(&self) -> bool {
        matches!(self.kind, TypeNodeKind::Parameterized { ordered: true, .. })
    }

    /// Key types of a key-value node
    pub fn keys(&self) -> &[TypeNode] {
        match &self.kind {
            TypeNodeKind::KeyValue { keys, .. } => keys,
            _ => &[],
        }
    }

    /// Value types of a key-value node
    pub fn values(&self) -> &[TypeNode] {
        match &self.kind {
            TypeNodeKind::KeyValue { values, .. } => values,
            _ => &[],
        }
    }

    /// Depth of the deepest nesting below this node (0 for a leaf)
    pub fn depth(&self) -> usize {
        let children = match &self.kind {
            TypeNodeKind::Basic => return 0,
            TypeNodeKind::Parameterized { items, .. } => items.iter().collect::<Vec<_>>(),
            TypeNodeKind::KeyValue { keys, values } => keys.iter().chain(values).collect(),
        };
        1 + children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

pub(crate) fn is_literal_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_lowercase)
}

pub(crate) fn is_method_reference_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('#')
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.kind {
            TypeNodeKind::Basic => Ok(()),
            TypeNodeKind::Parameterized {
                items,
                ordered: false,
            } => write!(f, "<{}>", format_type_list(items)),
            TypeNodeKind::Parameterized {
                items,
                ordered: true,
            } => write!(f, "<({})>", format_type_list(items)),
            TypeNodeKind::KeyValue { keys, values } => write!(
                f,
                "{{{}=>{}}}",
                format_type_list(keys),
                format_type_list(values)
            ),
        }
    }
}

/// Write a type list back in its canonical textual form
pub fn format_type_list(nodes: &[TypeNode]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Serialize for TypeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(path) = &self.resolved_path {
            map.serialize_entry("path", path)?;
        }
        match &self.kind {
            TypeNodeKind::Basic => {}
            TypeNodeKind::Parameterized { items, ordered } => {
                map.serialize_entry("items", items)?;
                map.serialize_entry("ordered", ordered)?;
            }
            TypeNodeKind::KeyValue { keys, values } => {
                map.serialize_entry("keys", keys)?;
                map.serialize_entry("values", values)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_forms() {
        let nodes = parse_types("Array<String>, Array<(String, Integer)>, Hash{Symbol=>nil}")
            .unwrap();
        assert_eq!(
            format_type_list(&nodes),
            "Array<String>, Array<(String, Integer)>, Hash{Symbol=>nil}"
        );
    }

    #[test]
    fn test_serialize_basic_skips_structural_fields() {
        let node = TypeNode::basic("String").with_path(Some("/string".to_string()));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({ "name": "String", "path": "/string" })
        );
    }

    #[test]
    fn test_serialize_nested() {
        let nodes = parse_types("Hash{Symbol=>Array<(Integer)>}").unwrap();
        assert_eq!(
            serde_json::to_value(&nodes).unwrap(),
            json!([{
                "name": "Hash",
                "keys": [{ "name": "Symbol" }],
                "values": [{
                    "name": "Array",
                    "items": [{ "name": "Integer" }],
                    "ordered": true
                }]
            }])
        );
    }

    #[test]
    fn test_literal_and_method_reference() {
        assert!(TypeNode::basic("nil").is_literal());
        assert!(!TypeNode::basic("String").is_literal());
        assert!(TypeNode::basic("#read").is_method_reference());
        assert!(TypeNode::basic(".call").is_method_reference());
    }

    #[test]
    fn test_depth() {
        let nodes = parse_types("Array<Array<Array<Integer>>>").unwrap();
        assert_eq!(nodes[0].depth(), 3);
        assert_eq!(TypeNode::basic("nil").depth(), 0);
    }
}
