//! Parse tree nodes.
//!
//! A `TreeNode` is the default value of a reduction: it records which
//! alternative of which target matched, and the symbols and values that
//! made it up. Names and values are parallel and fixed at construction.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Attribute keys that collide with node structure and cannot be set.
pub const RESERVED_ATTRIBUTES: [&str; 4] = ["target", "option", "names", "values"];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("node `{target}` has {names} names but {values} values")]
    ArityMismatch {
        target: String,
        names: usize,
        values: usize,
    },

    #[error("attribute `{0}` is reserved")]
    ReservedAttribute(String),

    #[error("`{0}` is not a valid attribute name")]
    InvalidAttribute(String),
}

/// One reduction of the grammar, as a tree node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTreeNode")]
pub struct TreeNode {
    target: String,
    option: usize,
    names: Vec<String>,
    values: Vec<Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attributes: IndexMap<String, String>,
}

/// Deserialized fields of a [`TreeNode`], checked before use.
#[derive(Deserialize)]
struct RawTreeNode {
    target: String,
    option: usize,
    names: Vec<String>,
    values: Vec<Value>,
    #[serde(default)]
    attributes: IndexMap<String, String>,
}

impl TryFrom<RawTreeNode> for TreeNode {
    type Error = NodeError;

    fn try_from(raw: RawTreeNode) -> Result<Self, Self::Error> {
        let mut node = TreeNode::new(raw.target, raw.option, raw.names, raw.values)?;
        for (key, value) in raw.attributes {
            node.set_attribute(key, value)?;
        }
        Ok(node)
    }
}

impl TreeNode {
    /// Build a node from a reduction.
    pub fn new(
        target: impl Into<String>,
        option: usize,
        names: Vec<String>,
        values: Vec<Value>,
    ) -> Result<Self, NodeError> {
        let target = target.into();
        if names.len() != values.len() {
            return Err(NodeError::ArityMismatch {
                target,
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            target,
            option,
            names,
            values,
            attributes: IndexMap::new(),
        })
    }

    /// A node for an empty alternative.
    pub fn leaf(target: impl Into<String>, option: usize) -> Self {
        Self {
            target: target.into(),
            option,
            names: Vec::new(),
            values: Vec::new(),
            attributes: IndexMap::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Index of the alternative that matched.
    pub fn option(&self) -> usize {
        self.option
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the `index`-th term.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Follow a path of term indices through nested nodes.
    ///
    /// `get_path(&[1, 0])` is the first term of the node in term 1.
    /// An empty path has no value.
    pub fn get_path(&self, path: &[usize]) -> Option<&Value> {
        let (&last, init) = path.split_last()?;
        let mut node = self;
        for &index in init {
            node = node.get(index)?.as_node()?;
        }
        node.get(last)
    }

    /// `(name, value)` pairs in term order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set a user attribute, returning the previous value.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, NodeError> {
        let key = key.into();
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
            return Err(NodeError::ReservedAttribute(key));
        }
        if !is_attribute_name(&key) {
            return Err(NodeError::InvalidAttribute(key));
        }
        Ok(self.attributes.insert(key, value.into()))
    }

    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, NodeError> {
        self.set_attribute(key, value)?;
        Ok(self)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Take the node apart: target, option, names, values.
    pub fn into_parts(self) -> (String, usize, Vec<String>, Vec<Value>) {
        (self.target, self.option, self.names, self.values)
    }

    /// Indented textual rendering of the tree, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        let _ = write!(out, "{pad}{}:{}", self.target, self.option);
        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}={value:?}");
        }
        out.push('\n');
        for (name, value) in self.children() {
            match value {
                Value::Node(child) => child.dump_into(out, depth + 1),
                Value::Empty => {
                    let _ = writeln!(out, "{pad}  {name}");
                }
                other => {
                    let _ = writeln!(out, "{pad}  {name} {:?}", other.to_string());
                }
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}", self.target, self.option)?;
        for name in &self.names {
            write!(f, " {name}")?;
        }
        f.write_str(">")
    }
}

/// Whether `name` may appear as a markup element or attribute name.
///
/// ASCII letters, digits, `_`, `-` and `.`, starting with a letter or `_`.
/// The `xml` prefix is reserved by the markup format.
pub(crate) fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}
