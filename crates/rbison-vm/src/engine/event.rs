//! Reduction events.

use rbison_core::{NodeError, TreeNode, Value};

/// One reduction: the target, which alternative matched, and the symbols
/// and semantic values of the alternative.
///
/// Without a handler, the event itself becomes the reduction value as a
/// [`TreeNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParseEvent {
    node: TreeNode,
}

impl ParseEvent {
    pub fn new(
        target: impl Into<String>,
        option: usize,
        names: Vec<String>,
        values: Vec<Value>,
    ) -> Result<Self, NodeError> {
        Ok(Self {
            node: TreeNode::new(target, option, names, values)?,
        })
    }

    pub fn target(&self) -> &str {
        self.node.target()
    }

    /// Index of the alternative, in declaration order.
    pub fn option(&self) -> usize {
        self.node.option()
    }

    pub fn names(&self) -> &[String] {
        self.node.names()
    }

    pub fn values(&self) -> &[Value] {
        self.node.values()
    }

    pub fn len(&self) -> usize {
        self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.node.get(index)
    }

    /// Token text of the `index`-th symbol.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.value(index)?.as_token()
    }

    /// The event as a tree node.
    pub fn into_node(self) -> TreeNode {
        self.node
    }

    /// Semantic values, consuming the event.
    pub fn into_values(self) -> Vec<Value> {
        self.node.into_parts().3
    }
}
