//! Parsed message trees and key navigation.

use std::collections::{BTreeMap, BTreeSet};

use serde_norway::Value;

use super::key_path::KeyPath;

/// One value inside a [`MessageTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum MessageNode {
    /// Translatable string leaf.
    Text(String),
    /// Nested mapping.
    Branch(MessageTree),
    /// Any other YAML value (numbers, lists, booleans, null). Never returned as a translation.
    Other(Value),
}

/// Recursive mapping of message keys to strings or nested trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageTree {
    entries: BTreeMap<String, MessageNode>,
}

/// Outcome of walking a [`KeyPath`] through a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The path ends on a string leaf.
    Found(&'a str),
    /// Segment `at` is absent (or null).
    Missing {
        /// Index of the missing segment.
        at: usize,
    },
    /// The value before segment `at` is not a mapping.
    NotAMapping {
        /// Index of the segment that could not be entered.
        at: usize,
    },
    /// The path exists but ends on something other than a string.
    NotAString,
}

impl MessageTree {
    /// Empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Convert a parsed YAML mapping into a tree.
    ///
    /// Inputs:
    /// - `mapping`: Root mapping of a message source
    ///
    /// Output:
    /// - `MessageTree` with string, branch and other nodes
    ///
    /// Details:
    /// - String keys are kept as-is; numeric and boolean keys are stringified.
    /// - Other key types cannot be addressed by a key path and are skipped.
    /// - Tagged values are unwrapped to their inner value.
    #[must_use]
    pub fn from_mapping(mapping: serde_norway::Mapping) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in mapping {
            let Some(key) = key_to_string(&key) else {
                tracing::debug!(key = ?key, "skipping non-scalar message key");
                continue;
            };
            entries.insert(key, MessageNode::from_value(value));
        }
        Self { entries }
    }

    /// What: Insert or replace a node, returning the tree for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, node: MessageNode) -> Self {
        self.entries.insert(key.into(), node);
        self
    }

    /// What: Insert or replace a string leaf, returning the tree for chaining.
    #[must_use]
    pub fn with_text(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(key, MessageNode::Text(text.into()))
    }

    /// What: Insert or replace a nested tree, returning the tree for chaining.
    #[must_use]
    pub fn with_branch(self, key: impl Into<String>, branch: Self) -> Self {
        self.with(key, MessageNode::Branch(branch))
    }

    /// Direct child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MessageNode> {
        self.entries.get(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MessageNode)> {
        self.entries.iter()
    }

    /// What: Walk `path` segment by segment.
    ///
    /// Inputs:
    /// - `path`: Key path to resolve
    ///
    /// Output:
    /// - `Lookup` describing where and why the walk stopped
    ///
    /// Details:
    /// - Null values count as missing keys.
    /// - An empty path ends on the tree itself, which is not a string.
    #[must_use]
    pub fn lookup(&self, path: &KeyPath) -> Lookup<'_> {
        let mut current = Cursor::Tree(self);
        for (at, segment) in path.segments().iter().enumerate() {
            let Cursor::Tree(tree) = current else {
                return Lookup::NotAMapping { at };
            };
            match tree.get(segment) {
                None | Some(MessageNode::Other(Value::Null)) => return Lookup::Missing { at },
                Some(MessageNode::Branch(next)) => current = Cursor::Tree(next),
                Some(node) => current = Cursor::Leaf(node),
            }
        }
        match current {
            Cursor::Leaf(MessageNode::Text(text)) => Lookup::Found(text),
            _ => Lookup::NotAString,
        }
    }

    /// What: Collect every leaf as a dot-joined full key.
    ///
    /// Output:
    /// - Set of keys such as `{"a.b", "a.c"}` for `{a: {b: "1", c: "2"}}`
    ///
    /// Details:
    /// - Descends into nested mappings; every non-mapping value is a terminal.
    /// - Empty nested mappings contribute no keys.
    #[must_use]
    pub fn flatten_keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        self.collect_keys("", &mut keys);
        keys
    }

    fn collect_keys(&self, prefix: &str, keys: &mut BTreeSet<String>) {
        for (key, node) in &self.entries {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                MessageNode::Branch(branch) => branch.collect_keys(&full_key, keys),
                MessageNode::Text(_) | MessageNode::Other(_) => {
                    keys.insert(full_key);
                }
            }
        }
    }
}

impl MessageNode {
    /// What: Convert one YAML value into a node.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Mapping(mapping) => Self::Branch(MessageTree::from_mapping(mapping)),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            other => Self::Other(other),
        }
    }
}

/// Position reached while walking a path.
#[derive(Clone, Copy)]
enum Cursor<'a> {
    Tree(&'a MessageTree),
    Leaf(&'a MessageNode),
}

/// What: Turn a scalar YAML key into the string a key path would use.
fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
