//! Nested status tree built from the XML report

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of a [`StatusTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusNode {
    /// Trimmed character data of a leaf element
    Value(String),
    /// Child elements keyed by (disambiguated) name
    Branch(StatusTree),
}

impl StatusNode {
    /// Returns the text if this node is a leaf
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Branch(_) => None,
        }
    }

    /// Returns the subtree if this node is a branch
    #[must_use]
    pub const fn as_branch(&self) -> Option<&StatusTree> {
        match self {
            Self::Value(_) => None,
            Self::Branch(t) => Some(t),
        }
    }
}

/// Dynamically keyed mapping mirroring the element hierarchy
///
/// Serializes to plain nested JSON objects with string leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTree {
    entries: BTreeMap<String, StatusNode>,
}

impl StatusTree {
    /// Creates an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree has no children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates direct children in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct child keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the node at `path`, descending through branches
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&StatusNode> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.entries.get(segment.as_ref())?.as_branch()?;
        }
        current.entries.get(last.as_ref())
    }

    /// Returns the leaf text at `path`
    #[must_use]
    pub fn value<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.get(path)?.as_value()
    }

    /// Returns the direct child subtree named `key`
    #[must_use]
    pub fn branch(&self, key: &str) -> Option<&StatusTree> {
        self.entries.get(key)?.as_branch()
    }

    /// Returns the leaf text at a dotted path such as `SERVICE-1.NAME`
    #[must_use]
    pub fn lookup(&self, dotted: &str) -> Option<&str> {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.value(&segments)
    }

    /// Assigns `value` at `path`, creating intermediate branches.
    ///
    /// Later assignments to the same path overwrite earlier ones. A leaf met
    /// on the way down is replaced by a branch. An empty path is ignored.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], value: impl Into<String>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = self;
        for segment in parents {
            let key = segment.as_ref();
            if !matches!(current.entries.get(key), Some(StatusNode::Branch(_))) {
                current
                    .entries
                    .insert(key.to_string(), StatusNode::Branch(Self::new()));
            }
            let Some(StatusNode::Branch(next)) = current.entries.get_mut(key) else {
                return;
            };
            current = next;
        }

        current
            .entries
            .insert(last.as_ref().to_string(), StatusNode::Value(value.into()));
    }
}

impl<'a> IntoIterator for &'a StatusTree {
    type Item = (&'a String, &'a StatusNode);
    type IntoIter = std::collections::btree_map::Iter<'a, String, StatusNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Service key used in the tree for the `n`th `SERVICE` element (1-based)
#[must_use]
pub fn service_key(n: u32) -> String {
    format!("SERVICE-{n}")
}

/// Result of folding one status report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDocument {
    /// The nested mapping
    pub tree: StatusTree,
    /// Number of `SERVICE` elements seen, in document order
    pub service_count: u32,
}

impl StatusDocument {
    /// Subtree of the `n`th service (1-based), if it carried any data
    #[must_use]
    pub fn service(&self, n: u32) -> Option<&StatusTree> {
        self.tree.branch(&service_key(n))
    }

    /// Iterates `(n, subtree)` for every numbered service present at the
    /// top level of the tree
    pub fn services(&self) -> impl Iterator<Item = (u32, &StatusTree)> {
        (1..=self.service_count).filter_map(|n| self.service(n).map(|tree| (n, tree)))
    }

    /// Serializes the tree to a JSON value for external renderers
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "tree": self.tree,
            "service_count": self.service_count,
        })
    }
}
