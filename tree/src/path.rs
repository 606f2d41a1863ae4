// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Hierarchical addressing of locations in the configuration tree

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Scalar;

/// One step in a [`NodePath`]. A segment addressing a list entry carries the
/// entry keys, so two entries of the same list get distinct segments.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    name: String,
    keys: BTreeMap<String, Scalar>,
}

impl PathSegment {
    /// Build a plain (key-less) segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Build a keyed segment addressing one list entry.
    pub fn keyed<K, V>(name: impl Into<String>, keys: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        Self {
            name: name.into(),
            keys: keys
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn keys(&self) -> &BTreeMap<String, Scalar> {
        &self.keys
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.keys {
            write!(f, "[{key}={value}]")?;
        }
        Ok(())
    }
}

/// Ordered sequence of [`PathSegment`]s identifying a location in the tree.
/// Immutable value type with structural equality, ordering and hashing, so it
/// can key update maps.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The path of the tree root (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Extend this path with one more segment, yielding the child path.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The path of the parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parse a slash-separated path of plain segments (`"/a/b/c"`). Keyed
/// segments must be built with [`PathSegment::keyed`] and [`NodePath::child`].
impl From<&str> for NodePath {
    fn from(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(PathSegment::new)
                .collect(),
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_and_display_round_trip() {
        let path = NodePath::from("/interfaces/interface");
        assert_eq!(path.len(), 2);
        assert_eq!(path.to_string(), "/interfaces/interface");
        assert_eq!(NodePath::root().to_string(), "/");
    }

    #[test]
    fn keyed_segments_distinguish_list_entries() {
        let base = NodePath::from("/interfaces");
        let eth0 = base.child(PathSegment::keyed("interface", [("name", "eth0")]));
        let eth1 = base.child(PathSegment::keyed("interface", [("name", "eth1")]));
        assert_ne!(eth0, eth1);
        assert_eq!(eth0.to_string(), "/interfaces/interface[name=eth0]");
    }

    #[test]
    fn parent_walks_up_to_root() {
        let path = NodePath::from("/a/b");
        let parent = path.parent().expect("non-root path has a parent");
        assert_eq!(parent, NodePath::from("/a"));
        assert_eq!(parent.parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
    }
}
