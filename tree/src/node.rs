// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! In-memory representation of configuration tree nodes.
//!
//! Every node carries an explicit structural shape. The wrapper shapes
//! (list / choice / augmentation) exist in the schema but have no standalone
//! identity on the device; the diff engine classifies them with the
//! predicates below instead of runtime type checks.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::{NodePath, PathSegment};

/// A leaf value. Closed set of the scalar types carried by configuration
/// leaves; structural equality is what the diff engine compares.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Uint(u64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Uint(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}
impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}
impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}
impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Uint(v)
    }
}
impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

/// Children of a composite node, keyed by segment. A `BTreeMap` keeps
/// iteration deterministic, which in turn keeps diff and writer ordering
/// deterministic.
pub type Children = BTreeMap<PathSegment, Node>;

/// A configuration tree node tagged with its structural shape.
///
/// `ListWrapper`, `ChoiceWrapper` and `AugmentationWrapper` are "mixin"
/// wrappers: schema artifacts without independent identity. Augmentation
/// wrappers are the one mixin kind that is still reportable as a modified
/// unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Leaf(Scalar),
    Container(Children),
    ListWrapper(Children),
    ChoiceWrapper(Children),
    AugmentationWrapper(Children),
}

impl Node {
    /// Build a leaf node from any scalar-convertible value.
    pub fn leaf(value: impl Into<Scalar>) -> Self {
        Node::Leaf(value.into())
    }

    /// Build an empty container.
    #[must_use]
    pub fn container() -> Self {
        Node::Container(Children::new())
    }

    #[must_use]
    pub fn list_wrapper() -> Self {
        Node::ListWrapper(Children::new())
    }

    #[must_use]
    pub fn choice_wrapper() -> Self {
        Node::ChoiceWrapper(Children::new())
    }

    #[must_use]
    pub fn augmentation_wrapper() -> Self {
        Node::AugmentationWrapper(Children::new())
    }

    /// Builder-style child insertion, mostly for assembling fixtures and
    /// literals. No-op on leaves.
    #[must_use]
    pub fn with_child(mut self, segment: impl Into<PathSegment>, child: Node) -> Self {
        if let Some(children) = self.children_mut() {
            children.insert(segment.into(), child);
        }
        self
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Structural wrapper with no standalone identity.
    #[must_use]
    pub fn is_mixin(&self) -> bool {
        matches!(
            self,
            Node::ListWrapper(_) | Node::ChoiceWrapper(_) | Node::AugmentationWrapper(_)
        )
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Node::ChoiceWrapper(_))
    }

    #[must_use]
    pub fn is_augmentation(&self) -> bool {
        matches!(self, Node::AugmentationWrapper(_))
    }

    #[must_use]
    pub fn value(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Leaf(_) => None,
            Node::Container(children)
            | Node::ListWrapper(children)
            | Node::ChoiceWrapper(children)
            | Node::AugmentationWrapper(children) => Some(children),
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Node::Leaf(_) => None,
            Node::Container(children)
            | Node::ListWrapper(children)
            | Node::ChoiceWrapper(children)
            | Node::AugmentationWrapper(children) => Some(children),
        }
    }

    #[must_use]
    pub fn child(&self, segment: &PathSegment) -> Option<&Node> {
        self.children().and_then(|children| children.get(segment))
    }

    /// Descend from this node along a relative path.
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        let mut current = self;
        for segment in path.segments() {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Merge `other` into this node. Composite nodes of the same shape are
    /// merged child-by-child; everything else (leaves, shape mismatches) is
    /// replaced by `other`.
    pub fn merge_from(&mut self, other: Node) {
        if std::mem::discriminant(self) != std::mem::discriminant(&other) {
            *self = other;
            return;
        }
        match other {
            Node::Leaf(_) => *self = other,
            Node::Container(incoming)
            | Node::ListWrapper(incoming)
            | Node::ChoiceWrapper(incoming)
            | Node::AugmentationWrapper(incoming) => {
                if let Some(children) = self.children_mut() {
                    for (segment, child) in incoming {
                        match children.get_mut(&segment) {
                            Some(existing) => existing.merge_from(child),
                            None => {
                                children.insert(segment, child);
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wrapper_classification() {
        assert!(Node::leaf("x").is_leaf());
        assert!(!Node::container().is_mixin());
        assert!(Node::list_wrapper().is_mixin());
        assert!(Node::choice_wrapper().is_mixin());
        assert!(Node::choice_wrapper().is_choice());
        assert!(Node::augmentation_wrapper().is_mixin());
        assert!(Node::augmentation_wrapper().is_augmentation());
    }

    #[test]
    fn get_descends_relative_paths() {
        let root = Node::container()
            .with_child("a", Node::container().with_child("b", Node::leaf("v1")));
        assert_eq!(
            root.get(&NodePath::from("/a/b")),
            Some(&Node::leaf("v1"))
        );
        assert_eq!(root.get(&NodePath::from("/a/missing")), None);
        assert_eq!(root.get(&NodePath::root()), Some(&root));
    }

    #[test]
    fn merge_unions_containers_and_replaces_leaves() {
        let mut target = Node::container()
            .with_child("kept", Node::leaf("old"))
            .with_child("replaced", Node::leaf("old"));
        let incoming = Node::container()
            .with_child("replaced", Node::leaf("new"))
            .with_child("added", Node::leaf("new"));
        target.merge_from(incoming);

        let expected = Node::container()
            .with_child("kept", Node::leaf("old"))
            .with_child("replaced", Node::leaf("new"))
            .with_child("added", Node::leaf("new"));
        assert_eq!(target, expected);
    }

    #[test]
    fn merge_replaces_on_shape_mismatch() {
        let mut target = Node::container().with_child("a", Node::leaf("x"));
        target.merge_from(Node::leaf("y"));
        assert_eq!(target, Node::leaf("y"));
    }
}
