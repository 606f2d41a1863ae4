// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Prepared modification candidates: the before/after tree a store produces
//! from a sealed modification, consumed once by the commit hook and once by
//! the final store commit.

use std::collections::BTreeMap;

use crate::node::Node;
use crate::path::{NodePath, PathSegment};

/// How a single candidate node was touched by the modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModificationKind {
    /// Node written (created or replaced) at this path.
    Write,
    /// Node deleted at this path.
    Delete,
    /// Node untouched.
    Unmodified,
    /// Node itself untouched, but some descendant changed.
    SubtreeModified,
}

/// One node of a prepared candidate: the before/after data pair plus the
/// per-node modification kind reported by the store. Children are keyed by
/// segment so traversal order is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateNode {
    pub data_before: Option<Node>,
    pub data_after: Option<Node>,
    pub kind: ModificationKind,
    pub children: BTreeMap<PathSegment, CandidateNode>,
}

impl CandidateNode {
    #[must_use]
    pub fn new(kind: ModificationKind, data_before: Option<Node>, data_after: Option<Node>) -> Self {
        Self {
            data_before,
            data_after,
            kind,
            children: BTreeMap::new(),
        }
    }

    /// Builder-style child insertion for assembling candidates in tests and
    /// store implementations.
    #[must_use]
    pub fn with_child(mut self, segment: impl Into<PathSegment>, child: CandidateNode) -> Self {
        self.children.insert(segment.into(), child);
        self
    }

    /// The representative data of this node: after-state if present, else
    /// before-state. Some stores emit candidate nodes with both sides absent.
    #[must_use]
    pub fn data(&self) -> Option<&Node> {
        self.data_after.as_ref().or(self.data_before.as_ref())
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.data().is_some_and(Node::is_leaf)
    }

    #[must_use]
    pub fn is_mixin(&self) -> bool {
        self.data().is_some_and(Node::is_mixin)
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.data().is_some_and(Node::is_choice)
    }

    #[must_use]
    pub fn is_augmentation(&self) -> bool {
        self.data().is_some_and(Node::is_augmentation)
    }
}

/// A whole prepared candidate: the root candidate node plus the path it is
/// rooted at. Produced exactly once per transaction by `prepare`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub root_path: NodePath,
    pub root: CandidateNode,
}

impl Candidate {
    #[must_use]
    pub fn new(root_path: NodePath, root: CandidateNode) -> Self {
        Self { root_path, root }
    }
}
