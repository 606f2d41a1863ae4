// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Contract a backing tree store must satisfy.
//!
//! The store is snapshot-isolated: [`DataTree::take_snapshot`] yields an
//! immutable point-in-time view, a snapshot mints at most one
//! [`TreeModification`], and a sealed modification is validated and prepared
//! into a [`Candidate`] which the store commits. Many snapshots may coexist;
//! a modification is invisible to other snapshots until committed.
//!
//! `validate` and `prepare` hang off the modification (which was minted by
//! its own store) rather than taking the store and the modification as a
//! pair; this keeps every trait object-safe so pipelines can be wired over
//! `Arc<dyn DataTree>` without knowing the engine.

use std::sync::Arc;

use crate::candidate::Candidate;
use crate::errors::{CommitFailed, PathError, ValidationError};
use crate::node::Node;
use crate::path::NodePath;

/// Read access to one tree view. Implemented by snapshots and modifications;
/// a read reflects staged-but-uncommitted state when the view is a
/// modification.
pub trait TreeRead: Send {
    /// Read the node at `path`, or `None` when not present. Reads never fail.
    fn read(&self, path: &NodePath) -> Option<Node>;
}

impl<T: TreeRead + Sync + ?Sized> TreeRead for Arc<T> {
    fn read(&self, path: &NodePath) -> Option<Node> {
        (**self).read(path)
    }
}

impl<T: TreeRead + ?Sized> TreeRead for Box<T> {
    fn read(&self, path: &NodePath) -> Option<Node> {
        (**self).read(path)
    }
}

/// Shareable read-only view of a whole store (e.g. the operational tree).
pub trait ReadableTree: TreeRead + Sync {}
impl<T: TreeRead + Sync + ?Sized> ReadableTree for T {}

/// Immutable point-in-time view of a tree.
pub trait TreeSnapshot: TreeRead {
    /// Derive a mutable staging area rooted at this snapshot. Consumes the
    /// snapshot so the modification owns its base exclusively.
    fn new_modification(self: Box<Self>) -> Box<dyn TreeModification>;
}

/// Mutable staging area of writes against one snapshot. Owned exclusively by
/// one transaction; not safe for concurrent use.
pub trait TreeModification: TreeRead {
    /// Stage a write (create or replace) at `path`.
    fn write(&mut self, path: &NodePath, data: Node) -> Result<(), PathError>;

    /// Stage a merge at `path` (containers unioned, leaves replaced).
    fn merge(&mut self, path: &NodePath, data: Node) -> Result<(), PathError>;

    /// Stage a delete at `path`. Deleting an absent path is a no-op.
    fn delete(&mut self, path: &NodePath) -> Result<(), PathError>;

    /// Seal the modification; subsequent writes fail with
    /// [`PathError::Sealed`]. Reads stay valid.
    fn ready(&mut self);

    /// Check the sealed modification against the store's schema and
    /// constraints. Must not mutate anything.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Produce the before/after candidate for this modification. Called once
    /// per transaction, after a successful `validate`.
    fn prepare(&self) -> Result<Candidate, ValidationError>;
}

/// A snapshot-isolated hierarchical store.
pub trait DataTree: Send + Sync {
    /// Capture an immutable view of the current tree state.
    fn take_snapshot(&self) -> Box<dyn TreeSnapshot>;

    /// Commit a prepared candidate, making its after-state the new tree
    /// state. The store is the sole arbiter of write-write conflicts and may
    /// reject a candidate whose base moved.
    fn commit(&self, candidate: Candidate) -> Result<(), CommitFailed>;
}
