// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Contract of the external writer pipeline that applies a diff to the
//! device, including the failure-with-rollback protocol.

use std::fmt;

use ordermap::OrderMap;

use tree::node::Node;
use tree::path::NodePath;
use tree::store::TreeRead;

use crate::errors::{RevertError, UpdateFailure};
use crate::transaction::ReadWriteTransaction;

/// Applies path-keyed before/after node maps to the backing device.
///
/// `update` applies changes in map order and must stop at the first failing
/// path, returning a [`BulkUpdateError`] that can revert what was applied
/// before it. Timeout policy, ordering constraints between writers and the
/// per-fragment encodings all live behind this trait.
pub trait WriterPipeline: Send + Sync {
    fn update(
        &self,
        nodes_before: &OrderMap<NodePath, Node>,
        nodes_after: &OrderMap<NodePath, Node>,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), BulkUpdateError>;
}

/// Writes back the before-state of every path applied before a failure, in
/// reverse application order. Consumed by use.
pub trait Reverter: Send {
    fn revert(self: Box<Self>) -> Result<(), RevertError>;
}

/// Partial-failure signal from the writer pipeline. The error value owns the
/// reverter, so a revert cannot run twice and a success cannot be reverted.
pub struct BulkUpdateError {
    failure: UpdateFailure,
    reverter: Box<dyn Reverter>,
}

impl BulkUpdateError {
    pub fn new(failure: UpdateFailure, reverter: Box<dyn Reverter>) -> Self {
        Self { failure, reverter }
    }

    #[must_use]
    pub fn failure(&self) -> &UpdateFailure {
        &self.failure
    }

    /// Attempt to revert the changes applied before the failure. Consumes
    /// the error; returns the original failure alongside the revert outcome.
    pub fn revert_changes(self) -> (UpdateFailure, Result<(), RevertError>) {
        let outcome = self.reverter.revert();
        (self.failure, outcome)
    }
}

impl fmt::Debug for BulkUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkUpdateError")
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for BulkUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bulk update failed: {}", self.failure)
    }
}

impl std::error::Error for BulkUpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.failure)
    }
}

/// Everything a writer needs while applying one transaction: the
/// pre-modification state, the post-modification state, and a read-write
/// transaction on the mapping context for translation metadata.
pub struct WriteContext<'a> {
    before: &'a dyn TreeRead,
    after: &'a dyn TreeRead,
    mapping: ReadWriteTransaction,
}

impl<'a> WriteContext<'a> {
    pub fn new(
        before: &'a dyn TreeRead,
        after: &'a dyn TreeRead,
        mapping: ReadWriteTransaction,
    ) -> Self {
        Self {
            before,
            after,
            mapping,
        }
    }

    /// Read the state as it was when the transaction opened.
    #[must_use]
    pub fn read_before(&self, path: &NodePath) -> Option<Node> {
        self.before.read(path)
    }

    /// Read the state including the staged modifications.
    #[must_use]
    pub fn read_after(&self, path: &NodePath) -> Option<Node> {
        self.after.read(path)
    }

    /// The mapping-context transaction, co-committed with the main tree.
    pub fn mapping(&mut self) -> &mut ReadWriteTransaction {
        &mut self.mapping
    }

    pub(crate) fn into_mapping(self) -> ReadWriteTransaction {
        self.mapping
    }
}
