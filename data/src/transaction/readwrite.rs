// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Read-write transaction: a read side and a write side glued together.

use tree::node::Node;
use tree::path::NodePath;

use crate::errors::{CommitError, ReadError, WriteError};
use crate::transaction::{
    LogicalDatastore, ReadOnlyTransaction, TransactionStatus, WriteTransaction,
};

/// Composition of an independent read transaction and write transaction.
/// Reads do not observe this transaction's own staged writes.
pub struct ReadWriteTransaction {
    read: ReadOnlyTransaction,
    write: WriteTransaction,
}

impl ReadWriteTransaction {
    #[must_use]
    pub fn new(read: ReadOnlyTransaction, write: WriteTransaction) -> Self {
        Self { read, write }
    }

    pub fn read(&self, store: LogicalDatastore, path: &NodePath) -> Result<Option<Node>, ReadError> {
        self.read.read(store, path)
    }

    pub fn exists(&self, store: LogicalDatastore, path: &NodePath) -> Result<bool, ReadError> {
        self.read.exists(store, path)
    }

    pub fn put(
        &mut self,
        store: LogicalDatastore,
        path: &NodePath,
        data: Node,
    ) -> Result<(), WriteError> {
        self.write.put(store, path, data)
    }

    pub fn merge(
        &mut self,
        store: LogicalDatastore,
        path: &NodePath,
        data: Node,
    ) -> Result<(), WriteError> {
        self.write.merge(store, path, data)
    }

    pub fn delete(&mut self, store: LogicalDatastore, path: &NodePath) -> Result<(), WriteError> {
        self.write.delete(store, path)
    }

    pub fn cancel(&mut self) -> bool {
        self.write.cancel()
    }

    pub fn submit(&mut self) -> Result<(), CommitError> {
        self.write.submit()
    }

    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.write.status()
    }
}
