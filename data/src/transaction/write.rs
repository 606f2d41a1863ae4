// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Write transaction adapter: stages writes into per-store modifications and
//! drives validate-then-commit on submit.

use tracing::{debug, error};

use tree::node::Node;
use tree::path::NodePath;

use crate::configtree::ConfigModification;
use crate::errors::{CommitError, WriteError};
use crate::transaction::{LogicalDatastore, TransactionStatus};

/// Write path of a transaction. Holds one modification per wired store;
/// writing to a store whose handle is absent fails rather than being dropped.
///
/// Submit validates every held modification before committing any of them, so
/// a validation failure in one store leaves all stores untouched.
pub struct WriteTransaction {
    config: Option<ConfigModification>,
    operational: Option<ConfigModification>,
    status: TransactionStatus,
}

impl WriteTransaction {
    #[must_use]
    pub fn create(config: ConfigModification, operational: ConfigModification) -> Self {
        Self {
            config: Some(config),
            operational: Some(operational),
            status: TransactionStatus::New,
        }
    }

    #[must_use]
    pub fn create_config_only(config: ConfigModification) -> Self {
        Self {
            config: Some(config),
            operational: None,
            status: TransactionStatus::New,
        }
    }

    #[must_use]
    pub fn create_operational_only(operational: ConfigModification) -> Self {
        Self {
            config: None,
            operational: Some(operational),
            status: TransactionStatus::New,
        }
    }

    fn modification(
        &mut self,
        store: LogicalDatastore,
    ) -> Result<&mut ConfigModification, WriteError> {
        if self.status != TransactionStatus::New {
            return Err(WriteError::AlreadyClosed);
        }
        let handle = match store {
            LogicalDatastore::Configuration => self.config.as_mut(),
            LogicalDatastore::Operational => self.operational.as_mut(),
        };
        handle.ok_or(WriteError::UnsupportedStore(store))
    }

    /// Stage a write, replacing whatever is at `path`.
    pub fn put(
        &mut self,
        store: LogicalDatastore,
        path: &NodePath,
        data: Node,
    ) -> Result<(), WriteError> {
        self.modification(store)?.write(path, data)
    }

    /// Stage a merge into the node at `path`.
    pub fn merge(
        &mut self,
        store: LogicalDatastore,
        path: &NodePath,
        data: Node,
    ) -> Result<(), WriteError> {
        self.modification(store)?.merge(path, data)
    }

    /// Stage a delete of the node at `path`. Deleting an absent node is a
    /// no-op.
    pub fn delete(&mut self, store: LogicalDatastore, path: &NodePath) -> Result<(), WriteError> {
        self.modification(store)?.delete(path)
    }

    /// Discard all staged writes. Returns true if the transaction was still
    /// open; canceling a submitted or canceled transaction has no effect.
    pub fn cancel(&mut self) -> bool {
        if self.status != TransactionStatus::New {
            return false;
        }
        self.config = None;
        self.operational = None;
        self.status = TransactionStatus::Canceled;
        debug!("transaction canceled");
        true
    }

    /// Validate and commit the staged writes. The transaction terminates in
    /// `Committed` or `Failed` either way and accepts no further writes.
    pub fn submit(&mut self) -> Result<(), CommitError> {
        if self.status != TransactionStatus::New {
            return Err(CommitError::IllegalState(
                "transaction was already submitted or canceled",
            ));
        }
        self.status = TransactionStatus::Submitted;
        match self.do_submit() {
            Ok(()) => {
                self.status = TransactionStatus::Committed;
                debug!("transaction committed");
                Ok(())
            }
            Err(e) => {
                self.status = TransactionStatus::Failed;
                error!("transaction failed: {e}");
                Err(e)
            }
        }
    }

    fn do_submit(&mut self) -> Result<(), CommitError> {
        /* validate everything before committing anything */
        if let Some(config) = self.config.as_mut() {
            config.validate()?;
        }
        if let Some(operational) = self.operational.as_mut() {
            operational.validate()?;
        }
        if let Some(config) = self.config.take() {
            config.commit()?;
        }
        if let Some(operational) = self.operational.take() {
            operational.commit()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.status
    }
}
