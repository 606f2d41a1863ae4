// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Error taxonomy of the transactional engine.
//!
//! Validation failures never reach the writer pipeline; pipeline failures
//! are always followed by exactly one revert attempt, and the two possible
//! outcomes surface as distinct [`ApplyError`] variants so callers can tell
//! "device unchanged" from "device possibly inconsistent" apart.

use thiserror::Error;

use tree::errors::{CommitFailed, PathError, ValidationError};
use tree::path::NodePath;

use crate::transaction::LogicalDatastore;

/// Failure of a read through a transaction adapter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("reads from the {0} store are not supported by this transaction")]
    UnsupportedStore(LogicalDatastore),
    #[error("failed to check existence at {path}")]
    ExistsFailed {
        path: NodePath,
        #[source]
        source: Box<ReadError>,
    },
}

/// Failure of a write through a transaction adapter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("modification of the {0} store is not supported by this transaction")]
    UnsupportedStore(LogicalDatastore),
    #[error("transaction was already submitted or canceled")]
    AlreadyClosed,
    #[error(transparent)]
    Path(#[from] PathError),
}

/// The cause carried by a partial writer-pipeline failure: which path failed
/// and why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("update of {path} failed: {reason}")]
pub struct UpdateFailure {
    pub path: NodePath,
    pub reason: String,
}

/// Failure while writing back the before-state of already-applied paths.
/// The most severe outcome: the device and the configuration tree may now
/// disagree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to revert {path}: {reason}")]
pub struct RevertError {
    pub path: NodePath,
    pub reason: String,
}

/// Failure while turning an accepted candidate into device writes.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Generic translation failure between tree and device representations.
    #[error("failed to translate data for the writer pipeline: {0}")]
    Translation(String),
    /// The mapping context co-commit failed after device writes were applied.
    #[error("error while updating mapping context data")]
    ContextCommit(#[source] Box<CommitError>),
    /// The pipeline failed partway and every previously applied path was
    /// written back. The device is unchanged.
    #[error("bulk update failed; applied changes were reverted")]
    RevertedUpdate(#[source] UpdateFailure),
    /// The pipeline failed partway and the revert failed too. The device may
    /// be inconsistent with the configuration tree.
    #[error("bulk update failed and revert failed; device state may be inconsistent: {cause}")]
    RevertFailed {
        cause: UpdateFailure,
        #[source]
        revert: RevertError,
    },
}

/// Failure to submit a transaction.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("failed to validate modification")]
    Validation(#[from] ValidationError),
    #[error("failed to apply changes")]
    Apply(#[from] ApplyError),
    #[error("store rejected the prepared candidate")]
    Store(#[from] CommitFailed),
    #[error("illegal transaction state: {0}")]
    IllegalState(&'static str),
}
