// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors raised by tree store implementations

use thiserror::Error;

use crate::path::NodePath;

/// The reasons a store may refuse to validate a sealed modification. Raised
/// before any mutation becomes visible, so always locally recoverable by
/// discarding the transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("schema violation at {path}: {reason}")]
    Schema { path: NodePath, reason: String },
    #[error("constraint violation at {path}: {reason}")]
    Constraint { path: NodePath, reason: String },
    #[error("tree changed since snapshot at {0}")]
    ConcurrentModification(NodePath),
}

/// Errors from staging a write/merge/delete into a modification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("cannot write below leaf node on the way to {0}")]
    NotAContainer(NodePath),
    #[error("modification is sealed and can no longer be changed")]
    Sealed,
}

/// Store-side failure to commit a prepared candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitFailed {
    #[error("candidate is stale: tree changed since prepare")]
    Stale,
    #[error("store rejected commit: {0}")]
    Rejected(String),
}
