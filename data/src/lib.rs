// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Transactional diff-and-apply engine for device configuration.
//!
//! The configuration store is a snapshot-isolated tree (`confplane-tree`).
//! This crate layers the transactional machinery on top: per-transaction
//! modification lifecycle ([`configtree`]), minimal-diff computation
//! ([`diff`]), propagation of accepted changes to the device through a
//! revert-capable writer pipeline ([`delegator`], [`writer`]), the
//! per-call-site transaction adapters ([`transaction`]) and the broker that
//! wires them per deployment pipeline ([`broker`]).

#![deny(
    unsafe_code,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod broker;
pub mod configtree;
pub mod delegator;
pub mod diff;
pub mod errors;
pub mod transaction;
pub mod writer;

#[cfg(test)]
mod diff_test;

pub use broker::DataBroker; // re-export
pub use configtree::{CandidateHook, ConfigDataTree, ConfigModification, NoopHook}; // re-export
pub use delegator::{IdentityCodec, NodeCodec, WriteDelegator}; // re-export
pub use diff::{ModificationDiff, NormalizedNodeUpdate}; // re-export
pub use errors::{ApplyError, CommitError, ReadError, RevertError, UpdateFailure, WriteError}; // re-export
pub use transaction::{
    LogicalDatastore, ReadOnlyTransaction, ReadWriteTransaction, TransactionStatus,
    WriteTransaction,
}; // re-export
pub use writer::{BulkUpdateError, Reverter, WriteContext, WriterPipeline}; // re-export
