// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Hierarchical configuration data model and the contract offered by the
//! versioned tree store. This crate defines how configuration state is
//! addressed ([`NodePath`]), represented ([`Node`]) and diffed
//! ([`Candidate`]), plus the snapshot / modification / commit traits that a
//! backing store must satisfy. The transactional engine lives in the
//! `confplane-data` crate; actual storage engines are external.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod candidate;
pub mod errors;
pub mod node;
pub mod path;
pub mod store;

pub use candidate::{Candidate, CandidateNode, ModificationKind}; // re-export
pub use errors::{CommitFailed, PathError, ValidationError}; // re-export
pub use node::{Node, Scalar}; // re-export
pub use path::{NodePath, PathSegment}; // re-export
pub use store::{DataTree, ReadableTree, TreeModification, TreeRead, TreeSnapshot}; // re-export
