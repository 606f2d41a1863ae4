// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Test doubles for the transactional engine: an in-memory snapshot-isolated
//! store and a recording writer pipeline with injectable failures.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]

pub mod pipeline;
pub mod store;

pub use pipeline::RecordingPipeline; // re-export
pub use store::TestStore; // re-export
