// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per-call-site transaction adapters over the two logical stores.

use std::fmt;

pub mod read;
pub mod readwrite;
pub mod write;

pub use read::ReadOnlyTransaction; // re-export
pub use readwrite::ReadWriteTransaction; // re-export
pub use write::WriteTransaction; // re-export

/// The two logical stores a transaction may address: intended configuration
/// (read-write on the main pipeline) and operational state (read-only,
/// reflects the device).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalDatastore {
    Configuration,
    Operational,
}

impl fmt::Display for LogicalDatastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalDatastore::Configuration => write!(f, "configuration"),
            LogicalDatastore::Operational => write!(f, "operational"),
        }
    }
}

/// Coarse externally-visible transaction state. A transaction holds its
/// modifications only while `New`; once submitted it always terminates in
/// `Committed` or `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    New,
    Submitted,
    Committed,
    Canceled,
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::New => write!(f, "new"),
            TransactionStatus::Submitted => write!(f, "submitted"),
            TransactionStatus::Committed => write!(f, "committed"),
            TransactionStatus::Canceled => write!(f, "canceled"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}
