// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Transaction factory: routes each transaction's store handles to the
//! underlying trees according to the pipeline it serves.

use std::sync::Arc;

use tracing::trace;

use tree::store::ReadableTree;

use crate::configtree::ConfigDataTree;
use crate::transaction::{ReadOnlyTransaction, ReadWriteTransaction, WriteTransaction};

enum Wiring {
    /// Device-facing pipeline: configuration is read-write over the config
    /// tree, operational is a read-only view of device state.
    Main {
        config: Arc<ConfigDataTree>,
        operational: Arc<dyn ReadableTree>,
    },
    /// Mapping-context pipeline: a single tree exposed read-write through
    /// the operational slot.
    Context { context: Arc<ConfigDataTree> },
}

/// Hands out transactions wired for one of the two pipelines.
///
/// Read-only and write sides of a read-write transaction are constructed
/// independently; a read never observes the sibling write side's staged data.
pub struct DataBroker {
    wiring: Wiring,
}

impl DataBroker {
    /// Broker for the device-facing pipeline.
    pub fn main_pipeline(
        config: Arc<ConfigDataTree>,
        operational: Arc<dyn ReadableTree>,
    ) -> Self {
        Self {
            wiring: Wiring::Main {
                config,
                operational,
            },
        }
    }

    /// Broker for the mapping-context pipeline.
    pub fn context_pipeline(context: Arc<ConfigDataTree>) -> Self {
        Self {
            wiring: Wiring::Context { context },
        }
    }

    #[must_use]
    pub fn new_read_only_transaction(&self) -> ReadOnlyTransaction {
        trace!("opening read-only transaction");
        match &self.wiring {
            Wiring::Main {
                config,
                operational,
            } => ReadOnlyTransaction::create(
                /* a fresh modification gives a stable config snapshot */
                Box::new(config.new_modification()),
                Box::new(Arc::clone(operational)),
            ),
            Wiring::Context { context } => {
                ReadOnlyTransaction::create_operational_only(Box::new(context.new_modification()))
            }
        }
    }

    #[must_use]
    pub fn new_write_only_transaction(&self) -> WriteTransaction {
        trace!("opening write-only transaction");
        match &self.wiring {
            Wiring::Main { config, .. } => {
                WriteTransaction::create_config_only(config.new_modification())
            }
            Wiring::Context { context } => {
                WriteTransaction::create_operational_only(context.new_modification())
            }
        }
    }

    #[must_use]
    pub fn new_read_write_transaction(&self) -> ReadWriteTransaction {
        ReadWriteTransaction::new(
            self.new_read_only_transaction(),
            self.new_write_only_transaction(),
        )
    }
}
