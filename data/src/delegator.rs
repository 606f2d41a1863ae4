// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Write-application delegator: the commit hook that turns an accepted
//! candidate into writer-pipeline calls, with the revert protocol on partial
//! failure.

use std::sync::Arc;

use ordermap::OrderMap;
use tracing::{debug, error, info, warn};

use tree::candidate::Candidate;
use tree::node::Node;
use tree::path::NodePath;
use tree::store::TreeRead;

use crate::broker::DataBroker;
use crate::configtree::CandidateHook;
use crate::diff::ModificationDiff;
use crate::errors::ApplyError;
use crate::writer::{WriteContext, WriterPipeline};

/// Converts tree nodes into the representation the writer pipeline consumes.
pub trait NodeCodec: Send + Sync {
    fn to_external(
        &self,
        nodes: OrderMap<NodePath, Node>,
    ) -> Result<OrderMap<NodePath, Node>, ApplyError>;
}

/// Codec for pipelines that consume the tree representation directly.
#[derive(Debug, Default)]
pub struct IdentityCodec;

impl NodeCodec for IdentityCodec {
    fn to_external(
        &self,
        nodes: OrderMap<NodePath, Node>,
    ) -> Result<OrderMap<NodePath, Node>, ApplyError> {
        Ok(nodes)
    }
}

/// Commit hook that diffs the candidate and delegates the changed subtrees
/// to the writer pipeline, alongside a read-write transaction on the mapping
/// context that commits together with the device writes.
pub struct WriteDelegator {
    writers: Arc<dyn WriterPipeline>,
    context_broker: Arc<DataBroker>,
    codec: Arc<dyn NodeCodec>,
}

impl WriteDelegator {
    pub fn new(writers: Arc<dyn WriterPipeline>, context_broker: Arc<DataBroker>) -> Self {
        Self::with_codec(writers, context_broker, Arc::new(IdentityCodec))
    }

    pub fn with_codec(
        writers: Arc<dyn WriterPipeline>,
        context_broker: Arc<DataBroker>,
        codec: Arc<dyn NodeCodec>,
    ) -> Self {
        Self {
            writers,
            context_broker,
            codec,
        }
    }
}

impl CandidateHook for WriteDelegator {
    fn process_candidate(
        &self,
        candidate: &Candidate,
        before: &dyn TreeRead,
        after: &dyn TreeRead,
    ) -> Result<(), ApplyError> {
        let diff = ModificationDiff::from_candidate(candidate);
        debug!("candidate diff: {} update(s)", diff.len());
        if diff.is_empty() {
            return Ok(());
        }

        let nodes_before = self.codec.to_external(diff.modifications_before())?;
        let nodes_after = self.codec.to_external(diff.modifications_after())?;

        let mapping = self.context_broker.new_read_write_transaction();
        let mut ctx = WriteContext::new(before, after, mapping);

        match self.writers.update(&nodes_before, &nodes_after, &mut ctx) {
            Ok(()) => {
                // FIXME the device writes should probably also be reverted
                // when the context co-commit fails; for now the caller only
                // learns that the two may disagree
                ctx.into_mapping()
                    .submit()
                    .map_err(|e| ApplyError::ContextCommit(Box::new(e)))?;
                debug!("writer pipeline applied all updates");
                Ok(())
            }
            Err(bulk) => {
                warn!("writer pipeline failed: {}, reverting", bulk.failure());
                let (cause, revert) = bulk.revert_changes();
                match revert {
                    Ok(()) => {
                        info!("changes successfully reverted");
                        Err(ApplyError::RevertedUpdate(cause))
                    }
                    Err(revert) => {
                        error!("failed to revert applied changes: {revert}");
                        Err(ApplyError::RevertFailed { cause, revert })
                    }
                }
            }
        }
    }
}
