// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Recording writer pipeline.
//!
//! Applies updates by logging them, in map order: all after-states first,
//! then the deletes (paths present only in the before map). A failure can be
//! injected at a given path, and the resulting reverter logs the already
//! applied paths in reverse order, or fails too when scripted to.

use std::sync::Arc;

use ordermap::OrderMap;
use parking_lot::Mutex;
use tracing::debug;

use tree::node::Node;
use tree::path::NodePath;

use data::errors::{RevertError, UpdateFailure};
use data::transaction::LogicalDatastore;
use data::writer::{BulkUpdateError, Reverter, WriteContext, WriterPipeline};

struct Inner {
    applied: Mutex<Vec<NodePath>>,
    reverted: Mutex<Vec<NodePath>>,
    fail_at: Mutex<Option<NodePath>>,
    fail_revert: Mutex<Option<String>>,
    mapping_write: Mutex<Option<(NodePath, Node)>>,
}

/// Writer pipeline test double. Clones share the same logs and scripts.
#[derive(Clone)]
pub struct RecordingPipeline {
    inner: Arc<Inner>,
}

impl RecordingPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                applied: Mutex::new(Vec::new()),
                reverted: Mutex::new(Vec::new()),
                fail_at: Mutex::new(None),
                fail_revert: Mutex::new(None),
                mapping_write: Mutex::new(None),
            }),
        }
    }

    /// Fail the update when it reaches `path`. Paths applied earlier stay
    /// applied and become revertible.
    pub fn fail_at(&self, path: NodePath) {
        *self.inner.fail_at.lock() = Some(path);
    }

    /// Make the revert following an injected failure fail as well.
    pub fn fail_revert(&self, reason: impl Into<String>) {
        *self.inner.fail_revert.lock() = Some(reason.into());
    }

    /// Stage one write into the mapping context during the next update. Used
    /// to exercise the co-commit of translation metadata.
    pub fn write_mapping(&self, path: NodePath, data: Node) {
        *self.inner.mapping_write.lock() = Some((path, data));
    }

    /// Paths applied so far, in application order.
    #[must_use]
    pub fn applied(&self) -> Vec<NodePath> {
        self.inner.applied.lock().clone()
    }

    /// Paths reverted so far, in revert order (reverse of application).
    #[must_use]
    pub fn reverted(&self) -> Vec<NodePath> {
        self.inner.reverted.lock().clone()
    }
}

impl Default for RecordingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterPipeline for RecordingPipeline {
    fn update(
        &self,
        nodes_before: &OrderMap<NodePath, Node>,
        nodes_after: &OrderMap<NodePath, Node>,
        ctx: &mut WriteContext<'_>,
    ) -> Result<(), BulkUpdateError> {
        if let Some((path, data)) = self.inner.mapping_write.lock().take()
            && let Err(e) = ctx.mapping().put(LogicalDatastore::Operational, &path, data)
        {
            return Err(BulkUpdateError::new(
                UpdateFailure {
                    path,
                    reason: format!("mapping write failed: {e}"),
                },
                Box::new(RecordingReverter {
                    inner: Arc::clone(&self.inner),
                    applied: Vec::new(),
                }),
            ));
        }

        let fail_at = self.inner.fail_at.lock().clone();
        let deletes = nodes_before
            .keys()
            .filter(|path| !nodes_after.contains_key(*path));
        let mut applied = Vec::new();
        for path in nodes_after.keys().chain(deletes) {
            if fail_at.as_ref() == Some(path) {
                return Err(BulkUpdateError::new(
                    UpdateFailure {
                        path: path.clone(),
                        reason: "injected pipeline failure".to_string(),
                    },
                    Box::new(RecordingReverter {
                        inner: Arc::clone(&self.inner),
                        applied,
                    }),
                ));
            }
            debug!("applying {path}");
            applied.push(path.clone());
            self.inner.applied.lock().push(path.clone());
        }
        Ok(())
    }
}

struct RecordingReverter {
    inner: Arc<Inner>,
    applied: Vec<NodePath>,
}

impl Reverter for RecordingReverter {
    fn revert(self: Box<Self>) -> Result<(), RevertError> {
        let Self { inner, applied } = *self;
        if let Some(reason) = inner.fail_revert.lock().take() {
            let path = applied.last().cloned().unwrap_or_else(NodePath::root);
            return Err(RevertError { path, reason });
        }
        for path in applied.into_iter().rev() {
            debug!("reverting {path}");
            inner.reverted.lock().push(path);
        }
        Ok(())
    }
}
