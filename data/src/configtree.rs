// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per-transaction modification lifecycle over a snapshot-isolated tree.
//!
//! [`ConfigDataTree`] mints one [`ConfigModification`] per transaction. The
//! modification moves through an explicit state machine (building →
//! validated → closed) and is consumed exactly once by `commit`, which
//! drives validate → prepare → hook → store-commit. The hook is the
//! extension point the write-application delegator plugs into; if it fails,
//! the store is never mutated.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use tree::candidate::Candidate;
use tree::errors::ValidationError;
use tree::node::Node;
use tree::path::NodePath;
use tree::store::{DataTree, TreeModification, TreeRead, TreeSnapshot};

use crate::errors::{ApplyError, CommitError, WriteError};

/// Hook invoked with the prepared candidate before the store commit.
///
/// `before` reads the pre-modification state (captured when the transaction
/// opened); `after` reads the state including the staged changes.
pub trait CandidateHook: Send + Sync {
    fn process_candidate(
        &self,
        candidate: &Candidate,
        before: &dyn TreeRead,
        after: &dyn TreeRead,
    ) -> Result<(), ApplyError>;
}

/// Default hook: accept every candidate untouched. Used by pipelines with no
/// external writer attached (writes apply directly to the store).
#[derive(Debug, Default)]
pub struct NoopHook;

impl CandidateHook for NoopHook {
    fn process_candidate(
        &self,
        _candidate: &Candidate,
        _before: &dyn TreeRead,
        _after: &dyn TreeRead,
    ) -> Result<(), ApplyError> {
        Ok(())
    }
}

/// A tree plus the hook its transactions run at commit time.
pub struct ConfigDataTree {
    tree: Arc<dyn DataTree>,
    hook: Arc<dyn CandidateHook>,
}

impl ConfigDataTree {
    /// Tree with no commit hook (hook is a no-op).
    pub fn new(tree: Arc<dyn DataTree>) -> Self {
        Self::with_hook(tree, Arc::new(NoopHook))
    }

    /// Tree whose transactions run `hook` between prepare and commit.
    pub fn with_hook(tree: Arc<dyn DataTree>, hook: Arc<dyn CandidateHook>) -> Self {
        Self { tree, hook }
    }

    /// Open a fresh modification against the current tree state.
    #[must_use]
    pub fn new_modification(&self) -> ConfigModification {
        // the untouched view must be captured as close as possible to the
        // start of the modification: writers read the before-state from it
        let untouched = self.tree.take_snapshot();
        let modification = self.tree.take_snapshot().new_modification();
        trace!("opened new modification");
        ConfigModification {
            state: State::Building(modification),
            untouched,
            tree: Arc::clone(&self.tree),
            hook: Arc::clone(&self.hook),
        }
    }
}

enum State {
    Building(Box<dyn TreeModification>),
    Validated(Box<dyn TreeModification>),
    /// Consumed, or left unusable by a failed validation.
    Closed,
}

/// One transaction's staging area plus the machinery to commit it.
///
/// Not safe for concurrent use; confine each instance to one call sequence.
pub struct ConfigModification {
    state: State,
    untouched: Box<dyn TreeSnapshot>,
    tree: Arc<dyn DataTree>,
    hook: Arc<dyn CandidateHook>,
}

impl ConfigModification {
    /// Stage a write. Fails once the modification left the building state.
    pub fn write(&mut self, path: &NodePath, data: Node) -> Result<(), WriteError> {
        trace!("write path={path}");
        match &mut self.state {
            State::Building(modification) => Ok(modification.write(path, data)?),
            _ => Err(WriteError::AlreadyClosed),
        }
    }

    /// Stage a merge. Fails once the modification left the building state.
    pub fn merge(&mut self, path: &NodePath, data: Node) -> Result<(), WriteError> {
        trace!("merge path={path}");
        match &mut self.state {
            State::Building(modification) => Ok(modification.merge(path, data)?),
            _ => Err(WriteError::AlreadyClosed),
        }
    }

    /// Stage a delete. Fails once the modification left the building state.
    pub fn delete(&mut self, path: &NodePath) -> Result<(), WriteError> {
        trace!("delete path={path}");
        match &mut self.state {
            State::Building(modification) => Ok(modification.delete(path)?),
            _ => Err(WriteError::AlreadyClosed),
        }
    }

    /// Seal and validate the staged modification. Idempotent: validating an
    /// already-validated modification is a no-op. A failed validation leaves
    /// the modification unusable for further writes.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Building(mut modification) => {
                modification.ready();
                match modification.validate() {
                    Ok(()) => {
                        self.state = State::Validated(modification);
                        Ok(())
                    }
                    Err(e) => {
                        warn!("validation failed: {e}");
                        Err(e)
                    }
                }
            }
            other => {
                self.state = other;
                Ok(())
            }
        }
    }

    /// Validate (if not yet done), prepare the candidate, run the commit
    /// hook, then commit into the store. Any error from validation or the
    /// hook propagates unmodified and leaves the store untouched.
    pub fn commit(mut self) -> Result<(), CommitError> {
        self.validate()?;
        let State::Validated(modification) = self.state else {
            return Err(CommitError::IllegalState("modification was already consumed"));
        };
        let candidate = modification.prepare()?;
        trace!("prepared candidate rooted at {}", candidate.root_path);
        self.hook
            .process_candidate(&candidate, &*self.untouched, &*modification)?;
        self.tree.commit(candidate)?;
        debug!("modification committed to the data tree");
        Ok(())
    }
}

impl TreeRead for ConfigModification {
    /// Reads see the staged-but-uncommitted state. A closed modification
    /// reads as empty.
    fn read(&self, path: &NodePath) -> Option<Node> {
        match &self.state {
            State::Building(modification) | State::Validated(modification) => {
                modification.read(path)
            }
            State::Closed => None,
        }
    }
}
