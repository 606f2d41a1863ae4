// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! In-memory snapshot-isolated tree store.
//!
//! Clones share the same underlying tree. Every lifecycle call is counted and
//! the next validation can be scripted to fail, so tests can assert the
//! exactly-once discipline of the transaction machinery.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use tree::candidate::{Candidate, CandidateNode, ModificationKind};
use tree::errors::{CommitFailed, PathError, ValidationError};
use tree::node::Node;
use tree::path::{NodePath, PathSegment};
use tree::store::{DataTree, TreeModification, TreeRead, TreeSnapshot};

struct Inner {
    root: Mutex<Node>,
    fail_validation: Mutex<Option<String>>,
    validate_calls: AtomicU32,
    prepare_calls: AtomicU32,
    commit_calls: AtomicU32,
}

/// In-memory store backing one logical datastore in tests.
#[derive(Clone)]
pub struct TestStore {
    inner: Arc<Inner>,
}

impl TestStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                root: Mutex::new(Node::container()),
                fail_validation: Mutex::new(None),
                validate_calls: AtomicU32::new(0),
                prepare_calls: AtomicU32::new(0),
                commit_calls: AtomicU32::new(0),
            }),
        }
    }

    /// The committed tree as of now.
    #[must_use]
    pub fn root(&self) -> Node {
        self.inner.root.lock().clone()
    }

    /// Script the next `validate` call to fail with `reason`. One-shot.
    pub fn fail_next_validation(&self, reason: impl Into<String>) {
        *self.inner.fail_validation.lock() = Some(reason.into());
    }

    #[must_use]
    pub fn validate_calls(&self) -> u32 {
        self.inner.validate_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn prepare_calls(&self) -> u32 {
        self.inner.prepare_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn commit_calls(&self) -> u32 {
        self.inner.commit_calls.load(Ordering::SeqCst)
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeRead for TestStore {
    /// Reads observe the committed state, not any open modification.
    fn read(&self, path: &NodePath) -> Option<Node> {
        self.inner.root.lock().get(path).cloned()
    }
}

impl DataTree for TestStore {
    fn take_snapshot(&self) -> Box<dyn TreeSnapshot> {
        Box::new(TestSnapshot {
            root: self.inner.root.lock().clone(),
            inner: Arc::clone(&self.inner),
        })
    }

    fn commit(&self, candidate: Candidate) -> Result<(), CommitFailed> {
        self.inner.commit_calls.fetch_add(1, Ordering::SeqCst);
        *self.inner.root.lock() = candidate.root.data_after.unwrap_or_else(Node::container);
        Ok(())
    }
}

struct TestSnapshot {
    root: Node,
    inner: Arc<Inner>,
}

impl TreeRead for TestSnapshot {
    fn read(&self, path: &NodePath) -> Option<Node> {
        self.root.get(path).cloned()
    }
}

impl TreeSnapshot for TestSnapshot {
    fn new_modification(self: Box<Self>) -> Box<dyn TreeModification> {
        Box::new(TestModification {
            base: self.root.clone(),
            staged: self.root,
            sealed: false,
            inner: self.inner,
        })
    }
}

struct TestModification {
    base: Node,
    staged: Node,
    sealed: bool,
    inner: Arc<Inner>,
}

impl TestModification {
    fn ensure_open(&self) -> Result<(), PathError> {
        if self.sealed {
            return Err(PathError::Sealed);
        }
        Ok(())
    }

    /// Descend to `path`, creating empty containers for missing segments.
    fn materialize<'a>(root: &'a mut Node, path: &NodePath) -> Result<&'a mut Node, PathError> {
        let mut current = root;
        let mut walked = NodePath::root();
        for segment in path.segments() {
            let children = current
                .children_mut()
                .ok_or_else(|| PathError::NotAContainer(walked.clone()))?;
            current = children
                .entry(segment.clone())
                .or_insert_with(Node::container);
            walked = walked.child(segment.clone());
        }
        Ok(current)
    }

    fn lookup_mut<'a>(root: &'a mut Node, path: &NodePath) -> Option<&'a mut Node> {
        let mut current = root;
        for segment in path.segments() {
            current = current.children_mut()?.get_mut(segment)?;
        }
        Some(current)
    }
}

impl TreeRead for TestModification {
    fn read(&self, path: &NodePath) -> Option<Node> {
        self.staged.get(path).cloned()
    }
}

impl TreeModification for TestModification {
    fn write(&mut self, path: &NodePath, data: Node) -> Result<(), PathError> {
        self.ensure_open()?;
        match path.parent() {
            /* a root write replaces the whole tree */
            None => {
                self.staged = data;
                Ok(())
            }
            Some(parent) => {
                let parent_node = Self::materialize(&mut self.staged, &parent)?;
                let children = parent_node
                    .children_mut()
                    .ok_or(PathError::NotAContainer(parent))?;
                if let Some(segment) = path.last() {
                    children.insert(segment.clone(), data);
                }
                Ok(())
            }
        }
    }

    fn merge(&mut self, path: &NodePath, data: Node) -> Result<(), PathError> {
        self.ensure_open()?;
        let target = Self::materialize(&mut self.staged, path)?;
        target.merge_from(data);
        Ok(())
    }

    fn delete(&mut self, path: &NodePath) -> Result<(), PathError> {
        self.ensure_open()?;
        match path.parent() {
            None => {
                self.staged = Node::container();
                Ok(())
            }
            Some(parent) => {
                /* deleting an absent path is a no-op */
                let Some(parent_node) = Self::lookup_mut(&mut self.staged, &parent) else {
                    return Ok(());
                };
                if let (Some(children), Some(segment)) = (parent_node.children_mut(), path.last())
                {
                    children.remove(segment);
                }
                Ok(())
            }
        }
    }

    fn ready(&mut self) {
        self.sealed = true;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.inner.validate_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.fail_validation.lock().take() {
            Some(reason) => Err(ValidationError::Constraint {
                path: NodePath::root(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn prepare(&self) -> Result<Candidate, ValidationError> {
        self.inner.prepare_calls.fetch_add(1, Ordering::SeqCst);
        let root = candidate_between(Some(&self.base), Some(&self.staged)).unwrap_or_else(|| {
            CandidateNode::new(
                ModificationKind::Unmodified,
                Some(self.base.clone()),
                Some(self.staged.clone()),
            )
        });
        Ok(Candidate::new(NodePath::root(), root))
    }
}

/// Build the candidate node describing how `before` became `after`, or `None`
/// when the two are equal.
fn candidate_between(before: Option<&Node>, after: Option<&Node>) -> Option<CandidateNode> {
    if before == after {
        return None;
    }
    let kind = match (before, after) {
        (_, None) => ModificationKind::Delete,
        (None, _) => ModificationKind::Write,
        (Some(b), Some(a)) => {
            if b.is_leaf() || a.is_leaf() {
                ModificationKind::Write
            } else {
                ModificationKind::SubtreeModified
            }
        }
    };
    let mut node = CandidateNode::new(kind, before.cloned(), after.cloned());

    let before_children = before.and_then(Node::children);
    let after_children = after.and_then(Node::children);
    let mut segments: BTreeSet<&PathSegment> = BTreeSet::new();
    if let Some(children) = before_children {
        segments.extend(children.keys());
    }
    if let Some(children) = after_children {
        segments.extend(children.keys());
    }
    for segment in segments {
        let child_before = before_children.and_then(|children| children.get(segment));
        let child_after = after_children.and_then(|children| children.get(segment));
        if let Some(child) = candidate_between(child_before, child_after) {
            node.children.insert(segment.clone(), child);
        }
    }
    Some(node)
}
