// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Minimal-diff computation over a prepared candidate.
//!
//! Recursively collects every subtree that really changed, keyed by path.
//! Leaf-level changes are aggregated into their parent and never reported
//! standalone; mixin wrapper nodes are skipped as reporting units (except
//! augmentation wrappers), so each update names the smallest enclosing
//! non-structural unit. The same change may surface both on an ancestor and
//! on a descendant when both independently qualify; callers get the map
//! as-is, without deduplication.

use std::hash::{Hash, Hasher};

use ordermap::OrderMap;

use tree::candidate::{Candidate, CandidateNode, ModificationKind};
use tree::node::Node;
use tree::path::NodePath;

/// Update to one node, identified by its path. At least one of the data
/// sides is present; equality and hashing are on the path alone so a map of
/// updates deduplicates by location.
#[derive(Clone, Debug)]
pub struct NormalizedNodeUpdate {
    path: NodePath,
    data_before: Option<Node>,
    data_after: Option<Node>,
}

impl NormalizedNodeUpdate {
    /// Build an update; `None` when both data sides are absent (nothing to
    /// report).
    #[must_use]
    pub fn new(path: NodePath, data_before: Option<Node>, data_after: Option<Node>) -> Option<Self> {
        if data_before.is_none() && data_after.is_none() {
            return None;
        }
        Some(Self {
            path,
            data_before,
            data_after,
        })
    }

    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    #[must_use]
    pub fn data_before(&self) -> Option<&Node> {
        self.data_before.as_ref()
    }

    #[must_use]
    pub fn data_after(&self) -> Option<&Node> {
        self.data_after.as_ref()
    }
}

impl PartialEq for NormalizedNodeUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}
impl Eq for NormalizedNodeUpdate {}
impl Hash for NormalizedNodeUpdate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// All unique modifications collected from one candidate, in traversal order.
#[derive(Debug, Default)]
pub struct ModificationDiff {
    updates: OrderMap<NodePath, NormalizedNodeUpdate>,
}

impl ModificationDiff {
    /// Aggregate a diff from a whole candidate.
    #[must_use]
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self::recursively_from(&candidate.root_path, &candidate.root)
    }

    /// Aggregate a diff from a candidate node recursively. Mixin wrappers are
    /// ignored as modifications, and so are composite nodes whose direct
    /// leaves were not modified.
    #[must_use]
    pub fn recursively_from(path: &NodePath, node: &CandidateNode) -> Self {
        // child subtrees first, then the current level if eligible
        let mut diff = Self::recursively_children_from(path, node);
        if is_modification(node)
            && let Some(update) = NormalizedNodeUpdate::new(
                path.clone(),
                node.data_before.clone(),
                node.data_after.clone(),
            )
        {
            diff.updates.insert(path.clone(), update);
        }
        diff
    }

    /// Process all non-leaf children recursively; modifications to leaves are
    /// aggregated into their parent, never collected on their own.
    fn recursively_children_from(path: &NodePath, node: &CandidateNode) -> Self {
        let mut diff = Self::default();
        for (segment, child) in &node.children {
            if child.is_leaf() {
                continue;
            }
            diff.merge(Self::recursively_from(&path.child(segment.clone()), child));
        }
        diff
    }

    fn merge(&mut self, other: Self) {
        // key collisions cannot occur: each recursive call owns a disjoint path
        self.updates.extend(other.updates);
    }

    #[must_use]
    pub fn updates(&self) -> &OrderMap<NodePath, NormalizedNodeUpdate> {
        &self.updates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// The before-state of every collected update that has one.
    #[must_use]
    pub fn modifications_before(&self) -> OrderMap<NodePath, Node> {
        self.updates
            .iter()
            .filter_map(|(path, update)| Some((path.clone(), update.data_before.clone()?)))
            .collect()
    }

    /// The after-state of every collected update that has one.
    #[must_use]
    pub fn modifications_after(&self) -> OrderMap<NodePath, Node> {
        self.updates
            .iter()
            .filter_map(|(path, update)| Some((path.clone(), update.data_after.clone()?)))
            .collect()
    }
}

/// Whether this node should be reported as a modified unit. Mixin wrappers
/// are not, unless they are augmentation wrappers.
fn is_modification(node: &CandidateNode) -> bool {
    if node.is_mixin() && !node.is_augmentation() {
        return false;
    }
    is_current_modified(node)
}

/// A node counts as modified when a direct leaf child really changed, or a
/// direct choice wrapper recursively does.
fn is_current_modified(node: &CandidateNode) -> bool {
    let direct_leaves_modified = node.children.values().any(|child| {
        child.is_leaf()
            // Some stores emit spurious touches on unmodified keyed list
            // entries; a child whose value did not change is never a
            // modification, whatever its reported kind.
            && before_and_after_differ(child)
            && matches!(child.kind, ModificationKind::Write | ModificationKind::Delete)
    });

    direct_leaves_modified
        // choices have no standalone identity: any change within one marks
        // its parent as modified
        || node
            .children
            .values()
            .any(|child| child.is_choice() && is_current_modified(child))
}

/// Whether the candidate's before and after data differ by value (absent
/// sides count as different from present ones).
fn before_and_after_differ(node: &CandidateNode) -> bool {
    match &node.data_before {
        Some(before) => Some(before) != node.data_after.as_ref(),
        None => node.data_after.is_some(),
    }
}
