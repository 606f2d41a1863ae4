// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use pretty_assertions::assert_eq;

    use tree::candidate::{Candidate, CandidateNode, ModificationKind};
    use tree::node::Node;
    use tree::path::{NodePath, PathSegment};

    use crate::diff::ModificationDiff;

    fn leaf_write(before: Option<&str>, after: Option<&str>) -> CandidateNode {
        let kind = if after.is_none() {
            ModificationKind::Delete
        } else {
            ModificationKind::Write
        };
        CandidateNode::new(kind, before.map(Node::leaf), after.map(Node::leaf))
    }

    fn subtree(before: Node, after: Node) -> CandidateNode {
        CandidateNode::new(ModificationKind::SubtreeModified, Some(before), Some(after))
    }

    fn diff_paths(candidate: &Candidate) -> Vec<String> {
        ModificationDiff::from_candidate(candidate)
            .updates()
            .keys()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn unmodified_candidate_yields_empty_diff() {
        let data = Node::container().with_child("a", Node::leaf("v"));
        let root = CandidateNode::new(
            ModificationKind::Unmodified,
            Some(data.clone()),
            Some(data),
        );
        let candidate = Candidate::new(NodePath::root(), root);
        assert!(ModificationDiff::from_candidate(&candidate).is_empty());
    }

    #[test]
    fn single_leaf_change_is_aggregated_into_parent_container() {
        let before = Node::container().with_child("b", Node::leaf("old"));
        let after = Node::container().with_child("b", Node::leaf("new"));
        let child = subtree(before.clone(), after.clone())
            .with_child("b", leaf_write(Some("old"), Some("new")));
        let root = subtree(
            Node::container().with_child("a", before.clone()),
            Node::container().with_child("a", after.clone()),
        )
        .with_child("a", child);
        let candidate = Candidate::new(NodePath::root(), root);

        let diff = ModificationDiff::from_candidate(&candidate);
        assert_eq!(diff_paths(&candidate), vec!["/a"]);
        let update = &diff.updates()[&NodePath::from("/a")];
        assert_eq!(update.data_before(), Some(&before));
        assert_eq!(update.data_after(), Some(&after));
    }

    #[test]
    fn list_wrapper_is_skipped_and_entry_is_the_reported_unit() {
        let entry_before = Node::container().with_child("mtu", Node::leaf(1500u64));
        let entry_after = Node::container().with_child("mtu", Node::leaf(9000u64));
        let entry_segment = PathSegment::keyed("interface", [("name", "eth0")]);

        let entry = subtree(entry_before.clone(), entry_after.clone())
            .with_child("mtu", leaf_write(Some("1500"), Some("9000")));
        let wrapper = CandidateNode::new(
            ModificationKind::SubtreeModified,
            Some(Node::list_wrapper().with_child(entry_segment.clone(), entry_before)),
            Some(Node::list_wrapper().with_child(entry_segment.clone(), entry_after)),
        )
        .with_child(entry_segment.clone(), entry);
        let root = subtree(Node::container(), Node::container()).with_child("interfaces", wrapper);
        let candidate = Candidate::new(NodePath::root(), root);

        assert_eq!(
            diff_paths(&candidate),
            vec!["/interfaces/interface[name=eth0]"]
        );
    }

    #[test]
    fn choice_change_marks_the_parent_as_modified() {
        let choice_before = Node::choice_wrapper().with_child("mode", Node::leaf("access"));
        let choice_after = Node::choice_wrapper().with_child("mode", Node::leaf("trunk"));
        let parent_before = Node::container().with_child("switching", choice_before.clone());
        let parent_after = Node::container().with_child("switching", choice_after.clone());

        let choice = subtree(choice_before, choice_after)
            .with_child("mode", leaf_write(Some("access"), Some("trunk")));
        let root = subtree(parent_before.clone(), parent_after.clone())
            .with_child("switching", choice);
        let candidate = Candidate::new(NodePath::from("/port"), root);

        // the wrapper has no leaf of its own, yet its parent is the reported unit
        let diff = ModificationDiff::from_candidate(&candidate);
        assert_eq!(diff_paths(&candidate), vec!["/port"]);
        let update = &diff.updates()[&NodePath::from("/port")];
        assert_eq!(update.data_after(), Some(&parent_after));
    }

    #[test]
    fn augmentation_wrapper_is_reportable_unlike_other_mixins() {
        let aug_before = Node::augmentation_wrapper().with_child("vrf", Node::leaf("red"));
        let aug_after = Node::augmentation_wrapper().with_child("vrf", Node::leaf("blue"));
        let aug = subtree(aug_before, aug_after)
            .with_child("vrf", leaf_write(Some("red"), Some("blue")));
        let root = subtree(Node::container(), Node::container()).with_child("routing-aug", aug);
        let candidate = Candidate::new(NodePath::root(), root);

        assert_eq!(diff_paths(&candidate), vec!["/routing-aug"]);
    }

    #[test]
    fn spurious_touch_on_unmodified_leaf_is_ignored() {
        // stores may report a write on an unmodified list key; value equality wins
        let data = Node::container().with_child("name", Node::leaf("eth0"));
        let root = subtree(data.clone(), data)
            .with_child("name", leaf_write(Some("eth0"), Some("eth0")));
        let candidate = Candidate::new(NodePath::from("/interface"), root);

        assert!(ModificationDiff::from_candidate(&candidate).is_empty());
    }

    #[test]
    fn leaf_delete_is_aggregated_into_parent() {
        let before = Node::container().with_child("description", Node::leaf("uplink"));
        let after = Node::container();
        let root = subtree(before.clone(), after.clone())
            .with_child("description", leaf_write(Some("uplink"), None));
        let candidate = Candidate::new(NodePath::from("/a"), root);

        let diff = ModificationDiff::from_candidate(&candidate);
        let update = &diff.updates()[&NodePath::from("/a")];
        assert_eq!(update.data_before(), Some(&before));
        assert_eq!(update.data_after(), Some(&after));
    }

    #[test]
    fn ancestor_and_descendant_may_both_be_reported() {
        // when both levels qualify independently, neither is deduplicated away
        let inner_before = Node::container().with_child("y", Node::leaf("1"));
        let inner_after = Node::container().with_child("y", Node::leaf("2"));
        let outer_before = Node::container()
            .with_child("x", Node::leaf("old"))
            .with_child("b", inner_before.clone());
        let outer_after = Node::container()
            .with_child("x", Node::leaf("new"))
            .with_child("b", inner_after.clone());

        let inner = subtree(inner_before, inner_after)
            .with_child("y", leaf_write(Some("1"), Some("2")));
        let root = subtree(outer_before, outer_after)
            .with_child("x", leaf_write(Some("old"), Some("new")))
            .with_child("b", inner);
        let candidate = Candidate::new(NodePath::from("/a"), root);

        assert_eq!(diff_paths(&candidate), vec!["/a/b", "/a"]);
    }
}
