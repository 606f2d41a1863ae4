// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! End-to-end scenarios over the broker: transactions against a config tree
//! whose commit hook delegates diffs to a writer pipeline, with a mapping
//! context co-committed alongside.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tracing_test::traced_test;

use tree::node::Node;
use tree::path::NodePath;
use tree::store::ReadableTree;

use confplane_data::broker::DataBroker;
use confplane_data::configtree::ConfigDataTree;
use confplane_data::delegator::WriteDelegator;
use confplane_data::errors::{ApplyError, CommitError};
use confplane_data::transaction::{LogicalDatastore, TransactionStatus};
use test_utils::{RecordingPipeline, TestStore};

struct Harness {
    device: TestStore,
    context: TestStore,
    pipeline: RecordingPipeline,
    broker: DataBroker,
}

fn harness() -> Harness {
    let device = TestStore::new();
    let context = TestStore::new();
    let pipeline = RecordingPipeline::new();

    let context_broker = Arc::new(DataBroker::context_pipeline(Arc::new(ConfigDataTree::new(
        Arc::new(context.clone()),
    ))));
    let delegator = Arc::new(WriteDelegator::new(
        Arc::new(pipeline.clone()),
        context_broker,
    ));
    let config = Arc::new(ConfigDataTree::with_hook(
        Arc::new(device.clone()),
        delegator,
    ));
    let operational: Arc<dyn ReadableTree> = Arc::new(device.clone());

    Harness {
        device,
        context,
        pipeline,
        broker: DataBroker::main_pipeline(config, operational),
    }
}

fn path(p: &str) -> NodePath {
    NodePath::from(p)
}

#[test]
#[traced_test]
fn commit_applies_the_diff_and_updates_the_store() {
    let h = harness();

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();
    assert_eq!(tx.status(), TransactionStatus::Committed);

    /* the leaf change was aggregated into its parent container */
    assert_eq!(h.pipeline.applied(), vec![path("/a")]);
    assert_eq!(
        h.device.root().get(&path("/a/b")),
        Some(&Node::leaf("v1"))
    );

    let rtx = h.broker.new_read_only_transaction();
    assert_eq!(
        rtx.read(LogicalDatastore::Configuration, &path("/a/b"))
            .unwrap(),
        Some(Node::leaf("v1"))
    );
    assert_eq!(
        rtx.read(LogicalDatastore::Operational, &path("/a/b"))
            .unwrap(),
        Some(Node::leaf("v1"))
    );
}

#[test]
fn validation_failure_leaves_the_store_and_device_untouched() {
    let h = harness();
    h.device.fail_next_validation("scripted constraint violation");

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    let err = tx.submit().expect_err("validation was scripted to fail");

    assert!(matches!(err, CommitError::Validation(_)));
    assert_eq!(tx.status(), TransactionStatus::Failed);
    assert!(h.pipeline.applied().is_empty());
    assert_eq!(h.device.commit_calls(), 0);
    assert_eq!(h.device.root(), Node::container());
}

#[test]
#[traced_test]
fn pipeline_failure_reverts_applied_changes_in_reverse_order() {
    let h = harness();
    h.pipeline.fail_at(path("/c"));

    let mut tx = h.broker.new_write_only_transaction();
    for name in ["/a/x", "/b/y", "/c/z"] {
        tx.put(
            LogicalDatastore::Configuration,
            &path(name),
            Node::leaf("v"),
        )
        .unwrap();
    }
    let err = tx.submit().expect_err("pipeline was scripted to fail");

    let CommitError::Apply(ApplyError::RevertedUpdate(cause)) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(cause.path, path("/c"));
    assert_eq!(tx.status(), TransactionStatus::Failed);
    /* only the updates before the failing one were applied, and they were
     * written back in reverse application order */
    assert_eq!(h.pipeline.applied(), vec![path("/a"), path("/b")]);
    assert_eq!(h.pipeline.reverted(), vec![path("/b"), path("/a")]);
    assert_eq!(h.device.commit_calls(), 0);
    assert_eq!(h.device.root(), Node::container());
}

#[test]
fn failed_revert_is_reported_as_possibly_inconsistent() {
    let h = harness();
    h.pipeline.fail_at(path("/b"));
    h.pipeline.fail_revert("device rejected the rollback");

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/x"),
        Node::leaf("v"),
    )
    .unwrap();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/b/y"),
        Node::leaf("v"),
    )
    .unwrap();
    let err = tx.submit().expect_err("pipeline and revert were scripted to fail");

    let CommitError::Apply(ApplyError::RevertFailed { cause, revert }) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(cause.path, path("/b"));
    assert_eq!(revert.reason, "device rejected the rollback");
    assert!(h.pipeline.reverted().is_empty());
    assert_eq!(h.device.commit_calls(), 0);
}

#[test]
fn context_co_commit_failure_leaves_device_writes_in_place() {
    let h = harness();
    h.context.fail_next_validation("context store rejected the update");

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    let err = tx.submit().expect_err("context commit was scripted to fail");

    assert!(matches!(
        err,
        CommitError::Apply(ApplyError::ContextCommit(_))
    ));
    assert_eq!(tx.status(), TransactionStatus::Failed);
    /* known inconsistency window: the device writes went through and are not
     * reverted, while the config tree never commits */
    assert_eq!(h.pipeline.applied(), vec![path("/a")]);
    assert!(h.pipeline.reverted().is_empty());
    assert_eq!(h.device.commit_calls(), 0);
}

#[test]
fn mapping_context_writes_commit_with_the_transaction() {
    let h = harness();
    h.pipeline
        .write_mapping(path("/naming/index"), Node::leaf(7i64));

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();

    assert_eq!(
        h.context.root().get(&path("/naming/index")),
        Some(&Node::leaf(7i64))
    );
    assert_eq!(h.context.commit_calls(), 1);
}

#[test]
fn rewriting_the_same_value_produces_no_pipeline_call() {
    let h = harness();

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();
    assert_eq!(h.pipeline.applied().len(), 1);

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();

    /* the empty diff never reaches the pipeline, but the store commit of the
     * unmodified candidate still happens */
    assert_eq!(h.pipeline.applied().len(), 1);
    assert_eq!(h.device.commit_calls(), 2);
}

#[test]
fn deleted_subtree_reaches_the_pipeline_as_a_before_only_update() {
    let h = harness();

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();

    let mut tx = h.broker.new_write_only_transaction();
    tx.delete(LogicalDatastore::Configuration, &path("/a")).unwrap();
    tx.submit().unwrap();

    assert_eq!(h.pipeline.applied(), vec![path("/a"), path("/a")]);
    assert_eq!(h.device.root().get(&path("/a")), None);
}

#[test]
fn store_lifecycle_calls_happen_exactly_once_per_commit() {
    let h = harness();

    let mut tx = h.broker.new_write_only_transaction();
    tx.put(
        LogicalDatastore::Configuration,
        &path("/a/b"),
        Node::leaf("v1"),
    )
    .unwrap();
    tx.submit().unwrap();

    assert_eq!(h.device.validate_calls(), 1);
    assert_eq!(h.device.prepare_calls(), 1);
    assert_eq!(h.device.commit_calls(), 1);
}
