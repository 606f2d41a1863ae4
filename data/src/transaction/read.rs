// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Read-only transaction adapter

use tracing::trace;

use tree::node::Node;
use tree::path::NodePath;
use tree::store::TreeRead;

use crate::errors::ReadError;
use crate::transaction::LogicalDatastore;

/// Read path of a transaction: zero, one or two store views. Reading from a
/// store whose handle is absent fails with an unsupported-store error; it
/// never silently reads as empty.
pub struct ReadOnlyTransaction {
    config: Option<Box<dyn TreeRead>>,
    operational: Option<Box<dyn TreeRead>>,
}

impl ReadOnlyTransaction {
    #[must_use]
    pub fn create(config: Box<dyn TreeRead>, operational: Box<dyn TreeRead>) -> Self {
        Self {
            config: Some(config),
            operational: Some(operational),
        }
    }

    #[must_use]
    pub fn create_config_only(config: Box<dyn TreeRead>) -> Self {
        Self {
            config: Some(config),
            operational: None,
        }
    }

    #[must_use]
    pub fn create_operational_only(operational: Box<dyn TreeRead>) -> Self {
        Self {
            config: None,
            operational: Some(operational),
        }
    }

    /// Read from the requested logical store.
    pub fn read(&self, store: LogicalDatastore, path: &NodePath) -> Result<Option<Node>, ReadError> {
        trace!("read store={store}, path={path}");
        let handle = match store {
            LogicalDatastore::Configuration => self.config.as_deref(),
            LogicalDatastore::Operational => self.operational.as_deref(),
        };
        let handle = handle.ok_or(ReadError::UnsupportedStore(store))?;
        Ok(handle.read(path))
    }

    /// Whether a node exists at `path`. Any underlying read failure surfaces
    /// uniformly as an exists-failed error.
    pub fn exists(&self, store: LogicalDatastore, path: &NodePath) -> Result<bool, ReadError> {
        self.read(store, path)
            .map(|node| node.is_some())
            .map_err(|e| ReadError::ExistsFailed {
                path: path.clone(),
                source: Box::new(e),
            })
    }

    /// Release the store views.
    pub fn close(self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedTree(Node);
    impl TreeRead for FixedTree {
        fn read(&self, path: &NodePath) -> Option<Node> {
            self.0.get(path).cloned()
        }
    }

    fn sample_tree() -> Box<dyn TreeRead> {
        Box::new(FixedTree(
            Node::container().with_child("a", Node::leaf("v1")),
        ))
    }

    #[test]
    fn read_dispatches_on_the_requested_store() {
        let tx = ReadOnlyTransaction::create_operational_only(sample_tree());
        let found = tx
            .read(LogicalDatastore::Operational, &NodePath::from("/a"))
            .expect("operational store is wired");
        assert_eq!(found, Some(Node::leaf("v1")));
    }

    #[test]
    fn absent_store_handle_is_an_error_not_an_empty_read() {
        let tx = ReadOnlyTransaction::create_operational_only(sample_tree());
        let err = tx
            .read(LogicalDatastore::Configuration, &NodePath::from("/a"))
            .expect_err("configuration store is not wired");
        assert_eq!(
            err,
            ReadError::UnsupportedStore(LogicalDatastore::Configuration)
        );
    }

    #[test]
    fn exists_wraps_underlying_failures() {
        let tx = ReadOnlyTransaction::create_config_only(sample_tree());
        assert!(
            tx.exists(LogicalDatastore::Configuration, &NodePath::from("/a"))
                .expect("read must succeed")
        );
        assert!(
            !tx.exists(LogicalDatastore::Configuration, &NodePath::from("/b"))
                .expect("read must succeed")
        );
        let err = tx
            .exists(LogicalDatastore::Operational, &NodePath::from("/a"))
            .expect_err("operational store is not wired");
        assert!(matches!(err, ReadError::ExistsFailed { .. }));
    }
}
