use std::sync::Arc;

use shared::models::{Node, Pod, Quantity};

use crate::cluster::{ClusterError, ClusterSnapshot, ClusterStateReader};

use super::{CustomScheduler, GROUP_NAME_LABEL, MIN_AVAILABLE_LABEL};

/// Reader whose every lookup fails, for error paths.
pub struct FailingReader;

impl ClusterStateReader for FailingReader {
    fn list_pods_by_label(&self, _: &str, _: &str, _: &str) -> Result<Vec<Pod>, ClusterError> {
        Err(ClusterError::Unavailable("informer not synced".to_string()))
    }

    fn node_allocatable_memory(&self, _: &str) -> Result<Quantity, ClusterError> {
        Err(ClusterError::Unavailable("informer not synced".to_string()))
    }
}

pub fn group_pod(namespace: &str, name: &str, group: &str, min_available: &str) -> Pod {
    Pod::new(namespace, name)
        .with_label(GROUP_NAME_LABEL, group)
        .with_label(MIN_AVAILABLE_LABEL, min_available)
}

/// Snapshot holding one node per `(name, memory bytes)` pair.
pub fn snapshot_with_nodes(nodes: &[(&str, u64)]) -> Arc<ClusterSnapshot> {
    let snapshot = ClusterSnapshot::new();
    for (name, memory) in nodes {
        snapshot.add_node(&Node::new(name, Quantity::new(*memory)));
    }
    snapshot
}

pub fn plugin(args: Option<&str>, reader: Arc<dyn ClusterStateReader>) -> CustomScheduler {
    CustomScheduler::new(args.map(str::as_bytes), reader).expect("valid plugin args")
}
