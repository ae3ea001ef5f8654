//! Read access to the cluster objects a plugin bases its decisions on.

mod snapshot;

use shared::models::{Pod, Quantity};

pub use snapshot::ClusterSnapshot;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterError {
    #[error("node \"{0}\" not found")]
    NodeNotFound(String),
    /// The backing view could not answer, may be transient
    #[error("cluster state unavailable: {0}")]
    Unavailable(String),
}

/// Lister over the scheduler's view of the cluster.
///
/// Implementations are shared by concurrent scheduling cycles and must be
/// safe to call from several threads at once.
pub trait ClusterStateReader: Send + Sync {
    /// All pods in `namespace` whose label `key` equals `value`.
    fn list_pods_by_label(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<Vec<Pod>, ClusterError>;

    /// Memory the node reports as allocatable.
    fn node_allocatable_memory(&self, node_name: &str) -> Result<Quantity, ClusterError>;
}
