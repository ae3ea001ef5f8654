use dashmap::DashMap;
use shared::api::{EventType, NodeEvent, PodEvent};
use shared::models::{Node, NodeStatus, Pod, Quantity};
use std::sync::Arc;
use uuid::Uuid;

use super::{ClusterError, ClusterStateReader};

/// In-memory view of pods and nodes, fed by watch events.
#[derive(Debug, Default)]
pub struct ClusterSnapshot {
    pods: DashMap<Uuid, Pod>,
    nodes: DashMap<String, Node>,
}

impl ClusterSnapshot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn apply_pod_event(&self, event: &PodEvent) {
        let pod = &event.pod;
        match event.event_type {
            EventType::Added | EventType::Modified => {
                self.pods.insert(pod.metadata.id, pod.clone());
            }
            EventType::Deleted => {
                if self.pods.remove(&pod.metadata.id).is_none() {
                    tracing::warn!(id=%pod.metadata.id, "Deleted pod was not tracked");
                }
            }
        }
    }

    pub fn apply_node_event(&self, event: &NodeEvent) {
        let node = &event.node;
        match event.event_type {
            EventType::Added | EventType::Modified => {
                self.nodes.insert(node.name.clone(), node.clone());
            }
            EventType::Deleted => {
                if self.nodes.remove(&node.name).is_none() {
                    tracing::warn!(node=%node.name, "Deleted node was not tracked");
                }
            }
        }
    }

    pub fn add_pod(&self, pod: &Pod) {
        self.pods.insert(pod.metadata.id, pod.clone());
    }

    pub fn add_node(&self, node: &Node) {
        self.nodes.insert(node.name.clone(), node.clone());
    }

    pub fn pod(&self, id: &Uuid) -> Option<Pod> {
        self.pods.get(id).map(|p| p.clone())
    }

    /// Pods not bound to any node yet
    pub fn pending_pods(&self) -> Vec<Uuid> {
        self.pods
            .iter()
            .filter(|entry| entry.is_pending())
            .map(|entry| *entry.key())
            .collect()
    }

    /// Names of nodes that can take pods, sorted for stable cycles
    pub fn ready_nodes(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .nodes
            .iter()
            .filter(|entry| entry.status != NodeStatus::Stopped)
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl ClusterStateReader for ClusterSnapshot {
    fn list_pods_by_label(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<Vec<Pod>, ClusterError> {
        Ok(self
            .pods
            .iter()
            .filter(|entry| {
                entry.metadata.namespace == namespace && entry.metadata.label(key) == Some(value)
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn node_allocatable_memory(&self, node_name: &str) -> Result<Quantity, ClusterError> {
        self.nodes
            .get(node_name)
            .map(|node| node.allocatable.memory)
            .ok_or_else(|| ClusterError::NodeNotFound(node_name.to_string()))
    }
}
