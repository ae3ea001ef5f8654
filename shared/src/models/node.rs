use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::quantity::Quantity;

/// Represents a node in the cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Node {
    pub id: Uuid,
    pub name: String,
    pub status: NodeStatus,
    pub addr: String,
    /// Capacity the node reports as available to pods
    #[serde(default)]
    pub allocatable: Resources,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

/// Status of a node in the cluster.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum NodeStatus {
    Ready,
    Running,
    Stopped,
}

/// Allocatable capacity. Only memory is modelled, other reported
/// resources are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Resources {
    #[serde(default)]
    pub memory: Quantity,
}

impl Node {
    pub fn new(name: &str, memory: Quantity) -> Self {
        Node {
            name: name.to_string(),
            allocatable: Resources { memory },
            ..Default::default()
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Node {
            id,
            name: id.to_string(),
            status: NodeStatus::Ready,
            addr: String::new(),
            allocatable: Resources::default(),
            started_at: now,
            last_heartbeat: now,
        }
    }
}
