use serde::{Deserialize, Serialize};

use crate::models::metadata::Metadata;

// --- Core ---

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pod {
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: PodSpec,
}

/// Desired state
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PodSpec {
    /// Empty until the pod is bound to a node
    #[serde(default)]
    pub node_name: String,
}

// --- Impl ---

impl Pod {
    pub fn new(namespace: &str, name: &str) -> Self {
        let mut pod = Pod::default();
        pod.metadata.namespace = namespace.to_string();
        pod.metadata.name = name.to_string();
        pod
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.metadata = self.metadata.with_label(key, value);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.spec.node_name.is_empty()
    }
}
