use shared::models::Pod;

use crate::framework::{ScoreExtensions, ScorePlugin, Status};

use super::CustomScheduler;

impl ScorePlugin for CustomScheduler {
    /// Raw score from the node's allocatable memory, signed by the mode.
    fn score(&self, pod: &Pod, node_name: &str) -> Result<i64, Status> {
        tracing::debug!(pod=%pod.metadata.name, node=%node_name, "Score phase");

        let memory = self
            .reader
            .node_allocatable_memory(node_name)
            .map_err(|error| Status::error(error.to_string()))?;

        Ok(self.mode.raw_score(memory.value()))
    }

    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        Some(self)
    }
}
