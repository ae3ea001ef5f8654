//! Pod group quorum admission plus allocatable-memory node ranking.
//!
//! - pre-filter: a pod carrying a `podGroup` label is only admitted once the
//!   scheduler sees at least `minAvailable` pods of that group in its namespace.
//! - score: nodes are ranked by allocatable memory, ascending or descending
//!   depending on the configured [`Mode`].
//! - normalize: raw scores are rescaled onto `[MIN_NODE_SCORE, MAX_NODE_SCORE]`.

mod filter;
mod mode;
mod normalize;
mod scorer;
#[cfg(test)]
mod test_reader;

use std::sync::Arc;

use crate::cluster::ClusterStateReader;
use crate::config::ConfigError;
use crate::framework::Plugin;

pub use mode::Mode;
pub use normalize::normalize;

/// Name the plugin is registered and configured under.
pub const NAME: &str = "CustomScheduler";
pub const GROUP_NAME_LABEL: &str = "podGroup";
pub const MIN_AVAILABLE_LABEL: &str = "minAvailable";

pub struct CustomScheduler {
    reader: Arc<dyn ClusterStateReader>,
    mode: Mode,
}

impl CustomScheduler {
    /// Builds the plugin from its optional JSON args, e.g. `{"mode": "Most"}`.
    pub fn new(
        args: Option<&[u8]>,
        reader: Arc<dyn ClusterStateReader>,
    ) -> Result<Self, ConfigError> {
        let mode = Mode::from_args(args)?;
        tracing::info!(%mode, "Custom scheduler runs with the mode");
        Ok(Self { reader, mode })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Plugin for CustomScheduler {
    fn name(&self) -> &'static str {
        NAME
    }
}
