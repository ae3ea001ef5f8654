//! Extension points a scheduling plugin implements, and the status values it
//! reports back to the scheduling cycle.

mod flow;

use std::fmt;

use shared::models::Pod;

pub use flow::{CycleOutcome, SchedulingCycle};

/// Highest score a node can hold after normalization.
pub const MAX_NODE_SCORE: i64 = 100;
/// Lowest score a node can hold after normalization.
pub const MIN_NODE_SCORE: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Success,
    /// Internal failure, the cycle for this pod is abandoned
    Error,
    /// Policy rejection, the pod is not schedulable right now
    Unschedulable,
}

/// Outcome of a plugin call plus a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Code::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Code::Error, message)
    }

    pub fn unschedulable(message: impl Into<String>) -> Self {
        Self::new(Code::Unschedulable, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.code == Code::Success
    }

    pub fn is_unschedulable(&self) -> bool {
        self.code == Code::Unschedulable
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.code)
        } else {
            write!(f, "{:?}: {}", self.code, self.message)
        }
    }
}

/// Score of one candidate node for the pod being scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

pub type NodeScoreList = Vec<NodeScore>;

pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
}

/// Runs once per cycle, before any node is looked at.
pub trait PreFilterPlugin: Plugin {
    fn pre_filter(&self, pod: &Pod) -> Status;
}

/// Runs once per candidate node.
pub trait ScorePlugin: Plugin {
    fn score(&self, pod: &Pod, node_name: &str) -> Result<i64, Status>;

    fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
        None
    }
}

/// Post-processing over the whole batch of scores for a pod.
pub trait ScoreExtensions: Send + Sync {
    /// Rewrites the scores in place. Entry order must be preserved.
    fn normalize_score(&self, pod: &Pod, scores: &mut [NodeScore]) -> Status;
}
