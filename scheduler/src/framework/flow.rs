use shared::models::Pod;

use super::{Code, NodeScore, NodeScoreList, PreFilterPlugin, ScorePlugin, Status};

/// Result of running one pod through a scheduling cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Normalized scores, in candidate order
    Ranked(NodeScoreList),
    /// The plugin decided the pod cannot be scheduled now
    Rejected(Status),
    /// A lookup or plugin failure aborted the cycle
    Failed(Status),
}

impl CycleOutcome {
    /// Highest scoring node, the earliest candidate wins ties.
    pub fn best(&self) -> Option<&NodeScore> {
        let CycleOutcome::Ranked(scores) = self else {
            return None;
        };
        scores.iter().fold(None, |best, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
    }
}

/// Scheduling cycle for a single pod: pre-filters it, scores every
/// candidate node and normalizes the batch. Nothing is bound.
pub struct SchedulingCycle<'a, P> {
    plugin: &'a P,
    pod: &'a Pod,
    candidates: Vec<String>,
    scores: NodeScoreList,
    halted: Option<CycleOutcome>,
}

impl<'a, P> SchedulingCycle<'a, P>
where
    P: PreFilterPlugin + ScorePlugin,
{
    pub fn new(plugin: &'a P, pod: &'a Pod, candidates: Vec<String>) -> Self {
        Self {
            plugin,
            pod,
            scores: Vec::with_capacity(candidates.len()),
            candidates,
            halted: None,
        }
    }

    pub fn execute(self) -> CycleOutcome {
        let cycle = self.pre_filter().score().normalize();
        cycle
            .halted
            .unwrap_or(CycleOutcome::Ranked(cycle.scores))
    }

    fn halt(mut self, status: Status) -> Self {
        self.halted = Some(match status.code() {
            Code::Unschedulable => CycleOutcome::Rejected(status),
            _ => CycleOutcome::Failed(status),
        });
        self
    }

    /// Admission check before any node is considered.
    fn pre_filter(self) -> Self {
        let status = self.plugin.pre_filter(self.pod);
        if status.is_success() {
            tracing::debug!(pod=%self.pod.metadata.name, %status, "Pre-filter passed");
            self
        } else {
            tracing::debug!(pod=%self.pod.metadata.name, %status, "Pre-filter stopped the cycle");
            self.halt(status)
        }
    }

    /// Raw score per candidate, first failure aborts the cycle.
    fn score(mut self) -> Self {
        if self.halted.is_some() {
            return self;
        }

        let candidates = std::mem::take(&mut self.candidates);
        for node in candidates {
            match self.plugin.score(self.pod, &node) {
                Ok(score) => self.scores.push(NodeScore::new(node, score)),
                Err(status) => {
                    tracing::error!(pod=%self.pod.metadata.name, %node, %status, "Scoring failed");
                    return self.halt(status);
                }
            }
        }
        self
    }

    fn normalize(mut self) -> Self {
        if self.halted.is_some() {
            return self;
        }
        let Some(extensions) = self.plugin.score_extensions() else {
            return self;
        };

        let status = extensions.normalize_score(self.pod, &mut self.scores);
        if status.is_success() {
            self
        } else {
            tracing::error!(pod=%self.pod.metadata.name, %status, "Normalization failed");
            self.halt(status)
        }
    }
}

#[cfg(test)]
mod tests {

    //! - test_rejected_pod_is_never_scored
    //!     an unschedulable pre-filter stops the cycle before scoring.
    //! - test_score_error_fails_cycle
    //! - test_ranked_keeps_candidate_order
    //!     scores come back in candidate order, best() picks first on ties.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::framework::{Plugin, ScoreExtensions};

    struct StubPlugin {
        admit: Status,
        scores: HashMap<String, i64>,
        score_calls: AtomicUsize,
    }

    impl StubPlugin {
        fn new(admit: Status, scores: &[(&str, i64)]) -> Self {
            Self {
                admit,
                scores: scores.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
                score_calls: AtomicUsize::new(0),
            }
        }
    }

    impl Plugin for StubPlugin {
        fn name(&self) -> &'static str {
            "Stub"
        }
    }

    impl PreFilterPlugin for StubPlugin {
        fn pre_filter(&self, _pod: &Pod) -> Status {
            self.admit.clone()
        }
    }

    impl ScorePlugin for StubPlugin {
        fn score(&self, _pod: &Pod, node_name: &str) -> Result<i64, Status> {
            self.score_calls.fetch_add(1, Ordering::SeqCst);
            self.scores
                .get(node_name)
                .copied()
                .ok_or_else(|| Status::error(format!("node {node_name} not found")))
        }

        fn score_extensions(&self) -> Option<&dyn ScoreExtensions> {
            Some(self)
        }
    }

    impl ScoreExtensions for StubPlugin {
        fn normalize_score(&self, _pod: &Pod, scores: &mut [NodeScore]) -> Status {
            for entry in scores.iter_mut() {
                entry.score *= 10;
            }
            Status::success("")
        }
    }

    fn names(nodes: &[&str]) -> Vec<String> {
        nodes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_rejected_pod_is_never_scored() {
        let plugin = StubPlugin::new(Status::unschedulable("nope"), &[("a", 1)]);
        let pod = Pod::default();

        let outcome = SchedulingCycle::new(&plugin, &pod, names(&["a"])).execute();

        assert_eq!(outcome, CycleOutcome::Rejected(Status::unschedulable("nope")));
        assert_eq!(plugin.score_calls.load(Ordering::SeqCst), 0);
        assert!(outcome.best().is_none());
    }

    #[test]
    fn test_score_error_fails_cycle() {
        let plugin = StubPlugin::new(Status::success(""), &[("a", 1)]);
        let pod = Pod::default();

        let outcome = SchedulingCycle::new(&plugin, &pod, names(&["a", "ghost", "a"])).execute();

        let CycleOutcome::Failed(status) = outcome else {
            panic!("expected failed cycle, got {outcome:?}");
        };
        assert_eq!(status.code(), Code::Error);
        assert_eq!(plugin.score_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ranked_keeps_candidate_order() {
        let plugin = StubPlugin::new(Status::success(""), &[("a", 1), ("b", 3), ("c", 3)]);
        let pod = Pod::default();

        let outcome = SchedulingCycle::new(&plugin, &pod, names(&["a", "b", "c"])).execute();

        assert_eq!(
            outcome,
            CycleOutcome::Ranked(vec![
                NodeScore::new("a", 10),
                NodeScore::new("b", 30),
                NodeScore::new("c", 30),
            ])
        );
        assert_eq!(outcome.best().map(|s| s.name.as_str()), Some("b"));
    }
}
