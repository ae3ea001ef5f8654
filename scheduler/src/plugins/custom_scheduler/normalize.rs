use shared::models::Pod;

use crate::framework::{MAX_NODE_SCORE, MIN_NODE_SCORE, NodeScore, ScoreExtensions, Status};

use super::CustomScheduler;

impl ScoreExtensions for CustomScheduler {
    fn normalize_score(&self, pod: &Pod, scores: &mut [NodeScore]) -> Status {
        if scores.is_empty() {
            return Status::success("no scores to normalize");
        }
        normalize(scores);
        tracing::debug!(pod=%pod.metadata.name, nodes = scores.len(), "Normalized scores");
        Status::success("")
    }
}

/// Min-max rescale of `scores` onto `[MIN_NODE_SCORE, MAX_NODE_SCORE]`, in place.
///
/// The lowest raw score maps to `MIN_NODE_SCORE`, the highest to
/// `MAX_NODE_SCORE`, the rest are interpolated with truncating division.
/// A batch of equal scores maps to the middle of the range.
pub fn normalize(scores: &mut [NodeScore]) {
    let Some(first) = scores.first() else {
        return;
    };
    let (min, max) = scores
        .iter()
        .fold((first.score, first.score), |(lo, hi), entry| {
            (lo.min(entry.score), hi.max(entry.score))
        });

    if min == max {
        let middle = (MIN_NODE_SCORE + MAX_NODE_SCORE) / 2;
        for entry in scores.iter_mut() {
            entry.score = middle;
        }
        return;
    }

    // i128 so that (raw - min) * range cannot overflow for any i64 input
    let score_range = i128::from(max) - i128::from(min);
    let valid_range = i128::from(MAX_NODE_SCORE - MIN_NODE_SCORE);
    for entry in scores.iter_mut() {
        let offset = i128::from(entry.score) - i128::from(min);
        entry.score = (offset * valid_range / score_range) as i64 + MIN_NODE_SCORE;
    }
}
