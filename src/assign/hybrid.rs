use tracing::{info, warn};

use super::engine::{check_complete, AssignmentEngine};
use super::types::{Assignment, Strategy};
use crate::error::AssignError;
use crate::evaluate::score;
use crate::store::Preferences;

/// Runs every candidate strategy on the same slot pool and keeps the
/// lowest-scoring assignment.
///
/// Candidates that fail are logged and skipped. Ties keep the earlier
/// candidate in [`Strategy::CANDIDATES`] order. When every candidate fails
/// the result comes straight from greedy-urgency.
///
/// Returns the assignment, the strategy that produced it, and whether the
/// optimal candidate had to be skipped for lack of a solver.
pub(super) fn assign_hybrid(
    engine: &AssignmentEngine,
    preferences: &Preferences,
    slots: &[String],
) -> Result<(Assignment, Strategy, bool), AssignError> {
    let unmatched_penalty = engine.scoring().unmatched_penalty;
    let mut optimal_skipped = false;
    let mut best: Option<(Strategy, Assignment, f64)> = None;

    for strategy in Strategy::CANDIDATES {
        if strategy == Strategy::Optimal && !engine.has_optimal_solver() {
            warn!("optimal solver unavailable, hybrid continues without it");
            optimal_skipped = true;
            continue;
        }

        let assignment = match engine
            .run_single(strategy, preferences, slots)
            .and_then(|assignment| {
                check_complete(strategy, &assignment, preferences.len()).map(|()| assignment)
            }) {
            Ok(assignment) => assignment,
            Err(err) => {
                warn!(strategy = %strategy, error = %err, "hybrid candidate failed");
                continue;
            }
        };

        let candidate_score = score(&assignment, preferences, unmatched_penalty);
        if best
            .as_ref()
            .map_or(true, |(_, _, best_score)| candidate_score < *best_score)
        {
            best = Some((strategy, assignment, candidate_score));
        }
    }

    match best {
        Some((strategy, assignment, best_score)) => {
            info!(strategy = %strategy, score = best_score, "hybrid strategy selected");
            Ok((assignment, strategy, optimal_skipped))
        }
        None => {
            warn!("every hybrid candidate failed, using greedy-urgency");
            let assignment = engine.run_single(Strategy::GreedyUrgency, preferences, slots)?;
            Ok((assignment, Strategy::GreedyUrgency, optimal_skipped))
        }
    }
}
