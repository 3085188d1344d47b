//! Scoring of assignments and comparison across strategies.
//!
//! Two cost scales are in use. [`score`] is the evaluator's cost: rank, or a
//! small penalty per unmatched person, scaled by satisfaction. Comparison
//! results carry a total cost on the solver's scale, where an unmatched person
//! costs 1000, and [`select_best`] weighs that against the satisfaction
//! percentage.

use serde::Serialize;
use tracing::{debug, warn};

use crate::assign::{Assignment, AssignmentEngine, Strategy};
use crate::error::AssignError;
use crate::store::{rank_of, PreferenceStore, Preferences};

/// Lower is better.
///
/// Sums each person's rank for their item (0 for a first choice) or
/// `unmatched_penalty` when the item is not in their list, then multiplies by
/// `2 - satisfied_fraction`.
pub fn score(assignment: &Assignment, preferences: &Preferences, unmatched_penalty: u32) -> f64 {
    if assignment.is_empty() {
        return 0.0;
    }

    let mut total = 0u64;
    let mut satisfied = 0usize;
    for (person, item) in assignment {
        match preferences.get(person).and_then(|list| rank_of(list, item)) {
            Some(rank) => {
                total += rank as u64;
                satisfied += 1;
            }
            None => total += u64::from(unmatched_penalty),
        }
    }

    let satisfied_fraction = satisfied as f64 / assignment.len() as f64;
    total as f64 * (2.0 - satisfied_fraction)
}

/// One strategy's assignment with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub assignment: Assignment,
    /// Sum of ranks, plus the comparison penalty per unmatched person.
    pub total_cost: u64,
    pub satisfied: usize,
    pub people: usize,
    pub satisfaction_pct: f64,
    pub details: Vec<String>,
}

impl StrategyResult {
    pub fn from_assignment(
        strategy: Strategy,
        assignment: Assignment,
        preferences: &Preferences,
        unmatched_penalty: u32,
    ) -> Self {
        let mut total_cost = 0u64;
        let mut satisfied = 0usize;
        let mut details = Vec::with_capacity(assignment.len());

        for (person, item) in &assignment {
            match preferences.get(person).and_then(|list| rank_of(list, item)) {
                Some(rank) => {
                    total_cost += rank as u64;
                    satisfied += 1;
                    details.push(format!("{person}: {item} (pref #{})", rank + 1));
                }
                None => {
                    total_cost += u64::from(unmatched_penalty);
                    details.push(format!("{person}: {item} (not preferred)"));
                }
            }
        }

        let people = assignment.len();
        let satisfaction_pct = if people == 0 {
            0.0
        } else {
            satisfied as f64 / people as f64 * 100.0
        };

        Self {
            strategy,
            assignment,
            total_cost,
            satisfied,
            people,
            satisfaction_pct,
            details,
        }
    }

    /// `total_cost * (100 - satisfaction_pct)`; lower is better.
    pub fn selection_score(&self) -> f64 {
        self.total_cost as f64 * (100.0 - self.satisfaction_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    pub results: Vec<StrategyResult>,
    pub failures: Vec<StrategyFailure>,
    /// The optimal strategy was left out because no solver is configured.
    pub optimal_skipped: bool,
}

impl Comparison {
    pub fn best(&self) -> Strategy {
        select_best(&self.results)
    }

    pub fn result(&self, strategy: Strategy) -> Option<&StrategyResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }
}

/// Runs every non-hybrid strategy on the raw preferences.
///
/// A failing strategy is recorded in [`Comparison::failures`] and the rest
/// still run.
pub fn compare_strategies(
    engine: &AssignmentEngine,
    store: &PreferenceStore,
) -> Result<Comparison, AssignError> {
    if store.is_empty() {
        return Err(AssignError::NoData);
    }

    let penalty = engine.scoring().comparison_penalty;
    let mut comparison = Comparison::default();

    for strategy in Strategy::CANDIDATES {
        if strategy == Strategy::Optimal && !engine.has_optimal_solver() {
            comparison.optimal_skipped = true;
            continue;
        }

        match engine.assign(store.preferences(), store.items(), strategy) {
            Ok(outcome) => {
                let result = StrategyResult::from_assignment(
                    strategy,
                    outcome.assignment,
                    store.preferences(),
                    penalty,
                );
                debug!(
                    strategy = %strategy,
                    cost = result.total_cost,
                    satisfaction = result.satisfaction_pct,
                    "strategy evaluated"
                );
                comparison.results.push(result);
            }
            Err(err) => {
                warn!(strategy = %strategy, error = %err, "strategy failed during comparison");
                comparison.failures.push(StrategyFailure {
                    strategy,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(comparison)
}

/// Picks the result with the lowest [`StrategyResult::selection_score`].
/// Ties keep the earlier result. With no results the default is hybrid.
pub fn select_best(results: &[StrategyResult]) -> Strategy {
    let mut best: Option<(Strategy, f64)> = None;
    for result in results {
        let candidate = result.selection_score();
        if best.map_or(true, |(_, top)| candidate < top) {
            best = Some((result.strategy, candidate));
        }
    }
    best.map_or(Strategy::Hybrid, |(strategy, _)| strategy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::assign::OptimalSolver;

    struct FailingSolver;

    impl OptimalSolver for FailingSolver {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn solve(&self, _costs: &[Vec<i64>]) -> Result<Vec<usize>, AssignError> {
            Err(AssignError::Solver("boom".to_string()))
        }
    }

    fn prefs(rows: &[(&str, &[&str])]) -> Preferences {
        rows.iter()
            .map(|(person, items)| {
                (
                    person.to_string(),
                    items.iter().map(|item| item.to_string()).collect(),
                )
            })
            .collect()
    }

    fn assignment(rows: &[(&str, &str)]) -> Assignment {
        rows.iter()
            .map(|(person, item)| (person.to_string(), item.to_string()))
            .collect()
    }

    fn sample() -> Preferences {
        prefs(&[("Ann", &["A", "B"]), ("Ben", &["B", "A"]), ("Cid", &["C"])])
    }

    #[test]
    fn perfect_assignment_scores_zero() {
        let a = assignment(&[("Ann", "A"), ("Ben", "B"), ("Cid", "C")]);
        assert_eq!(score(&a, &sample(), 10), 0.0);
    }

    #[test]
    fn unmatched_people_are_penalised_and_scaled() {
        // Ann rank 1, Ben rank 1, Cid unmatched: (1 + 1 + 10) * (2 - 2/3).
        let a = assignment(&[("Ann", "B"), ("Ben", "A"), ("Cid", "A")]);
        let expected = 12.0 * (2.0 - 2.0 / 3.0);
        assert!((score(&a, &sample(), 10) - expected).abs() < 1e-9);
    }

    #[test]
    fn more_first_choices_never_score_worse() {
        let preferences = sample();
        let better = assignment(&[("Ann", "A"), ("Ben", "B"), ("Cid", "C")]);
        let worse = assignment(&[("Ann", "B"), ("Ben", "A"), ("Cid", "C")]);
        assert!(score(&better, &preferences, 10) <= score(&worse, &preferences, 10));
    }

    #[test]
    fn empty_assignment_scores_zero() {
        assert_eq!(score(&Assignment::new(), &sample(), 10), 0.0);
    }

    #[test]
    fn strategy_result_collects_details() {
        let a = assignment(&[("Ann", "B"), ("Ben", "B"), ("Cid", "A")]);
        let result = StrategyResult::from_assignment(Strategy::Balanced, a, &sample(), 1000);

        assert_eq!(result.total_cost, 1001);
        assert_eq!(result.satisfied, 2);
        assert!((result.satisfaction_pct - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            result.details,
            vec![
                "Ann: B (pref #2)".to_string(),
                "Ben: B (pref #1)".to_string(),
                "Cid: A (not preferred)".to_string(),
            ]
        );
    }

    #[test]
    fn select_best_defaults_to_hybrid() {
        assert_eq!(select_best(&[]), Strategy::Hybrid);
    }

    #[test]
    fn select_best_weighs_cost_against_satisfaction() {
        let preferences = sample();
        let cheap = StrategyResult::from_assignment(
            Strategy::Balanced,
            assignment(&[("Ann", "B"), ("Ben", "A"), ("Cid", "C")]),
            &preferences,
            1000,
        );
        let costly = StrategyResult::from_assignment(
            Strategy::PriorityFair,
            assignment(&[("Ann", "A"), ("Ben", "C"), ("Cid", "C")]),
            &preferences,
            1000,
        );
        assert_eq!(cheap.selection_score(), 0.0);
        assert_eq!(select_best(&[costly.clone(), cheap.clone()]), Strategy::Balanced);
        // Equal scores keep the first entry.
        assert_eq!(select_best(&[cheap.clone(), cheap]), Strategy::Balanced);
    }

    #[test]
    fn comparison_runs_all_candidates() {
        let store = PreferenceStore::from_preferences(sample());
        let comparison = compare_strategies(&AssignmentEngine::default(), &store).unwrap();

        let strategies: Vec<Strategy> = comparison.results.iter().map(|r| r.strategy).collect();
        assert_eq!(strategies, Strategy::CANDIDATES.to_vec());
        assert!(comparison.failures.is_empty());
        assert!(!comparison.optimal_skipped);
        for result in &comparison.results {
            assert_eq!(result.people, 3);
        }
        assert_eq!(comparison.result(Strategy::Optimal).unwrap().total_cost, 0);
    }

    #[test]
    fn comparison_without_solver_skips_optimal() {
        let store = PreferenceStore::from_preferences(sample());
        let comparison = compare_strategies(&AssignmentEngine::without_solver(), &store).unwrap();

        assert!(comparison.optimal_skipped);
        assert!(comparison.result(Strategy::Optimal).is_none());
        assert_eq!(comparison.results.len(), 3);
    }

    #[test]
    fn comparison_records_failures_and_continues() {
        let store = PreferenceStore::from_preferences(sample());
        let engine = AssignmentEngine::with_solver(Box::new(FailingSolver));
        let comparison = compare_strategies(&engine, &store).unwrap();

        assert_eq!(
            comparison.failures,
            vec![StrategyFailure {
                strategy: Strategy::Optimal,
                error: "solver error: boom".to_string(),
            }]
        );
        assert!(!comparison.optimal_skipped);
        let strategies: Vec<Strategy> = comparison.results.iter().map(|r| r.strategy).collect();
        assert_eq!(
            strategies,
            vec![Strategy::Balanced, Strategy::PriorityFair, Strategy::GreedyUrgency]
        );
        assert_ne!(comparison.best(), Strategy::Optimal);
    }

    #[test]
    fn comparison_needs_data() {
        let err = compare_strategies(&AssignmentEngine::default(), &PreferenceStore::default())
            .unwrap_err();
        assert_eq!(err, AssignError::NoData);
    }
}
