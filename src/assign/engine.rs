use tracing::{debug, warn};

use super::balanced::assign_balanced;
use super::greedy_urgency::assign_greedy_urgency;
use super::hybrid::assign_hybrid;
use super::optimal::{assign_optimal, HungarianSolver, OptimalSolver};
use super::priority_fair::assign_priority_fair;
use super::slot_pool::build_slot_pool;
use super::types::{Assignment, Outcome, Strategy};
use crate::config::ScoringConfig;
use crate::error::AssignError;
use crate::store::Preferences;

/// Maps preferences onto one slot per person using a named strategy.
///
/// The optimal strategy needs an [`OptimalSolver`]. Without one, a direct
/// `optimal` request falls back to `greedy-urgency` and the returned
/// [`Outcome`] says so; `hybrid` simply leaves it out.
pub struct AssignmentEngine {
    solver: Option<Box<dyn OptimalSolver>>,
    scoring: ScoringConfig,
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::with_solver(Box::new(HungarianSolver))
    }
}

impl AssignmentEngine {
    pub fn with_solver(solver: Box<dyn OptimalSolver>) -> Self {
        Self {
            solver: Some(solver),
            scoring: ScoringConfig::default(),
        }
    }

    pub fn without_solver() -> Self {
        Self {
            solver: None,
            scoring: ScoringConfig::default(),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn has_optimal_solver(&self) -> bool {
        self.solver.is_some()
    }

    /// Runs `strategy` over `preferences`, handing out copies of `items`.
    ///
    /// Every person receives exactly one item from `items`, and no item is
    /// handed out more often than it has copies in the slot pool.
    pub fn assign(
        &self,
        preferences: &Preferences,
        items: &[String],
        strategy: Strategy,
    ) -> Result<Outcome, AssignError> {
        if preferences.is_empty() {
            return Err(AssignError::NoData);
        }
        let slots = build_slot_pool(items, preferences.len())?;

        let (assignment, used, optimal_fallback) = match strategy {
            Strategy::Hybrid => assign_hybrid(self, preferences, &slots)?,
            Strategy::Optimal if !self.has_optimal_solver() => {
                warn!("optimal solver unavailable, falling back to greedy-urgency");
                let assignment = self.run_single(Strategy::GreedyUrgency, preferences, &slots)?;
                (assignment, Strategy::GreedyUrgency, true)
            }
            single => (self.run_single(single, preferences, &slots)?, single, false),
        };

        check_complete(used, &assignment, preferences.len())?;
        debug!(
            requested = %strategy,
            used = %used,
            people = preferences.len(),
            slots = slots.len(),
            "assignment complete"
        );

        Ok(Outcome {
            assignment: in_input_order(assignment, preferences),
            requested: strategy,
            used,
            optimal_fallback,
        })
    }

    /// Runs one non-hybrid strategy on a prepared slot pool.
    pub(crate) fn run_single(
        &self,
        strategy: Strategy,
        preferences: &Preferences,
        slots: &[String],
    ) -> Result<Assignment, AssignError> {
        match strategy {
            Strategy::Optimal => {
                let solver = self
                    .solver
                    .as_deref()
                    .ok_or(AssignError::OptimalSolverUnavailable)?;
                assign_optimal(
                    preferences,
                    slots,
                    solver,
                    i64::from(self.scoring.solver_penalty),
                )
            }
            Strategy::Balanced => Ok(assign_balanced(preferences, slots)),
            Strategy::PriorityFair => Ok(assign_priority_fair(preferences, slots)),
            // Hybrid never re-enters itself; its last resort is greedy-urgency.
            Strategy::GreedyUrgency | Strategy::Hybrid => {
                Ok(assign_greedy_urgency(preferences, slots))
            }
        }
    }
}

/// Fails with [`AssignError::IncompleteAssignment`] unless everyone got an item.
pub fn check_complete(
    strategy: Strategy,
    assignment: &Assignment,
    expected: usize,
) -> Result<(), AssignError> {
    if assignment.len() != expected {
        return Err(AssignError::IncompleteAssignment {
            strategy: strategy.to_string(),
            assigned: assignment.len(),
            expected,
        });
    }
    Ok(())
}

fn in_input_order(mut assignment: Assignment, preferences: &Preferences) -> Assignment {
    preferences
        .keys()
        .filter_map(|person| {
            assignment
                .swap_remove(person)
                .map(|item| (person.clone(), item))
        })
        .collect()
}
