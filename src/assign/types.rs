use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AssignError;

/// Person -> assigned item, in the order people were processed by the caller.
pub type Assignment = IndexMap<String, String>;

/// The assignment strategies the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Minimum-cost perfect matching over the rank cost matrix.
    Optimal,
    /// Rarer tastes first, each trying their least contested choices first.
    Balanced,
    /// Shortest lists first.
    PriorityFair,
    /// Repeatedly serve whoever has the fewest choices still open.
    GreedyUrgency,
    /// Best-scoring result of the other four.
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Optimal,
        Strategy::Balanced,
        Strategy::PriorityFair,
        Strategy::GreedyUrgency,
        Strategy::Hybrid,
    ];

    /// Strategies hybrid and comparison runs consider, in tie-break order.
    pub const CANDIDATES: [Strategy; 4] = [
        Strategy::Optimal,
        Strategy::Balanced,
        Strategy::PriorityFair,
        Strategy::GreedyUrgency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Optimal => "optimal",
            Strategy::Balanced => "balanced",
            Strategy::PriorityFair => "priority-fair",
            Strategy::GreedyUrgency => "greedy-urgency",
            Strategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "optimal" | "hungarian" => Ok(Strategy::Optimal),
            "balanced" => Ok(Strategy::Balanced),
            "priority-fair" | "priority_fair" => Ok(Strategy::PriorityFair),
            "greedy-urgency" | "greedy_urgency" | "greedy_smart" | "greedy" => {
                Ok(Strategy::GreedyUrgency)
            }
            "hybrid" => Ok(Strategy::Hybrid),
            _ => Err(AssignError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub assignment: Assignment,
    /// The strategy the caller asked for.
    pub requested: Strategy,
    /// The strategy whose assignment was returned. Differs from `requested`
    /// for hybrid runs and when the optimal solver was unavailable.
    pub used: Strategy,
    /// Set when `optimal` was requested (directly or via hybrid) without a solver.
    pub optimal_fallback: bool,
}
