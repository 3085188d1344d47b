pub mod types;
pub mod slot_pool;
pub mod optimal;
pub mod balanced;
pub mod priority_fair;
pub mod greedy_urgency;
mod hybrid;
pub mod engine;

pub use types::{Assignment, Outcome, Strategy};
pub use slot_pool::build_slot_pool;
pub use optimal::{HungarianSolver, OptimalSolver};
pub use engine::{check_complete, AssignmentEngine};
