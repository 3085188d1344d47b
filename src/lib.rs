//! Assigns one item to each person from ranked preference lists.
//!
//! The pipeline is load, analyze, optionally expand short lists, assign with
//! one of several strategies, then evaluate and report.

pub mod analysis;
pub mod assign;
pub mod assigner;
pub mod config;
pub mod display;
pub mod error;
pub mod evaluate;
pub mod expand;
pub mod export;
pub mod parser;
pub mod store;

pub use analysis::{analyze, ConflictAnalysis};
pub use assign::{Assignment, AssignmentEngine, HungarianSolver, OptimalSolver, Outcome, Strategy};
pub use assigner::CharacterAssigner;
pub use config::AssignerConfig;
pub use error::{AssignError, ConfigError, FileError};
pub use evaluate::{compare_strategies, score, select_best, Comparison, StrategyResult};
pub use expand::{expand_preferences, ExpansionMethod};
pub use parser::{load_item_catalog, load_preferences, CsvFormat};
pub use store::{PreferenceStore, Preferences};
