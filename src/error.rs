//! Error types for loading, analysis and assignment.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the analyzer, the expander and the assignment engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// No people (or no preferences) are loaded.
    #[error("no preference data loaded")]
    NoData,

    #[error("unknown strategy {0:?} (expected one of: optimal, balanced, priority-fair, greedy-urgency, hybrid)")]
    UnknownStrategy(String),

    #[error("unknown expansion method {0:?} (expected one of: similarity, popularity, random, balanced)")]
    UnknownExpansionMethod(String),

    /// People are loaded but there is nothing to hand out.
    #[error("item universe is empty")]
    EmptyItemUniverse,

    /// A strategy returned fewer assignments than there are people.
    #[error("incomplete assignment from {strategy}: {assigned}/{expected} people")]
    IncompleteAssignment {
        strategy: String,
        assigned: usize,
        expected: usize,
    },

    /// No linear-assignment solver is configured on the engine.
    #[error("optimal solver unavailable")]
    OptimalSolverUnavailable,

    /// The solver rejected its cost matrix.
    #[error("solver error: {0}")]
    Solver(String),
}

/// Errors raised while reading or writing preference, catalog and assignment files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported format {0:?}, use 'wide' or 'long'")]
    UnsupportedFormat(String),

    #[error("the '{format}' format requires at least {required} columns, found {found}")]
    MissingColumns {
        format: &'static str,
        required: usize,
        found: usize,
    },

    /// The file parsed but contained no person with at least one preference.
    #[error("no preferences found in {}", .0.display())]
    Empty(PathBuf),
}

/// Errors raised while reading or validating an [`AssignerConfig`](crate::config::AssignerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
