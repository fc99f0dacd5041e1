//! Error types for trial and task configuration.

use thiserror::Error;

/// Configuration errors detected at load time. Fatal to the trial or
/// task being set up, never to the host process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field_a} has {len_a} entries but {field_b} has {len_b}")]
    ParallelLengthMismatch {
        field_a: &'static str,
        len_a: usize,
        field_b: &'static str,
        len_b: usize,
    },

    #[error("{field} must be non-negative, got {value}")]
    NegativeDuration { field: &'static str, value: f64 },

    #[error("BlockCount must be at least 1")]
    ZeroBlockCount,

    #[error("duplicate task acronym: {0}")]
    DuplicateAcronym(String),

    #[error("duplicate state name {name:?} in task {acronym:?}")]
    DuplicateStateName { acronym: String, name: String },

    #[error("task {0:?} has no states")]
    EmptyStateSequence(String),
}
