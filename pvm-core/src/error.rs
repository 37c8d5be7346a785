//! Error types for the statistical core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PvmError {
    #[error("invalid 2x2 table: {reason}")]
    InvalidTable { reason: String },

    #[error("report matrix has {got} columns, expected n_drugs + n_events = {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error(
        "hypergeometric distribution undefined for population={population}, \
         successes={successes}, draws={draws}"
    )]
    NumericDomain {
        population: u64,
        successes: u64,
        draws: u64,
    },
}
