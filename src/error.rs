use thiserror::Error;

/// Errors raised when a sampling or solver call is given inputs it cannot honour.
///
/// Every variant describes a caller precondition; a well-formed call never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("invalid seed {0:?}: expected a base-36 integer")]
    InvalidSeed(String),

    #[error("invalid integer range: min={min}, max={max}, step={step}")]
    InvalidRange { min: i64, max: i64, step: i64 },

    #[error("range [{min}, {max}] with step {step} contains no nonzero value")]
    NoNonZeroValue { min: i64, max: i64, step: i64 },

    #[error("requested {requested} unique values but the range only holds {available}")]
    NotEnoughValues { requested: usize, available: usize },

    #[error("cannot choose from an empty list")]
    EmptyItems,

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("permutation of length {perm} cannot reorder an array of length {len}")]
    PermutationLength { perm: usize, len: usize },

    #[error("invalid linear system: {0}")]
    InvalidSystem(String),

    #[error("invalid variable group: {0}")]
    InvalidGroup(String),

    #[error("difficulty must be between 1 and 4, got {0}")]
    InvalidDifficulty(u8),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SamplingError>;
