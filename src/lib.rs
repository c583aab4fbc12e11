//! Seeded question-variant generation.
//!
//! A [`SeededRandomStream`] turns a stored [`Seed`] into the exact same
//! sequence of sampling results every time, so a student's variant of a
//! question can be regenerated for regrading. The sampling operations live on
//! the stream itself; [`GivenVariableSolver`] picks which variables of a
//! linear system to reveal so the answer is a chosen number of steps away.
//!
//! # Modules
//!
//! - `seed` - base-36 seeds and the wall-clock fallback
//! - `stream` - the MT19937-backed stream
//! - `sampling` - integers, reals, choices, permutations and shuffles
//! - `categories` - spreading selections over weighted categories
//! - `functions` - random polynomial, exponential and trig terms
//! - `given` - difficulty classification and given-variable search

pub mod categories;
pub mod error;
pub mod functions;
pub mod given;
pub mod sampling;
pub mod seed;
pub mod stream;

pub use categories::CategoryWeights;
pub use error::{Result, SamplingError};
pub use functions::{ExponentialTerm, FunctionTerm, PolynomialOptions, TrigFunction, TrigTerm};
pub use given::{DifficultyLevel, GivenVariableSolver, LinearSystem, MAX_GIVEN_TRIALS};
pub use sampling::{apply_permutation, apply_permutation_to_many, repeat, IntRange};
pub use seed::Seed;
pub use stream::SeededRandomStream;
