//! Choosing which variables of a linear system to reveal.
//!
//! A question built on a system of equations shows the student some variables
//! ("given") and asks for another. [`LinearSystem::classify_difficulty`] rates
//! how much algebra isolating the answer takes, and [`GivenVariableSolver`]
//! searches for a set of variable groups to reveal that lands on an exact
//! difficulty.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SamplingError};
use crate::stream::SeededRandomStream;

/// Group additions allowed across a whole [`GivenVariableSolver::choose_given_groups`] search.
pub const MAX_GIVEN_TRIALS: usize = 1000;

/// How many algebraic steps isolating the answer variable takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DifficultyLevel {
    /// One equation contains the answer and no other unknown.
    Single = 1,
    /// One unknown is found from its own equation, then substituted.
    Sequential = 2,
    /// Two equations in the answer and one other unknown, solved together.
    Simultaneous = 3,
    Harder = 4,
}

impl DifficultyLevel {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = SamplingError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(DifficultyLevel::Single),
            2 => Ok(DifficultyLevel::Sequential),
            3 => Ok(DifficultyLevel::Simultaneous),
            4 => Ok(DifficultyLevel::Harder),
            other => Err(SamplingError::InvalidDifficulty(other)),
        }
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> u8 {
        level.level()
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Coefficient matrix of a linear system: one row per equation, one column per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct LinearSystem {
    rows: Vec<Vec<f64>>,
    n_vars: usize,
}

impl TryFrom<Vec<Vec<f64>>> for LinearSystem {
    type Error = SamplingError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        LinearSystem::new(rows)
    }
}

impl From<LinearSystem> for Vec<Vec<f64>> {
    fn from(system: LinearSystem) -> Self {
        system.rows
    }
}

impl LinearSystem {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_vars = rows
            .first()
            .map(|r| r.len())
            .ok_or_else(|| SamplingError::InvalidSystem("no equations".into()))?;
        if n_vars == 0 {
            return Err(SamplingError::InvalidSystem("no variables".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_vars) {
            return Err(SamplingError::InvalidSystem(format!(
                "row {i} has {} coefficients, expected {n_vars}",
                row.len()
            )));
        }
        Ok(Self { rows, n_vars })
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn n_equations(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    fn equations(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.n_vars {
            return Err(SamplingError::InvalidArgument(format!(
                "variable {index} is out of range for a system of {} variables",
                self.n_vars
            )));
        }
        Ok(())
    }

    /// Difficulty of solving for `answer` when the `given` variables are known.
    pub fn classify_difficulty(&self, answer: usize, given: &[usize]) -> Result<DifficultyLevel> {
        self.check_index(answer)?;
        for &g in given {
            self.check_index(g)?;
        }
        Ok(self.difficulty(answer, given))
    }

    /// Hardest difficulty over several answer variables; `None` when `answers` is empty.
    pub fn max_difficulty(&self, answers: &[usize], given: &[usize]) -> Result<Option<DifficultyLevel>> {
        for &a in answers {
            self.check_index(a)?;
        }
        for &g in given {
            self.check_index(g)?;
        }
        Ok(self.max_difficulty_unchecked(answers, given))
    }

    fn max_difficulty_unchecked(&self, answers: &[usize], given: &[usize]) -> Option<DifficultyLevel> {
        answers.iter().map(|&a| self.difficulty(a, given)).max()
    }

    fn difficulty(&self, answer: usize, given: &[usize]) -> DifficultyLevel {
        let unknowns: Vec<usize> = (0..self.n_vars)
            .filter(|i| *i != answer && !given.contains(i))
            .collect();

        // every unknown other than `except` has a zero coefficient
        let only = |row: &[f64], except: Option<usize>| {
            unknowns
                .iter()
                .filter(|&&j| Some(j) != except)
                .all(|&j| row[j] == 0.0)
        };

        if self.equations().any(|row| row[answer] != 0.0 && only(row, None)) {
            return DifficultyLevel::Single;
        }

        let pairs_with = |row: &[f64], i: usize| row[answer] != 0.0 && row[i] != 0.0 && only(row, Some(i));

        let sequential = unknowns.iter().any(|&i| {
            self.equations().any(|row| pairs_with(row, i))
                && self
                    .equations()
                    .any(|row| row[answer] == 0.0 && row[i] != 0.0 && only(row, Some(i)))
        });
        if sequential {
            return DifficultyLevel::Sequential;
        }

        let simultaneous = unknowns
            .iter()
            .any(|&i| self.equations().filter(|&row| pairs_with(row, i)).count() >= 2);
        if simultaneous {
            return DifficultyLevel::Simultaneous;
        }

        DifficultyLevel::Harder
    }
}

/// Randomised search for variable groups to reveal.
#[derive(Debug, Clone)]
pub struct GivenVariableSolver<'a> {
    system: &'a LinearSystem,
    groups: &'a [Vec<usize>],
    answer_group: usize,
}

impl<'a> GivenVariableSolver<'a> {
    /// `groups` bundle variable indices revealed together; `answer_group` holds
    /// the variables the student must find.
    pub fn new(system: &'a LinearSystem, groups: &'a [Vec<usize>], answer_group: usize) -> Result<Self> {
        let answers = groups.get(answer_group).ok_or_else(|| {
            SamplingError::InvalidGroup(format!(
                "answer group {answer_group} does not exist ({} groups)",
                groups.len()
            ))
        })?;
        if answers.is_empty() {
            return Err(SamplingError::InvalidGroup("answer group is empty".into()));
        }
        for (g, group) in groups.iter().enumerate() {
            if let Some(&v) = group.iter().find(|&&v| v >= system.n_vars()) {
                return Err(SamplingError::InvalidGroup(format!(
                    "group {g} names variable {v}, but the system has {} variables",
                    system.n_vars()
                )));
            }
        }
        Ok(Self { system, groups, answer_group })
    }

    fn answer_difficulty(&self, given: &[usize]) -> DifficultyLevel {
        // the answer group is non-empty, so there is always a maximum
        self.system
            .max_difficulty_unchecked(&self.groups[self.answer_group], given)
            .unwrap_or(DifficultyLevel::Harder)
    }

    /// Pick groups to reveal so that finding the answer group is exactly `target` hard.
    ///
    /// Groups are added one at a time, uniformly from those not yet given, until
    /// the difficulty drops to `target` or below. Landing below `target` throws
    /// the selection away and starts again from nothing. At most
    /// [`MAX_GIVEN_TRIALS`] additions are made over the whole search; after that
    /// the search gives up and returns `None`, as it does when revealing nothing
    /// is already easier than `target`.
    ///
    /// On success the groups are returned in the order they were added.
    pub fn choose_given_groups(
        &self,
        stream: &mut SeededRandomStream,
        target: DifficultyLevel,
    ) -> Option<Vec<usize>> {
        let initial = self.answer_difficulty(&[]);
        if initial < target {
            debug!(%initial, %target, "target difficulty is above the unassisted difficulty");
            return None;
        }

        let mut trials = 0;
        let mut restarts = 0;
        loop {
            let mut chosen = Vec::new();
            let mut remaining: Vec<usize> =
                (0..self.groups.len()).filter(|&g| g != self.answer_group).collect();
            let mut given: Vec<usize> = Vec::new();
            let mut difficulty = initial;

            while difficulty > target {
                if trials > MAX_GIVEN_TRIALS {
                    debug!(trials, restarts, %target, "no given groups reach the target difficulty");
                    return None;
                }
                trials += 1;

                if remaining.is_empty() {
                    // an empty pool still spends a draw
                    stream.next_uniform();
                    continue;
                }
                let group = remaining.remove(stream.index_below(remaining.len()));
                chosen.push(group);
                given.extend_from_slice(&self.groups[group]);
                difficulty = self.answer_difficulty(&given);
            }

            if difficulty == target {
                debug!(trials, restarts, groups = ?chosen, "chose given groups");
                return Some(chosen);
            }
            restarts += 1;
            debug!(%difficulty, %target, restarts, "overshot target difficulty, restarting");
        }
    }
}
