//! Recipe structures for variant generation.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use prairie_random::{CategoryWeights, DifficultyLevel, GivenVariableSolver, LinearSystem};
use serde::Deserialize;
use serde_json::Value;

/// A question recipe: parameters sampled in file order, then an optional
/// given-variable selection.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    #[serde(default, rename = "param")]
    pub params: Vec<ParamSpec>,

    /// Linear system whose given variables should be chosen
    #[serde(default)]
    pub system: Option<SystemSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(flatten)]
    pub kind: ParamKind,
}

/// What to sample for one parameter. Omitted bounds take the library defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamKind {
    Int {
        #[serde(default)]
        min: i64,
        #[serde(default = "default_max")]
        max: i64,
        #[serde(default = "default_step")]
        step: i64,
    },
    IntNonZero {
        #[serde(default)]
        min: i64,
        #[serde(default = "default_max")]
        max: i64,
        #[serde(default = "default_step")]
        step: i64,
    },
    Real {
        #[serde(default)]
        min: f64,
        #[serde(default = "default_real_max")]
        max: f64,
    },
    Bool {
        #[serde(default = "default_prob")]
        prob: f64,
    },
    Sign {
        #[serde(default = "default_prob")]
        prob: f64,
    },
    IntArray {
        #[serde(default = "default_len")]
        n: usize,
        #[serde(default)]
        min: i64,
        #[serde(default = "default_max")]
        max: i64,
        #[serde(default = "default_step")]
        step: i64,
        /// Redraw the whole array while every element is zero
        #[serde(default)]
        non_zero: bool,
        #[serde(default)]
        unique: bool,
    },
    RealArray {
        #[serde(default = "default_len")]
        n: usize,
        #[serde(default)]
        min: f64,
        #[serde(default = "default_real_max")]
        max: f64,
    },
    Choice {
        items: Vec<Value>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    /// `n` distinct items, without replacement
    Sample {
        n: usize,
        items: Vec<Value>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    Permutation {
        n: usize,
    },
    /// Parallel columns shuffled with one permutation
    Shuffle {
        columns: Vec<Vec<Value>>,
    },
    CategoryCounts {
        total: usize,
        categories: CategoryWeights,
    },
    Polynomial {
        #[serde(default = "default_degree")]
        degree: usize,
        #[serde(default = "default_max_coeff")]
        max_coeff: i64,
        #[serde(default = "default_prob")]
        zero_prob: f64,
        #[serde(default = "default_true")]
        allow_negative: bool,
    },
    Exponential {
        #[serde(default = "default_max_coeff")]
        max_coeff: i64,
        #[serde(default = "default_max_coeff")]
        max_exp: i64,
    },
    Trig {
        #[serde(default = "default_max_coeff")]
        max_coeff: i64,
        #[serde(default = "default_max_coeff")]
        max_freq: i64,
    },
    Functions {
        #[serde(default = "default_len")]
        n: usize,
    },
}

/// Linear system for given-variable selection.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemSpec {
    /// Coefficient rows, one per equation
    pub matrix: LinearSystem,

    /// Variable indices revealed together
    pub groups: Vec<Vec<usize>>,

    /// Index into `groups` of the variables the student solves for
    pub answer_group: usize,

    /// Required difficulty, 1 to 4
    pub difficulty: DifficultyLevel,
}

// Default value functions
fn default_max() -> i64 {
    10
}

fn default_step() -> i64 {
    1
}

fn default_real_max() -> f64 {
    1.0
}

fn default_prob() -> f64 {
    0.5
}

fn default_len() -> usize {
    3
}

fn default_degree() -> usize {
    2
}

fn default_max_coeff() -> i64 {
    3
}

fn default_true() -> bool {
    true
}

impl Recipe {
    /// Load and validate a recipe from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to load recipe file: {}", path.display()))
    }

    /// Parse and validate a recipe from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let recipe: Recipe = toml::from_str(content).context("Failed to parse recipe")?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Validate recipe structure. Value ranges are checked again when sampling.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for param in &self.params {
            if param.name.trim().is_empty() {
                anyhow::bail!("parameter names must not be empty");
            }
            if !names.insert(param.name.as_str()) {
                anyhow::bail!("duplicate parameter name '{}'", param.name);
            }
            param
                .kind
                .validate()
                .with_context(|| format!("invalid parameter '{}'", param.name))?;
        }

        if let Some(system) = &self.system {
            GivenVariableSolver::new(&system.matrix, &system.groups, system.answer_group)
                .context("invalid system")?;
        }

        Ok(())
    }
}

impl ParamKind {
    fn validate(&self) -> Result<()> {
        match self {
            ParamKind::IntArray { non_zero: true, unique: true, .. } => {
                anyhow::bail!("non_zero and unique cannot be combined");
            }
            ParamKind::Choice { items, weights } | ParamKind::Sample { items, weights, .. } => {
                if items.is_empty() {
                    anyhow::bail!("items must not be empty");
                }
                if let Some(w) = weights {
                    if w.len() != items.len() {
                        anyhow::bail!("{} weights given for {} items", w.len(), items.len());
                    }
                }
            }
            ParamKind::Shuffle { columns } => {
                let Some(first) = columns.first() else {
                    anyhow::bail!("shuffle needs at least one column");
                };
                if columns.iter().any(|c| c.len() != first.len()) {
                    anyhow::bail!("shuffled columns must all have the same length");
                }
            }
            ParamKind::Bool { prob } | ParamKind::Sign { prob } => {
                if !(0.0..=1.0).contains(prob) {
                    anyhow::bail!("probability must be in [0, 1], got {prob}");
                }
            }
            _ => {}
        }
        Ok(())
    }
}
