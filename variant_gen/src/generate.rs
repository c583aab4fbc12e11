use std::collections::BTreeMap;

use anyhow::{Context, Result};
use prairie_random::{
    DifficultyLevel, GivenVariableSolver, IntRange, PolynomialOptions, Seed, SeededRandomStream,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::{ParamKind, Recipe, SystemSpec};

/// One generated question variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub seed: Seed,
    pub params: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given: Option<GivenSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GivenSelection {
    pub difficulty: DifficultyLevel,
    /// Group indices in the order they were revealed, `None` if the target
    /// difficulty could not be reached
    pub groups: Option<Vec<usize>>,
    /// Variable indices covered by `groups`
    pub variables: Option<Vec<usize>>,
}

/// Sample every parameter of `recipe` in order from a stream seeded with
/// `seed`, then pick the given variables for its system.
pub fn generate_variant(recipe: &Recipe, seed: Seed) -> Result<Variant> {
    let mut stream = SeededRandomStream::new(seed);
    let mut params = BTreeMap::new();

    for param in &recipe.params {
        let value = sample_param(&mut stream, &param.kind)
            .with_context(|| format!("Failed to sample parameter '{}'", param.name))?;
        debug!(name = %param.name, %value, "sampled parameter");
        params.insert(param.name.clone(), value);
    }

    let given = recipe
        .system
        .as_ref()
        .map(|system| choose_given(&mut stream, system))
        .transpose()?;

    info!(%seed, params = params.len(), "generated variant");
    Ok(Variant { seed, params, given })
}

fn choose_given(stream: &mut SeededRandomStream, system: &SystemSpec) -> Result<GivenSelection> {
    let solver = GivenVariableSolver::new(&system.matrix, &system.groups, system.answer_group)?;
    let groups = solver.choose_given_groups(stream, system.difficulty);
    if groups.is_none() {
        warn!(difficulty = %system.difficulty, "no given variables reach the target difficulty");
    }
    let variables = groups.as_ref().map(|chosen| {
        chosen
            .iter()
            .flat_map(|&g| system.groups[g].iter().copied())
            .collect()
    });
    Ok(GivenSelection { difficulty: system.difficulty, groups, variables })
}

fn sample_param(stream: &mut SeededRandomStream, kind: &ParamKind) -> Result<Value> {
    let value = match kind {
        ParamKind::Int { min, max, step } => {
            json!(stream.uniform_int(&IntRange::with_step(*min, *max, *step)?))
        }
        ParamKind::IntNonZero { min, max, step } => {
            json!(stream.uniform_int_non_zero(&IntRange::with_step(*min, *max, *step)?)?)
        }
        ParamKind::Real { min, max } => json!(stream.uniform_real(*min, *max)),
        ParamKind::Bool { prob } => json!(stream.boolean(*prob)),
        ParamKind::Sign { prob } => json!(stream.sign(*prob)),
        ParamKind::IntArray { n, min, max, step, non_zero, unique } => {
            let range = IntRange::with_step(*min, *max, *step)?;
            let values = if *unique {
                stream.array_of_unique_int(*n, &range)?
            } else if *non_zero {
                stream.array_of_int_non_zero(*n, &range)?
            } else {
                stream.array_of_int(*n, &range)
            };
            json!(values)
        }
        ParamKind::RealArray { n, min, max } => json!(stream.array_of_real(*n, *min, *max)),
        ParamKind::Choice { items, weights } => match weights {
            Some(w) => stream.weighted_choice(items, w)?.clone(),
            None => stream.choice(items)?.clone(),
        },
        ParamKind::Sample { n, items, weights } => {
            json!(stream.choose_without_replacement(*n, items, weights.as_deref())?)
        }
        ParamKind::Permutation { n } => json!(stream.random_permutation(*n)),
        ParamKind::Shuffle { columns } => {
            let mut columns = columns.clone();
            let mut views: Vec<&mut [Value]> = columns.iter_mut().map(|c| c.as_mut_slice()).collect();
            let perm = stream.shuffle_together(&mut views)?;
            json!({ "perm": perm, "columns": columns })
        }
        ParamKind::CategoryCounts { total, categories } => {
            json!(stream.allocate_category_counts(*total, categories.clone())?)
        }
        ParamKind::Polynomial { degree, max_coeff, zero_prob, allow_negative } => {
            let options = PolynomialOptions {
                degree: *degree,
                max_coeff: *max_coeff,
                zero_prob: *zero_prob,
                allow_negative: *allow_negative,
            };
            json!(stream.random_polynomial(&options)?)
        }
        ParamKind::Exponential { max_coeff, max_exp } => {
            serde_json::to_value(stream.random_exponential_term(*max_coeff, *max_exp)?)?
        }
        ParamKind::Trig { max_coeff, max_freq } => {
            serde_json::to_value(stream.random_trig_term(*max_coeff, *max_freq)?)?
        }
        ParamKind::Functions { n } => serde_json::to_value(stream.array_of_function_terms(*n)?)?,
    };
    Ok(value)
}
