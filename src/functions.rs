//! Random elementary functions for calculus-style question templates.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplingError};
use crate::sampling::{IntRange, DEFAULT_ARRAY_LEN};
use crate::stream::SeededRandomStream;

/// Default bound on generated coefficients, exponents and frequencies.
pub const DEFAULT_MAX_COEFF: i64 = 3;

/// Options for [`SeededRandomStream::random_polynomial`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolynomialOptions {
    pub degree: usize,
    pub max_coeff: i64,
    /// Extra probability of forcing a lower-degree coefficient to zero
    pub zero_prob: f64,
    pub allow_negative: bool,
}

impl Default for PolynomialOptions {
    fn default() -> Self {
        Self {
            degree: 2,
            max_coeff: DEFAULT_MAX_COEFF,
            zero_prob: 0.5,
            allow_negative: true,
        }
    }
}

/// `coeff * e^(exp * x)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentialTerm {
    pub coeff: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrigFunction {
    Sin,
    Cos,
}

/// `coeff * fcn(freq * x)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrigTerm {
    pub coeff: i64,
    pub fcn: TrigFunction,
    pub freq: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fcn", content = "data")]
pub enum FunctionTerm {
    /// Coefficients `[a_0, a_1, ..., a_n]`
    #[serde(rename = "poly")]
    Polynomial(Vec<i64>),
    #[serde(rename = "exp")]
    Exponential(ExponentialTerm),
    #[serde(rename = "trig")]
    Trig(TrigTerm),
}

fn non_zero_bound(name: &str, bound: i64) -> Result<IntRange> {
    if bound <= 0 {
        return Err(SamplingError::InvalidArgument(format!(
            "{name} must be positive, got {bound}"
        )));
    }
    IntRange::symmetric(bound)
}

impl SeededRandomStream {
    /// Random polynomial coefficients `[a_0, ..., a_degree]`.
    ///
    /// Lower coefficients are zero with probability `zero_prob`, otherwise uniform
    /// in range; the leading coefficient is always nonzero.
    pub fn random_polynomial(&mut self, options: &PolynomialOptions) -> Result<Vec<i64>> {
        let min_coeff = if options.allow_negative { options.max_coeff.saturating_neg() } else { 0 };
        let range = IntRange::new(min_coeff, options.max_coeff)?;
        if !range.contains_non_zero() {
            return Err(SamplingError::NoNonZeroValue {
                min: range.min(),
                max: range.max(),
                step: range.step(),
            });
        }

        let mut coeffs = Vec::with_capacity(options.degree + 1);
        for _ in 0..options.degree {
            if self.next_uniform() < options.zero_prob {
                coeffs.push(0);
            } else {
                coeffs.push(self.uniform_int(&range));
            }
        }
        coeffs.push(self.uniform_int_non_zero(&range)?);
        Ok(coeffs)
    }

    pub fn random_exponential_term(&mut self, max_coeff: i64, max_exp: i64) -> Result<ExponentialTerm> {
        let coeffs = non_zero_bound("max_coeff", max_coeff)?;
        let exps = non_zero_bound("max_exp", max_exp)?;
        let coeff = self.uniform_int_non_zero(&coeffs)?;
        let exp = self.uniform_int_non_zero(&exps)?;
        Ok(ExponentialTerm { coeff, exp })
    }

    pub fn random_trig_term(&mut self, max_coeff: i64, max_freq: i64) -> Result<TrigTerm> {
        let coeffs = non_zero_bound("max_coeff", max_coeff)?;
        let freqs = non_zero_bound("max_freq", max_freq)?;
        let coeff = self.uniform_int_non_zero(&coeffs)?;
        let fcn = *self.choice(&[TrigFunction::Sin, TrigFunction::Cos])?;
        let freq = self.uniform_int_non_zero(&freqs)?;
        Ok(TrigTerm { coeff, fcn, freq })
    }

    /// Polynomial, exponential or trig term (equally likely), each with default options.
    pub fn random_function_term(&mut self) -> Result<FunctionTerm> {
        let kind = self.uniform_int(&IntRange::new(1, 3)?);
        Ok(match kind {
            1 => FunctionTerm::Polynomial(self.random_polynomial(&PolynomialOptions::default())?),
            2 => FunctionTerm::Exponential(
                self.random_exponential_term(DEFAULT_MAX_COEFF, DEFAULT_MAX_COEFF)?,
            ),
            _ => FunctionTerm::Trig(self.random_trig_term(DEFAULT_MAX_COEFF, DEFAULT_MAX_COEFF)?),
        })
    }

    pub fn array_of_function_terms(&mut self, n: usize) -> Result<Vec<FunctionTerm>> {
        (0..n).map(|_| self.random_function_term()).collect()
    }

    /// Three random function terms.
    pub fn default_function_terms(&mut self) -> Result<Vec<FunctionTerm>> {
        self.array_of_function_terms(DEFAULT_ARRAY_LEN)
    }
}
