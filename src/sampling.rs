//! Sampling primitives built on [`SeededRandomStream::next_uniform`].
//!
//! Every method consumes the stream in a fixed order. Reordering calls, or
//! replacing one primitive with an "equivalent" one, changes which variant a
//! stored seed regenerates.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplingError};
use crate::stream::SeededRandomStream;

/// Default length of the `array_of_*` generators.
pub const DEFAULT_ARRAY_LEN: usize = 3;

/// Inclusive integer range `min, min + step, ..., <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIntRange")]
pub struct IntRange {
    min: i64,
    max: i64,
    step: i64,
}

#[derive(Deserialize)]
struct RawIntRange {
    #[serde(default)]
    min: i64,
    #[serde(default = "default_max")]
    max: i64,
    #[serde(default = "default_step")]
    step: i64,
}

fn default_max() -> i64 {
    10
}

fn default_step() -> i64 {
    1
}

impl TryFrom<RawIntRange> for IntRange {
    type Error = SamplingError;

    fn try_from(raw: RawIntRange) -> Result<Self> {
        IntRange::with_step(raw.min, raw.max, raw.step)
    }
}

impl Default for IntRange {
    fn default() -> Self {
        Self { min: 0, max: default_max(), step: default_step() }
    }
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        Self::with_step(min, max, 1)
    }

    pub fn with_step(min: i64, max: i64, step: i64) -> Result<Self> {
        let invalid = SamplingError::InvalidRange { min, max, step };
        if step <= 0 || min > max {
            return Err(invalid);
        }
        max.checked_sub(min).ok_or(invalid)?;
        Ok(Self { min, max, step })
    }

    /// The symmetric range `[-bound, bound]`.
    pub fn symmetric(bound: i64) -> Result<Self> {
        Self::new(bound.saturating_neg(), bound)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of whole candidates in the range.
    pub fn len(&self) -> usize {
        ((self.max - self.min) / self.step) as usize + 1
    }

    pub fn contains_non_zero(&self) -> bool {
        self.min != 0 || self.len() > 1
    }

    // (max - min) / step + 1, in floating point, including any fractional top bucket
    fn bucket_count(&self) -> f64 {
        (self.max - self.min) as f64 / self.step as f64 + 1.0
    }

    fn value_at(&self, slot: i64) -> i64 {
        self.min + slot * self.step
    }

    // 0..=len-1, for picking an index into a non-empty list
    fn indices(len: usize) -> Self {
        Self { min: 0, max: len as i64 - 1, step: 1 }
    }
}

/// Array of `n` copies of `elem`.
pub fn repeat<T: Clone>(n: usize, elem: T) -> Vec<T> {
    vec![elem; n]
}

/// Reorder `array` in place so that position `i` holds the value previously at `perm[i]`.
pub fn apply_permutation<T: Clone>(perm: &[usize], array: &mut [T]) -> Result<()> {
    check_permutation(perm, array.len())?;
    let saved = array.to_vec();
    for (slot, &from) in array.iter_mut().zip(perm) {
        *slot = saved[from].clone();
    }
    Ok(())
}

/// Apply the same permutation to every array. Nothing is modified unless all arrays fit.
pub fn apply_permutation_to_many<T: Clone>(perm: &[usize], arrays: &mut [&mut [T]]) -> Result<()> {
    for array in arrays.iter() {
        check_permutation(perm, array.len())?;
    }
    for array in arrays.iter_mut() {
        apply_permutation(perm, array)?;
    }
    Ok(())
}

fn check_permutation(perm: &[usize], len: usize) -> Result<()> {
    if perm.len() != len || perm.iter().any(|&i| i >= len) {
        return Err(SamplingError::PermutationLength { perm: perm.len(), len });
    }
    Ok(())
}

pub(crate) fn validate_weights(weights: &[f64], expected_len: usize) -> Result<()> {
    if weights.len() != expected_len {
        return Err(SamplingError::LengthMismatch {
            expected: expected_len,
            actual: weights.len(),
        });
    }
    if weights.is_empty() {
        return Err(SamplingError::InvalidWeights("no weights given".into()));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(SamplingError::InvalidWeights(format!(
            "weight {w} is not a finite non-negative number"
        )));
    }
    if forward_sum(weights) <= 0.0 {
        return Err(SamplingError::InvalidWeights("weights sum to zero".into()));
    }
    Ok(())
}

fn forward_sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Index of the first normalised cumulative bucket exceeding `p`, clamped to the
/// last index when rounding leaves `p` past the final bucket. A zero total makes
/// every bucket NaN, which also lands on the last index.
fn bucket_index(p: f64, weights: &[f64]) -> usize {
    let total = forward_sum(weights);
    let mut sum = 0.0;
    let mut i = 0;
    while i < weights.len() {
        sum += weights[i] / total;
        if p < sum {
            break;
        }
        i += 1;
    }
    i.min(weights.len() - 1)
}

impl SeededRandomStream {
    /// Uniform real in `[min, max)`.
    pub fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_uniform() * (max - min)
    }

    /// Uniform integer from `range`, one draw.
    ///
    /// The candidate slot is `floor(u * n)` with `n = (max - min) / step + 1`.
    /// When `max - min` is not a multiple of `step` the slot is clamped to the
    /// last whole candidate so the result never exceeds `max`.
    pub fn uniform_int(&mut self, range: &IntRange) -> i64 {
        let n = range.bucket_count();
        let slot = (self.next_uniform() * n).floor() as i64;
        let last = range.len() as i64 - 1;
        range.value_at(slot.min(last))
    }

    /// Uniform nonzero integer from `range`, redrawing until the value is nonzero.
    pub fn uniform_int_non_zero(&mut self, range: &IntRange) -> Result<i64> {
        ensure_non_zero(range)?;
        loop {
            let value = self.uniform_int(range);
            if value != 0 {
                return Ok(value);
            }
        }
    }

    /// `true` with probability `true_prob`.
    pub fn boolean(&mut self, true_prob: f64) -> bool {
        self.next_uniform() < true_prob
    }

    /// `1` with probability `pos_prob`, otherwise `-1`.
    pub fn sign(&mut self, pos_prob: f64) -> i64 {
        if self.next_uniform() < pos_prob { 1 } else { -1 }
    }

    pub fn array_of_real(&mut self, n: usize, min: f64, max: f64) -> Vec<f64> {
        (0..n).map(|_| self.uniform_real(min, max)).collect()
    }

    pub fn array_of_int(&mut self, n: usize, range: &IntRange) -> Vec<i64> {
        (0..n).map(|_| self.uniform_int(range)).collect()
    }

    /// `n` integers, not all zero. An all-zero draw is discarded and the whole array redrawn.
    pub fn array_of_int_non_zero(&mut self, n: usize, range: &IntRange) -> Result<Vec<i64>> {
        if n == 0 {
            return Err(SamplingError::InvalidArgument(
                "a nonzero array needs at least one element".into(),
            ));
        }
        ensure_non_zero(range)?;
        loop {
            let values = self.array_of_int(n, range);
            if values.iter().any(|&v| v != 0) {
                return Ok(values);
            }
        }
    }

    /// `n` distinct integers, in the order they were first drawn.
    pub fn array_of_unique_int(&mut self, n: usize, range: &IntRange) -> Result<Vec<i64>> {
        let available = range.len();
        if n > available {
            return Err(SamplingError::NotEnoughValues { requested: n, available });
        }
        let mut values = Vec::with_capacity(n);
        while values.len() < n {
            let value = self.uniform_int(range);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Uniformly chosen element.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(SamplingError::EmptyItems);
        }
        let index = self.index_below(items.len());
        Ok(&items[index])
    }

    /// Element chosen with probability proportional to its weight.
    pub fn weighted_choice<'a, T>(&mut self, items: &'a [T], weights: &[f64]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(SamplingError::EmptyItems);
        }
        validate_weights(weights, items.len())?;
        let index = self.weighted_index(weights);
        Ok(&items[index])
    }

    /// `n` distinct elements (by position). Asking for more than `items.len()`
    /// returns a copy of `items` without drawing.
    pub fn choose_without_replacement<T: Clone>(
        &mut self,
        n: usize,
        items: &[T],
        weights: Option<&[f64]>,
    ) -> Result<Vec<T>> {
        if let Some(weights) = weights {
            validate_weights(weights, items.len())?;
        }
        Ok(self.draw_without_replacement(n, items, weights))
    }

    /// Random permutation of `0..n`: for each `i` left to right, swap with
    /// `uniform_int(i, n - 1)`.
    pub fn random_permutation(&mut self, n: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..n).collect();
        for i in 0..n.saturating_sub(1) {
            let range = IntRange { min: i as i64, max: n as i64 - 1, step: 1 };
            let j = self.uniform_int(&range) as usize;
            perm.swap(i, j);
        }
        perm
    }

    /// Shuffle parallel arrays with one permutation and return it.
    ///
    /// The permutation is sized to the first array; every array must have that length.
    pub fn shuffle_together<T: Clone>(&mut self, arrays: &mut [&mut [T]]) -> Result<Vec<usize>> {
        let len = arrays
            .first()
            .map(|a| a.len())
            .ok_or_else(|| SamplingError::InvalidArgument("no arrays to shuffle".into()))?;
        if let Some(other) = arrays.iter().find(|a| a.len() != len) {
            return Err(SamplingError::LengthMismatch { expected: len, actual: other.len() });
        }
        let perm = self.random_permutation(len);
        apply_permutation_to_many(&perm, arrays)?;
        Ok(perm)
    }

    pub(crate) fn index_below(&mut self, len: usize) -> usize {
        self.uniform_int(&IntRange::indices(len)) as usize
    }

    pub(crate) fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let p = self.next_uniform();
        bucket_index(p, weights)
    }

    // Unvalidated: weights shrink in lock-step with the pool and may reach a zero total.
    pub(crate) fn draw_without_replacement<T: Clone>(
        &mut self,
        n: usize,
        items: &[T],
        weights: Option<&[f64]>,
    ) -> Vec<T> {
        if n > items.len() {
            return items.to_vec();
        }
        let mut available = items.to_vec();
        let mut remaining_weights = weights.map(|w| w.to_vec());
        let mut chosen = Vec::with_capacity(n);
        for _ in 0..n {
            let index = match remaining_weights.as_mut() {
                Some(w) => {
                    let index = self.weighted_index(w);
                    w.remove(index);
                    index
                }
                None => self.index_below(available.len()),
            };
            chosen.push(available.remove(index));
        }
        chosen
    }
}

fn ensure_non_zero(range: &IntRange) -> Result<()> {
    if !range.contains_non_zero() {
        return Err(SamplingError::NoNonZeroValue {
            min: range.min,
            max: range.max,
            step: range.step,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn stream() -> SeededRandomStream {
        SeededRandomStream::new(5489u32)
    }

    #[test]
    fn test_uniform_int_reference_values() {
        // u = 0.8147.., 0.1354.., 0.9057.., 0.8350.., 0.1269..
        let mut s = stream();
        let range = IntRange::default();
        let values: Vec<i64> = (0..5).map(|_| s.uniform_int(&range)).collect();
        assert_eq!(values, vec![8, 1, 9, 9, 1]);
    }

    #[test]
    fn test_uniform_real_scales_draw() {
        let mut a = stream();
        let mut b = stream();
        let u = a.next_uniform();
        assert_eq!(b.uniform_real(-2.0, 6.0), -2.0 + u * 8.0);
    }

    #[test]
    fn test_range_validation() {
        assert!(IntRange::new(3, 2).is_err());
        assert!(IntRange::with_step(0, 10, 0).is_err());
        assert!(IntRange::with_step(0, 10, -2).is_err());
        assert!(IntRange::new(i64::MIN, i64::MAX).is_err());
        assert_eq!(IntRange::with_step(-6, 6, 3).unwrap().len(), 5);
        assert_eq!(IntRange::with_step(0, 10, 3).unwrap().len(), 4);
    }

    #[test]
    fn test_range_law() {
        let mut params = StdRng::seed_from_u64(7);
        let mut s = SeededRandomStream::new(2024u32);
        for _ in 0..500 {
            let min = params.gen_range(-50..50);
            let max = min + params.gen_range(0..60);
            let step = params.gen_range(1..8);
            let range = IntRange::with_step(min, max, step).unwrap();
            for _ in 0..20 {
                let v = s.uniform_int(&range);
                assert!(v >= min && v <= max, "{v} outside [{min}, {max}]");
                assert_eq!((v - min) % step, 0);
            }
        }
    }

    #[test]
    fn test_single_value_range() {
        let mut s = stream();
        let range = IntRange::new(4, 4).unwrap();
        for _ in 0..10 {
            assert_eq!(s.uniform_int(&range), 4);
        }
    }

    #[test]
    fn test_non_zero_law() {
        let mut s = SeededRandomStream::new(11u32);
        let range = IntRange::new(-1, 1).unwrap();
        for _ in 0..1000 {
            assert_ne!(s.uniform_int_non_zero(&range).unwrap(), 0);
        }
        let narrow = IntRange::new(0, 1).unwrap();
        for _ in 0..100 {
            let values = s.array_of_int_non_zero(2, &narrow).unwrap();
            assert_eq!(values.len(), 2);
            assert!(values.iter().any(|&v| v != 0));
        }
    }

    #[test]
    fn test_non_zero_rejects_zero_only_range() {
        let mut s = stream();
        let zero = IntRange::new(0, 0).unwrap();
        assert!(matches!(
            s.uniform_int_non_zero(&zero),
            Err(SamplingError::NoNonZeroValue { .. })
        ));
        assert!(s.array_of_int_non_zero(3, &zero).is_err());
        assert!(s.array_of_int_non_zero(0, &IntRange::default()).is_err());
        // nothing was drawn
        assert_eq!(s.next_uniform(), stream().next_uniform());
    }

    #[test]
    fn test_non_zero_redraws_in_sequence() {
        let range = IntRange::new(-1, 1).unwrap();
        let mut a = SeededRandomStream::new(3u32);
        let mut b = SeededRandomStream::new(3u32);
        let value = a.uniform_int_non_zero(&range).unwrap();
        let expected = loop {
            let v = b.uniform_int(&range);
            if v != 0 {
                break v;
            }
        };
        assert_eq!(value, expected);
        assert_eq!(a.next_uniform(), b.next_uniform());
    }

    #[test]
    fn test_boolean_and_sign() {
        let mut s = stream();
        // first draw is 0.8147..
        assert!(!s.boolean(0.5));
        assert!(s.boolean(0.5));
        let mut s = stream();
        assert_eq!(s.sign(0.9), 1);
        assert_eq!(s.sign(0.1), -1);
        assert!(!stream().boolean(0.0));
        assert!(stream().boolean(1.0));
    }

    #[test]
    fn test_arrays_have_requested_length() {
        let mut s = stream();
        assert_eq!(s.array_of_real(DEFAULT_ARRAY_LEN, 0.0, 1.0).len(), 3);
        assert_eq!(s.array_of_int(7, &IntRange::default()).len(), 7);
        assert!(s.array_of_int(0, &IntRange::default()).is_empty());
    }

    #[test]
    fn test_unique_ints() {
        let mut s = stream();
        let range = IntRange::with_step(0, 20, 2).unwrap();
        let mut values = s.array_of_unique_int(11, &range).unwrap();
        values.sort();
        assert_eq!(values, (0..=20).step_by(2).collect::<Vec<_>>());
        assert!(matches!(
            s.array_of_unique_int(12, &range),
            Err(SamplingError::NotEnoughValues { requested: 12, available: 11 })
        ));
    }

    #[test]
    fn test_choice() {
        let items = ["a", "b", "c"];
        let mut s = stream();
        // 0.8147 * 3 -> 2, 0.1354 * 3 -> 0
        assert_eq!(*s.choice(&items).unwrap(), "c");
        assert_eq!(*s.choice(&items).unwrap(), "a");
        let empty: [u8; 0] = [];
        assert_eq!(s.choice(&empty), Err(SamplingError::EmptyItems));
    }

    #[test]
    fn test_weighted_choice() {
        let items = ["x", "y", "z"];
        let mut s = stream();
        // 0.8147 against buckets 0.25, 0.5, 1.0
        assert_eq!(*s.weighted_choice(&items, &[1.0, 1.0, 2.0]).unwrap(), "z");
        // 0.1354 against 0.5, 0.5 + 0
        assert_eq!(*s.weighted_choice(&items, &[1.0, 0.0, 1.0]).unwrap(), "x");
        assert!(s.weighted_choice(&items, &[1.0, 1.0]).is_err());
        assert!(s.weighted_choice(&items, &[1.0, -1.0, 1.0]).is_err());
        assert!(s.weighted_choice(&items, &[0.0, 0.0, 0.0]).is_err());
        assert!(s.weighted_choice(&items, &[1.0, f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_weighted_choice_boundary_clamps_to_last() {
        assert_eq!(bucket_index(1.0, &[1.0, 2.0, 3.0]), 2);
        assert_eq!(bucket_index(0.999_999_999_9, &[0.1; 10]), 9);
        assert_eq!(bucket_index(0.5, &[0.0, 0.0]), 1);
        assert_eq!(bucket_index(0.0, &[0.0, 1.0]), 1);
        assert_eq!(bucket_index(0.0, &[1.0, 1.0]), 0);
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(3, "q"), vec!["q", "q", "q"]);
        assert!(repeat(0, 1).is_empty());
    }

    #[test]
    fn test_choose_without_replacement() {
        let items: Vec<u32> = (0..10).collect();
        let mut s = stream();
        let chosen = s.choose_without_replacement(4, &items, None).unwrap();
        assert_eq!(chosen.len(), 4);
        let mut sorted = chosen.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);

        let all = s.choose_without_replacement(11, &items, None).unwrap();
        assert_eq!(all, items);
    }

    #[test]
    fn test_choose_without_replacement_oversized_draws_nothing() {
        let mut s = stream();
        s.choose_without_replacement(5, &[1, 2], None).unwrap();
        assert_eq!(s.next_uniform(), stream().next_uniform());
    }

    #[test]
    fn test_weighted_without_replacement_skips_zero_weights() {
        let items = ["never", "a", "b"];
        let weights = [0.0, 1.0, 3.0];
        let mut s = SeededRandomStream::new(77u32);
        for _ in 0..200 {
            let mut picked = s.choose_without_replacement(2, &items, Some(&weights)).unwrap();
            picked.sort();
            assert_eq!(picked, vec!["a", "b"]);
        }
    }

    #[test]
    fn test_permutation_law() {
        let mut s = SeededRandomStream::new(314u32);
        for n in 0..40 {
            let mut perm = s.random_permutation(n);
            assert_eq!(perm.len(), n);
            perm.sort();
            assert_eq!(perm, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_permutation_uses_inclusive_left_to_right_swaps() {
        let mut a = stream();
        let mut b = stream();
        let perm = a.random_permutation(4);
        let mut expected = vec![0, 1, 2, 3];
        for i in 0..3 {
            let j = b.uniform_int(&IntRange::new(i as i64, 3).unwrap()) as usize;
            expected.swap(i, j);
        }
        assert_eq!(perm, expected);
    }

    #[test]
    fn test_apply_permutation() {
        let mut letters = vec!['a', 'b', 'c', 'd'];
        apply_permutation(&[2, 0, 3, 1], &mut letters).unwrap();
        assert_eq!(letters, vec!['c', 'a', 'd', 'b']);
        assert!(apply_permutation(&[0, 1], &mut letters).is_err());
        assert!(apply_permutation(&[0, 1, 2, 4], &mut letters).is_err());
    }

    #[test]
    fn test_apply_permutation_to_many_is_all_or_nothing() {
        let mut a = vec![1, 2, 3];
        let mut b = vec![4, 5];
        let result = apply_permutation_to_many(&[2, 1, 0], &mut [&mut a[..], &mut b[..]]);
        assert!(result.is_err());
        assert_eq!(a, vec![1, 2, 3]);
    }

    #[test]
    fn test_shuffle_consistency() {
        let mut s = SeededRandomStream::new(8u32);
        let mut values: Vec<i64> = (0..12).collect();
        let mut labels: Vec<i64> = (0..12).map(|i| i * 100).collect();
        let perm = s.shuffle_together(&mut [&mut values[..], &mut labels[..]]).unwrap();
        for i in 0..12 {
            assert_eq!(values[i], perm[i] as i64);
            assert_eq!(labels[i], values[i] * 100);
        }
    }

    #[test]
    fn test_shuffle_rejects_ragged_arrays() {
        let mut s = stream();
        let mut a = vec![1, 2, 3];
        let mut b = vec![1, 2];
        assert!(matches!(
            s.shuffle_together(&mut [&mut a[..], &mut b[..]]),
            Err(SamplingError::LengthMismatch { expected: 3, actual: 2 })
        ));
        let none: &mut [&mut [i32]] = &mut [];
        assert!(s.shuffle_together(none).is_err());
    }

    #[test]
    fn test_determinism_across_runs() {
        fn run(seed: &str) -> (Vec<i64>, Vec<usize>, Vec<f64>) {
            let mut s = SeededRandomStream::from_base36(seed).unwrap();
            let ints = s.array_of_int(5, &IntRange::with_step(-10, 10, 2).unwrap());
            let perm = s.random_permutation(6);
            let reals = s.array_of_real(3, 1.0, 2.0);
            (ints, perm, reals)
        }
        assert_eq!(run("q7"), run("q7"));
        assert_ne!(run("q7"), run("q8"));
    }
}
