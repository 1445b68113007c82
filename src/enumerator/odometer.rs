//! Mixed-radix counter over candidate-list positions.
//!
//! Digit `k` counts `0..radix[k]`. The last digit moves fastest; when it
//! wraps it carries into its left neighbour, like a car odometer with a
//! different base per wheel. The leftmost digit never wraps: its carry
//! means every index vector has been produced.
//!
//! Each digit vector corresponds to a linear index
//! `sum(digit[k] * prod(radix[k+1..]))`, which is how the index space is
//! cut into contiguous shards.

use std::ops::Range;

/// Product of all radices, or `None` if it does not fit in `u128`.
///
/// An empty radix list has product zero: with no candidate lists there is
/// nothing to choose.
pub fn total_combinations(radices: &[usize]) -> Option<u128> {
    if radices.is_empty() {
        return Some(0);
    }
    radices
        .iter()
        .try_fold(1u128, |acc, &radix| acc.checked_mul(radix as u128))
}

/// Splits `[0, total)` into at most `shards` contiguous, disjoint,
/// non-empty ranges whose sizes differ by at most one.
pub fn shard_ranges(total: u128, shards: usize) -> Vec<Range<u128>> {
    let shards = (shards.max(1) as u128).min(total);
    if shards == 0 {
        return Vec::new();
    }
    let base = total / shards;
    let remainder = total % shards;

    let mut ranges = Vec::with_capacity(shards as usize);
    let mut start = 0u128;
    for shard in 0..shards {
        let len = base + u128::from(shard < remainder);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// The counter itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    /// Creates a counter at all-zero digits.
    ///
    /// A counter with no digits, or with any zero radix, starts exhausted.
    pub fn new(radices: Vec<usize>) -> Self {
        let exhausted = radices.is_empty() || radices.contains(&0);
        Self {
            digits: vec![0; radices.len()],
            radices,
            exhausted,
        }
    }

    /// Creates a counter positioned at a linear index.
    ///
    /// An index at or past the product leaves the counter exhausted.
    pub fn starting_at(radices: Vec<usize>, linear: u128) -> Self {
        let mut odometer = Self::new(radices);
        if odometer.exhausted {
            return odometer;
        }

        let mut rest = linear;
        for k in (0..odometer.radices.len()).rev() {
            let radix = odometer.radices[k] as u128;
            odometer.digits[k] = (rest % radix) as usize;
            rest /= radix;
        }
        if rest > 0 {
            odometer.exhausted = true;
        }
        odometer
    }

    /// Current digits. Meaningless once exhausted.
    #[inline]
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// The radices.
    pub fn radices(&self) -> &[usize] {
        &self.radices
    }

    /// Whether every index vector has been produced.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Linear index of the current digits.
    pub fn linear_index(&self) -> u128 {
        self.digits
            .iter()
            .zip(&self.radices)
            .fold(0u128, |acc, (&digit, &radix)| {
                acc * radix as u128 + digit as u128
            })
    }

    /// Moves to the next index vector. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.exhausted {
            return false;
        }

        let last = self.digits.len() - 1;
        self.digits[last] += 1;
        for k in (1..=last).rev() {
            if self.digits[k] == self.radices[k] {
                self.digits[k] = 0;
                self.digits[k - 1] += 1;
            }
        }
        if self.digits[0] == self.radices[0] {
            self.exhausted = true;
        }
        !self.exhausted
    }
}
