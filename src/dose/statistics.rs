//! Summary statistics over an ascending-sorted sample array.
//!
//! Every routine here assumes its input slice is already sorted; the
//! `DoseDistribution` wrapper guarantees that by sorting once at
//! construction. Percentile queries use counting rank, not interpolation.

use crate::error::{Error, Result};

pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyDistribution);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Middle element for an odd count, mean of the two central elements for an
/// even count.
pub fn median(sorted: &[f64]) -> Result<f64> {
    let n = sorted.len();
    if n == 0 {
        return Err(Error::EmptyDistribution);
    }
    if n % 2 == 0 {
        Ok((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Ok(sorted[n / 2])
    }
}

pub fn min(sorted: &[f64]) -> Result<f64> {
    sorted.first().copied().ok_or(Error::EmptyDistribution)
}

pub fn max(sorted: &[f64]) -> Result<f64> {
    sorted.last().copied().ok_or(Error::EmptyDistribution)
}

/// Sample standard deviation (the N-1 variant).
pub fn sample_stddev(samples: &[f64]) -> Result<f64> {
    let n = samples.len();
    if n < 2 {
        return Err(Error::TooFewSamples { needed: 2, got: n });
    }
    let m = mean(samples)?;
    let ssq = samples.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    Ok((ssq / (n - 1) as f64).sqrt())
}

/// Root mean square deviation (the population variant, using N).
pub fn population_rmsdev(samples: &[f64]) -> Result<f64> {
    let n = samples.len();
    if n == 0 {
        return Err(Error::EmptyDistribution);
    }
    let m = mean(samples)?;
    let ssq = samples.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    Ok((ssq / n as f64).sqrt())
}

/// The value that `percent`% of the samples (by count) are greater than or
/// equal to.
///
/// Rank index is `round_half_up((1 - percent/100) * n)` clamped to
/// `[0, n-1]`, so `percent = 100` selects the smallest sample and
/// `percent = 0` the largest.
pub fn percentile_value_at_or_above(sorted: &[f64], percent: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(Error::PercentOutOfRange(percent));
    }
    let n = sorted.len();
    if n == 0 {
        return Err(Error::EmptyDistribution);
    }
    let rank = ((1.0 - percent / 100.0) * n as f64).round() as usize;
    Ok(sorted[rank.min(n - 1)])
}

/// Percentage of samples with a value greater than or equal to `value`,
/// computed by counting.
pub fn fraction_at_or_above_value(sorted: &[f64], value: f64) -> Result<f64> {
    let n = sorted.len();
    if n == 0 {
        return Err(Error::EmptyDistribution);
    }
    // partition_point gives the count of samples below `value` in one
    // binary search over the sorted slice.
    let below = sorted.partition_point(|&v| v < value);
    Ok((n - below) as f64 / n as f64 * 100.0)
}

/// The most frequent sample value; ties resolve to the smaller value.
pub fn most_common_value(sorted: &[f64]) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::EmptyDistribution);
    }
    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_count {
            best_count = j - i;
            best = sorted[i];
        }
        i = j;
    }
    Ok(best)
}
