use std::hash::{Hash, Hasher};

use crate::dose::statistics;
use crate::error::{Error, Result};

/// Opaque identity token for the spatial region a set of dose samples was
/// taken from. Compared by identity only, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VolumeRef(pub String);

impl VolumeRef {
    pub fn new(uid: impl Into<String>) -> Self {
        VolumeRef(uid.into())
    }

    pub fn uid(&self) -> &str {
        &self.0
    }
}

/// A single dose value derived from a distribution (a mean, a median, a
/// percentile dose, ...).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dose {
    pub value: f64,
}

impl Dose {
    pub fn new(value: f64) -> Self {
        Dose { value }
    }

    /// Biologically equivalent dose: the theoretical limit of the equivalent
    /// dose delivered in infinitely small fractions, with complete repair
    /// between fractions.
    ///
    /// `fraction_dose` is the dose per fraction, `alpha_beta` the tissue
    /// factor (must be positive).
    pub fn bed(&self, fraction_dose: f64, alpha_beta: f64) -> Result<f64> {
        if alpha_beta <= 0.0 {
            return Err(Error::NonPositiveAlphaBeta(alpha_beta));
        }
        Ok(self.value * (1.0 + fraction_dose / alpha_beta))
    }

    /// Equivalent dose in 2 Gy fractions: the total dose which, per the
    /// linear-quadratic model, yields the same biological effect when
    /// delivered in 2 Gy fractions.
    pub fn eqd2(&self, fraction_dose: f64, alpha_beta: f64) -> Result<f64> {
        if alpha_beta <= 0.0 {
            return Err(Error::NonPositiveAlphaBeta(alpha_beta));
        }
        Ok(self.value * (fraction_dose + alpha_beta) / (2.0 + alpha_beta))
    }
}

impl From<Dose> for f64 {
    fn from(dose: Dose) -> f64 {
        dose.value
    }
}

/// A collection of dose samples tied to the volume they were sampled from.
///
/// Samples are validated (finite, non-negative) and sorted ascending once at
/// construction and never mutated afterwards. All dose-volume metrics operate
/// on the stored sorted array.
#[derive(Debug, Clone)]
pub struct DoseDistribution {
    doses: Vec<f64>,
    volume: VolumeRef,
}

impl DoseDistribution {
    /// Builds a distribution from an unordered sample array.
    ///
    /// An empty array is accepted (some structures receive no dose at all),
    /// but every statistic on an empty distribution fails with
    /// [`Error::EmptyDistribution`].
    pub fn new(mut doses: Vec<f64>, volume: VolumeRef) -> Result<Self> {
        for &d in &doses {
            if !d.is_finite() || d < 0.0 {
                return Err(Error::InvalidDoseSample(d));
            }
        }
        doses.sort_by(|a, b| a.partial_cmp(b).unwrap());
        Ok(DoseDistribution { doses, volume })
    }

    /// The sorted sample array.
    pub fn doses(&self) -> &[f64] {
        &self.doses
    }

    pub fn volume(&self) -> &VolumeRef {
        &self.volume
    }

    pub fn len(&self) -> usize {
        self.doses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doses.is_empty()
    }

    pub fn mean(&self) -> Result<Dose> {
        statistics::mean(&self.doses).map(Dose::new)
    }

    pub fn median(&self) -> Result<Dose> {
        statistics::median(&self.doses).map(Dose::new)
    }

    pub fn min(&self) -> Result<Dose> {
        statistics::min(&self.doses).map(Dose::new)
    }

    pub fn max(&self) -> Result<Dose> {
        statistics::max(&self.doses).map(Dose::new)
    }

    /// Sample standard deviation (N-1) of the dose samples.
    pub fn stddev(&self) -> Result<f64> {
        statistics::sample_stddev(&self.doses)
    }

    /// Population root mean square deviation (N) of the dose samples.
    pub fn rmsdev(&self) -> Result<f64> {
        statistics::population_rmsdev(&self.doses)
    }

    /// The dose that `percent`% of the volume receives at least.
    pub fn d(&self, percent: f64) -> Result<Dose> {
        statistics::percentile_value_at_or_above(&self.doses, percent).map(Dose::new)
    }

    /// The percentage of the volume receiving at least `dose`.
    pub fn v(&self, dose: f64) -> Result<f64> {
        if dose < 0.0 {
            return Err(Error::NegativeDose(dose));
        }
        statistics::fraction_at_or_above_value(&self.doses, dose)
    }

    /// Generalized equivalent uniform dose with the power-mean model:
    /// `EUD = (mean of dose_i^a)^(1/a)`.
    ///
    /// `a = 1` reproduces the arithmetic mean. Negative exponents model
    /// under-dosing sensitivity and require strictly positive samples, as do
    /// fractional exponents. The formula is numerically unstable as `a`
    /// approaches zero, so a zero exponent is rejected outright instead of
    /// being approximated.
    pub fn eud(&self, a: f64) -> Result<Dose> {
        if a == 0.0 {
            return Err(Error::ZeroEudExponent);
        }
        if self.doses.is_empty() {
            return Err(Error::EmptyDistribution);
        }
        if (a < 0.0 || a.fract() != 0.0) && self.doses[0] <= 0.0 {
            return Err(Error::NonPositiveDoseInEud { exponent: a });
        }
        let power_sum = self.doses.iter().map(|d| d.powf(a)).sum::<f64>();
        let power_mean = power_sum / self.doses.len() as f64;
        Ok(Dose::new(power_mean.powf(1.0 / a)))
    }

    /// Homogeneity index `(D2 - D98) / D50`; zero for a perfectly uniform
    /// distribution.
    pub fn hindex(&self) -> Result<f64> {
        let d2 = self.d(2.0)?.value;
        let d98 = self.d(98.0)?.value;
        let d50 = self.d(50.0)?.value;
        Ok((d2 - d98) / d50)
    }
}

impl PartialEq for DoseDistribution {
    fn eq(&self, other: &Self) -> bool {
        self.doses == other.doses && self.volume == other.volume
    }
}

impl Eq for DoseDistribution {}

impl Hash for DoseDistribution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // samples are finite by construction, so bit patterns are canonical
        for d in &self.doses {
            state.write_u64(d.to_bits());
        }
        self.volume.hash(state);
    }
}
