//! DVH report assembly over one or two dose distributions.
//!
//! This is the orchestration layer: it pulls the individual metrics out of
//! the statistics core and packages them into a serializable summary, and it
//! evaluates two treatment plans concurrently for side-by-side comparison.

use anyhow::{anyhow, Context, Result};
use crossbeam::thread;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::dose::distribution::DoseDistribution;

/// One point of a cumulative dose-volume histogram: `volume_percent`% of the
/// volume receives at least `dose`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DvhPoint {
    pub dose: f64,
    pub volume_percent: f64,
}

/// Clinical summary of a single dose distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DvhReport {
    pub volume_uid: String,
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub d2: f64,
    pub d50: f64,
    pub d98: f64,
    pub hindex: f64,
    pub eud: f64,
    pub eud_exponent: f64,
    pub curve: Vec<DvhPoint>,
}

/// Side-by-side evaluation of two plans over the same prescription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanComparison {
    pub reference: DvhReport,
    pub comparison: DvhReport,
    pub mean_difference: f64,
    pub d50_difference: f64,
}

/// Builds the full report for one distribution.
///
/// The DVH curve is sampled at `dvh_bins` evenly spaced dose levels from
/// zero to the maximum dose inclusive.
pub fn build_report(dist: &DoseDistribution, config: &AnalysisConfig) -> Result<DvhReport> {
    config.validate()?;
    let uid = dist.volume().uid().to_string();

    let max = dist.max().context("empty distribution has no report")?.value;
    let step = max / (config.dvh_bins - 1) as f64;
    let mut curve = Vec::with_capacity(config.dvh_bins);
    for i in 0..config.dvh_bins {
        let dose = step * i as f64;
        curve.push(DvhPoint {
            dose,
            volume_percent: dist.v(dose)?,
        });
    }

    Ok(DvhReport {
        volume_uid: uid,
        samples: dist.len(),
        min: dist.min()?.value,
        max,
        mean: dist.mean()?.value,
        median: dist.median()?.value,
        stddev: dist.stddev()?,
        d2: dist.d(2.0)?.value,
        d50: dist.d(50.0)?.value,
        d98: dist.d(98.0)?.value,
        hindex: dist.hindex()?,
        eud: dist.eud(config.eud_exponent)?.value,
        eud_exponent: config.eud_exponent,
        curve,
    })
}

/// Builds the reports for a reference plan and a comparison plan on two
/// scoped threads and returns them with the headline differences.
pub fn compare_plans(
    reference: &DoseDistribution,
    comparison: &DoseDistribution,
    config: &AnalysisConfig,
) -> Result<PlanComparison> {
    println!(
        "Comparing plan '{}' against reference '{}'",
        comparison.volume().uid(),
        reference.volume().uid()
    );

    let result = thread::scope(|s| -> Result<PlanComparison> {
        let reference_handle = s.spawn(|_| {
            build_report(reference, config).context("building the reference plan report failed")
        });
        let comparison_handle = s.spawn(|_| {
            build_report(comparison, config).context("building the comparison plan report failed")
        });

        let reference = reference_handle.join().unwrap()?;
        let comparison = comparison_handle.join().unwrap()?;

        Ok(PlanComparison {
            mean_difference: comparison.mean - reference.mean,
            d50_difference: comparison.d50 - reference.d50,
            reference,
            comparison,
        })
    })
    .map_err(|payload| anyhow!("plan comparison threads panicked: {:?}", payload))?;

    result
}

#[cfg(test)]
mod analysis_tests {
    use super::*;
    use crate::dose::distribution::VolumeRef;
    use crate::utils::test_utils::{graded_doses, new_volume, uniform_doses};
    use approx::assert_relative_eq;

    #[test]
    fn test_report_uniform_distribution() {
        let dist = DoseDistribution::new(uniform_doses(2.0, 100), new_volume()).unwrap();
        let config = AnalysisConfig {
            eud_exponent: 1.0,
            dvh_bins: 5,
        };
        let report = build_report(&dist, &config).unwrap();

        assert_eq!(report.samples, 100);
        assert_eq!(report.min, 2.0);
        assert_eq!(report.max, 2.0);
        assert_eq!(report.mean, 2.0);
        assert_eq!(report.d2, 2.0);
        assert_eq!(report.d50, 2.0);
        assert_eq!(report.d98, 2.0);
        assert_eq!(report.hindex, 0.0);
        assert_relative_eq!(report.eud, 2.0, epsilon = 1e-12);
        assert_eq!(report.curve.len(), 5);
        // every bin up to the max dose is fully covered
        for point in &report.curve {
            assert_eq!(point.volume_percent, 100.0);
        }
    }

    #[test]
    fn test_report_curve_is_monotonically_decreasing() {
        let dist = DoseDistribution::new(graded_doses(100), new_volume()).unwrap();
        let report = build_report(&dist, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.curve.first().unwrap().volume_percent, 100.0);
        for pair in report.curve.windows(2) {
            assert!(pair[0].volume_percent >= pair[1].volume_percent);
        }
        // only the single hottest sample receives the maximum dose
        assert_relative_eq!(
            report.curve.last().unwrap().volume_percent,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let dist = DoseDistribution::new(vec![6.0, 1.0, 1.0, 3.0, 6.0], new_volume()).unwrap();
        let config = AnalysisConfig {
            eud_exponent: 1.0,
            dvh_bins: 4,
        };
        let report = build_report(&dist, &config).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["volume_uid"], "1.345.789");
        assert_eq!(json["samples"], 5);
        assert_eq!(json["mean"], 3.4);
        assert_eq!(json["curve"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_report_rejects_empty_distribution() {
        let dist = DoseDistribution::new(vec![], new_volume()).unwrap();
        assert!(build_report(&dist, &AnalysisConfig::default()).is_err());
    }

    #[test]
    fn test_compare_plans() {
        let reference =
            DoseDistribution::new(uniform_doses(60.0, 50), VolumeRef::new("1.1")).unwrap();
        let comparison =
            DoseDistribution::new(uniform_doses(62.0, 50), VolumeRef::new("1.2")).unwrap();

        let result = compare_plans(&reference, &comparison, &AnalysisConfig::default()).unwrap();
        assert_eq!(result.reference.volume_uid, "1.1");
        assert_eq!(result.comparison.volume_uid, "1.2");
        assert_relative_eq!(result.mean_difference, 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.d50_difference, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compare_plans_propagates_failures() {
        let good = DoseDistribution::new(uniform_doses(60.0, 50), new_volume()).unwrap();
        let empty = DoseDistribution::new(vec![], new_volume()).unwrap();
        assert!(compare_plans(&good, &empty, &AnalysisConfig::default()).is_err());
    }
}
