use anyhow::{bail, Context};
use serde::Deserialize;

/// Tunable parameters for DVH report building.
///
/// Loaded from TOML text supplied by the caller; unspecified keys fall back
/// to their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Exponent of the generalized power-mean EUD model.
    pub eud_exponent: f64,
    /// Number of sample points on the cumulative DVH curve.
    pub dvh_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            eud_exponent: 1.0,
            dvh_bins: 100,
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(text).context("failed to parse analysis config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.eud_exponent == 0.0 {
            bail!("eud_exponent must be non-zero");
        }
        if self.dvh_bins < 2 {
            bail!("dvh_bins must be at least 2 (got {})", self.dvh_bins);
        }
        Ok(())
    }
}
