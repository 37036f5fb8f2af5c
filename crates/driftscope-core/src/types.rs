//! Domain types exchanged between the detection engine and its callers.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::Error;

/// Qualitative classification of a PSI score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    /// No meaningful shift
    Stable,
    /// Shift worth investigating
    Moderate,
    /// Shift that requires action
    Significant,
}

impl StatusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Stable => "stable",
            StatusTier::Moderate => "moderate",
            StatusTier::Significant => "significant",
        }
    }

    /// Whether the tier indicates drift (anything above stable)
    pub fn is_drifted(&self) -> bool {
        !matches!(self, StatusTier::Stable)
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind of synthetic perturbation applied to a current sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftType {
    /// Leave the sample untouched
    #[default]
    None,
    /// Linear ramp of bias across the sample
    Gradual,
    /// Constant bias from the midpoint onward
    Sudden,
    /// Additive Gaussian noise
    Noise,
}

impl DriftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftType::None => "none",
            DriftType::Gradual => "gradual",
            DriftType::Sudden => "sudden",
            DriftType::Noise => "noise",
        }
    }

    /// Check an intensity for this drift type.
    ///
    /// Gradual and sudden intensities are biases and may be negative. Noise
    /// intensity is a standard deviation and must be non-negative.
    pub fn check_intensity(&self, intensity: f64) -> crate::Result<()> {
        if !intensity.is_finite() {
            return Err(Error::invalid_input(format!(
                "intensity must be finite, got {}",
                intensity
            )));
        }
        if *self == DriftType::Noise && intensity < 0.0 {
            return Err(Error::invalid_input(format!(
                "noise intensity must be non-negative, got {}",
                intensity
            )));
        }
        Ok(())
    }

    pub fn all() -> [DriftType; 4] {
        [
            DriftType::None,
            DriftType::Gradual,
            DriftType::Sudden,
            DriftType::Noise,
        ]
    }
}

impl fmt::Display for DriftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DriftType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(DriftType::None),
            "gradual" => Ok(DriftType::Gradual),
            "sudden" => Ok(DriftType::Sudden),
            "noise" => Ok(DriftType::Noise),
            other => Err(Error::invalid_input(format!(
                "unknown drift type '{}' (expected none, gradual, sudden or noise)",
                other
            ))),
        }
    }
}

/// How bin boundaries are derived from the reference sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningMethod {
    /// Reference quantiles, falling back to equal width when degenerate
    #[default]
    Quantile,
    /// Evenly spaced over the reference range
    EqualWidth,
}

impl BinningMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinningMethod::Quantile => "quantile",
            BinningMethod::EqualWidth => "equal_width",
        }
    }
}

impl fmt::Display for BinningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BinningMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quantile" => Ok(BinningMethod::Quantile),
            "equal" | "equal_width" | "equal-width" => Ok(BinningMethod::EqualWidth),
            other => Err(Error::invalid_input(format!(
                "unknown binning method '{}' (expected quantile or equal_width)",
                other
            ))),
        }
    }
}

/// One discretization interval of a histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower_edge: f64,
    /// Upper edge (exclusive, except for the last bin)
    pub upper_edge: f64,
    /// Number of sample values in the bin
    pub count: usize,
    /// count / sample size
    pub proportion: f64,
}

/// PSI score for one feature, tagged for downstream display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiResult {
    /// Feature identifier
    pub feature_id: String,
    /// PSI score (non-negative up to floating-point error)
    pub psi_value: f64,
    /// Status tier of the score
    pub status: StatusTier,
    /// Per-bin proportions of the reference sample
    pub reference_proportions: Vec<f64>,
    /// Per-bin proportions of the current sample
    pub current_proportions: Vec<f64>,
    /// Widened bin boundaries shared by both histograms
    pub bin_boundaries: Vec<f64>,
    /// Reference sample size after cleaning
    pub reference_samples: usize,
    /// Current sample size after cleaning
    pub current_samples: usize,
}

impl PsiResult {
    /// Number of bins the score was computed over
    pub fn bin_count(&self) -> usize {
        self.reference_proportions.len()
    }
}
