//! Waveform analysis
//!
//! Metrics extracted from observed or generated sequences: summary
//! statistics, settling time, overshoot, and the threshold/band checks that
//! heating and massage requirements are phrased in.

use serde::{Deserialize, Serialize};

use crate::params::{DEFAULT_SETTLING_CHECKPOINTS, DEFAULT_SETTLING_TOLERANCE, DEFAULT_STEP};
use crate::signal::{require_finite, require_non_negative, require_positive};
use crate::SignalError;

/// Summary statistics of a non-empty sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub range: f64,
    pub count: usize,
}

/// Summary statistics, or `None` when there is no data
pub fn statistics(values: &[f64]) -> Option<Statistics> {
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Statistics {
        mean,
        min,
        max,
        std_dev: variance.sqrt(),
        range: max - min,
        count,
    })
}

/// How the remainder of a sequence is checked once a sample enters the band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Durability {
    /// Check evenly spaced checkpoints from the candidate to the final sample.
    /// Cheap, but can miss an excursion that falls between checkpoints.
    Sparse { checkpoints: usize },
    /// Check every remaining sample
    FullSuffix,
}

impl Default for Durability {
    fn default() -> Self {
        Durability::Sparse {
            checkpoints: DEFAULT_SETTLING_CHECKPOINTS,
        }
    }
}

/// Settling detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlingConfig {
    /// Band half-width relative to the final value
    pub tolerance: f64,
    /// Sample interval of the analysed sequence (seconds)
    pub step: f64,
    pub durability: Durability,
}

impl SettlingConfig {
    pub fn new(tolerance: f64, step: f64, durability: Durability) -> Self {
        Self {
            tolerance,
            step,
            durability,
        }
    }

    /// Default tolerance and durability for a sequence sampled every `step` seconds
    pub fn with_step(step: f64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        require_non_negative("tolerance", self.tolerance)?;
        require_positive("step", self.step)?;
        if let Durability::Sparse { checkpoints: 0 } = self.durability {
            return Err(SignalError::InvalidParameter {
                name: "checkpoints",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for SettlingConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SETTLING_TOLERANCE,
            step: DEFAULT_STEP,
            durability: Durability::default(),
        }
    }
}

/// Outcome of settling detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlingResult {
    /// First sample from which the sequence stays in band
    Settled { index: usize, time: f64 },
    /// The sequence never durably entered the band
    NotSettled,
}

impl SettlingResult {
    pub fn is_settled(&self) -> bool {
        matches!(self, SettlingResult::Settled { .. })
    }

    /// Settling time in seconds, if settled
    pub fn time(&self) -> Option<f64> {
        match self {
            SettlingResult::Settled { time, .. } => Some(*time),
            SettlingResult::NotSettled => None,
        }
    }
}

/// Inclusive value window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    /// Window between `a` and `b`, in either order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// `nominal ± tolerance`
    pub fn around(nominal: f64, tolerance: f64) -> Self {
        Self::new(nominal - tolerance, nominal + tolerance)
    }

    /// `final_value * (1 ± tolerance)`
    pub fn relative(final_value: f64, tolerance: f64) -> Self {
        Self::new(final_value * (1.0 - tolerance), final_value * (1.0 + tolerance))
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Indices of samples outside the window
    pub fn violations(&self, values: &[f64]) -> Vec<usize> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| !self.contains(**v))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Time for `values` to enter and durably remain within `tolerance` of `final_value`
pub fn settling_time(
    values: &[f64],
    final_value: f64,
    config: &SettlingConfig,
) -> Result<SettlingResult, SignalError> {
    require_finite("final_value", final_value)?;
    config.validate()?;
    let band = Band::relative(final_value, config.tolerance);

    for (index, &value) in values.iter().enumerate() {
        if !band.contains(value) {
            continue;
        }
        if stays_in_band(&values[index..], &band, config.durability) {
            return Ok(SettlingResult::Settled {
                index,
                time: index as f64 * config.step,
            });
        }
    }

    Ok(SettlingResult::NotSettled)
}

fn stays_in_band(remaining: &[f64], band: &Band, durability: Durability) -> bool {
    match durability {
        Durability::FullSuffix => remaining.iter().all(|&v| band.contains(v)),
        Durability::Sparse { checkpoints } => {
            let len = remaining.len();
            if len <= checkpoints {
                return remaining.iter().all(|&v| band.contains(v));
            }
            if checkpoints == 1 {
                return band.contains(remaining[0]);
            }
            let last = len - 1;
            (0..checkpoints)
                .map(|k| k * last / (checkpoints - 1))
                .all(|i| band.contains(remaining[i]))
        }
    }
}

/// Percentage by which the peak exceeds `steady_state`, never negative.
///
/// A zero baseline has no relative overshoot and yields `0.0`, as does an
/// empty sequence.
pub fn overshoot(values: &[f64], steady_state: f64) -> f64 {
    if steady_state == 0.0 || values.is_empty() {
        return 0.0;
    }
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ((peak - steady_state) / steady_state.abs() * 100.0).max(0.0)
}

/// Direction of a threshold crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    /// First sample at or above the threshold
    Rising,
    /// First sample at or below the threshold
    Falling,
}

/// Elapsed time until the first sample crosses `threshold`, or `None`
pub fn time_to_threshold(
    values: &[f64],
    threshold: f64,
    step: f64,
    crossing: Crossing,
) -> Result<Option<f64>, SignalError> {
    require_positive("step", step)?;
    Ok(values
        .iter()
        .position(|&v| match crossing {
            Crossing::Rising => v >= threshold,
            Crossing::Falling => v <= threshold,
        })
        .map(|i| i as f64 * step))
}

/// Percentage of samples strictly above `threshold`
pub fn duty_cycle(values: &[f64], threshold: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let active = values.iter().filter(|&&v| v > threshold).count();
    Some(active as f64 / values.len() as f64 * 100.0)
}

/// Relative change from the first to the last sample, in percent
pub fn drift_percent(values: &[f64]) -> Option<f64> {
    let (&first, &last) = (values.first()?, values.last()?);
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first.abs() * 100.0)
}
