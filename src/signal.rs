//! Signal data model
//!
//! A signal is a finite run of samples taken at a fixed step interval.
//! Time is implicit: sample `i` sits at `i * step` seconds.

use serde::Serialize;

use crate::SignalError;

/// Ratios within this relative distance of an integer snap to it before
/// truncation, so `0.3 / 0.1 == 2.9999999999999996` still yields 3 samples.
const COUNT_EPSILON: f64 = 1e-12;

/// Upper bound on the samples one generator call may allocate
pub const MAX_SAMPLES: usize = 100_000_000;

/// Ordered, immutable sequence of samples at a fixed step interval (seconds)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    samples: Vec<f64>,
    step: f64,
}

impl Signal {
    /// Wrap recorded or generated samples taken every `step` seconds
    pub fn new(samples: Vec<f64>, step: f64) -> Result<Self, SignalError> {
        require_positive("step", step)?;
        Ok(Self { samples, step })
    }

    /// Caller has already validated `step`
    pub(crate) fn from_parts(samples: Vec<f64>, step: f64) -> Self {
        debug_assert!(step.is_finite() && step > 0.0);
        Self { samples, step }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Covered time span: `len * step`
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 * self.step
    }

    /// Elapsed time of sample `index`
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    /// Time axis matching `samples()`
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.samples.len()).map(move |i| self.time_at(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.samples.iter()
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

impl<'a> IntoIterator for &'a Signal {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Number of samples covering `duration` at `step`: `floor(duration / step)`
pub fn sample_count(duration: f64, step: f64) -> Result<usize, SignalError> {
    require_positive("duration", duration)?;
    require_positive("step", step)?;
    let n = truncated_ratio(duration, step);
    require_sample_budget("duration", duration, n)
}

pub(crate) fn require_sample_budget(
    name: &'static str,
    value: f64,
    n: usize,
) -> Result<usize, SignalError> {
    if n > MAX_SAMPLES {
        return Err(SignalError::InvalidParameter {
            name,
            value,
            reason: "exceeds maximum sample count",
        });
    }
    Ok(n)
}

/// `floor(numerator / denominator)` for non-negative inputs; saturates on overflow
pub(crate) fn truncated_ratio(numerator: f64, denominator: f64) -> usize {
    let ratio = numerator / denominator;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= nearest.abs().max(1.0) * COUNT_EPSILON {
        nearest as usize
    } else {
        ratio.floor() as usize
    }
}

pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, SignalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SignalError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, SignalError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SignalError::InvalidParameter {
            name,
            value,
            reason: "must be greater than zero",
        })
    }
}

pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64, SignalError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SignalError::InvalidParameter {
            name,
            value,
            reason: "must not be negative",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_truncates() {
        assert_eq!(sample_count(2.0, 0.01).unwrap(), 200);
        assert_eq!(sample_count(0.3, 0.1).unwrap(), 3);
        assert_eq!(sample_count(0.25, 0.1).unwrap(), 2);
        assert_eq!(sample_count(0.005, 0.01).unwrap(), 0);
    }

    #[test]
    fn test_sample_count_rejects_non_positive() {
        assert!(matches!(
            sample_count(0.0, 0.01),
            Err(SignalError::InvalidParameter { name: "duration", .. })
        ));
        assert!(matches!(
            sample_count(1.0, -0.01),
            Err(SignalError::InvalidParameter { name: "step", .. })
        ));
        assert!(sample_count(f64::NAN, 0.01).is_err());
        assert!(sample_count(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_sample_count_rejects_oversized() {
        assert!(matches!(
            sample_count(1e300, 1e-10),
            Err(SignalError::InvalidParameter {
                name: "duration",
                reason: "exceeds maximum sample count",
                ..
            })
        ));
        assert!(sample_count(1e4, 1e-6).is_err());
        assert_eq!(sample_count(1e4, 1e-4).unwrap(), MAX_SAMPLES);
    }

    #[test]
    fn test_truncated_ratio_snaps_only_representation_error() {
        assert_eq!(truncated_ratio(1_000_000_000.5, 1.0), 1_000_000_000);
        assert_eq!(truncated_ratio(120.0, 0.01), 12_000);
        assert_eq!(truncated_ratio(2.9999, 1.0), 2);
        assert_eq!(truncated_ratio(0.0, 1.0), 0);
    }

    #[test]
    fn test_signal_time_axis() {
        let signal = Signal::new(vec![1.0, 2.0, 3.0, 4.0], 0.5).unwrap();
        let times: Vec<f64> = signal.times().collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(signal.duration(), 2.0);
        assert_eq!(signal.len(), 4);
    }

    #[test]
    fn test_signal_rejects_bad_step() {
        assert!(Signal::new(vec![1.0], 0.0).is_err());
        assert!(Signal::new(Vec::new(), 0.01).unwrap().is_empty());
    }
}
