//! Generator parameters
//!
//! Fixed design constants for the physical transient models and the
//! defaults shared by the generators and profile files.

use serde::{Deserialize, Serialize};

/// Default sample interval: 10 ms
pub const DEFAULT_STEP: f64 = 0.01;

/// Default overshoot for heater temperature curves (percent of the swing)
pub const DEFAULT_TEMPERATURE_OVERSHOOT: f64 = 5.0;

/// Default overshoot for massage bladder pressure curves (percent of the swing)
pub const DEFAULT_PRESSURE_OVERSHOOT: f64 = 10.0;

/// Default settling band half-width, relative to the final value
pub const DEFAULT_SETTLING_TOLERANCE: f64 = 0.05;

/// Default number of durability checkpoints used by settling detection
pub const DEFAULT_SETTLING_CHECKPOINTS: usize = 5;

/// Shape of a two-phase exponential transient.
///
/// Phase 1 covers the first `split` fraction of samples and approaches the
/// overshoot ceiling as `1 - e^(-rise_rate * t)`. Phase 2 covers the rest and
/// decays from the ceiling towards the setpoint as `1 - e^(-settle_rate * t)`.
/// In both phases `t` is normalised to `0..1` over the phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientShape {
    /// Fraction of samples spent approaching the ceiling (0 < split < 1)
    pub split: f64,
    /// Exponential rate of the approach phase
    pub rise_rate: f64,
    /// Exponential rate of the settle phase
    pub settle_rate: f64,
    /// Never report a sample below the starting value
    pub clamp_to_start: bool,
}

impl TransientShape {
    /// Heater mat: fast approach, slower settle
    pub const THERMAL: Self = Self {
        split: 0.7,
        rise_rate: 3.0,
        settle_rate: 2.0,
        clamp_to_start: false,
    };

    /// Massage bladder: pump build-up, relief-valve settle
    pub const PNEUMATIC: Self = Self {
        split: 0.8,
        rise_rate: 4.0,
        settle_rate: 3.0,
        clamp_to_start: true,
    };

    pub fn new(split: f64, rise_rate: f64, settle_rate: f64, clamp_to_start: bool) -> Self {
        Self {
            split,
            rise_rate,
            settle_rate,
            clamp_to_start,
        }
    }
}

impl Default for TransientShape {
    fn default() -> Self {
        Self::THERMAL
    }
}
