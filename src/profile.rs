//! Stimulus profiles
//!
//! A profile names one generator call plus the analysis to run on its
//! output. Profile sets are loaded from TOML:
//!
//! ```toml
//! seed = 2026
//!
//! [[profiles]]
//! name = "heater_cold_start"
//! jitter = 0.05
//!
//! [profiles.spec]
//! kind = "temperature_ramp"
//! start_temp = 20.0
//! end_temp = 40.0
//! duration = 120.0
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::{
    overshoot, settling_time, statistics, SettlingConfig, SettlingResult, Statistics,
};
use crate::generator;
use crate::noise::{self, rng_from_seed};
use crate::params::{DEFAULT_PRESSURE_OVERSHOOT, DEFAULT_STEP, DEFAULT_TEMPERATURE_OVERSHOOT};
use crate::signal::{require_non_negative, Signal};
use crate::SignalError;

pub const DEFAULT_SEED: u64 = 2026;

fn default_step() -> f64 {
    DEFAULT_STEP
}

fn default_temperature_overshoot() -> f64 {
    DEFAULT_TEMPERATURE_OVERSHOOT
}

fn default_pressure_overshoot() -> f64 {
    DEFAULT_PRESSURE_OVERSHOOT
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// One generator call and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalSpec {
    Ramp {
        start: f64,
        end: f64,
        duration: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    Sine {
        amplitude: f64,
        frequency: f64,
        duration: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    Square {
        low: f64,
        high: f64,
        frequency: f64,
        duration: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    Pwm {
        low: f64,
        high: f64,
        frequency: f64,
        duty_percent: f64,
        duration: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    Step {
        initial: f64,
        target: f64,
        step_time: f64,
        duration: f64,
        #[serde(default = "default_step")]
        interval: f64,
    },
    GaussianNoise {
        mean: f64,
        std_dev: f64,
        duration: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    TemperatureRamp {
        start_temp: f64,
        end_temp: f64,
        duration: f64,
        #[serde(default = "default_temperature_overshoot")]
        overshoot_percent: f64,
    },
    PressureBuildup {
        start: f64,
        target: f64,
        ramp_time: f64,
        #[serde(default = "default_pressure_overshoot")]
        overshoot_percent: f64,
        #[serde(default = "default_step")]
        step: f64,
    },
    /// Inter-message intervals; sample `i` is the gap before message `i + 1`
    CanTiming {
        nominal_interval: f64,
        jitter_percent: f64,
        count: usize,
    },
}

impl SignalSpec {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SignalSpec::Ramp { .. } => "ramp",
            SignalSpec::Sine { .. } => "sine",
            SignalSpec::Square { .. } => "square",
            SignalSpec::Pwm { .. } => "pwm",
            SignalSpec::Step { .. } => "step",
            SignalSpec::GaussianNoise { .. } => "gaussian_noise",
            SignalSpec::TemperatureRamp { .. } => "temperature_ramp",
            SignalSpec::PressureBuildup { .. } => "pressure_buildup",
            SignalSpec::CanTiming { .. } => "can_timing",
        }
    }

    /// Value the signal is expected to settle at, for shapes that have one
    pub fn steady_state(&self) -> Option<f64> {
        match self {
            SignalSpec::Ramp { end, .. } => Some(*end),
            SignalSpec::Step { target, .. } => Some(*target),
            SignalSpec::TemperatureRamp { end_temp, .. } => Some(*end_temp),
            SignalSpec::PressureBuildup { target, .. } => Some(*target),
            SignalSpec::CanTiming {
                nominal_interval, ..
            } => Some(*nominal_interval),
            SignalSpec::Sine { .. }
            | SignalSpec::Square { .. }
            | SignalSpec::Pwm { .. }
            | SignalSpec::GaussianNoise { .. } => None,
        }
    }

    /// Run the generator. `rng` is drawn from only by the stochastic kinds.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Signal, SignalError> {
        match *self {
            SignalSpec::Ramp {
                start,
                end,
                duration,
                step,
            } => generator::ramp(start, end, duration, step),
            SignalSpec::Sine {
                amplitude,
                frequency,
                duration,
                step,
            } => generator::sine_wave(amplitude, frequency, duration, step),
            SignalSpec::Square {
                low,
                high,
                frequency,
                duration,
                step,
            } => generator::square_wave(low, high, frequency, duration, step),
            SignalSpec::Pwm {
                low,
                high,
                frequency,
                duty_percent,
                duration,
                step,
            } => generator::pwm(low, high, frequency, duty_percent, duration, step),
            SignalSpec::Step {
                initial,
                target,
                step_time,
                duration,
                interval,
            } => generator::step_response(initial, target, step_time, duration, interval),
            SignalSpec::GaussianNoise {
                mean,
                std_dev,
                duration,
                step,
            } => noise::gaussian_noise(mean, std_dev, duration, step, rng),
            SignalSpec::TemperatureRamp {
                start_temp,
                end_temp,
                duration,
                overshoot_percent,
            } => generator::temperature_ramp(start_temp, end_temp, duration, overshoot_percent),
            SignalSpec::PressureBuildup {
                start,
                target,
                ramp_time,
                overshoot_percent,
                step,
            } => generator::pressure_buildup(start, target, ramp_time, overshoot_percent, step),
            SignalSpec::CanTiming {
                nominal_interval,
                jitter_percent,
                count,
            } => {
                let intervals = noise::can_timing(nominal_interval, jitter_percent, count, rng)?;
                Signal::new(intervals, nominal_interval)
            }
        }
    }
}

/// Named generator call with optional jitter and analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub spec: SignalSpec,
    /// Standard deviation of measurement jitter added after generation
    #[serde(default)]
    pub jitter: Option<f64>,
    /// Overrides the seed derived from the profile set
    #[serde(default)]
    pub seed: Option<u64>,
    /// Steady-state value for overshoot/settling; defaults to the generator's setpoint
    #[serde(default)]
    pub target: Option<f64>,
    /// Settling parameters; the step always comes from the generated signal
    #[serde(default)]
    pub settling: Option<SettlingConfig>,
}

/// Analysis of one generated profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub name: String,
    pub kind: String,
    pub seed: u64,
    pub step: f64,
    pub statistics: Option<Statistics>,
    pub target: Option<f64>,
    pub overshoot_percent: Option<f64>,
    pub settling: Option<SettlingResult>,
}

impl Profile {
    pub fn new(name: impl Into<String>, spec: SignalSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            jitter: None,
            seed: None,
            target: None,
            settling: None,
        }
    }

    pub fn with_jitter(mut self, std_dev: f64) -> Self {
        self.jitter = Some(std_dev);
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.name.trim().is_empty() {
            return Err(SignalError::InvalidConfig(
                "profile name must not be empty".to_string(),
            ));
        }
        // names become output file stems
        if self.name.contains(['/', '\\']) || self.name.contains("..") {
            return Err(SignalError::InvalidConfig(format!(
                "profile name '{}' must not contain path separators or '..'",
                self.name
            )));
        }
        if let Some(std_dev) = self.jitter {
            require_non_negative("jitter", std_dev)?;
        }
        if let Some(settling) = &self.settling {
            settling.validate()?;
        }
        Ok(())
    }

    /// Generate the profile's signal from a fresh source seeded with `seed`
    pub fn generate(&self, seed: u64) -> Result<Signal, SignalError> {
        let mut rng = rng_from_seed(seed);
        let signal = self.spec.generate(&mut rng)?;
        debug!(
            profile = %self.name,
            kind = self.spec.kind_name(),
            seed,
            samples = signal.len(),
            "generated signal"
        );

        match self.jitter {
            Some(std_dev) if std_dev > 0.0 => noise::jitter(&signal, std_dev, &mut rng),
            _ => Ok(signal),
        }
    }

    pub fn steady_state(&self) -> Option<f64> {
        self.target.or_else(|| self.spec.steady_state())
    }

    /// Statistics always; overshoot and settling when a steady state is known
    pub fn analyse(&self, signal: &Signal, seed: u64) -> Result<SignalSummary, SignalError> {
        let target = self.steady_state();
        let config = SettlingConfig {
            step: signal.step(),
            ..self.settling.unwrap_or_default()
        };

        let settling = match target {
            Some(value) => Some(settling_time(signal.samples(), value, &config)?),
            None => None,
        };
        if let (Some(value), Some(SettlingResult::NotSettled)) = (target, settling) {
            debug!(profile = %self.name, target = value, "signal did not settle");
        }

        Ok(SignalSummary {
            name: self.name.clone(),
            kind: self.spec.kind_name().to_string(),
            seed,
            step: signal.step(),
            statistics: statistics(signal.samples()),
            target,
            overshoot_percent: target.map(|value| overshoot(signal.samples(), value)),
            settling,
        })
    }
}

/// A seeded collection of profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSet {
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub profiles: Vec<Profile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            profiles: Vec::new(),
        }
    }
}

impl ProfileSet {
    pub fn from_toml_str(raw: &str) -> Result<Self, SignalError> {
        let set: ProfileSet = toml::from_str(raw)?;
        set.validate()?;
        Ok(set)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SignalError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.profiles.is_empty() {
            return Err(SignalError::InvalidConfig(
                "profile set must contain at least one profile".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !seen.insert(profile.name.as_str()) {
                return Err(SignalError::InvalidConfig(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        Ok(())
    }

    /// Seed for the profile at `index`: its own, or the set seed offset by position
    pub fn seed_for(&self, index: usize) -> u64 {
        self.profiles
            .get(index)
            .and_then(|p| p.seed)
            .unwrap_or_else(|| self.seed.wrapping_add(index as u64))
    }

    /// Profiles matching `names` with their positions; all profiles when `names` is empty
    pub fn select(&self, names: &[String]) -> Result<Vec<(usize, &Profile)>, SignalError> {
        if names.is_empty() {
            return Ok(self.profiles.iter().enumerate().collect());
        }

        names
            .iter()
            .map(|name| {
                self.profiles
                    .iter()
                    .enumerate()
                    .find(|(_, p)| &p.name == name)
                    .ok_or_else(|| SignalError::InvalidConfig(format!("unknown profile '{name}'")))
            })
            .collect()
    }
}
