//! Seat HIL signals
//!
//! Stimulus synthesis and waveform analysis for hardware-in-the-loop testing
//! of a seat-comfort ECU (heating and massage subsystems). Generators produce
//! reference curves (ramps, pulse trains, thermal and pneumatic transients,
//! jittered CAN timing); the analyzer extracts the metrics requirement checks
//! are written against (statistics, settling time, overshoot).

pub mod analyzer;
pub mod generator;
pub mod io;
pub mod noise;
pub mod params;
pub mod profile;
pub mod signal;

use thiserror::Error;

// Re-export main types
pub use analyzer::{Band, Crossing, Durability, SettlingConfig, SettlingResult, Statistics};
pub use params::TransientShape;
pub use profile::{Profile, ProfileSet, SignalSpec, SignalSummary};
pub use signal::Signal;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
