//! Stochastic stimulus generators
//!
//! The random source is always passed in. Use [`rng_from_seed`] for a
//! reproducible stream; the same seed yields the same samples on every platform.

use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::signal::{
    require_finite, require_non_negative, require_positive, require_sample_budget, sample_count,
    Signal,
};
use crate::SignalError;

/// Deterministic random source for the stochastic generators
pub fn rng_from_seed(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, SignalError> {
    require_finite("mean", mean)?;
    require_non_negative("std_dev", std_dev)?;
    Normal::new(mean, std_dev).map_err(|_| SignalError::InvalidParameter {
        name: "std_dev",
        value: std_dev,
        reason: "not a valid normal distribution width",
    })
}

/// i.i.d. normal samples
pub fn gaussian_noise<R: Rng + ?Sized>(
    mean: f64,
    std_dev: f64,
    duration: f64,
    step: f64,
    rng: &mut R,
) -> Result<Signal, SignalError> {
    let dist = normal(mean, std_dev)?;
    let n = sample_count(duration, step)?;

    let samples = (0..n).map(|_| dist.sample(rng)).collect();
    Ok(Signal::from_parts(samples, step))
}

/// Copy of `signal` with independent zero-mean normal noise added to each sample
pub fn jitter<R: Rng + ?Sized>(
    signal: &Signal,
    jitter_std_dev: f64,
    rng: &mut R,
) -> Result<Signal, SignalError> {
    let dist = normal(0.0, jitter_std_dev)?;

    let samples = signal.iter().map(|&v| v + dist.sample(rng)).collect();
    Ok(Signal::from_parts(samples, signal.step()))
}

/// `count` inter-message intervals, each `nominal ± uniform(max_jitter)` with
/// `max_jitter = nominal_interval * jitter_percent / 100`
pub fn can_timing<R: Rng + ?Sized>(
    nominal_interval: f64,
    jitter_percent: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>, SignalError> {
    require_positive("nominal_interval", nominal_interval)?;
    require_non_negative("jitter_percent", jitter_percent)?;
    require_sample_budget("count", count as f64, count)?;

    let max_jitter = nominal_interval * (jitter_percent / 100.0);
    let dist = Uniform::new_inclusive(-max_jitter, max_jitter);

    Ok((0..count)
        .map(|_| nominal_interval + dist.sample(rng))
        .collect())
}
