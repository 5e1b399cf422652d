//! Deterministic stimulus generators
//!
//! Every generator is a pure function of its parameters and returns a
//! [`Signal`] of `floor(duration / step)` samples, or
//! [`SignalError::InvalidParameter`] without producing any samples.

use std::f64::consts::PI;

use crate::params::{TransientShape, DEFAULT_STEP};
use crate::signal::{
    require_finite, require_non_negative, require_positive, sample_count, truncated_ratio, Signal,
};
use crate::SignalError;

/// Linear ramp: `start + (end - start) * i / N`
///
/// The last sample sits one step short of `end`.
pub fn ramp(start: f64, end: f64, duration: f64, step: f64) -> Result<Signal, SignalError> {
    require_finite("start", start)?;
    require_finite("end", end)?;
    let n = sample_count(duration, step)?;

    let samples = (0..n)
        .map(|i| start + (end - start) * (i as f64 / n as f64))
        .collect();
    Ok(Signal::from_parts(samples, step))
}

/// `amplitude * sin(2π f t)` with `t = i * step`
pub fn sine_wave(
    amplitude: f64,
    frequency: f64,
    duration: f64,
    step: f64,
) -> Result<Signal, SignalError> {
    require_finite("amplitude", amplitude)?;
    require_finite("frequency", frequency)?;
    let n = sample_count(duration, step)?;

    let samples = (0..n)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f64 * step).sin())
        .collect();
    Ok(Signal::from_parts(samples, step))
}

/// Square wave: `high` for the first half of each period, `low` for the second
pub fn square_wave(
    low: f64,
    high: f64,
    frequency: f64,
    duration: f64,
    step: f64,
) -> Result<Signal, SignalError> {
    pwm(low, high, frequency, 50.0, duration, step)
}

/// Pulse train with an adjustable duty cycle.
///
/// Each period starts at `high` and drops to `low` once the phase reaches
/// `duty_percent / 100`. A duty of 100 holds `high`, a duty of 0 holds `low`.
pub fn pwm(
    low: f64,
    high: f64,
    frequency: f64,
    duty_percent: f64,
    duration: f64,
    step: f64,
) -> Result<Signal, SignalError> {
    require_finite("low", low)?;
    require_finite("high", high)?;
    require_positive("frequency", frequency)?;
    require_non_negative("duty_percent", duty_percent)?;
    if duty_percent > 100.0 {
        return Err(SignalError::InvalidParameter {
            name: "duty_percent",
            value: duty_percent,
            reason: "must not exceed 100",
        });
    }
    let n = sample_count(duration, step)?;

    let period = 1.0 / frequency;
    let duty = duty_percent / 100.0;
    let samples = (0..n)
        .map(|i| {
            let t = i as f64 * step;
            let phase = (t % period) / period;
            if phase < duty {
                high
            } else {
                low
            }
        })
        .collect();
    Ok(Signal::from_parts(samples, step))
}

/// `initial` before index `floor(step_time / interval)`, `target` from it on
pub fn step_response(
    initial: f64,
    target: f64,
    step_time: f64,
    duration: f64,
    interval: f64,
) -> Result<Signal, SignalError> {
    require_finite("initial", initial)?;
    require_finite("target", target)?;
    require_non_negative("step_time", step_time)?;
    let n = sample_count(duration, interval)?;
    let step_index = truncated_ratio(step_time, interval);

    let samples = (0..n)
        .map(|i| if i >= step_index { target } else { initial })
        .collect();
    Ok(Signal::from_parts(samples, interval))
}

/// Peak value of a transient from `start` to `end` with the given overshoot
pub fn overshoot_ceiling(start: f64, end: f64, overshoot_percent: f64) -> f64 {
    end + (end - start) * (overshoot_percent / 100.0)
}

/// Two-phase exponential transient from `start` to `end` overshooting by
/// `overshoot_percent` of the swing. See [`TransientShape`].
pub fn transient(
    start: f64,
    end: f64,
    duration: f64,
    step: f64,
    overshoot_percent: f64,
    shape: TransientShape,
) -> Result<Signal, SignalError> {
    require_finite("start", start)?;
    require_finite("end", end)?;
    require_non_negative("overshoot_percent", overshoot_percent)?;
    require_positive("rise_rate", shape.rise_rate)?;
    require_positive("settle_rate", shape.settle_rate)?;
    if !(shape.split > 0.0 && shape.split < 1.0) {
        return Err(SignalError::InvalidParameter {
            name: "split",
            value: shape.split,
            reason: "must lie strictly between 0 and 1",
        });
    }
    let n = sample_count(duration, step)?;

    let ceiling = overshoot_ceiling(start, end, overshoot_percent);
    let split_index = truncated_ratio(n as f64 * shape.split, 1.0);

    let samples = (0..n)
        .map(|i| {
            let value = if i < split_index {
                let t = i as f64 / split_index as f64;
                start + (ceiling - start) * (1.0 - (-shape.rise_rate * t).exp())
            } else {
                let t = (i - split_index) as f64 / (n - split_index) as f64;
                ceiling - (ceiling - end) * (1.0 - (-shape.settle_rate * t).exp())
            };
            if shape.clamp_to_start {
                value.max(start)
            } else {
                value
            }
        })
        .collect();
    Ok(Signal::from_parts(samples, step))
}

/// Heater temperature curve sampled every 10 ms
pub fn temperature_ramp(
    start_temp: f64,
    end_temp: f64,
    duration: f64,
    overshoot_percent: f64,
) -> Result<Signal, SignalError> {
    transient(
        start_temp,
        end_temp,
        duration,
        DEFAULT_STEP,
        overshoot_percent,
        TransientShape::THERMAL,
    )
}

/// Bladder pressure build-up; never reports a sample below `start`
pub fn pressure_buildup(
    start: f64,
    target: f64,
    ramp_time: f64,
    overshoot_percent: f64,
    step: f64,
) -> Result<Signal, SignalError> {
    transient(
        start,
        target,
        ramp_time,
        step,
        overshoot_percent,
        TransientShape::PNEUMATIC,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{DEFAULT_PRESSURE_OVERSHOOT, DEFAULT_TEMPERATURE_OVERSHOOT};
    use approx::assert_relative_eq;

    #[test]
    fn test_ramp_endpoints() {
        let signal = ramp(10.0, 20.0, 1.0, 0.1).unwrap();
        assert_eq!(signal.len(), 10);
        assert_relative_eq!(signal.samples()[0], 10.0);
        assert_relative_eq!(signal.samples()[9], 19.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ramp_rejects_invalid_duration() {
        assert!(matches!(
            ramp(0.0, 1.0, 0.0, 0.01),
            Err(SignalError::InvalidParameter { name: "duration", .. })
        ));
        assert!(ramp(0.0, 1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_generators_reject_oversized_duration() {
        assert!(matches!(
            ramp(0.0, 1.0, 1e300, 1e-10),
            Err(SignalError::InvalidParameter { name: "duration", .. })
        ));
        assert!(temperature_ramp(20.0, 40.0, 1e12, 5.0).is_err());
        assert!(pwm(0.0, 1.0, 1.0, 50.0, f64::MAX, 1e-300).is_err());
    }

    #[test]
    fn test_sine_wave_quarter_period() {
        let signal = sine_wave(2.0, 1.0, 1.0, 0.25).unwrap();
        assert_eq!(signal.len(), 4);
        assert_relative_eq!(signal.samples()[0], 0.0);
        assert_relative_eq!(signal.samples()[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(signal.samples()[3], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_wave_half_periods() {
        let signal = square_wave(0.0, 1.0, 1.0, 2.0, 0.01).unwrap();
        assert_eq!(signal.len(), 200);
        let s = signal.samples();
        for i in [0, 10, 25, 49, 100, 125, 149] {
            assert_eq!(s[i], 1.0, "sample {i} should be high");
        }
        for i in [51, 75, 99, 151, 175, 199] {
            assert_eq!(s[i], 0.0, "sample {i} should be low");
        }
        let high = s.iter().filter(|&&v| v == 1.0).count();
        assert_eq!(high, 100);
    }

    #[test]
    fn test_square_wave_rejects_zero_frequency() {
        assert!(matches!(
            square_wave(0.0, 1.0, 0.0, 1.0, 0.01),
            Err(SignalError::InvalidParameter { name: "frequency", .. })
        ));
    }

    #[test]
    fn test_pwm_duty_levels() {
        let level1 = pwm(0.0, 1.0, 10.0, 20.0, 1.0, 0.001).unwrap();
        let high = level1.iter().filter(|&&v| v == 1.0).count();
        assert!((195..=205).contains(&high), "high count {high}");

        let full = pwm(0.0, 1.0, 10.0, 100.0, 1.0, 0.01).unwrap();
        assert!(full.iter().all(|&v| v == 1.0));

        let off = pwm(0.0, 1.0, 10.0, 0.0, 1.0, 0.01).unwrap();
        assert!(off.iter().all(|&v| v == 0.0));

        assert!(pwm(0.0, 1.0, 10.0, 120.0, 1.0, 0.01).is_err());
    }

    #[test]
    fn test_step_response_index() {
        let signal = step_response(0.0, 5.0, 0.5, 1.0, 0.1).unwrap();
        assert_eq!(signal.len(), 10);
        assert_eq!(&signal.samples()[..5], &[0.0; 5]);
        assert_eq!(&signal.samples()[5..], &[5.0; 5]);
        assert!(step_response(0.0, 5.0, -0.1, 1.0, 0.1).is_err());
    }

    #[test]
    fn test_temperature_ramp_bounded_by_ceiling() {
        let signal = temperature_ramp(20.0, 40.0, 60.0, DEFAULT_TEMPERATURE_OVERSHOOT).unwrap();
        assert_eq!(signal.len(), 6000);
        let max = signal.iter().copied().fold(f64::MIN, f64::max);
        assert!(max >= 40.0 && max <= 41.0 + 1e-9, "max {max}");
        let last = *signal.samples().last().unwrap();
        assert!((last - 40.0).abs() < 0.2, "last {last}");
        assert_relative_eq!(signal.samples()[0], 20.0);
    }

    #[test]
    fn test_pressure_buildup_clamped() {
        let signal = pressure_buildup(0.0, 120.0, 0.5, DEFAULT_PRESSURE_OVERSHOOT, 0.01).unwrap();
        assert_eq!(signal.len(), 50);
        assert!(signal.iter().all(|&v| v >= 0.0));
        let max = signal.iter().copied().fold(f64::MIN, f64::max);
        assert!(max <= 132.0 + 1e-9);
        let last = *signal.samples().last().unwrap();
        assert!((last - 120.0).abs() < 1.0, "last {last}");
    }

    #[test]
    fn test_transient_rejects_bad_shape() {
        let shape = TransientShape::new(1.0, 3.0, 2.0, false);
        assert!(transient(0.0, 1.0, 1.0, 0.01, 5.0, shape).is_err());
        assert!(transient(0.0, 1.0, 1.0, 0.01, -5.0, TransientShape::THERMAL).is_err());
    }

    #[test]
    fn test_transient_single_sample() {
        // split index is zero; only the settle phase runs
        let signal = transient(0.0, 10.0, 0.01, 0.01, 10.0, TransientShape::THERMAL).unwrap();
        assert_eq!(signal.len(), 1);
        assert_relative_eq!(signal.samples()[0], 11.0);
    }
}
