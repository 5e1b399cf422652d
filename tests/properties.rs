//! Property-based tests over generator parameters and analyzer inputs.

use proptest::prelude::*;
use seat_hil_signals::analyzer::{overshoot, settling_time, statistics};
use seat_hil_signals::generator::{
    overshoot_ceiling, pressure_buildup, ramp, step_response, transient,
};
use seat_hil_signals::noise::{can_timing, jitter, rng_from_seed};
use seat_hil_signals::{Durability, SettlingConfig, SettlingResult, TransientShape};

fn step_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.001), Just(0.01), Just(0.05), Just(0.1), Just(0.5)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Length is floor(duration / step) and the first sample is `start`.
    #[test]
    fn prop_ramp_length_and_start(
        n in 1usize..2000,
        step in step_strategy(),
        start in -100.0f64..100.0,
        end in -100.0f64..100.0,
    ) {
        let signal = ramp(start, end, n as f64 * step, step).unwrap();
        prop_assert_eq!(signal.len(), n);
        prop_assert!((signal.samples()[0] - start).abs() < 1e-12);
        let last = *signal.samples().last().unwrap();
        let expected = start + (end - start) * ((n - 1) as f64 / n as f64);
        prop_assert!((last - expected).abs() < 1e-9);
    }

    /// Thermal transients never leave the span between start and the overshoot ceiling.
    #[test]
    fn prop_transient_bounded(
        start in -50.0f64..50.0,
        swing in -80.0f64..80.0,
        overshoot_percent in 0.0f64..30.0,
        n in 2usize..3000,
    ) {
        let end = start + swing;
        let signal = transient(start, end, n as f64 * 0.01, 0.01, overshoot_percent, TransientShape::THERMAL).unwrap();
        let ceiling = overshoot_ceiling(start, end, overshoot_percent);
        let (lo, hi) = (start.min(ceiling) - 1e-9, start.max(ceiling) + 1e-9);
        prop_assert_eq!(signal.len(), n);
        prop_assert!(signal.iter().all(|&v| v >= lo && v <= hi));
    }

    /// Pressure build-up never reports a sample below its start value.
    #[test]
    fn prop_pressure_never_below_start(
        start in 0.0f64..50.0,
        target in 0.0f64..150.0,
        overshoot_percent in 0.0f64..25.0,
        ramp_time in 0.05f64..3.0,
    ) {
        let signal = pressure_buildup(start, target, ramp_time, overshoot_percent, 0.01).unwrap();
        prop_assert!(signal.iter().all(|&v| v >= start));
    }

    #[test]
    fn prop_statistics_ordering(values in prop::collection::vec(-1e3f64..1e3, 1..200)) {
        let stats = statistics(&values).unwrap();
        prop_assert_eq!(stats.count, values.len());
        prop_assert!(stats.min <= stats.mean + 1e-9 && stats.mean <= stats.max + 1e-9);
        prop_assert!(stats.std_dev >= 0.0);
        prop_assert!((stats.range - (stats.max - stats.min)).abs() < 1e-12);
    }

    #[test]
    fn prop_overshoot_non_negative(
        values in prop::collection::vec(-1e3f64..1e3, 1..100),
        steady_state in -1e3f64..1e3,
    ) {
        prop_assert!(overshoot(&values, steady_state) >= 0.0);
        prop_assert_eq!(overshoot(&values, 0.0), 0.0);
    }

    /// A clean step settles exactly at the step index under either durability check.
    #[test]
    fn prop_step_settles_at_step_index(k in 0usize..150, target in 1.0f64..100.0) {
        let signal = step_response(0.0, target, k as f64 * 0.01, 2.0, 0.01).unwrap();
        for durability in [Durability::default(), Durability::FullSuffix] {
            let config = SettlingConfig::new(0.05, 0.01, durability);
            let result = settling_time(signal.samples(), target, &config).unwrap();
            prop_assert_eq!(result, SettlingResult::Settled { index: k, time: k as f64 * 0.01 });
        }
    }

    /// Full-suffix verification never reports an earlier settling time than the sparse check.
    #[test]
    fn prop_full_suffix_not_earlier(values in prop::collection::vec(0.0f64..2.0, 1..300)) {
        let sparse = settling_time(&values, 1.0, &SettlingConfig::default()).unwrap();
        let full = settling_time(&values, 1.0, &SettlingConfig::new(0.05, 0.01, Durability::FullSuffix)).unwrap();
        match (sparse, full) {
            (SettlingResult::Settled { index: a, .. }, SettlingResult::Settled { index: b, .. }) => {
                prop_assert!(a <= b);
            }
            (SettlingResult::NotSettled, full) => prop_assert_eq!(full, SettlingResult::NotSettled),
            (SettlingResult::Settled { .. }, SettlingResult::NotSettled) => {}
        }
    }

    #[test]
    fn prop_jitter_reproducible(seed in any::<u64>(), std_dev in 0.0f64..2.0) {
        let base = ramp(0.0, 1.0, 1.0, 0.01).unwrap();
        let a = jitter(&base, std_dev, &mut rng_from_seed(seed)).unwrap();
        let b = jitter(&base, std_dev, &mut rng_from_seed(seed)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_can_timing_within_window(
        nominal in 0.001f64..1.0,
        jitter_percent in 0.0f64..50.0,
        count in 0usize..300,
        seed in any::<u64>(),
    ) {
        let intervals = can_timing(nominal, jitter_percent, count, &mut rng_from_seed(seed)).unwrap();
        let max_jitter = nominal * jitter_percent / 100.0;
        prop_assert_eq!(intervals.len(), count);
        prop_assert!(intervals
            .iter()
            .all(|&v| (v - nominal).abs() <= max_jitter + 1e-12));
    }
}
