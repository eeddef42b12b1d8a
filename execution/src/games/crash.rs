//! Crash multiplier generation.
//!
//! A crash point is derived from a single uniform draw `r`:
//!
//! ```text
//! x     = -ln(1 - r) / lambda
//! raw   = min + (max - min) * (1 - e^(-x / saturation))
//! final = max(1.0, raw * (1 - house_edge))
//! ```
//!
//! The exponential variate concentrates mass near zero, so most rounds crash close to
//! `min_crash`; the saturating map only approaches `max_crash` asymptotically. The result is
//! non-decreasing in `r`.

use super::distribution::CrashObserver;
use crate::rng::{EntropyRng, RandomSource};
use arcade_types::{ConfigError, CrashOutcome, DistributionConfig, CRASH_FLOOR};
use tracing::debug;

/// Samples crash points from a validated [`DistributionConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrashPointGenerator {
    config: DistributionConfig,
}

impl CrashPointGenerator {
    pub fn new(config: DistributionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    /// Crash point for a given uniform draw.
    pub fn crash_point_for_draw(&self, draw: f64) -> f64 {
        let DistributionConfig {
            min_crash,
            max_crash,
            lambda,
            house_edge,
            saturation,
        } = self.config;
        let exponential = -(1.0 - draw).ln() / lambda;
        let raw = min_crash + (max_crash - min_crash) * (1.0 - (-exponential / saturation).exp());
        let adjusted = raw * (1.0 - house_edge);
        // NaN draws collapse to the floor.
        adjusted.max(CRASH_FLOOR)
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CrashOutcome {
        self.sample(rng).0
    }

    /// Like [`Self::generate`], additionally reporting the outcome to `observer`.
    ///
    /// The observer only sees the result; it cannot change it.
    pub fn generate_observed<R, O>(&self, rng: &mut R, observer: &mut O) -> CrashOutcome
    where
        R: RandomSource + ?Sized,
        O: CrashObserver + ?Sized,
    {
        let (outcome, draw) = self.sample(rng);
        observer.observe(&outcome, draw);
        outcome
    }

    fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> (CrashOutcome, f64) {
        let draw = rng.next_unit();
        let value = self.crash_point_for_draw(draw);
        debug!(
            draw,
            exponential = -(1.0 - draw).ln() / self.config.lambda,
            crash_point = value,
            "generated crash point"
        );
        (CrashOutcome { value }, draw)
    }
}

/// Validate `config` and sample one crash point from `rng`.
pub fn generate_crash_point<R: RandomSource + ?Sized>(
    config: &DistributionConfig,
    rng: &mut R,
) -> Result<f64, ConfigError> {
    Ok(CrashPointGenerator::new(*config)?.generate(rng).value)
}

/// Validate `config` and sample one crash point from thread-local entropy.
pub fn generate_crash_point_random(config: &DistributionConfig) -> Result<f64, ConfigError> {
    generate_crash_point(config, &mut EntropyRng::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::distribution::DistributionStats;
    use crate::rng::{FixedDraws, GameRng};
    use arcade_types::CrashBucket;
    use proptest::prelude::*;

    fn default_generator() -> CrashPointGenerator {
        CrashPointGenerator::new(DistributionConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DistributionConfig {
            lambda: -1.0,
            ..DistributionConfig::default()
        };
        assert!(matches!(
            CrashPointGenerator::new(config),
            Err(ConfigError::NonPositiveLambda { .. })
        ));
        assert!(generate_crash_point_random(&config).is_err());

        let config = DistributionConfig {
            max_crash: 0.5,
            ..DistributionConfig::default()
        };
        assert!(matches!(
            generate_crash_point(&config, &mut GameRng::new(0, 0)),
            Err(ConfigError::MaxCrashNotAboveMin { .. })
        ));
    }

    #[test]
    fn test_zero_draw_is_floor_adjusted_minimum() {
        let generator = default_generator();
        // 1.0 * 0.9 clamps to 1.0.
        assert_eq!(generator.crash_point_for_draw(0.0), 1.0);

        let config = DistributionConfig {
            min_crash: 2.0,
            ..DistributionConfig::default()
        };
        let generator = CrashPointGenerator::new(config).unwrap();
        assert!((generator.crash_point_for_draw(0.0) - 1.8).abs() < 1e-12);
        assert_eq!(generator.crash_point_for_draw(0.0), config.lowest_outcome());
    }

    #[test]
    fn test_draw_near_one_approaches_ceiling() {
        let generator = default_generator();
        let ceiling = generator.config().outcome_ceiling();
        let near = generator.crash_point_for_draw(1.0 - f64::EPSILON);
        assert!(near < ceiling);
        // x = 36.04/0.5 = 72 ⇒ 1 - e^(-1.44) ≈ 0.763, so the top is still well below 18.
        assert!(near > 13.0, "got {near}");

        // A gentler saturation gets arbitrarily close.
        let config = DistributionConfig {
            saturation: 0.5,
            ..DistributionConfig::default()
        };
        let generator = CrashPointGenerator::new(config).unwrap();
        let near = generator.crash_point_for_draw(1.0 - f64::EPSILON);
        assert!((ceiling - near).abs() < 1e-6, "got {near}");
    }

    #[test]
    fn test_matches_reference_values() {
        let generator = default_generator();
        // r = 0.5: x = ln 2 / 0.5, raw = 1 + 19 * (1 - e^(-x/50)).
        let x = 2.0f64.ln() / 0.5;
        let expected = ((1.0 + 19.0 * (1.0 - (-x / 50.0).exp())) * 0.9).max(1.0);
        assert!((generator.crash_point_for_draw(0.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_exactly_one_saturates() {
        // Only reachable through a hand-built source; the map stays finite.
        let generator = default_generator();
        let value = generator.crash_point_for_draw(1.0);
        assert!((value - 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_draw_collapses_to_floor() {
        let generator = default_generator();
        assert_eq!(generator.crash_point_for_draw(f64::NAN), 1.0);
    }

    #[test]
    fn test_monotonic_over_dense_grid() {
        let generator = default_generator();
        let mut previous = generator.crash_point_for_draw(0.0);
        for i in 1..100_000 {
            let draw = i as f64 / 100_000.0;
            let value = generator.crash_point_for_draw(draw);
            assert!(value >= previous, "decreased at r={draw}");
            previous = value;
        }
    }

    #[test]
    fn test_seeded_sequences_are_reproducible() {
        let generator = default_generator();
        let mut a = GameRng::new(1234, 0);
        let mut b = GameRng::new(1234, 0);
        let xs: Vec<f64> = (0..100).map(|_| generator.generate(&mut a).value).collect();
        let ys: Vec<f64> = (0..100).map(|_| generator.generate(&mut b).value).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fixed_draws_drive_outcome() {
        let generator = default_generator();
        let mut draws = FixedDraws::new(vec![0.0, 0.5]).unwrap();
        assert_eq!(generator.generate(&mut draws).value, 1.0);
        assert_eq!(
            generator.generate(&mut draws).value,
            generator.crash_point_for_draw(0.5)
        );
    }

    #[test]
    fn test_observer_sees_returned_value() {
        let generator = default_generator();
        let mut plain = GameRng::new(5, 0);
        let mut observed = GameRng::new(5, 0);
        let mut stats = DistributionStats::new(0);
        for _ in 0..1_000 {
            let expected = generator.generate(&mut plain);
            let got = generator.generate_observed(&mut observed, &mut stats);
            assert_eq!(expected, got);
        }
        assert_eq!(stats.total(), 1_000);
    }

    #[test]
    fn test_distribution_skews_low() {
        let generator = default_generator();
        let mut rng = GameRng::new(2024, 0);
        let mut stats = DistributionStats::new(0);
        for _ in 0..100_000 {
            let outcome = generator.generate_observed(&mut rng, &mut stats);
            assert!(outcome.value >= 1.0);
        }
        let low = stats.fraction(CrashBucket::Low);
        let very_high = stats.fraction(CrashBucket::VeryHigh);
        // Roughly 36% of rounds crash under 1.2x and under 4% reach 3.0x.
        assert!(low > very_high * 5.0, "low={low} very_high={very_high}");
        assert!((0.33..0.39).contains(&low), "low={low}");
        assert!(stats.max_observed() < 14.0);
    }

    #[test]
    fn test_generate_crash_point_random_respects_floor() {
        let config = DistributionConfig::default();
        for _ in 0..1_000 {
            assert!(generate_crash_point_random(&config).unwrap() >= 1.0);
        }
    }

    proptest! {
        #[test]
        fn test_floor_holds_for_valid_configs(
            min_crash in 1.0f64..5.0,
            spread in 0.01f64..100.0,
            lambda in 0.01f64..5.0,
            house_edge in 0.0f64..0.99,
            saturation in 0.1f64..200.0,
            draw in 0.0f64..1.0,
        ) {
            let config = DistributionConfig {
                min_crash,
                max_crash: min_crash + spread,
                lambda,
                house_edge,
                saturation,
            };
            let generator = CrashPointGenerator::new(config).unwrap();
            let value = generator.crash_point_for_draw(draw);
            prop_assert!(value >= 1.0);
            prop_assert!(value <= config.outcome_ceiling() + 1e-9);
        }

        #[test]
        fn test_non_decreasing_in_draw(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let generator = default_generator();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(generator.crash_point_for_draw(lo) <= generator.crash_point_for_draw(hi));
        }
    }
}
