//! Churn simulator - random zone, settings and clock changes
//!
//! Every step applies one random change and ticks the engine. The run is
//! valid when no tick ever broke a card set invariant.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use meridian_core::ClockResult;

use crate::{Scenario, Violation};

/// Zones the simulator draws from. The last one does not resolve.
pub const ZONE_POOL: &[&str] = &[
    "UTC",
    "EST",
    "Europe/Paris",
    "Asia/Tokyo",
    "America/New_York",
    "Australia/Sydney",
    "Asia/Kolkata",
    "America/St_Johns",
    "Mars/Olympus_Mons",
];

/// Churn simulator configuration
#[derive(Clone, Debug)]
pub struct ChurnConfig {
    /// Number of ticks
    pub steps: usize,
    /// Probability of adding a zone on a step
    pub add_prob: f64,
    /// Probability of removing a zone on a step
    pub remove_prob: f64,
    /// Probability of flipping a display setting on a step
    pub settings_prob: f64,
    /// Probability of a clock jump instead of a one-second advance
    pub jump_prob: f64,
    /// Largest clock jump, in seconds, either direction
    pub max_jump_secs: i64,
    /// Random seed
    pub seed: u64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        ChurnConfig {
            steps: 500,
            add_prob: 0.1,
            remove_prob: 0.08,
            settings_prob: 0.05,
            jump_prob: 0.05,
            max_jump_secs: 86_400,
            seed: 42,
        }
    }
}

impl ChurnConfig {
    /// Light churn for quick tests
    pub fn light() -> Self {
        ChurnConfig {
            steps: 100,
            ..ChurnConfig::default()
        }
    }

    /// Heavy churn: frequent changes, long jumps
    pub fn heavy() -> Self {
        ChurnConfig {
            steps: 2_000,
            add_prob: 0.3,
            remove_prob: 0.25,
            settings_prob: 0.2,
            jump_prob: 0.2,
            max_jump_secs: 86_400 * 400,
            seed: 42,
        }
    }
}

/// Totals over a churn run
#[derive(Debug, Default)]
pub struct ChurnResult {
    pub steps: usize,
    pub created: u64,
    pub removed: u64,
    pub duplicates: u64,
    pub cells_touched: u64,
    /// Cell opacity writes from the colon pulse
    pub pulsed: u64,
    /// Step number and what broke
    pub violations: Vec<(usize, Violation)>,
}

impl ChurnResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

pub struct ChurnSimulator {
    config: ChurnConfig,
    rng: StdRng,
    scenario: Scenario,
}

impl ChurnSimulator {
    pub fn new(config: ChurnConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let scenario = Scenario::new(Self::epoch()).with_zones(&["UTC"]);
        ChurnSimulator {
            config,
            rng,
            scenario,
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn run(&mut self) -> ClockResult<ChurnResult> {
        let mut result = ChurnResult::default();

        for step in 0..self.config.steps {
            self.mutate();
            let outcome = self.scenario.tick()?;

            result.steps += 1;
            result.created += u64::from(outcome.result.created);
            result.removed += u64::from(outcome.result.removed);
            result.duplicates += u64::from(outcome.result.duplicates);
            result.cells_touched += u64::from(outcome.result.cells_touched);
            result.pulsed += outcome.pulsed as u64;
            result
                .violations
                .extend(outcome.violations.into_iter().map(|v| (step, v)));
        }

        debug!(
            steps = result.steps,
            created = result.created,
            removed = result.removed,
            violations = result.violations.len(),
            "churn run complete"
        );
        Ok(result)
    }

    fn mutate(&mut self) {
        if self.rng.gen_bool(self.config.add_prob) {
            let zone = ZONE_POOL[self.rng.gen_range(0..ZONE_POOL.len())];
            self.scenario.add_zone(zone);
        }
        if self.rng.gen_bool(self.config.remove_prob) {
            let zone = ZONE_POOL[self.rng.gen_range(0..ZONE_POOL.len())];
            self.scenario.remove_zone(zone);
        }
        if self.rng.gen_bool(self.config.settings_prob) {
            let settings = self.scenario.settings_mut();
            match self.rng.gen_range(0..3) {
                0 => settings.use_24_hour = !settings.use_24_hour,
                1 => settings.show_seconds = !settings.show_seconds,
                _ => settings.pulsing = !settings.pulsing,
            }
        }
        if self.rng.gen_bool(self.config.jump_prob) {
            let max = self.config.max_jump_secs;
            self.scenario
                .advance(Duration::seconds(self.rng.gen_range(-max..=max)));
        } else {
            self.scenario.advance(Duration::seconds(1));
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_churn() {
        let result = ChurnSimulator::new(ChurnConfig::light()).run().unwrap();
        assert_eq!(result.steps, 100);
        assert!(result.is_valid(), "{:?}", result.violations);
    }

    #[test]
    fn test_heavy_churn() {
        let mut simulator = ChurnSimulator::new(ChurnConfig::heavy());
        let result = simulator.run().unwrap();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert!(result.created > 0);
        assert!(result.duplicates > 0);
        assert!(result.pulsed > 0);
        assert_eq!(simulator.scenario().ticks(), 2_000);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = ChurnSimulator::new(ChurnConfig::light()).run().unwrap();
        let b = ChurnSimulator::new(ChurnConfig::light()).run().unwrap();
        assert_eq!((a.created, a.removed, a.cells_touched), (b.created, b.removed, b.cells_touched));
    }
}
