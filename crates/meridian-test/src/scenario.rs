//! Scenario harness - the engine stepped through manual time

use chrono::{DateTime, Duration, Timelike, Utc};
use tracing::trace;

use meridian_core::{ClockResult, DisplaySettings, ZoneId, ZoneRecord};
use meridian_state::{CardSet, ReconcileResult};
use meridian_time::{pulse_level, zone_data_at, ManualTimeSource, TimeSource};
use meridian_visual::{Document, Surface, SurfaceStats};

use crate::{check_card_set, check_pulse, Violation};

/// Outcome of one scenario tick
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub records: Vec<ZoneRecord>,
    pub result: ReconcileResult,
    /// Pulsing cells whose opacity was written
    pub pulsed: usize,
    pub surface: SurfaceStats,
    pub violations: Vec<Violation>,
}

impl StepOutcome {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A document, a card set and a manual clock
///
/// Zones are kept as a raw list, so scenarios can feed duplicates and
/// unresolvable identifiers straight to the time source.
pub struct Scenario {
    source: ManualTimeSource,
    zones: Vec<ZoneId>,
    settings: DisplaySettings,
    doc: Document,
    cards: CardSet,
    /// Opacity was written by an earlier tick and not reset yet
    pulse_active: bool,
    ticks: u64,
}

impl Scenario {
    pub fn new(start: DateTime<Utc>) -> Self {
        let doc = Document::new();
        let cards = CardSet::new(doc.root());
        Scenario {
            source: ManualTimeSource::new(start),
            zones: Vec::new(),
            settings: DisplaySettings::default(),
            doc,
            cards,
            pulse_active: false,
            ticks: 0,
        }
    }

    pub fn with_zones(mut self, zones: &[&str]) -> Self {
        self.set_zones(zones);
        self
    }

    pub fn set_zones(&mut self, zones: &[&str]) {
        self.zones = zones.iter().map(|z| ZoneId::new(z)).collect();
    }

    pub fn add_zone(&mut self, zone: &str) {
        self.zones.push(ZoneId::new(zone));
    }

    pub fn remove_zone(&mut self, zone: &str) {
        let zone = ZoneId::new(zone);
        self.zones.retain(|z| *z != zone);
    }

    pub fn settings_mut(&mut self) -> &mut DisplaySettings {
        &mut self.settings
    }

    pub fn advance(&mut self, by: Duration) {
        self.source.advance(by);
    }

    pub fn set_time(&mut self, now: DateTime<Utc>) {
        self.source.set(now);
    }

    /// Reconcile against fresh records, pulse, and check every invariant
    pub fn tick(&mut self) -> ClockResult<StepOutcome> {
        self.ticks += 1;
        self.doc.reset_stats();

        let now = self.source.now();
        let records = zone_data_at(now, &self.zones, &self.settings);
        let result = self.cards.reconcile(&mut self.doc, &records)?;

        let opacity = self.settings.pulsing.then(|| pulse_level(now.second()));
        let pulsed = if opacity.is_some() || self.pulse_active {
            self.pulse_active = opacity.is_some();
            self.cards.apply_pulse(&mut self.doc, opacity)?
        } else {
            0
        };

        let mut violations = check_card_set(&self.doc, &self.cards, &records);
        violations.extend(check_pulse(&self.doc, &self.cards, opacity));
        trace!(tick = self.ticks, ?result, violations = violations.len(), "scenario tick");

        Ok(StepOutcome {
            records,
            result,
            pulsed,
            surface: self.doc.stats(),
            violations,
        })
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn cards(&self) -> &CardSet {
        &self.cards
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 4, h, m, s).unwrap()
    }

    fn digits(scenario: &Scenario, zone: &str) -> String {
        let card = scenario.cards().get(&ZoneId::new(zone)).unwrap();
        card.digital().cells().iter().map(|c| c.character).collect()
    }

    #[test]
    fn test_add_then_drop_zone() {
        let mut scenario = Scenario::new(at(12, 0, 0)).with_zones(&["UTC"]);
        let step = scenario.tick().unwrap();
        assert_eq!(step.result.created, 1);
        assert!(step.is_valid());

        scenario.add_zone("EST");
        let step = scenario.tick().unwrap();
        assert_eq!((step.result.created, step.result.updated), (1, 1));
        assert!(step.is_valid());

        scenario.remove_zone("UTC");
        let step = scenario.tick().unwrap();
        assert_eq!((step.result.removed, step.result.updated), (1, 1));
        assert!(step.is_valid());
        assert_eq!(scenario.cards().zones(), &[ZoneId::new("EST")]);
    }

    #[test]
    fn test_twelve_hour_rollover_shifts_cells() {
        let mut scenario = Scenario::new(at(12, 59, 59)).with_zones(&["UTC"]);
        scenario.tick().unwrap();
        assert_eq!(digits(&scenario, "UTC"), "12:59:59<");

        scenario.advance(Duration::seconds(1));
        let step = scenario.tick().unwrap();
        assert!(step.is_valid());
        assert_eq!(digits(&scenario, "UTC"), "1:00:00<");
        assert_eq!(step.result.cells_touched, 8);
    }

    #[test]
    fn test_dst_jump() {
        let mut scenario =
            Scenario::new(Utc.with_ymd_and_hms(2024, 3, 31, 0, 59, 59).unwrap()).with_zones(&["Europe/Paris"]);
        scenario.settings_mut().use_24_hour = true;
        scenario.tick().unwrap();
        assert_eq!(digits(&scenario, "EUROPE/PARIS"), "01:59:59");

        scenario.advance(Duration::seconds(1));
        let step = scenario.tick().unwrap();
        assert!(step.is_valid());
        assert_eq!(digits(&scenario, "EUROPE/PARIS"), "03:00:00");
    }

    #[test]
    fn test_toggle_seconds() {
        let mut scenario = Scenario::new(at(8, 15, 42)).with_zones(&["UTC", "Asia/Tokyo"]);
        scenario.tick().unwrap();

        scenario.settings_mut().show_seconds = false;
        let step = scenario.tick().unwrap();
        assert!(step.is_valid());
        assert_eq!(digits(&scenario, "UTC"), "8:15;");
        assert_eq!(digits(&scenario, "ASIA/TOKYO"), "5:15<");

        scenario.settings_mut().show_seconds = true;
        let step = scenario.tick().unwrap();
        assert!(step.is_valid());
        assert_eq!(digits(&scenario, "UTC"), "8:15:42;");
    }

    #[test]
    fn test_unknown_and_duplicate_zones() {
        let mut scenario = Scenario::new(at(0, 0, 0)).with_zones(&["UTC", "Atlantis/Capital", "utc"]);
        let step = scenario.tick().unwrap();
        assert_eq!(step.records.len(), 2);
        assert_eq!(step.result.created, 1);
        assert_eq!(step.result.duplicates, 1);
        assert!(step.is_valid());
    }

    #[test]
    fn test_pulse_follows_seconds_and_resets() {
        let mut scenario = Scenario::new(at(10, 20, 30)).with_zones(&["UTC"]);
        scenario.tick().unwrap();

        scenario.settings_mut().pulsing = true;
        let step = scenario.tick().unwrap();
        assert_eq!(step.pulsed, 2);
        assert!(step.is_valid(), "{:?}", step.violations);
        assert!(scenario.doc().render().contains("opacity:0.1"));

        scenario.advance(Duration::seconds(1));
        let step = scenario.tick().unwrap();
        assert!(step.is_valid(), "{:?}", step.violations);
        assert!(scenario.doc().render().contains("opacity:1.1"));

        scenario.settings_mut().pulsing = false;
        let step = scenario.tick().unwrap();
        assert_eq!(step.pulsed, 2);
        assert!(step.is_valid(), "{:?}", step.violations);

        let step = scenario.tick().unwrap();
        assert_eq!(step.pulsed, 0);
        assert!(step.is_valid(), "{:?}", step.violations);
    }

    #[test]
    fn test_clearing_all_zones_empties_document() {
        let mut scenario = Scenario::new(at(0, 0, 0)).with_zones(&["UTC", "EST"]);
        scenario.tick().unwrap();

        scenario.set_zones(&[]);
        let step = scenario.tick().unwrap();
        assert_eq!(step.result.removed, 2);
        assert!(scenario.cards().is_empty());
        assert!(scenario.doc().is_empty());
    }
}
