//! Clock controller - the once-per-tick driver
//!
//! The controller owns the document and the card set. Everything outside it
//! talks to it through a [`ControllerHandle`]: settings changes are queued
//! and applied at the start of the next tick, and the rendered page is
//! published after every tick.

use std::time::{Duration, Instant};

use chrono::Timelike;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use meridian_core::{ClockError, ClockResult, DisplaySettings, SettingsEvent, ZoneId};
use meridian_state::{CardSet, ReconcileResult};
use meridian_time::{pulse_level, resolve_zone, zone_data_at, TimeSource, ZoneList};
use meridian_visual::{Document, Surface, SurfaceStats};

use crate::{render_page, ClockConfig};

/// What one tick did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    pub events_applied: usize,
    /// Zone records produced by the time source
    pub records: usize,
    pub reconcile: ReconcileResult,
    /// Pulsing elements whose opacity was written
    pub pulsed: usize,
    /// Surface operations performed during the tick
    pub surface: SurfaceStats,
}

/// Totals over the controller's lifetime
#[derive(Clone, Debug, Default)]
pub struct ControllerStats {
    pub ticks: u64,
    pub events_applied: u64,
    pub cards_created: u64,
    pub cards_removed: u64,
    pub last_tick_duration: Duration,
}

/// Cloneable access to a running controller
#[derive(Clone, Debug)]
pub struct ControllerHandle {
    events: mpsc::UnboundedSender<SettingsEvent>,
    page: watch::Receiver<String>,
    zones: watch::Receiver<Vec<ZoneId>>,
    settings: watch::Receiver<DisplaySettings>,
}

impl ControllerHandle {
    /// Queue a zone for addition. The identifier is checked against the tz
    /// database right away so callers get the error, not the log.
    pub fn add_zone(&self, name: &str) -> ClockResult<ZoneId> {
        let zone = ZoneId::new(name);
        if zone.is_empty() || resolve_zone(&zone).is_none() {
            return Err(ClockError::UnknownZone(name.to_string()));
        }
        self.send(SettingsEvent::AddZone(zone.clone()))?;
        Ok(zone)
    }

    /// Queue a zone for removal
    pub fn remove_zone(&self, name: &str) -> ClockResult<ZoneId> {
        let zone = ZoneId::new(name);
        self.send(SettingsEvent::RemoveZone(zone.clone()))?;
        Ok(zone)
    }

    /// Queue a full replacement of the display settings
    pub fn set_display(&self, settings: DisplaySettings) -> ClockResult<()> {
        self.send(SettingsEvent::Replace(settings))
    }

    pub fn send(&self, event: SettingsEvent) -> ClockResult<()> {
        self.events
            .send(event)
            .map_err(|_| ClockError::Server("clock controller has stopped".into()))
    }

    /// Page rendered by the most recent tick
    pub fn page(&self) -> String {
        self.page.borrow().clone()
    }

    /// Zones as of the most recent tick
    pub fn zones(&self) -> Vec<ZoneId> {
        self.zones.borrow().clone()
    }

    /// Display settings as of the most recent tick
    pub fn settings(&self) -> DisplaySettings {
        *self.settings.borrow()
    }

    /// Wait for the next published page
    pub async fn next_page(&mut self) -> ClockResult<String> {
        self.page
            .changed()
            .await
            .map_err(|_| ClockError::Server("clock controller has stopped".into()))?;
        Ok(self.page.borrow_and_update().clone())
    }
}

/// Drives the card set from a time source
pub struct ClockController<T: TimeSource> {
    source: T,
    zones: ZoneList,
    settings: DisplaySettings,
    document: Document,
    cards: CardSet,
    tick_interval: Duration,
    /// Opacity was written by a previous tick and has not been reset yet
    pulse_active: bool,
    events_tx: mpsc::UnboundedSender<SettingsEvent>,
    events_rx: mpsc::UnboundedReceiver<SettingsEvent>,
    page_tx: watch::Sender<String>,
    zones_tx: watch::Sender<Vec<ZoneId>>,
    settings_tx: watch::Sender<DisplaySettings>,
    stats: ControllerStats,
}

impl<T: TimeSource> ClockController<T> {
    pub fn new(source: T, config: &ClockConfig) -> ClockResult<Self> {
        config.validate()?;
        let zones = config.zone_list()?;
        let settings = config.display;
        let document = Document::new();
        let cards = CardSet::with_layout(document.root(), config.layout());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (page_tx, _) = watch::channel(render_page(&document.render(), &settings));
        let (zones_tx, _) = watch::channel(zones.as_slice().to_vec());
        let (settings_tx, _) = watch::channel(settings);

        Ok(ClockController {
            source,
            zones,
            settings,
            document,
            cards,
            tick_interval: config.tick_interval,
            pulse_active: false,
            events_tx,
            events_rx,
            page_tx,
            zones_tx,
            settings_tx,
            stats: ControllerStats::default(),
        })
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            events: self.events_tx.clone(),
            page: self.page_tx.subscribe(),
            zones: self.zones_tx.subscribe(),
            settings: self.settings_tx.subscribe(),
        }
    }

    /// Run one tick to completion
    pub fn tick(&mut self) -> ClockResult<TickReport> {
        let start = Instant::now();
        self.document.reset_stats();
        self.stats.ticks += 1;

        let events_applied = self.drain_events();

        let now = self.source.now();
        let records = zone_data_at(now, self.zones.as_slice(), &self.settings);
        let reconcile = self.cards.reconcile(&mut self.document, &records)?;

        let pulsed = if self.settings.pulsing {
            self.pulse_active = true;
            self.cards
                .apply_pulse(&mut self.document, Some(pulse_level(now.second())))?
        } else if self.pulse_active {
            self.pulse_active = false;
            self.cards.apply_pulse(&mut self.document, None)?
        } else {
            0
        };

        self.page_tx
            .send_replace(render_page(&self.document.render(), &self.settings));

        self.stats.events_applied += events_applied as u64;
        self.stats.cards_created += u64::from(reconcile.created);
        self.stats.cards_removed += u64::from(reconcile.removed);
        self.stats.last_tick_duration = start.elapsed();

        let report = TickReport {
            tick: self.stats.ticks,
            events_applied,
            records: records.len(),
            reconcile,
            pulsed,
            surface: self.document.stats(),
        };
        trace!(?report, "tick complete");
        Ok(report)
    }

    /// Tick on a fixed interval until cancelled. Ticks that fall behind are
    /// skipped, never queued.
    pub async fn run(mut self, cancel: CancellationToken) -> ClockResult<ControllerStats> {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval = ?self.tick_interval,
            zones = self.zones.len(),
            "clock controller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick()?;
                }
            }
        }

        info!(ticks = self.stats.ticks, "clock controller stopped");
        Ok(self.stats.clone())
    }

    fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        let mut zones_changed = false;
        let mut display_changed = false;

        while let Ok(event) = self.events_rx.try_recv() {
            applied += 1;
            match &event {
                SettingsEvent::AddZone(zone) => match self.zones.add(zone.as_str()) {
                    Ok(added) => {
                        debug!(%zone, added, "zone add applied");
                        zones_changed |= added;
                    }
                    Err(err) => warn!(%zone, %err, "zone add rejected"),
                },
                SettingsEvent::RemoveZone(zone) => {
                    let removed = self.zones.remove(zone.as_str());
                    debug!(%zone, removed, "zone remove applied");
                    zones_changed |= removed;
                }
                _ => {
                    if self.settings.apply(&event) {
                        debug!(settings = ?self.settings, "display settings changed");
                        display_changed = true;
                    }
                }
            }
        }

        if zones_changed {
            self.zones_tx.send_replace(self.zones.as_slice().to_vec());
        }
        if display_changed {
            self.settings_tx.send_replace(self.settings);
        }
        applied
    }

    pub fn zones(&self) -> &ZoneList {
        &self.zones
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cards(&self) -> &CardSet {
        &self.cards
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use meridian_time::ManualTimeSource;

    use super::*;

    fn source() -> Arc<ManualTimeSource> {
        Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 13, 5, 8).unwrap(),
        ))
    }

    fn controller(source: Arc<ManualTimeSource>) -> ClockController<Arc<ManualTimeSource>> {
        ClockController::new(source, &ClockConfig::default()).unwrap()
    }

    #[test]
    fn test_first_tick_creates_default_card() {
        let mut controller = controller(source());
        let report = controller.tick().unwrap();

        assert_eq!(report.tick, 1);
        assert_eq!(report.records, 1);
        assert_eq!(report.reconcile.created, 1);
        assert_eq!(controller.cards().len(), 1);

        let page = controller.handle().page();
        assert!(page.contains("data-zone=\"UTC\""));
    }

    #[test]
    fn test_events_apply_at_tick_boundary() {
        let mut controller = controller(source());
        let handle = controller.handle();
        controller.tick().unwrap();

        handle.add_zone("est").unwrap();
        assert_eq!(handle.zones().len(), 1);
        assert_eq!(controller.cards().len(), 1);

        let report = controller.tick().unwrap();
        assert_eq!(report.events_applied, 1);
        assert_eq!(report.reconcile.created, 1);
        let zones: Vec<String> = handle.zones().iter().map(|z| z.to_string()).collect();
        assert_eq!(zones, vec!["UTC", "EST"]);

        handle.remove_zone("UTC").unwrap();
        let report = controller.tick().unwrap();
        assert_eq!(report.reconcile.removed, 1);
        assert_eq!(controller.cards().zones(), &[ZoneId::new("EST")]);
    }

    #[test]
    fn test_unknown_zone_rejected_by_handle() {
        let controller = controller(source());
        let handle = controller.handle();
        assert!(matches!(
            handle.add_zone("Mars/Olympus"),
            Err(ClockError::UnknownZone(_))
        ));
        assert!(matches!(handle.add_zone("  "), Err(ClockError::UnknownZone(_))));
    }

    #[test]
    fn test_unchanged_time_redraws_only_hands() {
        let mut controller = controller(source());
        controller.tick().unwrap();

        let report = controller.tick().unwrap();
        assert_eq!(report.reconcile.cells_touched, 0);
        assert_eq!(report.surface.appended, 3);
        assert_eq!(report.surface.removed, 3);
        assert_eq!(report.surface.text_writes, 0);
    }

    #[test]
    fn test_one_second_redraws_one_cell() {
        let time = source();
        let mut controller = controller(time.clone());
        controller.tick().unwrap();

        time.advance(chrono::Duration::seconds(1));
        let report = controller.tick().unwrap();
        assert_eq!(report.reconcile.updated, 1);
        assert_eq!(report.reconcile.cells_touched, 1);
    }

    #[test]
    fn test_display_settings_change() {
        let mut controller = controller(source());
        let handle = controller.handle();
        controller.tick().unwrap();

        handle
            .set_display(DisplaySettings {
                use_24_hour: true,
                show_seconds: false,
                pulsing: false,
            })
            .unwrap();
        controller.tick().unwrap();

        assert!(handle.settings().use_24_hour);
        let card = controller.cards().iter().next().unwrap();
        assert_eq!(card.digital().cells().len(), 5);
        assert_eq!(card.analog().hands().len(), 2);
    }

    #[test]
    fn test_pulse_then_reset_once() {
        let mut controller = controller(source());
        let handle = controller.handle();
        controller.tick().unwrap();

        handle.send(SettingsEvent::SetPulsing(true)).unwrap();
        let report = controller.tick().unwrap();
        // "1:05:08<" has two colons; second 8 is even
        assert_eq!(report.pulsed, 2);
        assert!(handle.page().contains("opacity:0.1"));

        handle.send(SettingsEvent::SetPulsing(false)).unwrap();
        let report = controller.tick().unwrap();
        assert_eq!(report.pulsed, 2);
        assert!(!handle.page().contains("opacity:0.1"));

        let report = controller.tick().unwrap();
        assert_eq!(report.pulsed, 0);
    }

    #[test]
    fn test_send_after_controller_dropped() {
        let handle = controller(source()).handle();
        assert!(matches!(
            handle.send(SettingsEvent::SetPulsing(true)),
            Err(ClockError::Server(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_cancelled() {
        let controller = controller(source());
        let mut handle = controller.handle();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(controller.run(cancel.clone()));

        let page = handle.next_page().await.unwrap();
        assert!(page.contains("data-zone=\"UTC\""));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        cancel.cancel();
        let stats = task.await.unwrap().unwrap();
        assert!(stats.ticks >= 3);
        assert_eq!(stats.cards_created, 1);
    }
}
