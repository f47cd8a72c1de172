//! Time sources - fresh zone records on demand

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use parking_lot::Mutex;
use tracing::warn;

use meridian_core::{DisplaySettings, HandValue, ZoneId, ZoneRecord, AM_SENTINEL, PM_SENTINEL};

use crate::resolve_zone;

/// Produces the normalized time records rendered by each tick
pub trait TimeSource {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// One record per resolvable zone, in list order
    fn zone_data(&self, zones: &[ZoneId], settings: &DisplaySettings) -> Vec<ZoneRecord> {
        zone_data_at(self.now(), zones, settings)
    }
}

/// Records for every resolvable zone at one instant
pub fn zone_data_at(now: DateTime<Utc>, zones: &[ZoneId], settings: &DisplaySettings) -> Vec<ZoneRecord> {
    zones
        .iter()
        .filter_map(|zone| match resolve_zone(zone) {
            Some(tz) => Some(zone_record(zone, &now.with_timezone(&tz), settings)),
            None => {
                warn!(zone = %zone, "skipping unresolvable time zone");
                None
            }
        })
        .collect()
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Build the record for one zone at a local time
pub fn zone_record<Tz: TimeZone>(
    zone: &ZoneId,
    local: &DateTime<Tz>,
    settings: &DisplaySettings,
) -> ZoneRecord {
    let hour = local.hour();
    let minute = local.minute();
    let second = local.second();

    let mut digits = if settings.use_24_hour {
        format!("{:02}:{:02}", hour, minute)
    } else {
        let twelve = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02}", twelve, minute)
    };
    if settings.show_seconds {
        digits.push_str(&format!(":{:02}", second));
    }
    if !settings.use_24_hour {
        digits.push(if hour < 12 { AM_SENTINEL } else { PM_SENTINEL });
    }

    let mut hands = vec![
        HandValue::hours(f64::from(hour) + f64::from(minute) / 60.0),
        HandValue::minutes(f64::from(minute)),
    ];
    if settings.show_seconds {
        hands.push(HandValue::seconds(f64::from(second)));
    }

    ZoneRecord {
        zone_id: zone.clone(),
        digits_text: digits,
        hand_values: hands,
    }
}

/// Opacity for pulsing elements at a given second: 0.1 on even seconds,
/// 1.1 on odd ones
pub fn pulse_level(second: u32) -> f64 {
    f64::from(second % 2) + 0.1
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time source frozen at an adjustable instant
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        ManualTimeSource {
            now: Mutex::new(now),
        }
    }

    /// Jump to an instant
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Move the clock forward (or backward, for a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::HandUnit;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    fn zones(names: &[&str]) -> Vec<ZoneId> {
        names.iter().map(|n| ZoneId::new(n)).collect()
    }

    #[test]
    fn test_twelve_hour_digits() {
        let source = ManualTimeSource::new(at(13, 5, 9));
        let records = source.zone_data(&zones(&["UTC"]), &DisplaySettings::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].digits_text, "1:05:09<");
    }

    #[test]
    fn test_midnight_is_twelve_am() {
        let source = ManualTimeSource::new(at(0, 30, 0));
        let settings = DisplaySettings {
            show_seconds: false,
            ..DisplaySettings::default()
        };
        let records = source.zone_data(&zones(&["UTC"]), &settings);
        assert_eq!(records[0].digits_text, "12:30;");
    }

    #[test]
    fn test_twenty_four_hour_digits() {
        let source = ManualTimeSource::new(at(7, 8, 9));
        let settings = DisplaySettings {
            use_24_hour: true,
            ..DisplaySettings::default()
        };
        let records = source.zone_data(&zones(&["UTC"]), &settings);
        assert_eq!(records[0].digits_text, "07:08:09");
    }

    #[test]
    fn test_zone_offset_applied() {
        // EST is a fixed UTC-5 zone
        let source = ManualTimeSource::new(at(13, 0, 0));
        let settings = DisplaySettings {
            use_24_hour: true,
            show_seconds: false,
            pulsing: false,
        };
        let records = source.zone_data(&zones(&["UTC", "EST"]), &settings);
        assert_eq!(records[0].digits_text, "13:00");
        assert_eq!(records[1].digits_text, "08:00");
        assert_eq!(records[1].zone_id.as_str(), "EST");
    }

    #[test]
    fn test_hand_values() {
        let source = ManualTimeSource::new(at(15, 30, 45));
        let records = source.zone_data(&zones(&["UTC"]), &DisplaySettings::default());
        let record = &records[0];
        assert_eq!(record.hand(HandUnit::Hours), Some(15.5));
        assert_eq!(record.hand(HandUnit::Minutes), Some(30.0));
        assert_eq!(record.hand(HandUnit::Seconds), Some(45.0));
    }

    #[test]
    fn test_hidden_seconds_drops_hand() {
        let source = ManualTimeSource::new(at(15, 30, 45));
        let settings = DisplaySettings {
            show_seconds: false,
            ..DisplaySettings::default()
        };
        let records = source.zone_data(&zones(&["UTC"]), &settings);
        assert_eq!(records[0].hand_values.len(), 2);
        assert_eq!(records[0].hand(HandUnit::Seconds), None);
        assert_eq!(records[0].digits_text, "3:30<");
    }

    #[test]
    fn test_unresolvable_zone_skipped() {
        let source = ManualTimeSource::new(at(1, 2, 3));
        let records = source.zone_data(&zones(&["NOWHERE", "UTC"]), &DisplaySettings::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].zone_id.as_str(), "UTC");
    }

    #[test]
    fn test_manual_advance() {
        let source = Arc::new(ManualTimeSource::new(at(1, 2, 3)));
        source.advance(Duration::seconds(2));
        assert_eq!(source.now(), at(1, 2, 5));
        source.set(at(9, 0, 0));
        assert_eq!(TimeSource::now(&source), at(9, 0, 0));
    }

    #[test]
    fn test_pulse_level() {
        assert_eq!(pulse_level(0), 0.1);
        assert_eq!(pulse_level(1), 1.1);
        assert_eq!(pulse_level(58), 0.1);
    }
}
