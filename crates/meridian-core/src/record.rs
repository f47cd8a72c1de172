//! Zone records - the per-zone snapshot rendered by one tick
//!
//! A record carries two views of the same instant: a digit string for the
//! digital face and a list of hand values for the analog face.

use serde::{Deserialize, Serialize};

use crate::ZoneId;

/// Sentinel character standing for the AM indicator in digit text
pub const AM_SENTINEL: char = ';';

/// Sentinel character standing for the PM indicator in digit text
pub const PM_SENTINEL: char = '<';

/// Unit carried by one hand of the analog face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandUnit {
    Hours,
    Minutes,
    Seconds,
    /// Any unit name the engine does not know. Entries with this unit draw
    /// nothing.
    #[serde(other)]
    Unrecognized,
}

impl HandUnit {
    /// Number of units in one full turn of the dial
    pub fn modulus(self) -> Option<f64> {
        match self {
            HandUnit::Hours => Some(12.0),
            HandUnit::Minutes | HandUnit::Seconds => Some(60.0),
            HandUnit::Unrecognized => None,
        }
    }
}

/// One hand position, in the hand's own unit (possibly fractional)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandValue {
    pub unit: HandUnit,
    pub value: f64,
}

impl HandValue {
    pub fn new(unit: HandUnit, value: f64) -> Self {
        Self { unit, value }
    }

    pub fn hours(value: f64) -> Self {
        Self::new(HandUnit::Hours, value)
    }

    pub fn minutes(value: f64) -> Self {
        Self::new(HandUnit::Minutes, value)
    }

    pub fn seconds(value: f64) -> Self {
        Self::new(HandUnit::Seconds, value)
    }
}

/// Snapshot of displayable time for one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Stable identity across ticks
    pub zone_id: ZoneId,
    /// Characters drawn left to right: `0-9`, `:`, and the AM/PM sentinels
    pub digits_text: String,
    /// Two or three hand entries; an omitted unit draws no hand
    pub hand_values: Vec<HandValue>,
}

impl ZoneRecord {
    pub fn new(zone_id: impl Into<ZoneId>, digits_text: impl Into<String>, hand_values: Vec<HandValue>) -> Self {
        Self {
            zone_id: zone_id.into(),
            digits_text: digits_text.into(),
            hand_values,
        }
    }

    /// Hand value for a unit, if present
    pub fn hand(&self, unit: HandUnit) -> Option<f64> {
        self.hand_values
            .iter()
            .find(|h| h.unit == unit)
            .map(|h| h.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_unit_deserializes() {
        let hand: HandValue = serde_json::from_str(r#"{"unit":"x","value":3.0}"#).unwrap();
        assert_eq!(hand.unit, HandUnit::Unrecognized);
        assert_eq!(hand.unit.modulus(), None);
    }

    #[test]
    fn test_record_hand_lookup() {
        let record = ZoneRecord::new(
            "utc",
            "12:34",
            vec![HandValue::hours(12.5), HandValue::minutes(34.0)],
        );
        assert_eq!(record.zone_id.as_str(), "UTC");
        assert_eq!(record.hand(HandUnit::Minutes), Some(34.0));
        assert_eq!(record.hand(HandUnit::Seconds), None);
    }
}
