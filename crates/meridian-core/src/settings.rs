//! Display settings and the discrete events that change them

use serde::{Deserialize, Serialize};

use crate::ZoneId;

/// How every clock face is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// 24-hour digits instead of 12-hour digits with an AM/PM indicator
    pub use_24_hour: bool,
    /// Show seconds digits and the seconds hand
    pub show_seconds: bool,
    /// Blink the colons of the digital faces once per second
    pub pulsing: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            use_24_hour: false,
            show_seconds: true,
            pulsing: false,
        }
    }
}

/// A configuration change, applied at the next tick boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    AddZone(ZoneId),
    RemoveZone(ZoneId),
    SetUse24Hour(bool),
    SetShowSeconds(bool),
    SetPulsing(bool),
    /// Replace all display settings at once
    Replace(DisplaySettings),
}

impl DisplaySettings {
    /// Apply a display event. Zone events are not display settings and are
    /// ignored here. Returns whether anything changed.
    pub fn apply(&mut self, event: &SettingsEvent) -> bool {
        let before = *self;
        match event {
            SettingsEvent::SetUse24Hour(v) => self.use_24_hour = *v,
            SettingsEvent::SetShowSeconds(v) => self.show_seconds = *v,
            SettingsEvent::SetPulsing(v) => self.pulsing = *v,
            SettingsEvent::Replace(settings) => *self = *settings,
            SettingsEvent::AddZone(_) | SettingsEvent::RemoveZone(_) => {}
        }
        before != *self
    }
}
