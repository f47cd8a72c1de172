//! Runtime configuration

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use meridian_core::{ClockError, ClockResult, DisplaySettings};
use meridian_state::CardLayout;
use meridian_time::ZoneList;
use meridian_visual::DialOptions;

/// Everything a clock process needs to start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Zone identifiers, in display order
    pub zones: Vec<String>,
    pub display: DisplaySettings,
    /// Time between ticks, as a humantime string (`"1s"`, `"500ms"`)
    #[serde(with = "humantime_duration")]
    pub tick_interval: Duration,
    /// Address of the page server
    pub bind: SocketAddr,
    pub analog_diameter: f64,
    pub digital_width: f64,
    /// Draw roman numerals on the dials
    pub numerals: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            zones: vec!["UTC".to_string()],
            display: DisplaySettings::default(),
            tick_interval: Duration::from_secs(1),
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            analog_diameter: 200.0,
            digital_width: 200.0,
            numerals: true,
        }
    }
}

impl ClockConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ClockResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
            .map_err(|e| ClockError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(contents: &str) -> ClockResult<Self> {
        serde_json::from_str(contents).map_err(|e| ClockError::Config(e.to_string()))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ClockResult<()> {
        if self.tick_interval.is_zero() {
            return Err(ClockError::Config("tick_interval must be non-zero".into()));
        }
        if !is_positive(self.analog_diameter) || !is_positive(self.digital_width) {
            return Err(ClockError::Config("face sizes must be positive".into()));
        }
        self.zone_list().map(|_| ())
    }

    /// Validated, normalized zone list
    pub fn zone_list(&self) -> ClockResult<ZoneList> {
        ZoneList::from_names(&self.zones)
    }

    pub fn layout(&self) -> CardLayout {
        CardLayout {
            dial: DialOptions {
                diameter: self.analog_diameter,
                numerals: self.numerals,
            },
            digital_width: self.digital_width,
            ..CardLayout::default()
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

mod humantime_duration {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
