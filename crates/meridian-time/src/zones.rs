//! Zone list - the ordered set of zones to display
//!
//! Identifiers are upper-cased on the way in and de-duplicated, so the list
//! handed to a time source never contains the same zone twice.

use chrono_tz::Tz;

use meridian_core::{ClockError, ClockResult, ZoneId};

/// Resolve a zone identifier against the tz database, ignoring case
pub fn resolve_zone(zone: &ZoneId) -> Option<Tz> {
    Tz::from_str_insensitive(zone.as_str()).ok()
}

/// Ordered, de-duplicated list of configured zones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneList {
    zones: Vec<ZoneId>,
}

impl ZoneList {
    /// An empty zone list
    pub fn empty() -> Self {
        ZoneList { zones: Vec::new() }
    }

    /// Build a list from raw identifiers, validating each one
    pub fn from_names<I, S>(names: I) -> ClockResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = ZoneList::empty();
        for name in names {
            list.add(name.as_ref())?;
        }
        Ok(list)
    }

    /// Add a zone at the end of the list.
    ///
    /// Returns `Ok(false)` if the zone is already present.
    pub fn add(&mut self, name: &str) -> ClockResult<bool> {
        let zone = ZoneId::new(name);
        if zone.is_empty() || resolve_zone(&zone).is_none() {
            return Err(ClockError::UnknownZone(name.to_string()));
        }
        if self.zones.contains(&zone) {
            return Ok(false);
        }
        self.zones.push(zone);
        Ok(true)
    }

    /// Remove a zone. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let zone = ZoneId::new(name);
        let before = self.zones.len();
        self.zones.retain(|z| *z != zone);
        self.zones.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zones.contains(&ZoneId::new(name))
    }

    pub fn as_slice(&self) -> &[ZoneId] {
        &self.zones
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for ZoneList {
    fn default() -> Self {
        ZoneList {
            zones: vec![ZoneId::new("UTC")],
        }
    }
}
