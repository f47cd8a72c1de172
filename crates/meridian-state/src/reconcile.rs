//! Card set reconciliation
//!
//! Cards are keyed by zone id. New zones get a card appended in record
//! order, known zones are updated in place, and zones no longer present
//! are destroyed. Existing cards are never moved.

use std::collections::{HashMap, HashSet};

use meridian_core::{ClockResult, NodeId, ZoneId, ZoneRecord};
use meridian_visual::Surface;
use tracing::{debug, trace, warn};

use crate::{Card, CardLayout};

/// Reconciliation result for one batch of zone records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    pub created: u32,
    pub updated: u32,
    pub removed: u32,
    /// Records ignored because an earlier record had the same zone id
    pub duplicates: u32,
    /// Digit cells redrawn, created or removed across all updated cards
    pub cells_touched: u32,
}

/// The live set of cards under one container
#[derive(Debug)]
pub struct CardSet {
    container: NodeId,
    layout: CardLayout,
    cards: HashMap<ZoneId, Card>,
    /// Display order
    order: Vec<ZoneId>,
}

impl CardSet {
    pub fn new(container: NodeId) -> Self {
        Self::with_layout(container, CardLayout::default())
    }

    pub fn with_layout(container: NodeId, layout: CardLayout) -> Self {
        CardSet {
            container,
            layout,
            cards: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Reconcile the rendered cards with a tick's zone records.
    ///
    /// When several records share a zone id the first one wins and the rest
    /// are ignored.
    pub fn reconcile<S: Surface>(
        &mut self,
        surface: &mut S,
        records: &[ZoneRecord],
    ) -> ClockResult<ReconcileResult> {
        let mut result = ReconcileResult::default();

        let mut seen = HashSet::with_capacity(records.len());
        let mut incoming = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(&record.zone_id) {
                incoming.push(record);
            } else {
                warn!(zone = %record.zone_id, "duplicate zone record ignored");
                result.duplicates += 1;
            }
        }

        // Exit: zones only in the old set
        let stale: Vec<ZoneId> = self
            .order
            .iter()
            .filter(|zone| !seen.contains(zone))
            .cloned()
            .collect();
        for zone in &stale {
            if let Some(card) = self.cards.remove(zone) {
                card.destroy(surface)?;
                result.removed += 1;
                debug!(zone = %zone, "card removed");
            }
        }
        self.order.retain(|zone| self.cards.contains_key(zone));

        // Update and enter, in record order
        for record in incoming {
            match self.cards.get_mut(&record.zone_id) {
                Some(card) => {
                    let update = card.update(surface, record)?;
                    result.updated += 1;
                    result.cells_touched +=
                        (update.digits.redrawn + update.digits.created + update.digits.removed) as u32;
                }
                None => {
                    let card = Card::create(surface, self.container, record, &self.layout)?;
                    debug!(zone = %record.zone_id, node = %card.node(), "card created");
                    self.order.push(record.zone_id.clone());
                    self.cards.insert(record.zone_id.clone(), card);
                    result.created += 1;
                }
            }
        }

        trace!(?result, cards = self.order.len(), "card set reconciled");
        Ok(result)
    }

    /// Set the opacity of every card's pulsing elements. `None` restores
    /// full opacity.
    pub fn apply_pulse<S: Surface>(&mut self, surface: &mut S, opacity: Option<f64>) -> ClockResult<usize> {
        let mut touched = 0;
        for zone in &self.order {
            if let Some(card) = self.cards.get_mut(zone) {
                touched += card.set_pulse(surface, opacity)?;
            }
        }
        Ok(touched)
    }

    pub fn get(&self, zone: &ZoneId) -> Option<&Card> {
        self.cards.get(zone)
    }

    /// Zone ids in display order
    pub fn zones(&self) -> &[ZoneId] {
        &self.order
    }

    /// Cards in display order
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|zone| self.cards.get(zone))
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
