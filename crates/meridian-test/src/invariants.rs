//! Structural invariants of a reconciled card set
//!
//! After every reconcile the document must look exactly as if it had been
//! drawn from scratch for the same records, modulo card order.

use std::collections::HashSet;

use meridian_core::{HandUnit, NodeId, ZoneId, ZoneRecord};
use meridian_state::{Card, CardSet};
use meridian_visual::{layout_cells, num, Document, SegmentGlyphTable};

/// A broken invariant
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A zone has a card but no record, or a record but no card
    CardSetMismatch { missing: Vec<ZoneId>, extra: Vec<ZoneId> },
    /// Container children differ from the cards, in order
    ContainerMismatch,
    /// Header text differs from the zone id
    Header { zone: ZoneId, text: Option<String> },
    /// Drawn cells differ from a fresh layout of the digit text
    Cells { zone: ZoneId, expected: String, drawn: String },
    /// A cell group holds the wrong number of primitives
    Primitives { zone: ZoneId, position: usize, expected: usize, drawn: usize },
    /// Hand count differs from the recognized hand values
    Hands { zone: ZoneId, expected: usize, drawn: usize },
    /// Nodes exist that are not reachable from the root
    Orphans { count: usize },
    /// A cell group carries the wrong opacity
    Opacity { zone: ZoneId, position: usize, expected: String, found: Option<String> },
}

/// Check `cards` against the records of the tick that produced them
pub fn check_card_set(doc: &Document, cards: &CardSet, records: &[ZoneRecord]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    let first: Vec<&ZoneRecord> = records.iter().filter(|r| seen.insert(&r.zone_id)).collect();

    let card_zones: HashSet<&ZoneId> = cards.zones().iter().collect();
    let missing: Vec<ZoneId> = first
        .iter()
        .filter(|r| !card_zones.contains(&r.zone_id))
        .map(|r| r.zone_id.clone())
        .collect();
    let extra: Vec<ZoneId> = cards
        .zones()
        .iter()
        .filter(|z| !seen.contains(z))
        .cloned()
        .collect();
    if !missing.is_empty() || !extra.is_empty() {
        violations.push(Violation::CardSetMismatch { missing, extra });
    }

    let card_nodes: Vec<NodeId> = cards.iter().map(Card::node).collect();
    if doc.children(cards.container()).unwrap_or(&[]) != card_nodes.as_slice() {
        violations.push(Violation::ContainerMismatch);
    }

    for record in first {
        if let Some(card) = cards.get(&record.zone_id) {
            check_card(doc, card, record, &mut violations);
        }
    }

    let reachable = doc.descendants(NodeId::ROOT).len() + 1;
    if reachable != doc.len() {
        violations.push(Violation::Orphans {
            count: doc.len() - reachable,
        });
    }

    violations
}

/// Check cell opacity after a pulse. Colon cells carry `opacity`, every
/// other cell full opacity; `None` means pulsing is off.
pub fn check_pulse(doc: &Document, cards: &CardSet, opacity: Option<f64>) -> Vec<Violation> {
    let pulsed = format!("opacity:{}", num(opacity.unwrap_or(1.0)));
    let mut violations = Vec::new();

    for card in cards.iter() {
        let groups = doc.find_by_class(card.digital().node(), "digit");
        for (position, (group, cell)) in groups.iter().zip(card.digital().cells()).enumerate() {
            let expected = if cell.is_pulsable() { pulsed.as_str() } else { "opacity:1" };
            let found = doc.element(*group).and_then(|e| e.get("style"));
            if found != Some(expected) {
                violations.push(Violation::Opacity {
                    zone: card.zone_id().clone(),
                    position,
                    expected: expected.to_string(),
                    found: found.map(str::to_string),
                });
            }
        }
    }

    violations
}

fn check_card(doc: &Document, card: &Card, record: &ZoneRecord, violations: &mut Vec<Violation>) {
    let zone = record.zone_id.clone();

    let header = doc
        .find_by_class(card.node(), "card-header")
        .first()
        .and_then(|node| doc.element(*node))
        .and_then(|e| e.text.clone());
    if header.as_deref() != Some(zone.as_str()) {
        violations.push(Violation::Header {
            zone: zone.clone(),
            text: header,
        });
    }

    let expected = layout_cells(&record.digits_text);
    let drawn = card.digital().cells();
    if expected != drawn {
        violations.push(Violation::Cells {
            zone: zone.clone(),
            expected: expected.iter().map(|c| c.character).collect(),
            drawn: drawn.iter().map(|c| c.character).collect(),
        });
    }

    let groups = doc.find_by_class(card.digital().node(), "digit");
    for (position, (group, cell)) in groups.iter().zip(&drawn).enumerate() {
        let expected = SegmentGlyphTable::segments_for(cell.character).len();
        let drawn = doc.children(*group).map(<[NodeId]>::len).unwrap_or(0);
        if expected != drawn {
            violations.push(Violation::Primitives {
                zone: zone.clone(),
                position,
                expected,
                drawn,
            });
        }
    }

    let expected = record
        .hand_values
        .iter()
        .filter(|h| h.unit != HandUnit::Unrecognized)
        .count();
    let drawn = card.analog().hands().len();
    if expected != drawn {
        violations.push(Violation::Hands { zone, expected, drawn });
    }
}
