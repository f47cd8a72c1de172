//! Card - the visual unit for one zone

use meridian_core::{ClockResult, NodeId, ZoneId, ZoneRecord};
use meridian_visual::{AnalogFace, DialOptions, DigitUpdate, DigitalFace, Element, Surface};

/// Sizes used when a card is created
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    /// CSS width of the card element
    pub card_width: String,
    pub dial: DialOptions,
    /// On-screen width of the digital face
    pub digital_width: f64,
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout {
            card_width: "15rem".to_string(),
            dial: DialOptions::default(),
            digital_width: 200.0,
        }
    }
}

/// What updating one card changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardUpdate {
    pub hands_drawn: usize,
    pub digits: DigitUpdate,
}

/// Header plus the two faces of one zone
#[derive(Debug, Clone)]
pub struct Card {
    zone_id: ZoneId,
    root: NodeId,
    label: String,
    analog: AnalogFace,
    digital: DigitalFace,
}

impl Card {
    /// Append a new card for `record` to `container`
    pub fn create<S: Surface>(
        surface: &mut S,
        container: NodeId,
        record: &ZoneRecord,
        layout: &CardLayout,
    ) -> ClockResult<Self> {
        let label = record.zone_id.to_string();
        let root = surface.append(
            container,
            Element::new("div")
                .class("card time-card")
                .attr("style", format!("width:{}", layout.card_width))
                .attr("data-zone", &label),
        )?;
        surface.append(
            root,
            Element::new("h2")
                .class("card-header h4 text-primary border-primary")
                .text(label.clone()),
        )?;
        let body = surface.append(root, Element::new("div").class("card-body"))?;

        let analog = AnalogFace::create(surface, body, layout.dial, &record.hand_values)?;
        let digital = DigitalFace::create(surface, body, &record.digits_text, layout.digital_width)?;

        Ok(Card {
            zone_id: record.zone_id.clone(),
            root,
            label,
            analog,
            digital,
        })
    }

    /// Bring an existing card to a new record of the same zone.
    ///
    /// The header shows the zone id, which is also the card's key, so it is
    /// written once at creation and never touched here.
    pub fn update<S: Surface>(&mut self, surface: &mut S, record: &ZoneRecord) -> ClockResult<CardUpdate> {
        let mut update = CardUpdate::default();
        update.hands_drawn = self.analog.update(surface, &record.hand_values)?;
        update.digits = self.digital.update(surface, &record.digits_text)?;
        Ok(update)
    }

    /// Remove the card and both faces from the surface
    pub fn destroy<S: Surface>(self, surface: &mut S) -> ClockResult<()> {
        surface.remove(self.root)
    }

    /// Set the opacity of the card's pulsing elements
    pub fn set_pulse<S: Surface>(&mut self, surface: &mut S, opacity: Option<f64>) -> ClockResult<usize> {
        self.digital.set_opacity(surface, opacity)
    }

    pub fn zone_id(&self) -> &ZoneId {
        &self.zone_id
    }

    pub fn node(&self) -> NodeId {
        self.root
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn analog(&self) -> &AnalogFace {
        &self.analog
    }

    pub fn digital(&self) -> &DigitalFace {
        &self.digital
    }
}
