//! Analog Face - dial, numerals and hands
//!
//! The dial is drawn once at creation. Every update removes the previously
//! drawn hands and draws exactly one hand per recognized entry.

use meridian_core::{ClockResult, HandUnit, HandValue, NodeId};
use meridian_time::AngleMapper;
use tracing::trace;

use crate::{num, Element, Surface};

/// Internal coordinate box of the dial
pub const DIAL_BOX: f64 = 200.0;

const DIAL_RADIUS: f64 = 95.0;
const NUMERAL_RADIUS: f64 = 85.0;
const PIVOT_RADIUS: f64 = 4.0;

/// Code point of ROMAN NUMERAL ONE; I through XII are contiguous
const ROMAN_ONE: u32 = 0x2160;

/// Options fixed when a dial is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialOptions {
    /// On-screen width and height
    pub diameter: f64,
    /// Draw roman numerals at the hour positions
    pub numerals: bool,
}

impl Default for DialOptions {
    fn default() -> Self {
        DialOptions {
            diameter: 200.0,
            numerals: true,
        }
    }
}

/// Derived drawing parameters for one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandGeometry {
    pub unit: HandUnit,
    pub angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stroke_width: f64,
    pub color: &'static str,
}

impl HandGeometry {
    /// Geometry for a hand entry, `None` for an unrecognized unit
    pub fn for_value(hand: &HandValue) -> Option<Self> {
        let (value, outer_radius, stroke_width, color) = match hand.unit {
            HandUnit::Seconds => (hand.value, 70.0, 2.0, "red"),
            HandUnit::Minutes => (hand.value, 70.0, 3.0, "black"),
            HandUnit::Hours => (hand.value % 12.0, 50.0, 3.0, "black"),
            HandUnit::Unrecognized => return None,
        };
        Some(HandGeometry {
            unit: hand.unit,
            angle: AngleMapper::angle(hand.unit, value)?,
            inner_radius: 0.0,
            outer_radius,
            stroke_width,
            color,
        })
    }

    /// Path data for a radial line from the inner to the outer radius
    pub fn path(&self) -> String {
        let (x0, y0) = AngleMapper::tip(self.angle, self.inner_radius);
        let (x1, y1) = AngleMapper::tip(self.angle, self.outer_radius);
        format!("M{},{}L{},{}", num(x0), num(y0), num(x1), num(y1))
    }
}

/// One analog clock instance and the nodes it owns
#[derive(Debug, Clone)]
pub struct AnalogFace {
    svg: NodeId,
    group: NodeId,
    hands: Vec<NodeId>,
}

impl AnalogFace {
    /// Draw the static dial under `container`, then the initial hands.
    ///
    /// Each call draws a new dial; call it once per face.
    pub fn create<S: Surface>(
        surface: &mut S,
        container: NodeId,
        options: DialOptions,
        hands: &[HandValue],
    ) -> ClockResult<Self> {
        let svg = surface.append(
            container,
            Element::new("svg")
                .attr("width", num(options.diameter))
                .attr("height", num(options.diameter))
                .attr("viewBox", format!("0 0 {0} {0}", DIAL_BOX))
                .class("analog-clock"),
        )?;
        let center = DIAL_BOX / 2.0;
        let group = surface.append(
            svg,
            Element::new("g")
                .class("clock-group")
                .attr("transform", format!("translate({center},{center})")),
        )?;

        surface.append(
            group,
            Element::new("circle")
                .attr("r", DIAL_RADIUS)
                .attr("fill", "none")
                .class("clock outercircle")
                .attr("stroke", "black")
                .attr("stroke-width", 2),
        )?;

        if options.numerals {
            for hour in 1..=12u32 {
                let rotation = (hour % 12) * 30;
                let label = char::from_u32(ROMAN_ONE + hour - 1)
                    .map(String::from)
                    .unwrap_or_else(|| hour.to_string());
                let slot = surface.append(
                    group,
                    Element::new("g").attr("transform", format!("rotate({rotation})")),
                )?;
                surface.append(
                    slot,
                    Element::new("text")
                        .attr("text-anchor", "middle")
                        .attr("font-family", "serif")
                        .attr("font-size", 14)
                        .attr("x", 0)
                        .attr("y", 6)
                        .attr("dy", -NUMERAL_RADIUS)
                        .attr("fill", "black")
                        .attr(
                            "transform",
                            format!("rotate(-{rotation},0,-{NUMERAL_RADIUS})"),
                        )
                        .text(label),
                )?;
            }
        }

        surface.append(
            group,
            Element::new("circle")
                .attr("r", PIVOT_RADIUS)
                .attr("fill", "black")
                .class("clock innercircle"),
        )?;

        let mut face = AnalogFace {
            svg,
            group,
            hands: Vec::new(),
        };
        face.update(surface, hands)?;
        Ok(face)
    }

    /// Replace the drawn hands with one hand per recognized entry.
    ///
    /// Returns the number of hands drawn.
    pub fn update<S: Surface>(&mut self, surface: &mut S, hands: &[HandValue]) -> ClockResult<usize> {
        for hand in &self.hands {
            surface.remove(*hand)?;
        }
        self.hands.clear();

        for geometry in hands.iter().filter_map(HandGeometry::for_value) {
            let node = surface.append(
                self.group,
                Element::new("path")
                    .attr("d", geometry.path())
                    .class("clock-hand")
                    .attr("stroke", geometry.color)
                    .attr("stroke-width", geometry.stroke_width)
                    .attr("fill", "none"),
            )?;
            self.hands.push(node);
        }

        trace!(face = %self.svg, hands = self.hands.len(), "analog hands redrawn");
        Ok(self.hands.len())
    }

    /// Outermost node of the face
    pub fn node(&self) -> NodeId {
        self.svg
    }

    /// Currently drawn hand nodes
    pub fn hands(&self) -> &[NodeId] {
        &self.hands
    }
}
