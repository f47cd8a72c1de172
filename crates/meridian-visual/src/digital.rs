//! Digital Face - a run of seven-segment glyph cells
//!
//! Cells are diffed by position, not by character: position 0 is always
//! compared with the previous position 0. A change in digit count (a
//! 12-hour rollover, toggling seconds) therefore shows up as substitutions
//! at every shifted position rather than as an insertion.

use meridian_core::{ClockResult, NodeId};
use tracing::trace;

use crate::{num, Element, Placement, SegmentGlyphTable, SegmentPrimitive, Surface, CELL_HEIGHT};

/// Internal coordinate box width: six digits, two colons and an indicator
pub const DIGITAL_BOX_WIDTH: f64 = 250.0;

const LIT_COLOR: &str = "#d00";
const VERTICAL_SEGMENT: &str = "m.1,.1 l2.4,2.4 l2.5,-2.5 l2.5,-15.0 l-2.5,-2.5 l-2.4,2.4, l-2.5,15.0 z";
const HORIZONTAL_SEGMENT: &str = "m0,0 l2.5,2.5 l10.0,0 l2.5,-2.5 l-2.5,-2.5 l-10.0,0 l-2.5,2.5 z";
const DOT: &str = "m 12.5,17.5 a 3.86,3.78 0 1 1 0,-.01z";

/// One character position of a digital face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphCell {
    pub character: char,
    pub x_offset: f64,
}

impl GlyphCell {
    pub fn width(&self) -> f64 {
        SegmentGlyphTable::width(self.character).unwrap_or(0.0)
    }

    /// Colon cells blink when pulsing is on
    pub fn is_pulsable(&self) -> bool {
        self.character == ':'
    }
}

/// Lay out digit text left to right, dropping characters outside the
/// displayable alphabet
pub fn layout_cells(text: &str) -> Vec<GlyphCell> {
    let mut x_offset = 0.0;
    text.chars()
        .filter_map(|character| {
            let width = SegmentGlyphTable::width(character)?;
            let cell = GlyphCell {
                character,
                x_offset,
            };
            x_offset += width;
            Some(cell)
        })
        .collect()
}

/// Total width of a laid-out run
pub fn content_width(cells: &[GlyphCell]) -> f64 {
    cells
        .last()
        .map(|cell| cell.x_offset + cell.width())
        .unwrap_or(0.0)
}

/// What one update changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitUpdate {
    /// Existing positions cleared and redrawn
    pub redrawn: usize,
    /// Positions added beyond the previous count
    pub created: usize,
    /// Positions removed beyond the new count
    pub removed: usize,
    /// Segment primitives drawn in total
    pub primitives_drawn: usize,
}

impl DigitUpdate {
    pub fn is_noop(&self) -> bool {
        *self == DigitUpdate::default()
    }
}

#[derive(Debug, Clone)]
struct DrawnCell {
    cell: GlyphCell,
    group: NodeId,
    primitives: Vec<NodeId>,
}

/// Ids of the two shapes shared by every glyph of a face
#[derive(Debug, Clone)]
struct SegmentShapes {
    vertical: String,
    horizontal: String,
}

/// One digital clock instance and the nodes it owns
#[derive(Debug, Clone)]
pub struct DigitalFace {
    svg: NodeId,
    run: NodeId,
    shapes: SegmentShapes,
    cells: Vec<DrawnCell>,
    run_offset: Option<f64>,
    opacity: Option<f64>,
}

impl DigitalFace {
    /// Allocate the face and its shared segment shapes under `container`,
    /// then draw `digits`.
    pub fn create<S: Surface>(
        surface: &mut S,
        container: NodeId,
        digits: &str,
        display_width: f64,
    ) -> ClockResult<Self> {
        let svg = surface.append(
            container,
            Element::new("svg")
                .attr("width", num(display_width))
                .attr("height", num(display_width / 5.0))
                .attr("viewBox", format!("0 0 {} {}", DIGITAL_BOX_WIDTH, CELL_HEIGHT))
                .class("digital-clock"),
        )?;

        // Shape ids are scoped by the face's node so several faces can share
        // one document.
        let shapes = SegmentShapes {
            vertical: format!("vs-{}", svg.as_u64()),
            horizontal: format!("hs-{}", svg.as_u64()),
        };
        let defs = surface.append(svg, Element::new("defs"))?;
        surface.append(
            defs,
            Element::new("path")
                .attr("id", &shapes.vertical)
                .attr("d", VERTICAL_SEGMENT),
        )?;
        surface.append(
            defs,
            Element::new("path")
                .attr("id", &shapes.horizontal)
                .attr("d", HORIZONTAL_SEGMENT),
        )?;

        let run = surface.append(svg, Element::new("g").class("digit-run"))?;

        let mut face = DigitalFace {
            svg,
            run,
            shapes,
            cells: Vec::new(),
            run_offset: None,
            opacity: None,
        };
        face.update(surface, digits)?;
        Ok(face)
    }

    /// Reconcile the drawn cells with new digit text, touching only the
    /// positions whose character or offset changed, then re-center the run.
    pub fn update<S: Surface>(&mut self, surface: &mut S, digits: &str) -> ClockResult<DigitUpdate> {
        let cells = layout_cells(digits);
        let mut report = DigitUpdate::default();

        for (index, cell) in cells.iter().enumerate() {
            let style = self.style_for(cell);
            match self.cells.get_mut(index) {
                Some(drawn) if drawn.cell == *cell => {}
                Some(drawn) => {
                    for primitive in &drawn.primitives {
                        surface.remove(*primitive)?;
                    }
                    drawn.primitives.clear();
                    if drawn.cell.is_pulsable() != cell.is_pulsable() {
                        surface.set_attr(drawn.group, "class", cell_class(cell))?;
                        surface.set_attr(drawn.group, "style", &style)?;
                    }
                    drawn.primitives = draw_glyph(surface, drawn.group, &self.shapes, cell)?;
                    drawn.cell = *cell;
                    report.redrawn += 1;
                    report.primitives_drawn += drawn.primitives.len();
                }
                None => {
                    let group = surface.append(
                        self.run,
                        Element::new("g")
                            .class(cell_class(cell))
                            .attr("fill", LIT_COLOR)
                            .attr("stroke", "#fff")
                            .attr("stroke-width", 2)
                            .attr("style", &style),
                    )?;
                    let primitives = draw_glyph(surface, group, &self.shapes, cell)?;
                    report.created += 1;
                    report.primitives_drawn += primitives.len();
                    self.cells.push(DrawnCell {
                        cell: *cell,
                        group,
                        primitives,
                    });
                }
            }
        }

        while self.cells.len() > cells.len() {
            if let Some(stale) = self.cells.pop() {
                surface.remove(stale.group)?;
                report.removed += 1;
            }
        }

        let offset = (DIGITAL_BOX_WIDTH - content_width(&cells)) / 2.0;
        if self.run_offset != Some(offset) {
            surface.set_attr(self.run, "transform", &format!("translate({},0)", num(offset)))?;
            self.run_offset = Some(offset);
        }

        if !report.is_noop() {
            trace!(face = %self.svg, ?report, "digital face reconciled");
        }
        Ok(report)
    }

    /// Set the opacity of every pulsable cell. `None` restores full opacity.
    ///
    /// Returns the number of cells touched.
    pub fn set_opacity<S: Surface>(&mut self, surface: &mut S, opacity: Option<f64>) -> ClockResult<usize> {
        self.opacity = opacity;
        let mut touched = 0;
        for drawn in self.cells.iter().filter(|d| d.cell.is_pulsable()) {
            surface.set_attr(drawn.group, "style", &opacity_style(opacity))?;
            touched += 1;
        }
        Ok(touched)
    }

    /// Outermost node of the face
    pub fn node(&self) -> NodeId {
        self.svg
    }

    /// Cells as currently drawn
    pub fn cells(&self) -> Vec<GlyphCell> {
        self.cells.iter().map(|d| d.cell).collect()
    }

    /// Horizontal translation currently applied to the run
    pub fn run_offset(&self) -> f64 {
        self.run_offset.unwrap_or(0.0)
    }

    fn style_for(&self, cell: &GlyphCell) -> String {
        if cell.is_pulsable() {
            opacity_style(self.opacity)
        } else {
            opacity_style(None)
        }
    }
}

fn cell_class(cell: &GlyphCell) -> &'static str {
    if cell.is_pulsable() {
        "digit pulsable"
    } else {
        "digit"
    }
}

fn opacity_style(opacity: Option<f64>) -> String {
    format!("opacity:{}", num(opacity.unwrap_or(1.0)))
}

/// Draw the lit primitives of one cell into its group
fn draw_glyph<S: Surface>(
    surface: &mut S,
    group: NodeId,
    shapes: &SegmentShapes,
    cell: &GlyphCell,
) -> ClockResult<Vec<NodeId>> {
    let x = cell.x_offset;
    SegmentGlyphTable::segments_for(cell.character)
        .iter()
        .map(|primitive| surface.append(group, primitive_element(primitive, shapes, x)))
        .collect()
}

fn primitive_element(primitive: SegmentPrimitive, shapes: &SegmentShapes, x: f64) -> Element {
    match primitive.placement() {
        Placement::Vertical { x: px, y } => Element::new("use")
            .attr("href", format!("#{}", shapes.vertical))
            .attr("x", num(x + px))
            .attr("y", num(y)),
        Placement::Horizontal { x: px, y } => Element::new("use")
            .attr("href", format!("#{}", shapes.horizontal))
            .attr("x", num(x + px))
            .attr("y", num(y)),
        Placement::Dot { dx, dy } => Element::new("path")
            .attr("d", DOT)
            .attr("transform", format!("translate({},{})", num(x + dx), num(dy))),
        Placement::Label { text, x: px, y } => Element::new("text")
            .attr("x", num(x + px))
            .attr("y", num(y))
            .attr("stroke-width", 0.1)
            .attr("style", "text-anchor:end;font-size:20px;font-family:Arial")
            .text(text),
    }
}
