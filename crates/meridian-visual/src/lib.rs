//! Meridian Visual - clock faces drawn onto a retained visual tree
//!
//! Faces are STATE, not pictures. Each face owns the nodes it drew and, on
//! every tick, touches only the nodes whose value changed.
//!
//! # Layers
//!
//! - Surface: the substrate faces draw onto (append, remove, set attribute)
//! - Document: an in-memory surface that serializes to SVG/HTML markup
//! - SegmentGlyphTable: which seven-segment strokes each character lights
//! - AnalogFace: dial, numerals and hands
//! - DigitalFace: a run of seven-segment glyph cells, diffed by position

pub mod analog;
pub mod digital;
pub mod document;
pub mod glyph;
pub mod surface;

pub use analog::*;
pub use digital::*;
pub use document::*;
pub use glyph::*;
pub use surface::*;
