//! Seven-segment glyph table
//!
//! Single source of truth for which strokes are lit for each displayable
//! character. Cell geometry assumes a 30 x 50 box (15 x 50 for a colon).

use std::fmt;

use meridian_core::{AM_SENTINEL, PM_SENTINEL};

/// Width of a digit or AM/PM cell in internal units
pub const DIGIT_WIDTH: f64 = 30.0;

/// Width of a colon cell: half a digit
pub const COLON_WIDTH: f64 = DIGIT_WIDTH / 2.0;

/// Height of every cell
pub const CELL_HEIGHT: f64 = 50.0;

/// One lit stroke of a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentPrimitive {
    Top,
    TopLeft,
    TopRight,
    Middle,
    BottomLeft,
    BottomRight,
    Bottom,
    UpperDot,
    LowerDot,
    AmText,
    PmText,
}

/// How a primitive is placed inside its cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A reused vertical segment shape
    Vertical { x: f64, y: f64 },
    /// A reused horizontal segment shape
    Horizontal { x: f64, y: f64 },
    /// A colon dot, as a translation of the dot path
    Dot { dx: f64, dy: f64 },
    /// Indicator text anchored at its end
    Label { text: &'static str, x: f64, y: f64 },
}

impl SegmentPrimitive {
    /// Every primitive, in drawing order
    pub const ALL: [SegmentPrimitive; 11] = [
        SegmentPrimitive::Top,
        SegmentPrimitive::TopLeft,
        SegmentPrimitive::TopRight,
        SegmentPrimitive::Middle,
        SegmentPrimitive::BottomLeft,
        SegmentPrimitive::BottomRight,
        SegmentPrimitive::Bottom,
        SegmentPrimitive::UpperDot,
        SegmentPrimitive::LowerDot,
        SegmentPrimitive::AmText,
        SegmentPrimitive::PmText,
    ];

    #[inline]
    const fn bit(self) -> u16 {
        1 << self as u16
    }

    pub fn placement(self) -> Placement {
        match self {
            SegmentPrimitive::Top => Placement::Horizontal { x: 10.0, y: 5.0 },
            SegmentPrimitive::TopLeft => Placement::Vertical { x: 5.0, y: 22.5 },
            SegmentPrimitive::TopRight => Placement::Vertical { x: 20.0, y: 22.5 },
            SegmentPrimitive::Middle => Placement::Horizontal { x: 7.5, y: 25.0 },
            SegmentPrimitive::BottomLeft => Placement::Vertical { x: 2.5, y: 42.5 },
            SegmentPrimitive::BottomRight => Placement::Vertical { x: 17.5, y: 42.5 },
            SegmentPrimitive::Bottom => Placement::Horizontal { x: 5.0, y: 45.0 },
            SegmentPrimitive::UpperDot => Placement::Dot { dx: 0.0, dy: 0.0 },
            SegmentPrimitive::LowerDot => Placement::Dot { dx: -2.28, dy: 17.5 },
            SegmentPrimitive::AmText => Placement::Label { text: "AM", x: 30.0, y: 22.5 },
            SegmentPrimitive::PmText => Placement::Label { text: "PM", x: 26.6, y: 45.0 },
        }
    }
}

const T: u16 = SegmentPrimitive::Top.bit();
const TL: u16 = SegmentPrimitive::TopLeft.bit();
const TR: u16 = SegmentPrimitive::TopRight.bit();
const M: u16 = SegmentPrimitive::Middle.bit();
const BL: u16 = SegmentPrimitive::BottomLeft.bit();
const BR: u16 = SegmentPrimitive::BottomRight.bit();
const B: u16 = SegmentPrimitive::Bottom.bit();

/// Ordered set of lit primitives
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentSet(u16);

impl SegmentSet {
    pub const EMPTY: SegmentSet = SegmentSet(0);

    pub fn from_primitives(primitives: &[SegmentPrimitive]) -> Self {
        SegmentSet(primitives.iter().fold(0, |acc, p| acc | p.bit()))
    }

    pub fn contains(self, primitive: SegmentPrimitive) -> bool {
        self.0 & primitive.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lit primitives in drawing order
    pub fn iter(self) -> impl Iterator<Item = SegmentPrimitive> {
        SegmentPrimitive::ALL
            .into_iter()
            .filter(move |p| self.contains(*p))
    }
}

impl fmt::Debug for SegmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Classic seven-segment patterns for 0-9
const DIGITS: [SegmentSet; 10] = [
    SegmentSet(T | TL | TR | BL | BR | B),
    SegmentSet(TR | BR),
    SegmentSet(T | TR | M | BL | B),
    SegmentSet(T | TR | M | BR | B),
    SegmentSet(TL | TR | M | BR),
    SegmentSet(T | TL | M | BR | B),
    SegmentSet(T | TL | M | BL | BR | B),
    SegmentSet(T | TR | BR),
    SegmentSet(T | TL | TR | M | BL | BR | B),
    SegmentSet(T | TL | TR | M | BR | B),
];

const COLON: SegmentSet =
    SegmentSet(SegmentPrimitive::UpperDot.bit() | SegmentPrimitive::LowerDot.bit());
const AM: SegmentSet = SegmentSet(SegmentPrimitive::AmText.bit());
const PM: SegmentSet = SegmentSet(SegmentPrimitive::PmText.bit());

/// Character to lit-primitive lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentGlyphTable;

impl SegmentGlyphTable {
    /// Lit primitives for a character. Unknown characters light nothing.
    pub fn segments_for(c: char) -> SegmentSet {
        match c {
            '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
            ':' => COLON,
            AM_SENTINEL => AM,
            PM_SENTINEL => PM,
            _ => SegmentSet::EMPTY,
        }
    }

    /// Whether the character belongs to the displayable alphabet
    pub fn is_glyph(c: char) -> bool {
        matches!(c, '0'..='9' | ':' | AM_SENTINEL | PM_SENTINEL)
    }

    /// Horizontal space a character consumes, or `None` outside the alphabet
    pub fn width(c: char) -> Option<f64> {
        match c {
            ':' => Some(COLON_WIDTH),
            c if Self::is_glyph(c) => Some(DIGIT_WIDTH),
            _ => None,
        }
    }
}
