//! Glyph selection: tonal ramp index or directional edge glyph per cell.
//!
//! Interior cells become an edge glyph when the Sobel operator finds an
//! edge in the mask and the cell is darker than [`LUMINANCE_GATE`].
//! Everything else, including the whole outer ring, maps onto the tonal
//! ramp with fixed-point arithmetic.

use image::GrayImage;
use serde::{Deserialize, Serialize};

pub use crate::sobel::EdgeDirection;
use crate::sobel::{edge_direction_at, is_interior};
use crate::types::{GlyphGrid, PipelineError};

/// Tonal ramp, darkest to brightest.
pub const RAMP: &[u8; 10] = b" .:-=+*#%@";

/// Number of tonal glyphs.
#[allow(clippy::cast_possible_truncation)]
pub const RAMP_LEN: u8 = RAMP.len() as u8;

/// Luminance (exclusive) below which edge glyphs may replace tones.
pub const LUMINANCE_GATE: u8 = 96;

/// `255 * 100`: luminance scaled by 100 before the ramp division.
const FIXED_POINT_RANGE: u32 = 25_500;

/// Luminance step per ramp entry, scaled by 100. The division truncates
/// before it is used, giving 2833 for the 10-entry ramp.
const TONE_STEP: u32 = FIXED_POINT_RANGE / (RAMP_LEN as u32 - 1);
const _: () = assert!(TONE_STEP == 2833);

/// Ramp index for a luminance value: `(luminance * 100) / 2833`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn tonal_index(luminance: u8) -> u8 {
    // 255 * 100 / 2833 == 9, so the result always fits the ramp.
    (luminance as u32 * 100 / TONE_STEP) as u8
}

/// A position on the tonal ramp, always `< RAMP_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tone(u8);

impl Tone {
    /// The darkest ramp entry.
    pub const DARKEST: Self = Self(0);

    /// The brightest ramp entry.
    pub const BRIGHTEST: Self = Self(RAMP_LEN - 1);

    /// Checked constructor; `None` when `index >= RAMP_LEN`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < RAMP_LEN {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The ramp entry for a luminance value.
    #[must_use]
    pub const fn from_luminance(luminance: u8) -> Self {
        Self(tonal_index(luminance))
    }

    /// Index into [`RAMP`].
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The ramp character for this tone.
    #[must_use]
    pub const fn ramp_char(self) -> u8 {
        RAMP[self.0 as usize]
    }
}

/// The glyph chosen for one output cell.
///
/// Serialized as its atlas index, so out-of-range values are rejected
/// on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Glyph {
    /// A tonal ramp entry.
    Tone(Tone),
    /// Directional edge symbol.
    Edge(EdgeDirection),
}

impl Glyph {
    /// Total number of distinct glyphs (ramp plus four edge symbols).
    pub const COUNT: u8 = RAMP_LEN + 4;

    /// Atlas / palette index: ramp entries first, then 10..=13 for
    /// horizontal, backslash, vertical and slash edges.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Tone(tone) => tone.get(),
            Self::Edge(dir) => RAMP_LEN + dir.ordinal(),
        }
    }

    /// Inverse of [`Self::index`].
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        if let Some(tone) = Tone::new(index) {
            return Some(Self::Tone(tone));
        }
        EdgeDirection::ALL
            .get(usize::from(index - RAMP_LEN))
            .copied()
            .map(Self::Edge)
    }

    /// Whether this is a directional edge glyph.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::Edge(_))
    }
}

impl TryFrom<u8> for Glyph {
    type Error = PipelineError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(PipelineError::GlyphIndex(index))
    }
}

impl From<Glyph> for u8 {
    fn from(glyph: Glyph) -> Self {
        glyph.index()
    }
}

/// Select a glyph for every luminance cell.
///
/// With `edges = None` every cell takes the tonal path. Otherwise the
/// Sobel operator runs on the mask at interior cells only; the outer
/// ring is never evaluated.
#[must_use = "returns the glyph grid"]
pub fn map_glyphs(luminance: &GrayImage, edges: Option<&GrayImage>) -> GlyphGrid {
    let (width, height) = luminance.dimensions();
    let tone = |x: u32, y: u32| Glyph::Tone(Tone::from_luminance(luminance.get_pixel(x, y).0[0]));

    let Some(mask) = edges else {
        return GlyphGrid::from_fn(width, height, tone);
    };

    let grid = GlyphGrid::from_fn(width, height, |x, y| {
        if !is_interior(width, height, x, y) || luminance.get_pixel(x, y).0[0] >= LUMINANCE_GATE {
            return tone(x, y);
        }
        edge_direction_at(mask, x, y).map_or_else(|| tone(x, y), Glyph::Edge)
    });

    log::debug!(
        "mapped {width}x{height} cells, {} edge glyphs",
        grid.edge_count()
    );
    grid
}
