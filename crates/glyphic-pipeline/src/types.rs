//! Shared types for the glyphic image analysis pipeline.

use serde::{Deserialize, Serialize};

use crate::glyph::Glyph;

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate grids without depending on `image` directly.
///
/// Luminance grids, blur grids and edge masks are all single-channel
/// `u8` rasters: a flat row-major buffer with a bounds-checked
/// accessor (`get_pixel_checked`).
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can construct pixel
/// buffers without depending on `image` directly.
pub use image::RgbaImage;

/// Decoded source image: width × height × RGBA, row-major.
pub type PixelBuffer = RgbaImage;

/// Image or grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Dimensions {
    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// One glyph per output cell, stored row-major in a flat buffer.
///
/// Always holds exactly `width * height` cells; deserialization goes
/// through [`GlyphGrid::new`] and rejects any other length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGlyphGrid")]
pub struct GlyphGrid {
    width: u32,
    height: u32,
    cells: Vec<Glyph>,
}

/// Unchecked serde form of [`GlyphGrid`].
#[derive(Deserialize)]
struct RawGlyphGrid {
    width: u32,
    height: u32,
    cells: Vec<Glyph>,
}

impl TryFrom<RawGlyphGrid> for GlyphGrid {
    type Error = PipelineError;

    fn try_from(raw: RawGlyphGrid) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.cells)
    }
}

impl GlyphGrid {
    /// Wrap a row-major cell buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::GridShape`] if `cells.len()` differs from
    /// `width * height`.
    pub fn new(width: u32, height: u32, cells: Vec<Glyph>) -> Result<Self, PipelineError> {
        let expected = Dimensions { width, height }.cell_count();
        if u64::try_from(cells.len()).ok() != Some(expected) {
            return Err(PipelineError::GridShape {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid by evaluating `f` at every `(x, y)` in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Glyph) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The glyph at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Glyph]> {
        // `max(1)` keeps `chunks_exact` valid for a zero-width grid,
        // whose cell buffer is empty anyway.
        self.cells.chunks_exact((self.width as usize).max(1))
    }

    /// Number of cells holding a directional edge glyph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|g| g.is_edge()).count()
    }
}

/// Configuration for the glyph pipeline.
///
/// The numeric constants of the analysis (kernel tables, thresholds,
/// ramp) are fixed at compile time; only the sampling factor and the
/// edge-glyph switch are configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Edge length, in source pixels, of the square block averaged into
    /// one output cell. Must be at least 1 and at most
    /// `min(width, height)` of the source image.
    pub downscale_factor: u32,

    /// Whether interior cells may be rendered as directional edge
    /// glyphs. When `false` every cell takes the tonal path and the
    /// Sobel step is skipped.
    pub edge_glyphs: bool,
}

impl PipelineConfig {
    /// Default downscale factor.
    pub const DEFAULT_DOWNSCALE_FACTOR: u32 = 8;

    /// Default edge-glyph switch.
    pub const DEFAULT_EDGE_GLYPHS: bool = true;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            downscale_factor: Self::DEFAULT_DOWNSCALE_FACTOR,
            edge_glyphs: Self::DEFAULT_EDGE_GLYPHS,
        }
    }
}

/// All intermediates of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedResult {
    /// Block-averaged luminance, one value per output cell.
    pub luminance: GrayImage,
    /// Luminance convolved with the 3×3 binomial kernel.
    pub blur_fine: GrayImage,
    /// Luminance convolved with the 7×7 binomial kernel.
    pub blur_coarse: GrayImage,
    /// Thresholded difference of the two blurs (0 or 255).
    pub edges: GrayImage,
    /// Final glyph selection.
    pub glyphs: GlyphGrid,
    /// Dimensions of the source pixel buffer.
    pub source: Dimensions,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The image could not be decoded (unreadable or unsupported format).
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input byte slice was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A raw RGBA buffer did not match its declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// `width * height * 4`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// The downscale factor is zero or exceeds an image dimension.
    #[error("invalid downscale factor {factor} for a {width}x{height} image")]
    InvalidScalar {
        /// The rejected factor.
        factor: u32,
        /// Source image width in pixels.
        width: u32,
        /// Source image height in pixels.
        height: u32,
    },

    /// A serialized glyph carried an index outside the atlas.
    #[error("glyph index {0} is out of range")]
    GlyphIndex(u8),

    /// A glyph grid's cell count did not match its dimensions.
    #[error("glyph grid of {width}x{height} cannot hold {cells} cells")]
    GridShape {
        /// Declared width in cells.
        width: u32,
        /// Declared height in cells.
        height: u32,
        /// Number of cells supplied.
        cells: usize,
    },
}
