//! Palette atlas and the raster renderer built on it.
//!
//! An atlas is a single strip of 8×8 tiles, one per glyph, laid out
//! left to right in [`Glyph::index`] order. Each texel is reduced to a
//! single intensity `(R + G + B) / 3`; rendering copies that intensity
//! into all three channels of the output, so the result is monochrome.

use glyphic_pipeline::{Glyph, GlyphGrid, GrayImage};
use image::{ImageEncoder, Luma, Rgb, RgbImage};

use crate::ExportError;

/// Edge length of one glyph tile in texels.
pub const TILE_SIZE: u32 = 8;

/// Minimum atlas width: one tile per glyph.
pub const ATLAS_WIDTH: u32 = TILE_SIZE * Glyph::COUNT as u32;

/// Minimum atlas height: one row of tiles.
pub const ATLAS_HEIGHT: u32 = TILE_SIZE;

/// Monochrome glyph tiles, `ATLAS_WIDTH × ATLAS_HEIGHT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteAtlas {
    intensity: GrayImage,
}

impl PaletteAtlas {
    /// Decode an atlas from encoded image bytes (PNG, JPEG, BMP, WebP).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyPalette`] for an empty slice,
    /// [`ExportError::PaletteDecode`] if the bytes are not a supported
    /// image, and [`ExportError::PaletteDimensions`] if the image is
    /// smaller than one tile strip.
    pub fn decode(bytes: &[u8]) -> Result<Self, ExportError> {
        if bytes.is_empty() {
            return Err(ExportError::EmptyPalette);
        }
        let img = image::load_from_memory(bytes).map_err(ExportError::PaletteDecode)?;
        log::debug!("decoded palette {}x{}", img.width(), img.height());
        Self::from_rgb(&img.to_rgb8())
    }

    /// Build an atlas from an RGB image. Only the top-left
    /// `ATLAS_WIDTH × ATLAS_HEIGHT` region is read.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::PaletteDimensions`] if `rgb` is too small.
    pub fn from_rgb(rgb: &RgbImage) -> Result<Self, ExportError> {
        let (width, height) = rgb.dimensions();
        if width < ATLAS_WIDTH || height < ATLAS_HEIGHT {
            return Err(ExportError::PaletteDimensions {
                width,
                height,
                required_width: ATLAS_WIDTH,
                required_height: ATLAS_HEIGHT,
            });
        }
        let intensity = GrayImage::from_fn(ATLAS_WIDTH, ATLAS_HEIGHT, |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let sum = u16::from(r) + u16::from(g) + u16::from(b);
            // A sum of three u8 divided by 3 always fits.
            #[allow(clippy::cast_possible_truncation)]
            Luma([(sum / 3) as u8])
        });
        Ok(Self { intensity })
    }

    /// Build an atlas by evaluating `f(glyph_index, x, y)` for every
    /// texel of every tile.
    pub fn from_fn(mut f: impl FnMut(u8, u32, u32) -> u8) -> Self {
        let intensity = GrayImage::from_fn(ATLAS_WIDTH, ATLAS_HEIGHT, |x, y| {
            // x / TILE_SIZE < Glyph::COUNT, which fits in u8.
            #[allow(clippy::cast_possible_truncation)]
            let index = (x / TILE_SIZE) as u8;
            Luma([f(index, x % TILE_SIZE, y)])
        });
        Self { intensity }
    }

    /// Intensity of texel `(x, y)` within the tile for `glyph_index`.
    /// Out-of-range coordinates read as 0.
    #[must_use]
    pub fn texel(&self, glyph_index: u8, x: u32, y: u32) -> u8 {
        if x >= TILE_SIZE {
            return 0;
        }
        self.intensity
            .get_pixel_checked(u32::from(glyph_index) * TILE_SIZE + x, y)
            .map_or(0, |p| p.0[0])
    }

    /// The intensity strip.
    #[must_use]
    pub const fn intensity(&self) -> &GrayImage {
        &self.intensity
    }

    /// The atlas as a grayscale-in-RGB image, suitable for writing out
    /// as a palette file.
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(ATLAS_WIDTH, ATLAS_HEIGHT, |x, y| {
            let v = self.intensity.get_pixel(x, y).0[0];
            Rgb([v, v, v])
        })
    }
}

/// Tile the atlas over the glyph grid.
///
/// The output is `(grid.width() * 8) × (grid.height() * 8)` RGB, each
/// cell replaced by its glyph's tile.
#[must_use = "returns the rendered raster"]
pub fn render(atlas: &PaletteAtlas, grid: &GlyphGrid) -> RgbImage {
    let width = grid.width() * TILE_SIZE;
    let height = grid.height() * TILE_SIZE;
    let raster = RgbImage::from_fn(width, height, |px, py| {
        let index = grid
            .get(px / TILE_SIZE, py / TILE_SIZE)
            .map_or(0, Glyph::index);
        let v = atlas.texel(index, px % TILE_SIZE, py % TILE_SIZE);
        Rgb([v, v, v])
    });
    log::debug!(
        "rendered {}x{} cells to {width}x{height} raster",
        grid.width(),
        grid.height()
    );
    raster
}

/// Encode an RGB raster as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the PNG encoder fails.
pub fn encode_png(raster: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(ExportError::Encode)?;
    Ok(buf)
}
