//! glyphic-export: Pure renderers for glyph grids (sans-IO)
//!
//! Two independent consumers of a [`GlyphGrid`](glyphic_pipeline::GlyphGrid):
//! a text serializer and a palette-atlas raster renderer. A built-in
//! bitmap table can synthesize a default atlas. Nothing here touches
//! the filesystem; callers get `String`s, images and encoded bytes.

pub mod builtin;
pub mod error;
pub mod palette;
pub mod text;

pub use builtin::builtin_atlas;
pub use error::ExportError;
pub use palette::{PaletteAtlas, encode_png, render};
pub use text::to_text;

/// Render a glyph grid through an atlas and encode the result as PNG.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if PNG encoding fails.
pub fn to_png(
    atlas: &PaletteAtlas,
    grid: &glyphic_pipeline::GlyphGrid,
) -> Result<Vec<u8>, ExportError> {
    encode_png(&render(atlas, grid))
}

/// The built-in atlas encoded as PNG, ready to be saved as a palette file.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if PNG encoding fails.
pub fn builtin_atlas_png() -> Result<Vec<u8>, ExportError> {
    encode_png(&builtin_atlas().to_rgb())
}
