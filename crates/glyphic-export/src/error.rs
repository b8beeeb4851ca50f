//! Error type for palette loading and raster encoding.

/// Errors from the raster side of the export crate.
///
/// The three palette variants together form the "palette could not be
/// used" class; [`ExportError::is_palette_error`] lets host wrappers
/// map them to one exit status.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The palette byte slice was empty.
    #[error("palette data is empty")]
    EmptyPalette,

    /// The palette could not be decoded as an image.
    #[error("failed to decode palette: {0}")]
    PaletteDecode(#[source] image::ImageError),

    /// The palette decoded but is too small to hold every glyph tile.
    #[error(
        "palette is {width}x{height}, needs at least {required_width}x{required_height}"
    )]
    PaletteDimensions {
        /// Decoded palette width.
        width: u32,
        /// Decoded palette height.
        height: u32,
        /// Minimum width: one tile per glyph.
        required_width: u32,
        /// Minimum height: one tile row.
        required_height: u32,
    },

    /// Encoding the output raster failed.
    #[error("failed to encode raster: {0}")]
    Encode(#[source] image::ImageError),
}

impl ExportError {
    /// Whether this error means the palette atlas was unusable.
    #[must_use]
    pub const fn is_palette_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPalette | Self::PaletteDecode(_) | Self::PaletteDimensions { .. }
        )
    }
}
