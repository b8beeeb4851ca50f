//! Image decoding into a 4-channel pixel buffer.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGBA
//! [`PixelBuffer`] regardless of the source channel layout. Hosts that
//! already hold raw RGBA bytes can wrap them with [`from_raw`].

use crate::types::{PipelineError, PixelBuffer};

/// Decode raw image bytes into an RGBA pixel buffer.
///
/// Grayscale, RGB and paletted sources are expanded to four channels,
/// so every pixel contributes `(R + G + B) / 3` downstream.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    log::debug!("decoded {}x{} image", img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Wrap a row-major RGBA byte buffer of the given dimensions.
///
/// # Errors
///
/// Returns [`PipelineError::BufferSize`] if `data.len()` is not
/// `width * height * 4`.
pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<PixelBuffer, PipelineError> {
    let expected = width as usize * height as usize * 4;
    let actual = data.len();
    PixelBuffer::from_raw(width, height, data)
        .filter(|_| actual == expected)
        .ok_or(PipelineError::BufferSize { expected, actual })
}
