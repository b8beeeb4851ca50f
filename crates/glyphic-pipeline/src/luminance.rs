//! Block-average luminance sampling.
//!
//! Reduces an RGBA pixel buffer to one luminance value per
//! `factor × factor` block. This is the first analysis step: every
//! later grid has the shape of the sampled luminance grid.

use image::{GrayImage, Luma};

use crate::types::{PipelineError, PixelBuffer};

/// Unweighted luminance of one RGBA pixel: `(R + G + B) / 3`, truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn pixel_luminance(rgba: [u8; 4]) -> u8 {
    let [r, g, b, _] = rgba;
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}

/// Check that `factor` is usable for a `width × height` source.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidScalar`] if `factor` is zero or
/// larger than either dimension.
pub fn validate_factor(factor: u32, width: u32, height: u32) -> Result<(), PipelineError> {
    if factor == 0 || factor > width || factor > height {
        return Err(PipelineError::InvalidScalar {
            factor,
            width,
            height,
        });
    }
    Ok(())
}

/// Downsample `pixels` into a luminance grid of
/// `floor(W / factor) × floor(H / factor)` cells.
///
/// Each cell is the truncated mean of the per-pixel luminances in its
/// block. Both divisions truncate: per pixel first, then per block.
/// Partial blocks along the right and bottom edges are discarded.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidScalar`] if `factor` is zero or
/// exceeds `min(W, H)`.
#[allow(clippy::cast_possible_truncation)]
pub fn sample_luminance(pixels: &PixelBuffer, factor: u32) -> Result<GrayImage, PipelineError> {
    let (width, height) = pixels.dimensions();
    validate_factor(factor, width, height)?;

    let block_area = u64::from(factor) * u64::from(factor);
    let grid = GrayImage::from_fn(width / factor, height / factor, |cx, cy| {
        let mut sum: u64 = 0;
        for y in cy * factor..(cy + 1) * factor {
            for x in cx * factor..(cx + 1) * factor {
                sum += u64::from(pixel_luminance(pixels.get_pixel(x, y).0));
            }
        }
        // Mean of u8 values, always <= 255.
        Luma([(sum / block_area) as u8])
    });

    log::debug!(
        "sampled {width}x{height} pixels into {}x{} luminance cells (factor {factor})",
        grid.width(),
        grid.height(),
    );
    Ok(grid)
}
