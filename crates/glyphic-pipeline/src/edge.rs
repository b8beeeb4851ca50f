//! Difference-of-Gaussians edge field.
//!
//! Subtracts the coarse (7×7) blur from the fine (3×3) blur and
//! thresholds the result per cell. The output is a binary mask: 255
//! where the difference strictly exceeds [`EDGE_THRESHOLD`], 0
//! elsewhere. No smoothing, dilation or connectivity filtering follows.

use image::{GrayImage, Luma};

use crate::blur::{KERNEL_3, KERNEL_7, gaussian_blur};

/// Minimum fine-minus-coarse difference (exclusive) marking an edge cell.
pub const EDGE_THRESHOLD: i16 = 9;

/// Mask value for edge cells.
pub const EDGE: u8 = 255;

/// Threshold the difference of two blurs of the same luminance grid.
///
/// Only reachable with pairs produced by [`gaussian_blur`] from one
/// source, so both grids always share dimensions.
#[must_use = "returns the binary edge mask"]
pub(crate) fn edge_mask(fine: &GrayImage, coarse: &GrayImage) -> GrayImage {
    debug_assert_eq!(fine.dimensions(), coarse.dimensions());

    GrayImage::from_fn(fine.width(), fine.height(), |x, y| {
        let f = i16::from(fine.get_pixel(x, y).0[0]);
        let c = i16::from(coarse.get_pixel(x, y).0[0]);
        Luma([if f - c > EDGE_THRESHOLD { EDGE } else { 0 }])
    })
}

/// Blur `luminance` with both kernels and threshold their difference.
///
/// Returns `(fine, coarse, mask)`.
#[must_use]
pub fn difference_of_gaussians(luminance: &GrayImage) -> (GrayImage, GrayImage, GrayImage) {
    let fine = gaussian_blur(luminance, &KERNEL_3);
    let coarse = gaussian_blur(luminance, &KERNEL_7);
    let mask = edge_mask(&fine, &coarse);
    (fine, coarse, mask)
}

/// Count mask cells equal to [`EDGE`].
#[must_use]
pub fn count_edge_cells(mask: &GrayImage) -> u64 {
    mask.pixels().map(|p| u64::from(p.0[0] == EDGE)).sum()
}
