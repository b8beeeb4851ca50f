//! Integer binomial blur over a luminance grid.
//!
//! Two fixed kernels are used by the difference-of-Gaussians edge
//! field: a 3×3 and a 7×7 binomial approximation of a Gaussian. Each is
//! applied as the outer product of its 1D weights and normalized by a
//! literal divisor with truncating integer division.
//!
//! Cells whose full K×K window does not fit inside the grid are set to
//! zero. They are not recomputed with a smaller window, clamped, or
//! reflected.

use image::{GrayImage, Luma};

/// A separable binomial kernel: 1D weights plus the 2D divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    weights: &'static [u32],
    divisor: u32,
}

/// 3×3 binomial kernel, weights `[1, 2, 1]`, divisor 16.
pub const KERNEL_3: Kernel = Kernel {
    weights: &[1, 2, 1],
    divisor: 16,
};

/// 7×7 binomial kernel, weights `[1, 6, 15, 20, 15, 6, 1]`, divisor 4096.
pub const KERNEL_7: Kernel = Kernel {
    weights: &[1, 6, 15, 20, 15, 6, 1],
    divisor: 4096,
};

const fn weight_sum(weights: &[u32]) -> u32 {
    let mut sum = 0;
    let mut i = 0;
    while i < weights.len() {
        sum += weights[i];
        i += 1;
    }
    sum
}

// Each divisor is the square of its 1D weight sum, so a constant grid
// blurs to itself.
const _: () = assert!(KERNEL_3.weights.len() % 2 == 1);
const _: () = assert!(KERNEL_7.weights.len() % 2 == 1);
const _: () = assert!(weight_sum(KERNEL_3.weights) * weight_sum(KERNEL_3.weights) == KERNEL_3.divisor);
const _: () = assert!(weight_sum(KERNEL_7.weights) * weight_sum(KERNEL_7.weights) == KERNEL_7.divisor);

impl Kernel {
    /// Kernel edge length K.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.weights.len()
    }

    /// Half-width `K / 2` (truncating).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn radius(&self) -> u32 {
        (self.weights.len() / 2) as u32
    }

    /// The 1D weights.
    #[must_use]
    pub const fn weights(&self) -> &'static [u32] {
        self.weights
    }

    /// The normalization divisor applied to the 2D weighted sum.
    #[must_use]
    pub const fn divisor(&self) -> u32 {
        self.divisor
    }
}

/// Whether the K×K window centred on `(x, y)` lies fully inside a
/// `width × height` grid.
const fn window_fits(x: u32, y: u32, width: u32, height: u32, radius: u32) -> bool {
    x >= radius && y >= radius && x + radius < width && y + radius < height
}

/// Convolve `grid` with `kernel`.
///
/// Output has the same shape as the input. For every cell whose window
/// fits, the result is `Σ grid[y+i−r][x+j−r] · w[i] · w[j]`, truncating-
/// divided by the kernel divisor. All other cells are 0.
#[must_use = "returns the blurred grid"]
#[allow(clippy::cast_possible_truncation)]
pub fn gaussian_blur(grid: &GrayImage, kernel: &Kernel) -> GrayImage {
    let (width, height) = grid.dimensions();
    let r = kernel.radius();

    GrayImage::from_fn(width, height, |x, y| {
        if !window_fits(x, y, width, height, r) {
            return Luma([0]);
        }

        let mut sum: u32 = 0;
        for (i, &wy) in (0u32..).zip(kernel.weights) {
            for (j, &wx) in (0u32..).zip(kernel.weights) {
                let v = grid.get_pixel(x + j - r, y + i - r).0[0];
                sum += u32::from(v) * wy * wx;
            }
        }
        // Weights sum to the divisor, so the quotient is at most 255.
        Luma([(sum / kernel.divisor) as u8])
    })
}
