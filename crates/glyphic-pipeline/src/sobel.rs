//! Sobel gradient and orientation at a single interior cell.
//!
//! Evaluated on the binary edge mask: a cell counts as an edge when the
//! gradient magnitude exceeds [`GRADIENT_THRESHOLD`], and its
//! orientation is bucketed into one of four [`EdgeDirection`]s.

use std::f64::consts::PI;

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Gradient magnitude (exclusive) above which a cell is an edge.
pub const GRADIENT_THRESHOLD: f64 = 400.0;

/// Added to `Gx` so the orientation ratio `Gy / Gx` is always finite.
const GX_BIAS: f64 = 0.0001;

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Orientation class of a detected edge.
///
/// Declaration order matches the glyph index order (10..=13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Rendered as `--`.
    Horizontal,
    /// Rendered as `\\`.
    Backslash,
    /// Rendered as `||`.
    Vertical,
    /// Rendered as `//`.
    Slash,
}

impl EdgeDirection {
    /// All directions in glyph index order.
    pub const ALL: [Self; 4] = [Self::Horizontal, Self::Backslash, Self::Vertical, Self::Slash];

    /// Bucket a normalized orientation `theta ∈ (0, 1)`.
    #[must_use]
    pub fn from_theta(theta: f64) -> Self {
        if theta < 0.1 || theta > 0.9 {
            Self::Horizontal
        } else if theta < 0.4 {
            Self::Backslash
        } else if theta < 0.6 {
            Self::Vertical
        } else {
            Self::Slash
        }
    }

    /// Position within [`Self::ALL`].
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Horizontal => 0,
            Self::Backslash => 1,
            Self::Vertical => 2,
            Self::Slash => 3,
        }
    }
}

/// Sobel response at one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    /// Horizontal response, biased by a tiny positive constant.
    pub gx: f64,
    /// Vertical response.
    pub gy: f64,
}

impl Gradient {
    /// `sqrt(Gx² + Gy²)`.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.gx.hypot(self.gy)
    }

    /// Normalized orientation `atan(Gy / Gx) / π + 0.5`, in `(0, 1)`.
    #[must_use]
    pub fn theta(self) -> f64 {
        (self.gy / self.gx).atan() / PI + 0.5
    }

    /// The edge direction, or `None` when the magnitude does not exceed
    /// [`GRADIENT_THRESHOLD`].
    #[must_use]
    pub fn direction(self) -> Option<EdgeDirection> {
        (self.magnitude() > GRADIENT_THRESHOLD).then(|| EdgeDirection::from_theta(self.theta()))
    }
}

/// Whether `(x, y)` has a full 3×3 neighbourhood inside `grid`.
#[must_use]
pub const fn is_interior(width: u32, height: u32, x: u32, y: u32) -> bool {
    x > 0 && y > 0 && x + 1 < width && y + 1 < height
}

/// Sobel gradient at `(x, y)`, or `None` for border and out-of-range cells.
#[must_use]
pub fn gradient_at(grid: &GrayImage, x: u32, y: u32) -> Option<Gradient> {
    if !is_interior(grid.width(), grid.height(), x, y) {
        return None;
    }

    let mut gx: i32 = 0;
    let mut gy: i32 = 0;
    for (i, (row_x, row_y)) in (0u32..).zip(SOBEL_X.iter().zip(&SOBEL_Y)) {
        for (j, (&kx, &ky)) in (0u32..).zip(row_x.iter().zip(row_y)) {
            let v = i32::from(grid.get_pixel(x + j - 1, y + i - 1).0[0]);
            gx += v * kx;
            gy += v * ky;
        }
    }

    Some(Gradient {
        gx: f64::from(gx) + GX_BIAS,
        gy: f64::from(gy),
    })
}

/// Edge direction at an interior cell, or `None` when there is no edge
/// or the cell lies on the border.
#[must_use]
pub fn edge_direction_at(grid: &GrayImage, x: u32, y: u32) -> Option<EdgeDirection> {
    gradient_at(grid, x, y).and_then(Gradient::direction)
}
