//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate grid before continuing.
//!
//! ```rust
//! # use glyphic_pipeline::{Pipeline, PipelineConfig, PipelineError, PixelBuffer};
//! # fn run(pixels: PixelBuffer) -> Result<(), PipelineError> {
//! let staged = Pipeline::new(pixels, PipelineConfig::default())
//!     .sample()?
//!     .blur()
//!     .detect_edges()
//!     .map_glyphs()
//!     .into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline
//! state, so stages cannot be skipped or reordered. The source pixel
//! buffer is dropped as soon as the luminance grid exists; every later
//! grid is produced once and only read afterwards.

use image::GrayImage;

use crate::blur::{KERNEL_3, KERNEL_7, gaussian_blur};
use crate::diagnostics::StageMetrics;
use crate::edge::{EDGE_THRESHOLD, count_edge_cells, edge_mask};
use crate::types::{Dimensions, GlyphGrid, PipelineConfig, PipelineError, PixelBuffer, StagedResult};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing; call .sample() to continue"]
pub struct Pending {
    config: PipelineConfig,
    pixels: PixelBuffer,
}

impl Pending {
    /// The source pixel buffer.
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Block-average the source into a luminance grid, releasing the
    /// pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidScalar`] if the configured
    /// downscale factor is zero or exceeds either image dimension.
    pub fn sample(self) -> Result<Sampled, PipelineError> {
        let (width, height) = self.pixels.dimensions();
        let luminance =
            crate::luminance::sample_luminance(&self.pixels, self.config.downscale_factor)?;
        Ok(Sampled {
            config: self.config,
            source: Dimensions { width, height },
            luminance,
        })
    }
}

// ───────────────────────── Stage 1: Sampled ──────────────────────────

/// Pipeline state after luminance sampling.
#[must_use = "pipeline stages are consumed by advancing; call .blur() to continue"]
pub struct Sampled {
    config: PipelineConfig,
    source: Dimensions,
    luminance: GrayImage,
}

impl Sampled {
    /// The downsampled luminance grid.
    pub const fn luminance(&self) -> &GrayImage {
        &self.luminance
    }

    /// Blur the luminance grid with the 3×3 and 7×7 kernels.
    pub fn blur(self) -> Blurred {
        let fine = gaussian_blur(&self.luminance, &KERNEL_3);
        let coarse = gaussian_blur(&self.luminance, &KERNEL_7);
        log::debug!(
            "blurred {}x{} grid with {}x{} and {}x{} kernels",
            self.luminance.width(),
            self.luminance.height(),
            KERNEL_3.size(),
            KERNEL_3.size(),
            KERNEL_7.size(),
            KERNEL_7.size(),
        );
        Blurred {
            config: self.config,
            source: self.source,
            luminance: self.luminance,
            fine,
            coarse,
        }
    }
}

// ───────────────────────── Stage 2: Blurred ──────────────────────────

/// Pipeline state after both blurs.
#[must_use = "pipeline stages are consumed by advancing; call .detect_edges() to continue"]
pub struct Blurred {
    config: PipelineConfig,
    source: Dimensions,
    luminance: GrayImage,
    fine: GrayImage,
    coarse: GrayImage,
}

impl Blurred {
    /// The 3×3 blur.
    pub const fn fine(&self) -> &GrayImage {
        &self.fine
    }

    /// The 7×7 blur.
    pub const fn coarse(&self) -> &GrayImage {
        &self.coarse
    }

    /// Threshold the difference of the two blurs into an edge mask.
    pub fn detect_edges(self) -> EdgesDetected {
        let edges = edge_mask(&self.fine, &self.coarse);
        log::debug!("edge field marks {} cells", count_edge_cells(&edges));
        EdgesDetected {
            config: self.config,
            source: self.source,
            luminance: self.luminance,
            fine: self.fine,
            coarse: self.coarse,
            edges,
        }
    }
}

// ───────────────────────── Stage 3: EdgesDetected ────────────────────

/// Pipeline state after the difference-of-Gaussians edge field.
#[must_use = "pipeline stages are consumed by advancing; call .map_glyphs() to continue"]
pub struct EdgesDetected {
    config: PipelineConfig,
    source: Dimensions,
    luminance: GrayImage,
    fine: GrayImage,
    coarse: GrayImage,
    edges: GrayImage,
}

impl EdgesDetected {
    /// The binary edge mask.
    pub const fn edges(&self) -> &GrayImage {
        &self.edges
    }

    /// Choose a glyph for every cell.
    ///
    /// When `config.edge_glyphs` is `false` the mask is ignored and
    /// every cell is tonal.
    pub fn map_glyphs(self) -> Mapped {
        let mask = self.config.edge_glyphs.then_some(&self.edges);
        let glyphs = crate::glyph::map_glyphs(&self.luminance, mask);
        Mapped {
            config: self.config,
            source: self.source,
            luminance: self.luminance,
            fine: self.fine,
            coarse: self.coarse,
            edges: self.edges,
            glyphs,
        }
    }
}

// ───────────────────────── Stage 4: Mapped ───────────────────────────

/// Final pipeline state, after glyph mapping.
#[must_use = "call .into_result() to extract the StagedResult"]
pub struct Mapped {
    config: PipelineConfig,
    source: Dimensions,
    luminance: GrayImage,
    fine: GrayImage,
    coarse: GrayImage,
    edges: GrayImage,
    glyphs: GlyphGrid,
}

impl Mapped {
    /// The glyph grid.
    pub const fn glyphs(&self) -> &GlyphGrid {
        &self.glyphs
    }

    /// Consume the pipeline and return all intermediates.
    pub fn into_result(self) -> StagedResult {
        StagedResult {
            luminance: self.luminance,
            blur_fine: self.fine,
            blur_coarse: self.coarse,
            edges: self.edges,
            glyphs: self.glyphs,
            source: self.source,
        }
    }
}

// ──────────────────── PipelineStage trait + Stage enum ────────────────

/// Total number of stages in the pipeline.
pub const STAGE_COUNT: usize = 5;

/// Common interface implemented by every typed stage.
pub trait PipelineStage: Sized {
    /// Human-readable stage name.
    const NAME: &'static str;
    /// Zero-based position in the pipeline.
    const INDEX: usize;

    /// Metrics describing the work this stage performed, or `None` for
    /// the initial stage.
    fn metrics(&self) -> Option<StageMetrics>;

    /// Advance one stage; `Ok(None)` when already at the final stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the transition fails.
    fn next(self) -> Result<Option<Stage>, PipelineError>;
}

impl PipelineStage for Pending {
    const NAME: &'static str = "Pending";
    const INDEX: usize = 0;

    fn metrics(&self) -> Option<StageMetrics> {
        None
    }

    fn next(self) -> Result<Option<Stage>, PipelineError> {
        self.sample().map(|s| Some(s.into()))
    }
}

impl PipelineStage for Sampled {
    const NAME: &'static str = "Sample";
    const INDEX: usize = 1;

    fn metrics(&self) -> Option<StageMetrics> {
        Some(StageMetrics::Sample {
            source_width: self.source.width,
            source_height: self.source.height,
            downscale_factor: self.config.downscale_factor,
            grid_width: self.luminance.width(),
            grid_height: self.luminance.height(),
        })
    }

    fn next(self) -> Result<Option<Stage>, PipelineError> {
        Ok(Some(self.blur().into()))
    }
}

impl PipelineStage for Blurred {
    const NAME: &'static str = "Blur";
    const INDEX: usize = 2;

    fn metrics(&self) -> Option<StageMetrics> {
        Some(StageMetrics::Blur {
            fine_kernel: KERNEL_3.size(),
            coarse_kernel: KERNEL_7.size(),
        })
    }

    fn next(self) -> Result<Option<Stage>, PipelineError> {
        Ok(Some(self.detect_edges().into()))
    }
}

impl PipelineStage for EdgesDetected {
    const NAME: &'static str = "Edge Field";
    const INDEX: usize = 3;

    fn metrics(&self) -> Option<StageMetrics> {
        Some(StageMetrics::EdgeField {
            threshold: EDGE_THRESHOLD,
            edge_cell_count: count_edge_cells(&self.edges),
            total_cell_count: u64::from(self.edges.width()) * u64::from(self.edges.height()),
        })
    }

    fn next(self) -> Result<Option<Stage>, PipelineError> {
        Ok(Some(self.map_glyphs().into()))
    }
}

impl PipelineStage for Mapped {
    const NAME: &'static str = "Glyph Mapping";
    const INDEX: usize = 4;

    fn metrics(&self) -> Option<StageMetrics> {
        let edge_glyph_count = self.glyphs.edge_count();
        Some(StageMetrics::GlyphMapping {
            edge_glyphs_enabled: self.config.edge_glyphs,
            edge_glyph_count,
            tonal_glyph_count: self.glyphs.cells().len() - edge_glyph_count,
        })
    }

    fn next(self) -> Result<Option<Stage>, PipelineError> {
        Ok(None)
    }
}

/// Enum wrapping all pipeline stages for uniform, loopable access.
#[must_use]
pub enum Stage {
    /// See [`Pending`].
    Pending(Pending),
    /// See [`Sampled`].
    Sampled(Sampled),
    /// See [`Blurred`].
    Blurred(Blurred),
    /// See [`EdgesDetected`].
    EdgesDetected(EdgesDetected),
    /// See [`Mapped`].
    Mapped(Mapped),
}

/// Delegate a method call to whichever `Stage` variant is active.
macro_rules! delegate {
    ($self:ident, $method:ident) => {
        match $self {
            Self::Pending(s) => s.$method(),
            Self::Sampled(s) => s.$method(),
            Self::Blurred(s) => s.$method(),
            Self::EdgesDetected(s) => s.$method(),
            Self::Mapped(s) => s.$method(),
        }
    };
}

/// Same as [`delegate!`] for the trait's associated constants.
macro_rules! delegate_const {
    ($self:ident, $konst:ident) => {
        match $self {
            Self::Pending(_) => Pending::$konst,
            Self::Sampled(_) => Sampled::$konst,
            Self::Blurred(_) => Blurred::$konst,
            Self::EdgesDetected(_) => EdgesDetected::$konst,
            Self::Mapped(_) => Mapped::$konst,
        }
    };
}

impl Stage {
    /// Human-readable name of the current stage.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        delegate_const!(self, NAME)
    }

    /// Zero-based index of the current stage.
    #[must_use]
    pub const fn index(&self) -> usize {
        delegate_const!(self, INDEX)
    }

    /// Stage-specific metrics for diagnostics.
    #[must_use]
    pub fn metrics(&self) -> Option<StageMetrics> {
        delegate!(self, metrics)
    }

    /// Whether the pipeline is at the final stage.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Mapped(_))
    }

    /// Advance to the next stage; `Ok(None)` if already complete.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a fallible stage transition fails.
    pub fn next(self) -> Result<Option<Self>, PipelineError> {
        delegate!(self, next)
    }

    /// Run all remaining stages and return the intermediates.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if any remaining fallible stage fails.
    pub fn complete(self) -> Result<StagedResult, PipelineError> {
        let mut stage = self;
        loop {
            match stage {
                Self::Mapped(done) => return Ok(done.into_result()),
                other => {
                    #[allow(clippy::unreachable)]
                    let next = other
                        .next()?
                        .unwrap_or_else(|| unreachable!("only the final stage returns None"));
                    stage = next;
                }
            }
        }
    }
}

impl From<Pending> for Stage {
    fn from(s: Pending) -> Self {
        Self::Pending(s)
    }
}

impl From<Sampled> for Stage {
    fn from(s: Sampled) -> Self {
        Self::Sampled(s)
    }
}

impl From<Blurred> for Stage {
    fn from(s: Blurred) -> Self {
        Self::Blurred(s)
    }
}

impl From<EdgesDetected> for Stage {
    fn from(s: EdgesDetected) -> Self {
        Self::EdgesDetected(s)
    }
}

impl From<Mapped> for Stage {
    fn from(s: Mapped) -> Self {
        Self::Mapped(s)
    }
}

// ───────────────────── Pipeline entry point ──────────────────────────

/// Incremental glyph pipeline.
///
/// Created via [`Pipeline::new`], which stores the pixel buffer and
/// config without doing any processing.
pub struct Pipeline;

impl Pipeline {
    /// Create a new pipeline from a decoded pixel buffer and config.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(pixels: PixelBuffer, config: PipelineConfig) -> Pending {
        Pending { config, pixels }
    }
}
