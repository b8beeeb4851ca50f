//! glyphic-pipeline: Pure image analysis and glyph selection (sans-IO).
//!
//! Converts an RGBA pixel buffer into a grid of glyphs through:
//! block-average luminance -> 3×3 and 7×7 binomial blur ->
//! difference-of-Gaussians edge mask -> per-cell Sobel orientation ->
//! tonal ramp or directional edge glyph.
//!
//! This crate has **no filesystem dependencies** -- it operates on
//! in-memory byte slices and pixel buffers and returns structured data.
//! Rendering lives in `glyphic-export`; file handling lives in the
//! `glyphic` binary.

pub mod blur;
pub mod decode;
pub mod diagnostics;
pub mod edge;
pub mod glyph;
pub mod luminance;
pub mod pipeline;
pub mod sobel;
pub mod types;

use std::time::Instant;

pub use diagnostics::PipelineDiagnostics;
pub use glyph::{EdgeDirection, Glyph, RAMP, Tone};
pub use pipeline::Pipeline;
pub use types::{
    Dimensions, GlyphGrid, GrayImage, PipelineConfig, PipelineError, PixelBuffer, RgbaImage,
    StagedResult,
};

use diagnostics::{PipelineSummary, StageDiagnostics};
use pipeline::{STAGE_COUNT, Stage};

/// Run the full pipeline on a decoded pixel buffer.
///
/// A pure function of `(pixels, config)`: running it twice on the same
/// input yields identical grids.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidScalar`] if `config.downscale_factor`
/// is zero or exceeds either image dimension.
pub fn process(pixels: &PixelBuffer, config: &PipelineConfig) -> Result<GlyphGrid, PipelineError> {
    let luminance = luminance::sample_luminance(pixels, config.downscale_factor)?;
    let (_, _, edges) = edge::difference_of_gaussians(&luminance);
    Ok(glyph::map_glyphs(
        &luminance,
        config.edge_glyphs.then_some(&edges),
    ))
}

/// Decode raw image bytes and run the full pipeline.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
/// Returns [`PipelineError::InvalidScalar`] for an unusable downscale factor.
pub fn process_bytes(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<GlyphGrid, PipelineError> {
    let pixels = decode::decode(image_bytes)?;
    process(&pixels, config)
}

/// Run the pipeline keeping every intermediate grid and collecting
/// per-stage diagnostics.
///
/// Takes the pixel buffer by value; it is released as soon as the
/// luminance grid has been sampled.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidScalar`] if `config.downscale_factor`
/// is zero or exceeds either image dimension.
pub fn process_staged(
    pixels: PixelBuffer,
    config: &PipelineConfig,
) -> Result<(StagedResult, PipelineDiagnostics), PipelineError> {
    let started = Instant::now();
    let mut stages = Vec::with_capacity(STAGE_COUNT - 1);
    let mut stage: Stage = Pipeline::new(pixels, config.clone()).into();

    let result = loop {
        match stage {
            Stage::Mapped(done) => break done.into_result(),
            current => {
                let stage_started = Instant::now();
                #[allow(clippy::unreachable)]
                let next = current
                    .next()?
                    .unwrap_or_else(|| unreachable!("only the final stage returns None"));
                let duration = stage_started.elapsed();
                if let Some(metrics) = next.metrics() {
                    log::debug!("stage {} finished in {duration:?}", next.name());
                    stages.push(StageDiagnostics {
                        name: next.name().to_string(),
                        duration,
                        metrics,
                    });
                }
                stage = next;
            }
        }
    };
    let diagnostics = PipelineDiagnostics {
        stages,
        total_duration: started.elapsed(),
        summary: PipelineSummary::new(result.source, &result.edges, &result.glyphs),
    };
    Ok((result, diagnostics))
}
