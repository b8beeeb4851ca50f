//! Pipeline diagnostics: timing and counts for each stage.
//!
//! Every call to [`process_staged`](crate::process_staged) collects
//! diagnostics alongside the pipeline results. Durations are serialized
//! as fractional seconds (`f64`) because `std::time::Duration` does not
//! implement serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::edge::count_edge_cells;
use crate::glyph::{EdgeDirection, Glyph, RAMP_LEN};
use crate::types::{Dimensions, GlyphGrid, GrayImage};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// One entry per executed stage, in pipeline order.
    pub stages: Vec<StageDiagnostics>,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Stage name, as reported by [`Stage::name`](crate::pipeline::Stage::name).
    pub name: String,
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Luminance sampling metrics.
    Sample {
        /// Source width in pixels.
        source_width: u32,
        /// Source height in pixels.
        source_height: u32,
        /// Block edge length in pixels.
        downscale_factor: u32,
        /// Luminance grid width in cells.
        grid_width: u32,
        /// Luminance grid height in cells.
        grid_height: u32,
    },
    /// Blur metrics.
    Blur {
        /// Edge length of the fine kernel.
        fine_kernel: usize,
        /// Edge length of the coarse kernel.
        coarse_kernel: usize,
    },
    /// Difference-of-Gaussians metrics.
    EdgeField {
        /// Exclusive difference threshold.
        threshold: i16,
        /// Number of mask cells set to 255.
        edge_cell_count: u64,
        /// Total cell count for computing edge density.
        total_cell_count: u64,
    },
    /// Glyph mapping metrics.
    GlyphMapping {
        /// Whether edge glyphs were allowed.
        edge_glyphs_enabled: bool,
        /// Cells rendered with a directional edge glyph.
        edge_glyph_count: usize,
        /// Cells rendered with a ramp glyph.
        tonal_glyph_count: usize,
    },
}

/// High-level summary for the entire pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image dimensions in pixels.
    pub source: Dimensions,
    /// Glyph grid dimensions in cells.
    pub grid: Dimensions,
    /// Edge-mask cells set to 255, whether or not they became edge glyphs.
    pub edge_cell_count: u64,
    /// Cells per ramp index, darkest first.
    pub tonal_histogram: Vec<u64>,
    /// Cells per edge direction: horizontal, backslash, vertical, slash.
    pub edge_histogram: Vec<u64>,
}

impl PipelineSummary {
    /// Build the summary from the edge mask and the final glyph grid.
    #[must_use]
    pub fn new(source: Dimensions, edges: &GrayImage, glyphs: &GlyphGrid) -> Self {
        let mut tonal_histogram = vec![0; usize::from(RAMP_LEN)];
        let mut edge_histogram = vec![0; EdgeDirection::ALL.len()];
        for glyph in glyphs.cells() {
            let slot = match *glyph {
                Glyph::Tone(tone) => tonal_histogram.get_mut(usize::from(tone.get())),
                Glyph::Edge(dir) => edge_histogram.get_mut(usize::from(dir.ordinal())),
            };
            if let Some(count) = slot {
                *count += 1;
            }
        }
        Self {
            source,
            grid: glyphs.dimensions(),
            edge_cell_count: count_edge_cells(edges),
            tonal_histogram,
            edge_histogram,
        }
    }
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} -> {}x{} cells",
            self.summary.source.width,
            self.summary.source.height,
            self.summary.grid.width,
            self.summary.grid.height,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for stage in &self.stages {
            let ms = duration_ms(stage.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&stage.metrics);
            lines.push(format!("{:<24} {ms:>8.3}ms {pct:>9.1}%  {details}", stage.name));
        }

        lines.push(String::new());
        lines.push(format!("Edge mask cells: {}", self.summary.edge_cell_count));
        lines.push(format!("Tones: {:?}", self.summary.tonal_histogram));
        lines.push(format!(
            "Edges (- \\ | /): {:?}",
            self.summary.edge_histogram
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Sample {
            source_width,
            source_height,
            downscale_factor,
            grid_width,
            grid_height,
        } => format!(
            "{source_width}x{source_height} / {downscale_factor} -> {grid_width}x{grid_height}"
        ),
        StageMetrics::Blur {
            fine_kernel,
            coarse_kernel,
        } => format!("k={fine_kernel} k={coarse_kernel}"),
        StageMetrics::EdgeField {
            threshold,
            edge_cell_count,
            total_cell_count,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let density = if *total_cell_count > 0 {
                *edge_cell_count as f64 / *total_cell_count as f64 * 100.0
            } else {
                0.0
            };
            format!("threshold>{threshold} edges={edge_cell_count} ({density:.1}%)")
        }
        StageMetrics::GlyphMapping {
            edge_glyphs_enabled,
            edge_glyph_count,
            tonal_glyph_count,
        } => {
            if *edge_glyphs_enabled {
                format!("{edge_glyph_count} edge, {tonal_glyph_count} tonal")
            } else {
                format!("{tonal_glyph_count} tonal (edge glyphs off)")
            }
        }
    }
}
