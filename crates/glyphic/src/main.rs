//! glyphic: convert a raster image into edge-aware glyph art.
//!
//! Reads an image, runs the glyph pipeline, and writes the result as a
//! text file and, optionally, as a raster tiled from a palette atlas.
//!
//! # Usage
//!
//! ```text
//! glyphic [OPTIONS] <IMAGE_PATH>
//! glyphic atlas [--output palette.png]
//! ```
//!
//! # Exit status
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | 1    | bad `--config-json`, output I/O or encode |
//! | 2    | command-line usage error (from clap)      |
//! | 3    | palette atlas unreadable or unusable      |
//! | 4    | invalid downscale factor                  |
//! | 5    | source image unreadable or undecodable    |

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glyphic_export::{ExportError, PaletteAtlas};
use glyphic_pipeline::{PipelineConfig, PipelineError};

/// Convert a raster image into edge-aware glyph art.
///
/// Dark outlines become directional glyphs (`--`, `||`, `//`, `\\`);
/// everything else maps onto a ten-step luminance ramp.
#[derive(Debug, Parser)]
#[command(
    name = "glyphic",
    version,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the input image (PNG, JPEG, BMP, WebP).
    #[arg(required = true)]
    image_path: Option<PathBuf>,

    /// Downscale factor: edge length in pixels of each averaged block.
    #[arg(
        short,
        long,
        default_value_t = PipelineConfig::DEFAULT_DOWNSCALE_FACTOR,
        value_parser = clap::builder::RangedU64ValueParser::<u32>::new()
    )]
    scale: u32,

    /// Palette atlas used for raster output.
    #[arg(long, default_value = DEFAULT_PALETTE)]
    palette: PathBuf,

    /// Where to write the text rendering.
    #[arg(long, default_value = "output.txt")]
    text_output: PathBuf,

    /// Also render a raster through the palette and write it here (PNG).
    #[arg(long)]
    raster_output: Option<PathBuf>,

    /// Render tones only; no directional edge glyphs.
    #[arg(long)]
    no_edges: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, `--scale` and `--no-edges` are ignored. The JSON
    /// must be a valid `PipelineConfig` serialization; missing fields
    /// take their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print pipeline diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the built-in palette atlas as a PNG.
    Atlas {
        /// Destination file.
        #[arg(short, long, default_value = DEFAULT_PALETTE)]
        output: PathBuf,
    },
}

const DEFAULT_PALETTE: &str = "palette.png";

/// A terminal failure, carrying the exit status it maps to.
#[derive(Debug)]
enum Failure {
    /// Bad configuration, output I/O, or encoding.
    General(String),
    /// Source image unreadable or undecodable.
    Decode(String),
    /// Palette atlas unreadable or unusable.
    Palette(String),
    /// Downscale factor out of range.
    InvalidScalar(String),
}

impl Failure {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::General(_) => 1,
            Self::Palette(_) => 3,
            Self::InvalidScalar(_) => 4,
            Self::Decode(_) => 5,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General(msg) | Self::Decode(msg) | Self::Palette(msg) | Self::InvalidScalar(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<PipelineError> for Failure {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidScalar { .. } => Self::InvalidScalar(e.to_string()),
            PipelineError::ImageDecode(_) | PipelineError::EmptyInput => {
                Self::Decode(e.to_string())
            }
            PipelineError::BufferSize { .. }
            | PipelineError::GlyphIndex(_)
            | PipelineError::GridShape { .. } => Self::General(e.to_string()),
        }
    }
}

impl From<ExportError> for Failure {
    fn from(e: ExportError) -> Self {
        if e.is_palette_error() {
            Self::Palette(e.to_string())
        } else {
            Self::General(e.to_string())
        }
    }
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, Failure> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json)
            .map_err(|e| Failure::General(format!("failed to parse --config-json: {e}")));
    }

    Ok(PipelineConfig {
        downscale_factor: cli.scale,
        edge_glyphs: !cli.no_edges,
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), Failure> {
    std::fs::write(path, bytes)
        .map_err(|e| Failure::General(format!("failed to write {}: {e}", path.display())))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn write_atlas(output: &Path) -> Result<(), Failure> {
    let png = glyphic_export::builtin_atlas_png()?;
    write_output(output, &png)
}

fn render_image(cli: &Cli, image_path: &Path) -> Result<(), Failure> {
    let config = config_from_cli(cli)?;
    log::info!("config: {config:?}");

    let image_bytes = std::fs::read(image_path).map_err(|e| {
        Failure::Decode(format!("failed to read {}: {e}", image_path.display()))
    })?;
    let pixels = glyphic_pipeline::decode::decode(&image_bytes)?;
    log::info!(
        "image: {} ({}x{})",
        image_path.display(),
        pixels.width(),
        pixels.height()
    );

    let (staged, diagnostics) = glyphic_pipeline::process_staged(pixels, &config)?;

    // Validate the palette before any output exists, so a broken
    // palette leaves nothing half-written.
    let raster = match cli.raster_output {
        Some(ref raster_path) => {
            let palette_bytes = std::fs::read(&cli.palette).map_err(|e| {
                Failure::Palette(format!(
                    "failed to read palette {}: {e}",
                    cli.palette.display()
                ))
            })?;
            let atlas = PaletteAtlas::decode(&palette_bytes)?;
            let png = glyphic_export::to_png(&atlas, &staged.glyphs)?;
            Some((raster_path, png))
        }
        None => None,
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&diagnostics)
            .map_err(|e| Failure::General(format!("failed to serialize diagnostics: {e}")))?;
        println!("{json}");
    } else {
        log::info!("{}", diagnostics.report());
    }

    write_output(&cli.text_output, glyphic_export::to_text(&staged.glyphs).as_bytes())?;
    if let Some((raster_path, png)) = raster {
        write_output(raster_path, &png)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Failure> {
    match (&cli.command, &cli.image_path) {
        (Some(Command::Atlas { output }), _) => write_atlas(output),
        (None, Some(image_path)) => render_image(cli, image_path),
        (None, None) => Err(Failure::General("no input image given".to_string())),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("error: {failure}");
            ExitCode::from(failure.exit_code())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_pipeline_config() {
        let cli = Cli::try_parse_from(["glyphic", "in.png"]).unwrap();
        assert_eq!(config_from_cli(&cli).unwrap(), PipelineConfig::default());
        assert_eq!(cli.palette, PathBuf::from("palette.png"));
        assert_eq!(cli.text_output, PathBuf::from("output.txt"));
        assert!(cli.raster_output.is_none());
    }

    #[test]
    fn flags_build_config() {
        let cli = Cli::try_parse_from(["glyphic", "in.png", "-s", "3", "--no-edges"]).unwrap();
        assert_eq!(
            config_from_cli(&cli).unwrap(),
            PipelineConfig {
                downscale_factor: 3,
                edge_glyphs: false,
            }
        );
    }

    #[test]
    fn zero_scale_reaches_the_pipeline() {
        let cli = Cli::try_parse_from(["glyphic", "in.png", "--scale", "0"]).unwrap();
        assert_eq!(config_from_cli(&cli).unwrap().downscale_factor, 0);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "glyphic",
            "in.png",
            "-s",
            "3",
            "--config-json",
            r#"{"downscale_factor": 5}"#,
        ])
        .unwrap();
        assert_eq!(
            config_from_cli(&cli).unwrap(),
            PipelineConfig {
                downscale_factor: 5,
                edge_glyphs: true,
            }
        );
    }

    #[test]
    fn malformed_config_json_is_general_failure() {
        let cli =
            Cli::try_parse_from(["glyphic", "in.png", "--config-json", "{nope"]).unwrap();
        let failure = config_from_cli(&cli).unwrap_err();
        assert_eq!(failure.exit_code(), 1);
    }

    #[test]
    fn atlas_subcommand_needs_no_image() {
        let cli = Cli::try_parse_from(["glyphic", "atlas", "-o", "p.png"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Atlas { ref output }) if output == Path::new("p.png")
        ));
    }

    #[test]
    fn image_path_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["glyphic"]).is_err());
    }

    #[test]
    fn error_classes_map_to_distinct_codes() {
        let scalar = Failure::from(PipelineError::InvalidScalar {
            factor: 0,
            width: 1,
            height: 1,
        });
        let decode = Failure::from(PipelineError::EmptyInput);
        let palette = Failure::from(ExportError::EmptyPalette);
        let codes = [scalar.exit_code(), decode.exit_code(), palette.exit_code()];
        assert_eq!(codes, [4, 5, 3]);
    }

    #[test]
    fn decode_status_differs_from_usage_status() {
        let usage = Cli::try_parse_from(["glyphic"]).unwrap_err();
        let decode = Failure::from(PipelineError::EmptyInput);
        assert_ne!(usage.exit_code(), i32::from(decode.exit_code()));
        assert_eq!(decode.exit_code(), 5);
    }
}
