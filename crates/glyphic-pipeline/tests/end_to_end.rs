//! Integration test: synthetic images through the full pipeline.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use glyphic_pipeline::{
    EdgeDirection, Glyph, GlyphGrid, PipelineConfig, PipelineError, PixelBuffer, Tone, process,
    process_bytes, process_staged,
};
use image::Rgba;

/// A black disc on a dark gray background with a black horizontal bar
/// underneath. Background luminance is 95, just under the edge glyph
/// gate.
fn scene(width: u32, height: u32) -> PixelBuffer {
    let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 3.0);
    let radius = f64::from(width.min(height)) / 5.0;
    PixelBuffer::from_fn(width, height, |x, y| {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        let in_disc = dx.hypot(dy) < radius;
        let in_bar = y > height * 2 / 3 && y < height * 2 / 3 + height / 10;
        if in_disc || in_bar {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([94, 95, 96, 255])
        }
    })
}

fn config(factor: u32) -> PipelineConfig {
    PipelineConfig {
        downscale_factor: factor,
        ..PipelineConfig::default()
    }
}

fn assert_border_is_tonal(grid: &GlyphGrid) {
    let (w, h) = (grid.width(), grid.height());
    for y in 0..h {
        for x in 0..w {
            let border = x == 0 || y == 0 || x + 1 == w || y + 1 == h;
            if border {
                assert!(
                    !grid.get(x, y).unwrap().is_edge(),
                    "border cell ({x}, {y}) got an edge glyph"
                );
            }
        }
    }
}

#[test]
fn grid_dimensions_floor_divide() {
    for (w, h, s) in [(64, 48, 8), (65, 49, 8), (10, 7, 3), (5, 5, 5), (1, 1, 1)] {
        let grid = process(&scene(w, h), &config(s)).unwrap();
        assert_eq!(grid.width(), w / s, "{w}x{h} / {s}");
        assert_eq!(grid.height(), h / s, "{w}x{h} / {s}");
        assert_eq!(grid.cells().len(), (w / s * (h / s)) as usize);
    }
}

#[test]
fn scene_produces_edges_away_from_border() {
    let grid = process(&scene(160, 120), &config(2)).unwrap();
    assert!(grid.edge_count() > 0);
    assert_border_is_tonal(&grid);
    for glyph in grid.cells() {
        if let Glyph::Tone(tone) = glyph {
            assert!(tone.get() < 10);
        }
    }
}

#[test]
fn scene_has_horizontal_and_vertical_edges() {
    let grid = process(&scene(160, 120), &config(1)).unwrap();
    let has = |dir| grid.cells().contains(&Glyph::Edge(dir));
    assert!(has(EdgeDirection::Horizontal));
    assert!(has(EdgeDirection::Vertical));
}

#[test]
fn disabling_edges_only_replaces_edge_cells() {
    let pixels = scene(96, 96);
    let with_edges = process(&pixels, &config(2)).unwrap();
    let without = process(
        &pixels,
        &PipelineConfig {
            downscale_factor: 2,
            edge_glyphs: false,
        },
    )
    .unwrap();

    assert_eq!(without.edge_count(), 0);
    for (a, b) in with_edges.cells().iter().zip(without.cells()) {
        if !a.is_edge() {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn bright_image_never_gets_edge_glyphs() {
    let pixels = PixelBuffer::from_fn(64, 64, |x, _| {
        if x < 32 {
            Rgba([120, 120, 120, 255])
        } else {
            Rgba([250, 250, 250, 255])
        }
    });
    let grid = process(&pixels, &config(1)).unwrap();
    assert_eq!(grid.edge_count(), 0);
}

#[test]
fn white_image_is_brightest_ramp_entry() {
    let pixels = PixelBuffer::from_pixel(32, 16, Rgba([255, 255, 255, 255]));
    let grid = process(&pixels, &config(4)).unwrap();
    assert!(grid.cells().iter().all(|g| *g == Glyph::Tone(Tone::BRIGHTEST)));
}

#[test]
fn alpha_channel_is_ignored() {
    let opaque = PixelBuffer::from_pixel(24, 24, Rgba([90, 90, 90, 255]));
    let clear = PixelBuffer::from_pixel(24, 24, Rgba([90, 90, 90, 0]));
    assert_eq!(
        process(&opaque, &config(3)).unwrap(),
        process(&clear, &config(3)).unwrap()
    );
}

#[test]
fn invalid_factors_are_rejected() {
    let pixels = scene(20, 10);
    for factor in [0, 11, 21] {
        let err = process(&pixels, &config(factor)).unwrap_err();
        assert!(
            matches!(err, PipelineError::InvalidScalar { factor: f, width: 20, height: 10 } if f == factor),
            "factor {factor}: {err}"
        );
    }
}

#[test]
fn png_bytes_match_in_memory_buffer() {
    let pixels = scene(80, 60);
    let mut png = Vec::new();
    pixels
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    assert_eq!(
        process_bytes(&png, &config(4)).unwrap(),
        process(&pixels, &config(4)).unwrap()
    );
}

#[test]
fn staged_intermediates_share_grid_dimensions() {
    let (result, diagnostics) = process_staged(scene(72, 40), &config(4)).unwrap();
    let dims = (18, 10);
    assert_eq!(result.luminance.dimensions(), dims);
    assert_eq!(result.blur_fine.dimensions(), dims);
    assert_eq!(result.blur_coarse.dimensions(), dims);
    assert_eq!(result.edges.dimensions(), dims);
    assert_eq!((result.glyphs.width(), result.glyphs.height()), dims);
    assert!(result.edges.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert_eq!(diagnostics.summary.grid, result.glyphs.dimensions());
    assert_eq!(diagnostics.stages.len(), 4);
}

#[test]
fn repeated_runs_are_identical() {
    let pixels = scene(100, 70);
    let first = process(&pixels, &config(3)).unwrap();
    for _ in 0..3 {
        assert_eq!(process(&pixels, &config(3)).unwrap(), first);
    }
}

#[test]
fn glyph_grid_serializes_to_json() {
    let grid = process(&scene(40, 40), &config(4)).unwrap();
    let json = serde_json::to_string(&grid).unwrap();
    let back: GlyphGrid = serde_json::from_str(&json).unwrap();
    assert_eq!(back, grid);
}
