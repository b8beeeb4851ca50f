//! Runs the built `glyphic` binary against files in a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::tempdir;

fn run_glyphic(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_glyphic"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("glyphic command should run")
}

fn write_png(path: &Path, img: &RgbaImage) {
    img.save_with_format(path, ImageFormat::Png)
        .expect("png should write");
}

fn gray_image(dir: &Path, name: &str) {
    write_png(
        &dir.join(name),
        &RgbaImage::from_pixel(16, 16, Rgba([128, 128, 128, 255])),
    );
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn renders_text_with_default_output_name() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");

    let output = run_glyphic(dir.path(), &["gray.png", "--scale", "4"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert_eq!(text, "========\n".repeat(4));
    assert!(!dir.path().join("palette.png").exists());
}

#[test]
fn atlas_then_raster_output() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");

    let atlas = run_glyphic(dir.path(), &["atlas"]);
    assert!(atlas.status.success(), "stderr: {}", stderr(&atlas));
    assert!(dir.path().join("palette.png").exists());

    let output = run_glyphic(
        dir.path(),
        &[
            "gray.png",
            "-s",
            "4",
            "--text-output",
            "art.txt",
            "--raster-output",
            "art.png",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("art.txt").exists());

    let raster = image::open(dir.path().join("art.png")).unwrap();
    assert_eq!((raster.width(), raster.height()), (32, 32));
}

#[test]
fn missing_input_exits_with_decode_status() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_glyphic(dir.path(), &["absent.png"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).starts_with("error: "));
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn undecodable_input_exits_with_decode_status() {
    let dir = tempdir().expect("tempdir should create");
    fs::write(dir.path().join("junk.png"), b"definitely not a png").unwrap();
    let output = run_glyphic(dir.path(), &["junk.png"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("failed to decode image"));
}

#[test]
fn usage_error_keeps_clap_status() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_glyphic(dir.path(), &["--no-such-flag", "in.png"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn oversized_scale_exits_with_scalar_status() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");
    for scale in ["0", "17"] {
        let output = run_glyphic(dir.path(), &["gray.png", "-s", scale]);
        assert_eq!(output.status.code(), Some(4), "scale {scale}");
        assert!(stderr(&output).contains("invalid downscale factor"));
    }
    assert!(!dir.path().join("output.txt").exists());
}

#[test]
fn bad_palette_exits_with_palette_status_and_writes_nothing() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");
    // Decodes fine but is far too small to be an atlas.
    write_png(
        &dir.path().join("tiny.png"),
        &RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])),
    );

    let output = run_glyphic(
        dir.path(),
        &[
            "gray.png",
            "-s",
            "4",
            "--palette",
            "tiny.png",
            "--raster-output",
            "art.png",
        ],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("palette"));
    assert!(!dir.path().join("output.txt").exists());
    assert!(!dir.path().join("art.png").exists());

    let missing = run_glyphic(
        dir.path(),
        &["gray.png", "-s", "4", "--raster-output", "art.png"],
    );
    assert_eq!(missing.status.code(), Some(3));
}

#[test]
fn json_diagnostics_on_stdout() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");

    let output = run_glyphic(dir.path(), &["gray.png", "-s", "2", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["grid"]["width"], 8);
    assert_eq!(json["summary"]["grid"]["height"], 8);
    assert_eq!(json["stages"].as_array().unwrap().len(), 4);
}

#[test]
fn config_json_replaces_flags() {
    let dir = tempdir().expect("tempdir should create");
    gray_image(dir.path(), "gray.png");

    let output = run_glyphic(
        dir.path(),
        &[
            "gray.png",
            "-s",
            "1",
            "--config-json",
            r#"{"downscale_factor": 8, "edge_glyphs": false}"#,
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = fs::read_to_string(dir.path().join("output.txt")).unwrap();
    assert_eq!(text.lines().count(), 2);

    let bad = run_glyphic(dir.path(), &["gray.png", "--config-json", "{nope"]);
    assert_eq!(bad.status.code(), Some(1));
}

#[test]
fn repeated_runs_write_identical_files() {
    let dir = tempdir().expect("tempdir should create");
    write_png(
        &dir.path().join("ramp.png"),
        &RgbaImage::from_fn(48, 32, |x, y| {
            let v = u8::try_from((x * 5 + y * 2) % 256).unwrap();
            Rgba([v, 255 - v, v / 2, 255])
        }),
    );
    assert!(run_glyphic(dir.path(), &["atlas"]).status.success());

    let mut outputs = Vec::new();
    for name in ["a", "b"] {
        let txt = format!("{name}.txt");
        let png = format!("{name}.png");
        let output = run_glyphic(
            dir.path(),
            &["ramp.png", "-s", "2", "--text-output", &txt, "--raster-output", &png],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        outputs.push((
            fs::read(dir.path().join(&txt)).unwrap(),
            fs::read(dir.path().join(&png)).unwrap(),
        ));
    }
    assert_eq!(outputs[0], outputs[1]);
}
