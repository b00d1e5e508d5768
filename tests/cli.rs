extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::process::Command;

fn cli() -> Command {
    Command::cargo_bin("fractalview").unwrap()
}

#[test]
fn renders_a_mandelbrot_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mandel.png");
    cli()
        .args(&[
            "--output",
            path.to_str().unwrap(),
            "--size",
            "64x48",
            "--iterations",
            "64",
        ])
        .assert()
        .success();
    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn renders_a_julia_png_with_a_palette_file() {
    let dir = tempfile::tempdir().unwrap();
    let palette = dir.path().join("palette.json");
    let mut file = fs::File::create(&palette).unwrap();
    file.write_all(
        b"{\"hue\":{\"range\":[0.0,1.0],\"easing\":\"InOutCubic\"},\
          \"saturation\":{\"range\":[1.0,1.0],\"easing\":\"Fixed\"},\
          \"brightness\":{\"range\":[0.0,1.0],\
          \"easing\":{\"p1\":[0.5,0.0],\"p2\":[0.5,1.0]}}}",
    )
    .unwrap();

    let path = dir.path().join("julia.png");
    cli()
        .args(&[
            "--output",
            path.to_str().unwrap(),
            "--kind",
            "julia",
            "--constant=-0.3,-0.63",
            "--size",
            "64x64",
            "--palette",
            palette.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert!(fs::read(&path).unwrap().len() > 8);
}

#[test]
fn rejects_a_malformed_size() {
    cli()
        .args(&["--output", "out.png", "--size", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output image size"));
}

#[test]
fn rejects_a_nonpositive_zoom() {
    cli()
        .args(&["--output", "out.png", "--zoom", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Zoom must be strictly positive"));
}

#[test]
fn requires_an_output_path() {
    cli().assert().failure();
}

#[test]
fn reports_a_bad_palette_file() {
    let dir = tempfile::tempdir().unwrap();
    let palette = dir.path().join("palette.json");
    let mut file = fs::File::create(&palette).unwrap();
    file.write_all(
        b"{\"hue\":{\"range\":[0.0,1.0],\"easing\":\"Wobble\"},\
          \"saturation\":{\"range\":[1.0,1.0],\"easing\":\"Fixed\"},\
          \"brightness\":{\"range\":[0.0,1.0],\"easing\":\"Linear\"}}",
    )
    .unwrap();

    cli()
        .args(&[
            "--output",
            dir.path().join("out.png").to_str().unwrap(),
            "--palette",
            palette.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Palette failure"));
}
