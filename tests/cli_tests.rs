//! CLI integration tests for `stickerpack validate` and `stickerpack export`.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run stickerpack with the given arguments and return (stdout, stderr, exit code).
fn run(args: &[&str], cwd: &Path) -> (String, String, Option<i32>) {
    let output = Command::new(env!("CARGO_BIN_EXE_stickerpack"))
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute stickerpack");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([90, 160, 220, 255])))
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode fixture");
    buffer.into_inner()
}

/// A pack directory with contents.json, a tray and `stickers` sticker files
fn pack_dir(identifier: &str, stickers: usize) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("tray.png"), png(96, 96)).unwrap();

    let mut entries = Vec::new();
    for i in 0..stickers {
        let name = format!("{:02}.png", i);
        std::fs::write(dir.path().join(&name), png(512, 512)).unwrap();
        entries.push(serde_json::json!({ "image_file": name, "emojis": ["🙂"] }));
    }
    let manifest = serde_json::json!({
        "android_play_store_link": "https://play.google.com/store/apps/details?id=com.example",
        "sticker_packs": [{
            "identifier": identifier,
            "name": "Cuppy",
            "publisher": "Jane Doe",
            "tray_image_file": "tray.png",
            "stickers": entries,
        }]
    });
    std::fs::write(dir.path().join("contents.json"), manifest.to_string()).unwrap();
    dir
}

#[test]
fn test_validate_text_output() {
    let dir = pack_dir("cuppyID", 3);
    let (stdout, stderr, code) = run(&["validate", "contents.json"], dir.path());
    assert_eq!(code, Some(0), "stderr: {}", stderr);
    assert!(stdout.contains("cuppyID: 3 stickers, static"), "stdout: {}", stdout);
    assert!(stdout.contains("1 pack(s) valid"));
}

#[test]
fn test_validate_json_output() {
    let dir = pack_dir("cuppyID", 3);
    let (stdout, _, code) = run(&["validate", "contents.json", "--format", "json"], dir.path());
    assert_eq!(code, Some(0));
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["packs"][0]["identifier"], "cuppyID");
    assert_eq!(json["packs"][0]["stickers"], 3);
    assert_eq!(json["packs"][0]["animated"], false);
}

#[test]
fn test_validate_reports_too_few_stickers() {
    let dir = pack_dir("cuppyID", 2);
    let (_, stderr, code) = run(&["validate", "contents.json"], dir.path());
    assert_eq!(code, Some(1));
    assert!(stderr.contains("pack 'cuppyID'"), "stderr: {}", stderr);
    assert!(stderr.contains("allowed range is 3 to 30"), "stderr: {}", stderr);
}

#[test]
fn test_validate_invalid_format_flag() {
    let dir = pack_dir("cuppyID", 3);
    let (_, _, code) = run(&["validate", "contents.json", "--format", "yaml"], dir.path());
    assert_eq!(code, Some(2));
}

#[test]
fn test_validate_strict_from_flag_and_config() {
    let dir = pack_dir("cuppy/ID", 3);

    let (_, _, code) = run(&["validate", "contents.json"], dir.path());
    assert_eq!(code, Some(0), "lenient mode accepts any identifier characters");

    let (_, stderr, code) = run(&["validate", "contents.json", "--strict"], dir.path());
    assert_eq!(code, Some(1));
    assert!(stderr.contains("identifier 'cuppy/ID' is invalid"), "stderr: {}", stderr);

    std::fs::write(dir.path().join("stickerpack.toml"), "[validate]\nstrict = true\n").unwrap();
    let (_, _, code) = run(&["validate", "contents.json"], dir.path());
    assert_eq!(code, Some(1));
}

#[test]
fn test_validate_config_limits() {
    let dir = pack_dir("cuppyID", 3);
    std::fs::write(dir.path().join("custom.toml"), "[limits]\nmin_stickers_per_pack = 4\n").unwrap();
    let (_, stderr, code) = run(&["validate", "contents.json", "--config", "custom.toml"], dir.path());
    assert_eq!(code, Some(1));
    assert!(stderr.contains("allowed range is 4 to 30"), "stderr: {}", stderr);
}

#[test]
fn test_validate_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run(&["validate", "nope.json"], dir.path());
    assert_eq!(code, Some(1));
    assert!(stderr.contains("cannot load 'nope.json'"));
}

#[test]
fn test_export_writes_payload() {
    let dir = pack_dir("cuppyID", 3);
    let (stdout, stderr, code) = run(&["export", "contents.json", "--pack", "cuppyID", "-o", "out.json"], dir.path());
    assert_eq!(code, Some(0), "stderr: {}", stderr);
    assert!(stdout.contains("Exported 'cuppyID'"));

    let payload: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("out.json")).unwrap()).unwrap();
    assert_eq!(payload["identifier"], "cuppyID");
    assert_eq!(payload["stickers"].as_array().unwrap().len(), 3);
    assert_eq!(
        payload["android_play_store_link"],
        "https://play.google.com/store/apps/details?id=com.example"
    );
    assert!(payload.get("ios_app_store_link").is_none());
    assert!(payload.get("animated_sticker_pack").is_none());
}

#[test]
fn test_export_unknown_pack() {
    let dir = pack_dir("cuppyID", 3);
    let (_, stderr, code) = run(&["export", "contents.json", "--pack", "other"], dir.path());
    assert_eq!(code, Some(1));
    assert!(stderr.contains("no pack with identifier 'other'"));
}

#[test]
fn test_export_refuses_sample_bundle_identifier() {
    let dir = pack_dir("cuppyID", 3);
    let (_, stderr, code) = run(
        &["export", "contents.json", "--pack", "cuppyID", "--bundle-identifier", "WA.WAStickersThirdParty"],
        dir.path(),
    );
    assert_eq!(code, Some(1));
    assert!(stderr.contains("default sample identifier"), "stderr: {}", stderr);
    assert!(!dir.path().join("cuppyID.json").exists());
}
