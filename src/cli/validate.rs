//! Validate command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::pack::StickerPack;

use super::{Session, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the validate command
pub fn run_validate(
    manifest: &Path,
    assets: Option<&Path>,
    config: Option<&Path>,
    overrides: CliOverrides,
    format: &str,
) -> ExitCode {
    if format != "text" && format != "json" {
        eprintln!("Error: --format must be 'text' or 'json'");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    let json = format == "json";

    let session = match Session::start(config, &overrides) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match session.ingest(manifest, assets) {
        Ok(batch) => {
            if json {
                let packs: Vec<_> = batch.packs.iter().map(pack_summary_json).collect();
                println!("{}", serde_json::json!({ "valid": true, "packs": packs }));
            } else {
                for pack in &batch.packs {
                    println!("{}", pack_summary_text(pack));
                }
                println!("{} pack(s) valid", batch.len());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::json!({ "valid": false, "error": e }));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn pack_summary_text(pack: &StickerPack) -> String {
    format!(
        "{}: {} stickers, {}, {}",
        pack.identifier(),
        pack.stickers().len(),
        pack.mode(),
        pack.formatted_size()
    )
}

fn pack_summary_json(pack: &StickerPack) -> serde_json::Value {
    serde_json::json!({
        "identifier": pack.identifier(),
        "name": pack.name(),
        "stickers": pack.stickers().len(),
        "animated": pack.is_animated(),
        "size": pack.byte_size(),
        "formatted_size": pack.formatted_size(),
    })
}
