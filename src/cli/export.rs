//! Export command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::CliOverrides;
use crate::transfer::FileTarget;

use super::{Session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(
    manifest: &Path,
    pack: &str,
    assets: Option<&Path>,
    output: Option<&Path>,
    config: Option<&Path>,
    overrides: CliOverrides,
) -> ExitCode {
    let session = match Session::start(config, &overrides) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let batch = match session.ingest(manifest, assets) {
        Ok(batch) => Arc::new(batch),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(format!("{}.json", pack)));
    let target = Arc::new(FileTarget::new(&output_path));
    let future = session.worker.send(batch, pack.to_string(), target, session.config.transfer_options());

    match session.runtime.block_on(future) {
        Ok(Ok(Some(true))) => {
            println!("Exported '{}' to {}", pack, output_path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(Ok(Some(false))) => {
            eprintln!("Error: failed to write '{}'", output_path.display());
            ExitCode::from(EXIT_ERROR)
        }
        Ok(Ok(None)) => {
            eprintln!("Error: no pack with identifier '{}' in {}", pack, manifest.display());
            ExitCode::from(EXIT_ERROR)
        }
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
