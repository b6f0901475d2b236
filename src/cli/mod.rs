//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod validate;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, StickerConfig};
use crate::ingest::StickerPackBatch;
use crate::manifest::PackManifest;
use crate::source::DirAssetSource;
use crate::validate::Validator;
use crate::worker::PackWorker;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// stickerpack - Validate sticker pack manifests and export transfer payloads
#[derive(Parser)]
#[command(name = "stickerpack")]
#[command(about = "Validate sticker pack manifests and export transfer payloads")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every pack in a manifest
    Validate {
        /// Manifest file (contents.json)
        manifest: PathBuf,

        /// Directory holding the images named in the manifest
        /// (defaults to the manifest's directory)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Also check identifier characters, links and emojis
        #[arg(long)]
        strict: bool,

        /// Config file (defaults to the nearest stickerpack.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Encode one pack and write its transfer payload
    Export {
        /// Manifest file (contents.json)
        manifest: PathBuf,

        /// Identifier of the pack to export
        #[arg(long)]
        pack: String,

        /// Directory holding the images named in the manifest
        /// (defaults to the manifest's directory)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Output file (defaults to {pack}.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bundle identifier of the sending app
        #[arg(long)]
        bundle_identifier: Option<String>,

        /// Config file (defaults to the nearest stickerpack.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { manifest, assets, strict, config, format } => validate::run_validate(
            &manifest,
            assets.as_deref(),
            config.as_deref(),
            CliOverrides { strict: strict.then_some(true), ..Default::default() },
            &format,
        ),
        Commands::Export { manifest, pack, assets, output, bundle_identifier, config } => {
            export::run_export(
                &manifest,
                &pack,
                assets.as_deref(),
                output.as_deref(),
                config.as_deref(),
                CliOverrides { bundle_identifier, ..Default::default() },
            )
        }
    }
}

/// Install the log subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Everything a command needs after argument handling
pub(crate) struct Session {
    pub config: StickerConfig,
    pub worker: PackWorker,
    pub runtime: tokio::runtime::Runtime,
}

impl Session {
    /// Load config and start the worker and the runtime that waits on it
    pub fn start(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, String> {
        let mut config = load_config(config_path).map_err(|e| e.to_string())?;
        merge_cli_overrides(&mut config, overrides);

        let worker = PackWorker::spawn().map_err(|e| e.to_string())?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| format!("failed to start runtime: {}", e))?;

        Ok(Self { config, worker, runtime })
    }

    /// Parse the manifest and ingest it on the worker
    pub fn ingest(&self, manifest_path: &Path, assets: Option<&Path>) -> Result<StickerPackBatch, String> {
        let manifest = PackManifest::load(manifest_path)
            .map_err(|e| format!("cannot load '{}': {}", manifest_path.display(), e))?;

        let assets_dir = match assets {
            Some(dir) => dir.to_path_buf(),
            None => manifest_path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        tracing::debug!(assets = %assets_dir.display(), "resolving sticker files");

        let validator = Validator::new().with_limits(self.config.limits.clone());
        let future = self.worker.ingest(
            manifest,
            Arc::new(DirAssetSource::new(assets_dir)),
            validator,
            self.config.ingest_options(),
        );

        match self.runtime.block_on(future) {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
