//! stickerpack - Library for validating and transferring sticker packs
//!
//! This library provides functionality to:
//! - Validate tray and sticker images against the receiving app's limits
//! - Canonicalize sticker emojis and accessibility text
//! - Load every pack of a `contents.json` manifest on a background worker
//! - Encode a validated pack into the transfer payload and hand it off
//!
//! ```no_run
//! use stickerpack::ingest::{ingest_manifest, IngestOptions};
//! use stickerpack::manifest::PackManifest;
//! use stickerpack::source::DirAssetSource;
//! use stickerpack::Validator;
//! use std::path::Path;
//!
//! let manifest = PackManifest::load(Path::new("packs/contents.json"))?;
//! let assets = DirAssetSource::new("packs");
//! let batch = ingest_manifest(&manifest, &assets, &Validator::new(), &IngestOptions::default())?;
//! for pack in &batch.packs {
//!     println!("{}: {}", pack.identifier(), pack.formatted_size());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod asset;
pub mod cli;
pub mod codec;
pub mod config;
pub mod emoji;
pub mod error;
pub mod ingest;
pub mod limits;
pub mod manifest;
pub mod pack;
pub mod payload;
pub mod source;
pub mod sticker;
pub mod transfer;
pub mod validate;
pub mod worker;

pub use error::{IngestError, StickerPackError};
pub use limits::Limits;
pub use pack::StickerPack;
pub use sticker::Sticker;
pub use validate::Validator;
