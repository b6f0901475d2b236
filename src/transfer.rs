//! Handing an encoded pack to the receiving app
//!
//! The host platform supplies a [`TransferTarget`]: the exchange mechanism
//! (pasteboard plus URL launch on iOS) and a clipboard.
//! This module packages the payload into a [`Handoff`] and triggers it.

use crate::error::TransferError;
use crate::manifest::StoreLinks;
use crate::pack::StickerPack;
use crate::payload::encode_pack;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Exchange type the receiving app reads sticker packs from
pub const PASTEBOARD_DATA_TYPE: &str = "net.whatsapp.third-party.sticker-pack";
/// How long the exchanged data stays available
pub const PASTEBOARD_EXPIRATION: Duration = Duration::from_secs(60);
/// URL that opens the receiving app's import flow
pub const HANDOFF_URL: &str = "whatsapp://stickerPack";
/// Bundle identifier of the sample app, which must be replaced before shipping
pub const DEFAULT_BUNDLE_IDENTIFIER: &str = "WA.WAStickersThirdParty";

/// One payload ready for the exchange mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    pub data_type: &'static str,
    pub expiration: Duration,
    pub url: &'static str,
    /// Serialized JSON payload
    pub data: Vec<u8>,
}

impl Handoff {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data_type: PASTEBOARD_DATA_TYPE, expiration: PASTEBOARD_EXPIRATION, url: HANDOFF_URL, data }
    }
}

/// Platform hooks needed to hand data to the receiving app.
pub trait TransferTarget: Send + Sync {
    /// Whether the receiving app is installed and can accept a handoff
    fn can_handoff(&self) -> bool;

    /// Publish the handoff. Returns whether the handoff was attempted.
    fn trigger_transfer(&self, handoff: &Handoff) -> bool;

    fn copy_image_to_clipboard(&self, png: &[u8]);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOptions {
    /// Bundle identifier of the sending app, checked against the sample's
    pub bundle_identifier: Option<String>,
}

/// Encode `pack` and build its handoff without triggering it
pub fn build_handoff(
    pack: &StickerPack,
    links: &StoreLinks,
    options: &TransferOptions,
) -> Result<Handoff, TransferError> {
    if let Some(bundle) = options.bundle_identifier.as_deref() {
        if bundle.contains(DEFAULT_BUNDLE_IDENTIFIER) {
            return Err(TransferError::DefaultBundleIdentifier(bundle.to_string()));
        }
    }

    let payload = encode_pack(pack, links)?;
    Ok(Handoff::new(payload.to_json_bytes()?))
}

/// Encode `pack` and hand it to `target`.
///
/// Returns `Ok(false)` without encoding when the target cannot accept a
/// handoff, otherwise whatever the target reports.
pub fn send_pack(
    pack: &StickerPack,
    links: &StoreLinks,
    target: &dyn TransferTarget,
    options: &TransferOptions,
) -> Result<bool, TransferError> {
    if !target.can_handoff() {
        tracing::debug!(pack = pack.identifier(), "transfer target unavailable");
        return Ok(false);
    }

    let handoff = build_handoff(pack, links, options)?;
    tracing::debug!(pack = pack.identifier(), bytes = handoff.data.len(), "triggering transfer");
    Ok(target.trigger_transfer(&handoff))
}

/// Writes handoffs to a file instead of a platform exchange
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where clipboard images go: the target path with a `png` extension
    pub fn clipboard_path(&self) -> PathBuf {
        self.path.with_extension("png")
    }
}

impl TransferTarget for FileTarget {
    fn can_handoff(&self) -> bool {
        true
    }

    fn trigger_transfer(&self, handoff: &Handoff) -> bool {
        match fs::write(&self.path, &handoff.data) {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    data_type = handoff.data_type,
                    url = handoff.url,
                    "wrote sticker pack handoff"
                );
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to write handoff");
                false
            }
        }
    }

    fn copy_image_to_clipboard(&self, png: &[u8]) {
        let path = self.clipboard_path();
        if let Err(e) = fs::write(&path, png) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write clipboard image");
        }
    }
}
