//! Transfer payload encoding
//!
//! Turns a validated pack into the JSON structure the receiving app reads.
//! Binary fields are base64 (standard alphabet, padded). Sticker images are
//! always sent as WebP; the tray is always sent as PNG.

use crate::error::TransferError;
use crate::manifest::StoreLinks;
use crate::pack::StickerPack;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// Outbound pack as the receiving app expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferPayload {
    pub identifier: String,
    pub name: String,
    pub publisher: String,
    pub tray_image: String,
    /// Present only for animated packs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated_sticker_pack: Option<bool>,
    pub stickers: Vec<StickerPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios_app_store_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_play_store_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StickerPayload {
    pub image_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_text: Option<String>,
}

impl TransferPayload {
    pub fn to_value(&self) -> Result<serde_json::Value, TransferError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TransferError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Encode `pack` for transfer.
///
/// A sticker that cannot be re-encoded is left out of the payload and logged.
/// The tray failing to encode is an error.
pub fn encode_pack(pack: &StickerPack, links: &StoreLinks) -> Result<TransferPayload, TransferError> {
    let tray = pack.tray_image().png_bytes().map_err(TransferError::TrayImage)?;

    let mut stickers = Vec::with_capacity(pack.stickers().len());
    for (index, sticker) in pack.stickers().iter().enumerate() {
        match sticker.image().animation_encoded_bytes() {
            Ok(bytes) => stickers.push(StickerPayload {
                image_data: STANDARD.encode(bytes),
                emojis: sticker.emojis().map(<[String]>::to_vec),
                accessibility_text: sticker.accessibility_text().map(str::to_string),
            }),
            Err(e) => {
                tracing::warn!(pack = pack.identifier(), index, error = %e, "dropping sticker from transfer");
            }
        }
    }

    Ok(TransferPayload {
        identifier: pack.identifier().to_string(),
        name: pack.name().to_string(),
        publisher: pack.publisher().to_string(),
        tray_image: STANDARD.encode(tray),
        animated_sticker_pack: pack.is_animated().then_some(true),
        stickers,
        ios_app_store_link: links.ios_app_store_link.clone(),
        android_play_store_link: links.android_play_store_link.clone(),
    })
}
