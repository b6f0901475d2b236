//! Batch loading of every pack in a manifest
//!
//! Packs are built in manifest order and the first error aborts the whole
//! batch. A partially loaded batch is never returned.

use crate::error::{IngestError, StickerPackError};
use crate::manifest::{normalize_optional, PackDescriptor, PackManifest, StoreLinks};
use crate::pack::{PackInfo, StickerPack};
use crate::source::AssetSource;
use crate::sticker::{ImageSource, StickerSource};
use crate::validate::{
    validate_email, validate_identifier_charset, validate_store_link, validate_website, Validator,
    APP_STORE_HOST, PLAY_STORE_HOST,
};
use std::collections::HashSet;

/// Ingestion options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Also check identifier characters, email and link shapes, that the manifest
    /// lists at least one pack and that every sticker has an emoji
    pub strict: bool,
}

/// Every pack of one manifest, fully validated
#[derive(Debug, Default)]
pub struct StickerPackBatch {
    pub packs: Vec<StickerPack>,
    pub store_links: StoreLinks,
}

impl StickerPackBatch {
    pub fn find(&self, identifier: &str) -> Option<&StickerPack> {
        self.packs.iter().find(|pack| pack.identifier() == identifier)
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

/// Build and validate every pack in `manifest`.
pub fn ingest_manifest(
    manifest: &PackManifest,
    assets: &dyn AssetSource,
    validator: &Validator,
    options: &IngestOptions,
) -> Result<StickerPackBatch, IngestError> {
    let store_links = manifest.store_links();
    if options.strict {
        if manifest.sticker_packs.is_empty() {
            return Err(IngestError::new("manifest", StickerPackError::EmptyPackList));
        }
        check_store_links(&store_links).map_err(|e| IngestError::new("manifest", e))?;
    }

    let mut seen = HashSet::new();
    let mut packs = Vec::with_capacity(manifest.sticker_packs.len());

    for (index, descriptor) in manifest.sticker_packs.iter().enumerate() {
        let identifier = match descriptor.identifier.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(IngestError::new(
                    format!("pack #{}", index),
                    StickerPackError::DuplicateOrMissingIdentifier(None),
                ))
            }
        };
        let location = format!("pack '{}'", identifier);
        if !seen.insert(identifier) {
            return Err(IngestError::new(
                location,
                StickerPackError::DuplicateOrMissingIdentifier(Some(identifier.to_string())),
            ));
        }

        let pack = load_pack(identifier, descriptor, assets, validator, options)
            .map_err(|(at, e)| IngestError::new(at.unwrap_or(location), e))?;

        tracing::debug!(
            identifier,
            stickers = pack.stickers().len(),
            animated = pack.is_animated(),
            "loaded sticker pack"
        );
        packs.push(pack);
    }

    tracing::info!(packs = packs.len(), "sticker pack manifest ingested");
    Ok(StickerPackBatch { packs, store_links })
}

/// Errors carry a location when they come from one sticker
type PackResult<T> = Result<T, (Option<String>, StickerPackError)>;

fn load_pack(
    identifier: &str,
    descriptor: &PackDescriptor,
    assets: &dyn AssetSource,
    validator: &Validator,
    options: &IngestOptions,
) -> PackResult<StickerPack> {
    let info = PackInfo {
        identifier: identifier.to_string(),
        name: descriptor.name.clone(),
        publisher: descriptor.publisher.clone(),
        publisher_email: normalize_optional(descriptor.publisher_email.as_deref()),
        publisher_website: normalize_optional(descriptor.publisher_website.as_deref()),
        privacy_policy_website: normalize_optional(descriptor.privacy_policy_website.as_deref()),
        license_agreement_website: normalize_optional(descriptor.license_agreement_website.as_deref()),
        animated: descriptor.animated_sticker_pack.unwrap_or(false),
    };
    if options.strict {
        check_pack_info(&info).map_err(|e| (None, e))?;
    }

    if descriptor.tray_image_file.is_empty() {
        return Err((None, StickerPackError::EmptyString { field: "tray_image_file" }));
    }
    let tray = ImageSource::load(&descriptor.tray_image_file, assets).map_err(|e| (None, e))?;
    let mut pack = StickerPack::new(info, tray, validator).map_err(|e| (None, e))?;

    for sticker in &descriptor.stickers {
        let at = || Some(format!("pack '{}', sticker '{}'", identifier, sticker.image_file));

        if options.strict && sticker.emojis.as_ref().map_or(true, Vec::is_empty) {
            return Err((at(), StickerPackError::MissingEmoji));
        }

        let image = ImageSource::load(&sticker.image_file, assets).map_err(|e| (at(), e))?;
        let source = StickerSource {
            image,
            emojis: sticker.emojis.clone(),
            accessibility_text: sticker.accessibility_text.clone(),
        };
        pack.append(source, validator).map_err(|e| (at(), e))?;
    }

    pack.check_min_count(validator).map_err(|e| (None, e))?;
    Ok(pack)
}

fn check_pack_info(info: &PackInfo) -> Result<(), StickerPackError> {
    validate_identifier_charset(&info.identifier)?;
    if let Some(email) = &info.publisher_email {
        validate_email(email)?;
    }
    for (field, url) in [
        ("publisher_website", &info.publisher_website),
        ("privacy_policy_website", &info.privacy_policy_website),
        ("license_agreement_website", &info.license_agreement_website),
    ] {
        if let Some(url) = url {
            validate_website(field, url)?;
        }
    }
    Ok(())
}

fn check_store_links(links: &StoreLinks) -> Result<(), StickerPackError> {
    if let Some(url) = &links.android_play_store_link {
        validate_store_link("android_play_store_link", url, PLAY_STORE_HOST)?;
    }
    if let Some(url) = &links.ios_app_store_link {
        validate_store_link("ios_app_store_link", url, APP_STORE_HOST)?;
    }
    Ok(())
}
