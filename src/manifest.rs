//! Sticker pack manifest (`contents.json`) model
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "ios_app_store_link": "https://itunes.apple.com/app/id123",
//!   "android_play_store_link": "",
//!   "sticker_packs": [
//!     {
//!       "identifier": "cuppyID",
//!       "name": "Cuppy",
//!       "publisher": "Jane",
//!       "tray_image_file": "tray_Cuppy.png",
//!       "publisher_website": "",
//!       "stickers": [
//!         { "image_file": "01_Cuppy.png", "emojis": ["☕", "🙂"] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Parsing only checks JSON shape. Field values are checked during ingestion.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Conventional manifest file name inside an asset directory
pub const MANIFEST_FILENAME: &str = "contents.json";

/// Error reading or parsing a manifest
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios_app_store_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android_play_store_link: Option<String>,
    #[serde(default)]
    pub sticker_packs: Vec<PackDescriptor>,
}

/// One pack as written in the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDescriptor {
    /// Missing identifiers are reported during ingestion, not parsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub tray_image_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated_sticker_pack: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_agreement_website: Option<String>,
    #[serde(default)]
    pub stickers: Vec<StickerDescriptor>,
}

/// One sticker as written in the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerDescriptor {
    pub image_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emojis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_text: Option<String>,
}

impl PackManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ManifestError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The app-store links, with empty strings treated as absent
    pub fn store_links(&self) -> StoreLinks {
        StoreLinks {
            ios_app_store_link: normalize_optional(self.ios_app_store_link.as_deref()),
            android_play_store_link: normalize_optional(self.android_play_store_link.as_deref()),
        }
    }
}

/// App-store links shared by every pack of one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreLinks {
    pub ios_app_store_link: Option<String>,
    pub android_play_store_link: Option<String>,
}

/// Treat an empty string the same as a missing one
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "ios_app_store_link": "",
        "android_play_store_link": "https://play.google.com/store/apps/details?id=com.example",
        "sticker_packs": [
            {
                "identifier": "cuppyID",
                "name": "Cuppy",
                "publisher": "Jane",
                "tray_image_file": "tray_Cuppy.png",
                "publisher_email": "jane@example.com",
                "publisher_website": "",
                "stickers": [
                    { "image_file": "01_Cuppy.png", "emojis": ["☕", "🙂"] },
                    { "image_file": "02_Cuppy.png", "accessibility_text": "cup waving" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let manifest = PackManifest::from_json_str(SAMPLE).unwrap();
        assert_eq!(manifest.sticker_packs.len(), 1);

        let pack = &manifest.sticker_packs[0];
        assert_eq!(pack.identifier.as_deref(), Some("cuppyID"));
        assert_eq!(pack.animated_sticker_pack, None);
        assert_eq!(pack.publisher_email.as_deref(), Some("jane@example.com"));
        assert_eq!(pack.publisher_website.as_deref(), Some(""));
        assert_eq!(pack.stickers.len(), 2);
        assert_eq!(pack.stickers[0].emojis.as_ref().unwrap().len(), 2);
        assert_eq!(pack.stickers[1].emojis, None);
        assert_eq!(pack.stickers[1].accessibility_text.as_deref(), Some("cup waving"));
    }

    #[test]
    fn test_store_links_normalize_empty() {
        let links = PackManifest::from_json_str(SAMPLE).unwrap().store_links();
        assert_eq!(links.ios_app_store_link, None);
        assert!(links.android_play_store_link.unwrap().starts_with("https://play.google.com"));
    }

    #[test]
    fn test_missing_identifier_parses() {
        let manifest = PackManifest::from_json_str(r#"{"sticker_packs": [{"name": "x"}]}"#).unwrap();
        assert_eq!(manifest.sticker_packs[0].identifier, None);
        assert!(manifest.sticker_packs[0].stickers.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = PackManifest::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(PackManifest::load(&path).unwrap().sticker_packs[0].name, "Cuppy");

        let err = PackManifest::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("")), None);
        assert_eq!(normalize_optional(Some("x")), Some("x".to_string()));
    }
}
