//! Validated sticker entity

use crate::asset::ImageAsset;
use crate::emoji::{canonicalize_emojis, validate_accessibility_text};
use crate::error::StickerPackError;
use crate::source::AssetSource;
use crate::transfer::TransferTarget;
use crate::validate::{ImageRole, PackMode, Validator};
use std::path::Path;

/// Raw image bytes with the extension they were declared with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub data: Vec<u8>,
    pub extension: String,
    /// File name the bytes came from, used in diagnostics
    pub name: Option<String>,
}

impl ImageSource {
    pub fn from_bytes(data: Vec<u8>, extension: impl Into<String>) -> Self {
        Self { data, extension: extension.into(), name: None }
    }

    /// Load a named file; the extension is taken from the name.
    pub fn load(name: &str, source: &dyn AssetSource) -> Result<Self, StickerPackError> {
        let data = source.load_file_bytes(name)?;
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { data, extension, name: Some(name.to_string()) })
    }
}

/// Everything needed to build a [`Sticker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerSource {
    pub image: ImageSource,
    pub emojis: Option<Vec<String>>,
    pub accessibility_text: Option<String>,
}

impl StickerSource {
    pub fn new(image: ImageSource) -> Self {
        Self { image, emojis: None, accessibility_text: None }
    }

    pub fn with_emojis<I, S>(mut self, emojis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emojis = Some(emojis.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_accessibility_text(mut self, text: impl Into<String>) -> Self {
        self.accessibility_text = Some(text.into());
        self
    }
}

/// One validated sticker.
///
/// Only [`Sticker::new`] creates one, so every instance has passed the image
/// checks for its pack mode and carries canonical emojis.
#[derive(Debug)]
pub struct Sticker {
    image: ImageAsset,
    emojis: Option<Vec<String>>,
    accessibility_text: Option<String>,
}

impl Sticker {
    /// Validate the image, then the emojis, then the accessibility text.
    pub fn new(source: StickerSource, mode: PackMode, validator: &Validator) -> Result<Self, StickerPackError> {
        let StickerSource { image, emojis, accessibility_text } = source;

        let image = validator.validate_image(image.data, &image.extension, ImageRole::Sticker(mode))?;
        let emojis = canonicalize_emojis(emojis.as_deref(), validator.limits())?;
        let accessibility_text =
            validate_accessibility_text(accessibility_text.as_deref(), image.is_animated(), validator.limits())?;

        Ok(Self { image, emojis, accessibility_text })
    }

    pub fn image(&self) -> &ImageAsset {
        &self.image
    }

    pub fn emojis(&self) -> Option<&[String]> {
        self.emojis.as_deref()
    }

    pub fn accessibility_text(&self) -> Option<&str> {
        self.accessibility_text.as_deref()
    }

    pub fn is_animated(&self) -> bool {
        self.image.is_animated()
    }

    pub fn byte_size(&self) -> u64 {
        self.image.byte_size()
    }

    /// Put the first frame on the clipboard as PNG
    pub fn copy_to_clipboard(&self, target: &dyn TransferTarget) -> Result<(), StickerPackError> {
        let png = self.image.png_bytes()?;
        target.copy_image_to_clipboard(&png);
        Ok(())
    }
}
