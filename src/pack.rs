//! Sticker pack entity
//!
//! A [`StickerPack`] is created with a validated tray image and no stickers,
//! then filled through [`StickerPack::append`]. Every sticker must match the
//! pack's mode and the count never exceeds the configured maximum.

use crate::asset::ImageAsset;
use crate::error::StickerPackError;
use crate::sticker::{ImageSource, Sticker, StickerSource};
use crate::validate::{ImageRole, PackMode, Validator};

/// Pack-level metadata supplied by the author
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackInfo {
    pub identifier: String,
    pub name: String,
    pub publisher: String,
    pub publisher_email: Option<String>,
    pub publisher_website: Option<String>,
    pub privacy_policy_website: Option<String>,
    pub license_agreement_website: Option<String>,
    pub animated: bool,
}

impl PackInfo {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            publisher: publisher.into(),
            ..Default::default()
        }
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}

#[derive(Debug)]
pub struct StickerPack {
    info: PackInfo,
    tray_image: ImageAsset,
    stickers: Vec<Sticker>,
}

impl StickerPack {
    /// Validate identifier, name and publisher, then the tray image.
    pub fn new(info: PackInfo, tray: ImageSource, validator: &Validator) -> Result<Self, StickerPackError> {
        validator.validate_string_field("identifier", &info.identifier)?;
        validator.validate_string_field("name", &info.name)?;
        validator.validate_string_field("publisher", &info.publisher)?;

        let tray_image = validator.validate_image(tray.data, &tray.extension, ImageRole::Tray)?;

        Ok(Self { info, tray_image, stickers: Vec::new() })
    }

    /// Validate and add one sticker.
    ///
    /// On any error the pack is left exactly as it was.
    pub fn append(&mut self, source: StickerSource, validator: &Validator) -> Result<(), StickerPackError> {
        let limits = validator.limits();
        if self.stickers.len() >= limits.max_stickers_per_pack {
            return Err(StickerPackError::CountOutsideAllowableRange {
                count: self.stickers.len() + 1,
                min: limits.min_stickers_per_pack,
                max: limits.max_stickers_per_pack,
            });
        }

        let mode = self.mode();
        let sticker = Sticker::new(source, mode, validator)?;
        if sticker.is_animated() != mode.is_animated() {
            return Err(mode.mismatch_error());
        }

        self.stickers.push(sticker);
        Ok(())
    }

    /// Fails when the pack holds fewer stickers than the minimum
    pub fn check_min_count(&self, validator: &Validator) -> Result<(), StickerPackError> {
        let limits = validator.limits();
        if self.stickers.len() < limits.min_stickers_per_pack {
            return Err(StickerPackError::CountOutsideAllowableRange {
                count: self.stickers.len(),
                min: limits.min_stickers_per_pack,
                max: limits.max_stickers_per_pack,
            });
        }
        Ok(())
    }

    pub fn info(&self) -> &PackInfo {
        &self.info
    }

    pub fn identifier(&self) -> &str {
        &self.info.identifier
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn publisher(&self) -> &str {
        &self.info.publisher
    }

    pub fn publisher_email(&self) -> Option<&str> {
        self.info.publisher_email.as_deref()
    }

    pub fn publisher_website(&self) -> Option<&str> {
        self.info.publisher_website.as_deref()
    }

    pub fn privacy_policy_website(&self) -> Option<&str> {
        self.info.privacy_policy_website.as_deref()
    }

    pub fn license_agreement_website(&self) -> Option<&str> {
        self.info.license_agreement_website.as_deref()
    }

    pub fn is_animated(&self) -> bool {
        self.info.animated
    }

    pub fn mode(&self) -> PackMode {
        PackMode::from_animated(self.info.animated)
    }

    pub fn tray_image(&self) -> &ImageAsset {
        &self.tray_image
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Name and publisher text plus every image byte
    pub fn byte_size(&self) -> u64 {
        let text = (self.info.name.len() + self.info.publisher.len()) as u64;
        text + self.tray_image.byte_size() + self.stickers.iter().map(Sticker::byte_size).sum::<u64>()
    }

    /// [`StickerPack::byte_size`] for display, e.g. `"14 KB"`
    pub fn formatted_size(&self) -> String {
        format_byte_count(self.byte_size())
    }
}

/// Render a byte count with decimal units.
///
/// ```
/// use stickerpack::pack::format_byte_count;
///
/// assert_eq!(format_byte_count(812), "812 bytes");
/// assert_eq!(format_byte_count(14_200), "14 KB");
/// assert_eq!(format_byte_count(1_230_000), "1.2 MB");
/// ```
pub fn format_byte_count(bytes: u64) -> String {
    const KB: f64 = 1_000.0;
    const MB: f64 = KB * 1_000.0;
    const GB: f64 = MB * 1_000.0;

    if bytes == 1 {
        return "1 byte".to_string();
    }
    if bytes < 1_000 {
        return format!("{} bytes", bytes);
    }

    // Pick the unit from the rounded value so 999_999 reads "1.0 MB", not "1000 KB"
    let size = bytes as f64;
    let kb = (size / KB).round();
    if kb < 1_000.0 {
        return format!("{:.0} KB", kb);
    }
    let mb = (size / MB * 10.0).round() / 10.0;
    if mb < 1_000.0 {
        return format!("{:.1} MB", mb);
    }
    format!("{:.2} GB", size / GB)
}
