//! Numeric limits enforced on sticker packs
//!
//! Every limit is published as a constant and gathered into [`Limits`], which
//! can be overridden from the `[limits]` section of `stickerpack.toml`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum file size of a static sticker (100 KB)
pub const MAX_STATIC_STICKER_FILE_SIZE: u64 = 100 * 1024;
/// Maximum file size of an animated sticker (500 KB)
pub const MAX_ANIMATED_STICKER_FILE_SIZE: u64 = 500 * 1024;
/// Maximum file size of a tray image (50 KB)
pub const MAX_TRAY_IMAGE_FILE_SIZE: u64 = 50 * 1024;

/// Shortest frame an animated sticker may show
pub const MIN_ANIMATED_FRAME_DURATION_MS: u32 = 8;
/// Longest a single loop of an animated sticker may run
pub const MAX_ANIMATED_TOTAL_DURATION_MS: u32 = 10_000;

/// Required tray image dimensions
pub const TRAY_IMAGE_DIMENSIONS: Dimensions = Dimensions::new(96, 96);
/// Required sticker image dimensions
pub const STICKER_DIMENSIONS: Dimensions = Dimensions::new(512, 512);

pub const MIN_STICKERS_PER_PACK: usize = 3;
pub const MAX_STICKERS_PER_PACK: usize = 30;

/// Limit for identifier, name and publisher
pub const MAX_CHAR_LIMIT: usize = 128;

pub const MAX_EMOJIS_PER_STICKER: usize = 3;

pub const MAX_STATIC_ACCESSIBILITY_TEXT_CHARS: usize = 125;
pub const MAX_ANIMATED_ACCESSIBILITY_TEXT_CHARS: usize = 255;

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// The full set of limits a [`crate::Validator`] checks against.
///
/// `Default` yields the published values. Individual fields can be lowered in
/// tests or overridden from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_static_sticker_file_size: u64,
    pub max_animated_sticker_file_size: u64,
    pub max_tray_image_file_size: u64,
    pub min_animated_frame_duration_ms: u32,
    pub max_animated_total_duration_ms: u32,
    pub tray_image_dimensions: Dimensions,
    pub sticker_dimensions: Dimensions,
    pub min_stickers_per_pack: usize,
    pub max_stickers_per_pack: usize,
    pub max_char_limit: usize,
    pub max_emojis_per_sticker: usize,
    pub max_static_accessibility_text_chars: usize,
    pub max_animated_accessibility_text_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_static_sticker_file_size: MAX_STATIC_STICKER_FILE_SIZE,
            max_animated_sticker_file_size: MAX_ANIMATED_STICKER_FILE_SIZE,
            max_tray_image_file_size: MAX_TRAY_IMAGE_FILE_SIZE,
            min_animated_frame_duration_ms: MIN_ANIMATED_FRAME_DURATION_MS,
            max_animated_total_duration_ms: MAX_ANIMATED_TOTAL_DURATION_MS,
            tray_image_dimensions: TRAY_IMAGE_DIMENSIONS,
            sticker_dimensions: STICKER_DIMENSIONS,
            min_stickers_per_pack: MIN_STICKERS_PER_PACK,
            max_stickers_per_pack: MAX_STICKERS_PER_PACK,
            max_char_limit: MAX_CHAR_LIMIT,
            max_emojis_per_sticker: MAX_EMOJIS_PER_STICKER,
            max_static_accessibility_text_chars: MAX_STATIC_ACCESSIBILITY_TEXT_CHARS,
            max_animated_accessibility_text_chars: MAX_ANIMATED_ACCESSIBILITY_TEXT_CHARS,
        }
    }
}

impl Limits {
    /// Maximum sticker file size for the given animation mode
    pub fn max_sticker_file_size(&self, animated: bool) -> u64 {
        if animated {
            self.max_animated_sticker_file_size
        } else {
            self.max_static_sticker_file_size
        }
    }

    /// Maximum accessibility text length for the given animation mode
    pub fn max_accessibility_text_chars(&self, animated: bool) -> usize {
        if animated {
            self.max_animated_accessibility_text_chars
        } else {
            self.max_static_accessibility_text_chars
        }
    }

    /// Check the limits for internal consistency.
    ///
    /// Returns a list of problems, empty when the limits are usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.min_stickers_per_pack > self.max_stickers_per_pack {
            errors.push(format!(
                "limits.min_stickers_per_pack ({}) exceeds limits.max_stickers_per_pack ({})",
                self.min_stickers_per_pack, self.max_stickers_per_pack
            ));
        }
        if self.max_stickers_per_pack == 0 {
            errors.push("limits.max_stickers_per_pack must be at least 1".to_string());
        }
        for (name, size) in [
            ("max_static_sticker_file_size", self.max_static_sticker_file_size),
            ("max_animated_sticker_file_size", self.max_animated_sticker_file_size),
            ("max_tray_image_file_size", self.max_tray_image_file_size),
        ] {
            if size == 0 {
                errors.push(format!("limits.{} must be greater than 0", name));
            }
        }
        for (name, dims) in [
            ("tray_image_dimensions", self.tray_image_dimensions),
            ("sticker_dimensions", self.sticker_dimensions),
        ] {
            if dims.width == 0 || dims.height == 0 {
                errors.push(format!("limits.{} must be non-zero, got {}", name, dims));
            }
        }
        if self.max_char_limit == 0 {
            errors.push("limits.max_char_limit must be at least 1".to_string());
        }

        errors
    }
}
