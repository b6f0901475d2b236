//! Error types shared across the crate

use crate::limits::Dimensions;
use thiserror::Error;

/// Why a sticker, tray image or pack was rejected.
///
/// These are configuration errors made by whoever authored the pack. The
/// library returns them; the host decides whether they are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StickerPackError {
    /// The named asset could not be loaded
    #[error("{0} not found")]
    FileNotFound(String),
    /// Asset name would escape the asset directory
    #[error("file name '{0}' must not contain '..' or path separators")]
    InvalidFileName(String),
    /// A required string field is empty
    #[error("{field} must not be empty")]
    EmptyString { field: &'static str },
    /// A string field exceeds the character limit
    #[error("{field} is {len} characters, the limit is {max}")]
    StringTooLong { field: &'static str, len: usize, max: usize },
    /// Declared extension is neither png nor webp
    #[error("'{0}' is not a supported image format (expected png or webp)")]
    UnsupportedFormat(String),
    /// Image bytes exceed the size limit for their role
    #[error("{} image is {:.2} KB, the limit is {} KB", mode_label(*.animated), kilobytes(*.size), .max / 1024)]
    ImageTooBig { size: u64, max: u64, animated: bool },
    /// Image is empty or cannot be decoded
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },
    /// Pixel dimensions don't match the role's required size
    #[error("image is {actual}, required dimensions are {expected}")]
    IncorrectImageSize { actual: Dimensions, expected: Dimensions },
    /// Tray images must be still images
    #[error("animated images are not supported as tray images")]
    AnimatedImagesNotSupported,
    /// Sticker count is outside the allowed range
    #[error("pack has {count} stickers, allowed range is {min} to {max}")]
    CountOutsideAllowableRange { count: usize, min: usize, max: usize },
    /// Too many emojis attached to one sticker
    #[error("sticker has {count} emojis, the maximum is {max}")]
    TooManyEmojis { count: usize, max: usize },
    /// Strict mode requires at least one emoji per sticker
    #[error("sticker has no emojis, at least one is required")]
    MissingEmoji,
    /// A frame of an animated sticker is displayed too briefly
    #[error("shortest frame lasts {actual_ms} ms, minimum is {min_ms} ms")]
    MinFrameDurationTooShort { actual_ms: u32, min_ms: u32 },
    /// One animation loop runs too long
    #[error("animation runs {actual_ms} ms, maximum is {max_ms} ms")]
    TotalAnimationDurationTooLong { actual_ms: u64, max_ms: u32 },
    /// A static sticker was added to an animated pack
    #[error("animated sticker pack cannot contain static stickers")]
    AnimatedStickerPackWithStaticStickers,
    /// An animated sticker was added to a static pack
    #[error("static sticker pack cannot contain animated stickers")]
    StaticStickerPackWithAnimatedStickers,
    /// Accessibility text exceeds the limit for the sticker's mode
    #[error("{} sticker accessibility text is {len} characters, the limit is {max}", mode_label(*.animated))]
    AccessibilityTextTooLong { len: usize, max: usize, animated: bool },
    /// Pack identifier is missing or already used in this batch
    #[error("{}", describe_identifier(.0))]
    DuplicateOrMissingIdentifier(Option<String>),
    /// Identifier contains characters the receiving app rejects
    #[error("identifier '{identifier}' is invalid: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
    /// Publisher email address is malformed
    #[error("publisher_email '{0}' is not a valid email address")]
    InvalidEmail(String),
    /// The manifest lists no sticker packs
    #[error("sticker pack list cannot be empty")]
    EmptyPackList,
    /// A website or store link is malformed or points at the wrong host
    #[error("{field} '{url}' is invalid: {reason}")]
    InvalidUrl { field: &'static str, url: String, reason: String },
}

fn mode_label(animated: bool) -> &'static str {
    if animated {
        "animated"
    } else {
        "static"
    }
}

fn kilobytes(size: u64) -> f64 {
    size as f64 / 1024.0
}

fn describe_identifier(identifier: &Option<String>) -> String {
    match identifier {
        Some(id) => format!("a sticker pack already has the identifier '{}'", id),
        None => "sticker pack must have an identifier".to_string(),
    }
}

/// Failure inside the image codec adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

impl From<CodecError> for StickerPackError {
    fn from(err: CodecError) -> Self {
        StickerPackError::InvalidImage { reason: err.to_string() }
    }
}

/// A batch ingestion failure with the manifest location that caused it
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: {error}")]
pub struct IngestError {
    /// Human-readable location, e.g. `pack 'cuppyID', sticker '01_Cuppy.png'`
    pub location: String,
    #[source]
    pub error: StickerPackError,
}

impl IngestError {
    pub fn new(location: impl Into<String>, error: StickerPackError) -> Self {
        Self { location: location.into(), error }
    }
}

/// Failure while building or handing off a transfer payload
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransferError {
    /// Payload could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Tray image could not be re-encoded as PNG
    #[error("tray image: {0}")]
    TrayImage(CodecError),
    /// The app still uses the sample bundle identifier
    #[error("bundle identifier '{0}' must not include the default sample identifier")]
    DefaultBundleIdentifier(String),
}

/// The background worker is gone
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("sticker pack worker has stopped")]
    Stopped,
    /// The job panicked; the worker keeps running
    #[error("sticker pack job panicked")]
    Panicked,
    #[error("failed to start sticker pack worker: {0}")]
    Spawn(String),
}
