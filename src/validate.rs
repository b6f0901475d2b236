//! Image compliance and pack metadata validation
//!
//! [`Validator`] decides whether candidate bytes are acceptable as a tray
//! image or as a sticker of a given pack mode. Checks run in a fixed order and
//! the first failure is returned, so a given input always reports the same
//! reason.
//!
//! The free functions at the bottom implement the opt-in strict checks on
//! identifiers and links.

use crate::asset::ImageAsset;
use crate::codec::{ImageCodec, ImageExtension, ImageRsCodec};
use crate::error::StickerPackError;
use crate::limits::{Dimensions, Limits};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use url::Url;

/// Whether a pack holds animated or static stickers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackMode {
    Static,
    Animated,
}

impl PackMode {
    pub fn from_animated(animated: bool) -> Self {
        if animated {
            PackMode::Animated
        } else {
            PackMode::Static
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, PackMode::Animated)
    }

    /// Error for a sticker whose animation doesn't match this mode
    pub(crate) fn mismatch_error(&self) -> StickerPackError {
        match self {
            PackMode::Animated => StickerPackError::AnimatedStickerPackWithStaticStickers,
            PackMode::Static => StickerPackError::StaticStickerPackWithAnimatedStickers,
        }
    }
}

impl std::fmt::Display for PackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackMode::Static => write!(f, "static"),
            PackMode::Animated => write!(f, "animated"),
        }
    }
}

/// What an image is being validated as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Tray,
    Sticker(PackMode),
}

/// Image and metadata validator
///
/// Holds the limits to check against and the codec used to inspect images.
/// Cloning is cheap; the codec is shared.
#[derive(Clone)]
pub struct Validator {
    limits: Limits,
    codec: Arc<dyn ImageCodec>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("limits", &self.limits).finish_non_exhaustive()
    }
}

impl Validator {
    /// Create a validator with the published limits and the `image` crate codec
    pub fn new() -> Self {
        Self { limits: Limits::default(), codec: Arc::new(ImageRsCodec::new()) }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn codec(&self) -> &Arc<dyn ImageCodec> {
        &self.codec
    }

    /// Validate raw image bytes for a role.
    ///
    /// On success the returned asset has already been decoded once; later
    /// queries hit its cache.
    pub fn validate_image(
        &self,
        data: Vec<u8>,
        extension: &str,
        role: ImageRole,
    ) -> Result<ImageAsset, StickerPackError> {
        let ext = ImageExtension::from_extension(extension)
            .ok_or_else(|| StickerPackError::UnsupportedFormat(extension.to_string()))?;

        if data.is_empty() {
            return Err(StickerPackError::InvalidImage { reason: "image data is empty".to_string() });
        }

        let asset = ImageAsset::new(data, ext, Arc::clone(&self.codec));
        match role {
            ImageRole::Tray => self.check_tray(&asset)?,
            ImageRole::Sticker(mode) => self.check_sticker(&asset, mode)?,
        }
        Ok(asset)
    }

    fn check_tray(&self, asset: &ImageAsset) -> Result<(), StickerPackError> {
        if asset.is_animated() {
            return Err(StickerPackError::AnimatedImagesNotSupported);
        }

        let max = self.limits.max_tray_image_file_size;
        if asset.byte_size() > max {
            return Err(StickerPackError::ImageTooBig { size: asset.byte_size(), max, animated: false });
        }

        check_dimensions(asset, self.limits.tray_image_dimensions)
    }

    fn check_sticker(&self, asset: &ImageAsset, mode: PackMode) -> Result<(), StickerPackError> {
        let animated = asset.is_animated();

        let max = self.limits.max_sticker_file_size(animated);
        if asset.byte_size() > max {
            return Err(StickerPackError::ImageTooBig { size: asset.byte_size(), max, animated });
        }

        check_dimensions(asset, self.limits.sticker_dimensions)?;

        if animated {
            let info = asset.info()?;
            let min_ms = self.limits.min_animated_frame_duration_ms;
            if let Some(shortest) = info.min_frame_duration_ms() {
                if shortest < min_ms {
                    return Err(StickerPackError::MinFrameDurationTooShort { actual_ms: shortest, min_ms });
                }
            }

            let max_ms = self.limits.max_animated_total_duration_ms;
            let total = info.total_duration_ms();
            if total > u64::from(max_ms) {
                return Err(StickerPackError::TotalAnimationDurationTooLong { actual_ms: total, max_ms });
            }
        }

        if animated != mode.is_animated() {
            return Err(mode.mismatch_error());
        }

        Ok(())
    }

    /// Check a required string field: non-empty and within the character limit
    pub fn validate_string_field(&self, field: &'static str, value: &str) -> Result<(), StickerPackError> {
        validate_string_field(field, value, self.limits.max_char_limit)
    }
}

fn check_dimensions(asset: &ImageAsset, expected: Dimensions) -> Result<(), StickerPackError> {
    let actual = asset.decoded_size()?;
    if actual != expected {
        return Err(StickerPackError::IncorrectImageSize { actual, expected });
    }
    Ok(())
}

/// Check that `value` is non-empty and at most `max` characters long
pub fn validate_string_field(field: &'static str, value: &str, max: usize) -> Result<(), StickerPackError> {
    if value.is_empty() {
        return Err(StickerPackError::EmptyString { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(StickerPackError::StringTooLong { field, len, max });
    }
    Ok(())
}

fn identifier_pattern() -> Result<&'static Regex, &'static regex::Error> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-.,' \t\n\x0B\x0C\r]+$")).as_ref()
}

fn email_pattern() -> Result<&'static Regex, &'static regex::Error> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
            )
        })
        .as_ref()
}

/// Strict email check: `local@domain.tld` shape, no further verification
pub fn validate_email(email: &str) -> Result<(), StickerPackError> {
    match email_pattern() {
        Ok(pattern) if pattern.is_match(email) => Ok(()),
        _ => Err(StickerPackError::InvalidEmail(email.to_string())),
    }
}

/// Strict identifier check: ASCII letters, digits, `_-.,'` and whitespace, no `..`
pub fn validate_identifier_charset(identifier: &str) -> Result<(), StickerPackError> {
    let invalid = |reason: String| StickerPackError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason,
    };

    let pattern = identifier_pattern().map_err(|e| invalid(e.to_string()))?;
    if !pattern.is_match(identifier) {
        return Err(invalid(
            "only letters, digits, '_', '-', '.', ',', ''' and whitespace are allowed".to_string(),
        ));
    }
    if identifier.contains("..") {
        return Err(invalid("must not contain '..'".to_string()));
    }
    Ok(())
}

/// Strict website check: absolute http or https URL
pub fn validate_website(field: &'static str, url: &str) -> Result<Url, StickerPackError> {
    let invalid = |reason: String| StickerPackError::InvalidUrl { field, url: url.to_string(), reason };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("scheme '{}' is not http or https", other))),
    }
}

/// Strict store link check: a website on the expected host
pub fn validate_store_link(field: &'static str, url: &str, host: &str) -> Result<(), StickerPackError> {
    let parsed = validate_website(field, url)?;
    if parsed.host_str() != Some(host) {
        return Err(StickerPackError::InvalidUrl {
            field,
            url: url.to_string(),
            reason: format!("host must be {}", host),
        });
    }
    Ok(())
}

pub const PLAY_STORE_HOST: &str = "play.google.com";
pub const APP_STORE_HOST: &str = "itunes.apple.com";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::testing::FakeCodec;

    fn validator(codec: FakeCodec) -> (Validator, Arc<FakeCodec>) {
        let codec = Arc::new(codec);
        (Validator::new().with_codec(codec.clone()), codec)
    }

    #[test]
    fn test_unsupported_format_checked_first() {
        let (v, codec) = validator(FakeCodec::still(96, 96));
        let err = v.validate_image(Vec::new(), "gif", ImageRole::Tray).unwrap_err();
        assert_eq!(err, StickerPackError::UnsupportedFormat("gif".to_string()));
        assert_eq!(codec.decodes(), 0);
    }

    #[test]
    fn test_empty_bytes_are_invalid_for_every_role() {
        let (v, _) = validator(FakeCodec::still(512, 512));
        for role in [ImageRole::Tray, ImageRole::Sticker(PackMode::Static), ImageRole::Sticker(PackMode::Animated)] {
            for ext in ["png", "webp"] {
                let err = v.validate_image(Vec::new(), ext, role).unwrap_err();
                assert!(matches!(err, StickerPackError::InvalidImage { .. }), "{:?} {}", role, ext);
            }
        }
    }

    #[test]
    fn test_valid_tray() {
        let (v, _) = validator(FakeCodec::still(96, 96));
        let asset = v.validate_image(vec![1; 10], "png", ImageRole::Tray).unwrap();
        assert_eq!(asset.extension(), ImageExtension::Png);
    }

    #[test]
    fn test_animated_tray_rejected() {
        let (v, _) = validator(FakeCodec::animated(96, 96, vec![50, 50]));
        let err = v.validate_image(vec![1; 10], "webp", ImageRole::Tray).unwrap_err();
        assert_eq!(err, StickerPackError::AnimatedImagesNotSupported);
    }

    #[test]
    fn test_tray_too_big() {
        let (v, _) = validator(FakeCodec::still(96, 96));
        let err = v.validate_image(vec![0; 50 * 1024 + 1], "png", ImageRole::Tray).unwrap_err();
        assert!(matches!(err, StickerPackError::ImageTooBig { animated: false, .. }));
    }

    #[test]
    fn test_tray_wrong_dimensions() {
        for (w, h) in [(97, 97), (96, 40), (48, 48)] {
            let (v, _) = validator(FakeCodec::still(w, h));
            let err = v.validate_image(vec![1], "png", ImageRole::Tray).unwrap_err();
            assert_eq!(
                err,
                StickerPackError::IncorrectImageSize {
                    actual: Dimensions::new(w, h),
                    expected: Dimensions::new(96, 96)
                }
            );
        }
    }

    #[test]
    fn test_sticker_size_limit_depends_on_animation() {
        let (v, _) = validator(FakeCodec::still(512, 512));
        let err = v
            .validate_image(vec![0; 100 * 1024 + 1], "png", ImageRole::Sticker(PackMode::Static))
            .unwrap_err();
        assert!(matches!(err, StickerPackError::ImageTooBig { animated: false, max: 102_400, .. }));

        let (v, _) = validator(FakeCodec::animated(512, 512, vec![100, 100]));
        assert!(v
            .validate_image(vec![0; 200 * 1024], "webp", ImageRole::Sticker(PackMode::Animated))
            .is_ok());
    }

    #[test]
    fn test_sticker_wrong_dimensions() {
        let (v, _) = validator(FakeCodec::still(500, 500));
        let err = v.validate_image(vec![1], "png", ImageRole::Sticker(PackMode::Static)).unwrap_err();
        assert_eq!(
            err,
            StickerPackError::IncorrectImageSize {
                actual: Dimensions::new(500, 500),
                expected: Dimensions::new(512, 512)
            }
        );
    }

    #[test]
    fn test_short_frame_rejected() {
        let (v, _) = validator(FakeCodec::animated(512, 512, vec![100, 5, 100]));
        let err = v.validate_image(vec![1], "webp", ImageRole::Sticker(PackMode::Animated)).unwrap_err();
        assert_eq!(err, StickerPackError::MinFrameDurationTooShort { actual_ms: 5, min_ms: 8 });
    }

    #[test]
    fn test_long_animation_rejected() {
        let (v, _) = validator(FakeCodec::animated(512, 512, vec![6000, 4001]));
        let err = v.validate_image(vec![1], "webp", ImageRole::Sticker(PackMode::Animated)).unwrap_err();
        assert_eq!(err, StickerPackError::TotalAnimationDurationTooLong { actual_ms: 10_001, max_ms: 10_000 });
    }

    #[test]
    fn test_mode_mismatch() {
        let (v, _) = validator(FakeCodec::still(512, 512));
        let err = v.validate_image(vec![1], "webp", ImageRole::Sticker(PackMode::Animated)).unwrap_err();
        assert_eq!(err, StickerPackError::AnimatedStickerPackWithStaticStickers);

        let (v, _) = validator(FakeCodec::animated(512, 512, vec![40, 40]));
        let err = v.validate_image(vec![1], "webp", ImageRole::Sticker(PackMode::Static)).unwrap_err();
        assert_eq!(err, StickerPackError::StaticStickerPackWithAnimatedStickers);
    }

    #[test]
    fn test_undecodable_webp_is_invalid_image() {
        let mut fake = FakeCodec::still(512, 512);
        fake.fail_decode = true;
        let (v, codec) = validator(fake);
        let err = v.validate_image(vec![1], "webp", ImageRole::Sticker(PackMode::Static)).unwrap_err();
        assert!(matches!(err, StickerPackError::InvalidImage { .. }));
        assert_eq!(codec.decodes(), 1);
    }

    #[test]
    fn test_custom_limits() {
        let limits = Limits { sticker_dimensions: Dimensions::new(64, 64), ..Limits::default() };
        let codec = Arc::new(FakeCodec::still(64, 64));
        let v = Validator::new().with_limits(limits).with_codec(codec);
        assert!(v.validate_image(vec![1], "png", ImageRole::Sticker(PackMode::Static)).is_ok());
    }

    #[test]
    fn test_string_fields() {
        let v = Validator::new();
        assert!(v.validate_string_field("name", "Cuppy").is_ok());
        assert_eq!(v.validate_string_field("name", ""), Err(StickerPackError::EmptyString { field: "name" }));
        let long = "x".repeat(129);
        assert_eq!(
            v.validate_string_field("publisher", &long),
            Err(StickerPackError::StringTooLong { field: "publisher", len: 129, max: 128 })
        );
        assert!(v.validate_string_field("publisher", &"x".repeat(128)).is_ok());
    }

    #[test]
    fn test_identifier_charset() {
        assert!(validate_identifier_charset("cuppy_pack-1.0, Jim's").is_ok());
        assert!(matches!(
            validate_identifier_charset("pack/one"),
            Err(StickerPackError::InvalidIdentifier { .. })
        ));
        assert!(matches!(validate_identifier_charset("a..b"), Err(StickerPackError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_identifier_allows_any_ascii_whitespace() {
        assert!(validate_identifier_charset("cuppy\tpack").is_ok());
        assert!(validate_identifier_charset("cuppy\npack").is_ok());
        assert!(matches!(
            validate_identifier_charset("caf\u{e9}"),
            Err(StickerPackError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("jane.doe+stickers@mail.example.com").is_ok());
        assert_eq!(validate_email("jane@localhost"), Err(StickerPackError::InvalidEmail("jane@localhost".to_string())));
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane doe@example.com").is_err());
    }

    #[test]
    fn test_website_and_store_links() {
        assert!(validate_website("publisher_website", "https://example.com/about").is_ok());
        assert!(validate_website("publisher_website", "ftp://example.com").is_err());
        assert!(validate_website("publisher_website", "example.com").is_err());

        assert!(validate_store_link(
            "android_play_store_link",
            "https://play.google.com/store/apps/details?id=com.example",
            PLAY_STORE_HOST
        )
        .is_ok());
        let err = validate_store_link("ios_app_store_link", "https://apps.example.com/app", APP_STORE_HOST)
            .unwrap_err();
        assert!(err.to_string().contains("itunes.apple.com"));
    }
}
