//! Image codec adapter
//!
//! Wraps the `image` crate behind the [`ImageCodec`] trait: decoding raw bytes
//! to frames with their durations, and re-encoding stills to WebP, the format
//! the receiving app accepts for animated and static stickers alike.
//!
//! The trait is the seam the rest of the crate depends on, so a host with a
//! different codec (or a test counting decoder calls) can swap it in.

use crate::error::CodecError;
use crate::limits::Dimensions;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, RgbaImage};
use std::fmt;
use std::io::Cursor;

/// The two image encodings a sticker may be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    Png,
    Webp,
}

impl ImageExtension {
    /// Parse a declared extension. Matching is exact: `"png"` or `"webp"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(ImageExtension::Png),
            "webp" => Some(ImageExtension::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Webp => "webp",
        }
    }

    fn image_format(&self) -> image::ImageFormat {
        match self {
            ImageExtension::Png => image::ImageFormat::Png,
            ImageExtension::Webp => image::ImageFormat::WebP,
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded frame and how long it is shown
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub image: RgbaImage,
    pub duration_ms: u32,
}

/// Facts derived from a decode that validation needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    /// Per-frame durations in milliseconds; a still image has one entry of 0
    pub frame_durations: Vec<u32>,
}

impl ImageInfo {
    /// Summarize decoded frames. Returns `None` when there are no frames.
    pub fn from_frames(frames: &[DecodedFrame]) -> Option<Self> {
        let first = frames.first()?;
        Some(Self {
            dimensions: first.image.dimensions().into(),
            frame_durations: frames.iter().map(|f| f.duration_ms).collect(),
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_durations.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frame_count() > 1
    }

    /// Shortest frame duration, if any frames exist
    pub fn min_frame_duration_ms(&self) -> Option<u32> {
        self.frame_durations.iter().copied().min()
    }

    /// Length of one animation loop
    pub fn total_duration_ms(&self) -> u64 {
        self.frame_durations.iter().map(|&d| d as u64).sum()
    }
}

/// The codec operations sticker validation and transfer depend on.
pub trait ImageCodec: Send + Sync {
    /// Decode all frames. Stills decode to exactly one frame.
    fn decode(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<DecodedFrame>, CodecError>;

    /// Re-encode to WebP. Data that is already WebP is returned unchanged.
    fn encode_as_animatable(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<u8>, CodecError>;

    /// Encode the first frame as PNG. PNG input is returned unchanged.
    fn encode_png(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<u8>, CodecError>;

    fn frame_count(&self, data: &[u8], ext: ImageExtension) -> Result<usize, CodecError> {
        Ok(self.decode(data, ext)?.len())
    }

    fn frame_durations(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<u32>, CodecError> {
        Ok(self.decode(data, ext)?.into_iter().map(|f| f.duration_ms).collect())
    }
}

/// [`ImageCodec`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode_still(data: &[u8], ext: ImageExtension) -> Result<DynamicImage, CodecError> {
        image::load_from_memory_with_format(data, ext.image_format())
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn decode_animated_webp(data: &[u8]) -> Result<Vec<DecodedFrame>, CodecError> {
        let decoder =
            WebPDecoder::new(Cursor::new(data)).map_err(|e| CodecError::Decode(e.to_string()))?;
        let mut frames = Vec::new();
        for frame in decoder.into_frames() {
            let frame = frame.map_err(|e| CodecError::Decode(e.to_string()))?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            let duration_ms = if denom > 0 { numer / denom } else { 0 };
            frames.push(DecodedFrame { image: frame.into_buffer(), duration_ms });
        }

        if frames.is_empty() {
            return Err(CodecError::Decode("animated webp has no frames".to_string()));
        }
        Ok(frames)
    }

    fn write(image: &DynamicImage, format: image::ImageFormat) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format).map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

impl ImageCodec for ImageRsCodec {
    fn decode(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<DecodedFrame>, CodecError> {
        if ext == ImageExtension::Webp && webp_has_animation(data) {
            return Self::decode_animated_webp(data);
        }
        let image = Self::decode_still(data, ext)?;
        Ok(vec![DecodedFrame { image: image.to_rgba8(), duration_ms: 0 }])
    }

    fn encode_as_animatable(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<u8>, CodecError> {
        match ext {
            ImageExtension::Webp => Ok(data.to_vec()),
            ImageExtension::Png => {
                let image = Self::decode_still(data, ext)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
                // The lossless WebP encoder only takes 8-bit RGB(A)
                let image = DynamicImage::ImageRgba8(image.to_rgba8());
                Self::write(&image, image::ImageFormat::WebP)
            }
        }
    }

    fn encode_png(&self, data: &[u8], ext: ImageExtension) -> Result<Vec<u8>, CodecError> {
        match ext {
            ImageExtension::Png => Ok(data.to_vec()),
            ImageExtension::Webp => {
                let frames = self.decode(data, ext).map_err(|e| CodecError::Encode(e.to_string()))?;
                let first = frames
                    .into_iter()
                    .next()
                    .ok_or_else(|| CodecError::Encode("no frames to encode".to_string()))?;
                Self::write(&DynamicImage::ImageRgba8(first.image), image::ImageFormat::Png)
            }
        }
    }
}

/// Check the RIFF container for the VP8X animation flag without decoding.
///
/// Layout: `RIFF` size `WEBP` then the first chunk. Only extended (`VP8X`)
/// files can animate; bit 1 of the flags byte marks an animation.
pub fn webp_has_animation(data: &[u8]) -> bool {
    const ANIMATION_FLAG: u8 = 0x02;

    data.len() > 20
        && &data[0..4] == b"RIFF"
        && &data[8..12] == b"WEBP"
        && &data[12..16] == b"VP8X"
        && data[20] & ANIMATION_FLAG != 0
}
