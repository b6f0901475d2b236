//! Immutable image bytes with lazily derived, memoized facts
//!
//! An [`ImageAsset`] never changes its bytes or extension. Values that need
//! the codec (decoded info, the WebP re-encoding) are computed on first
//! access and cached for the asset's lifetime. Each cache is a `OnceLock`, so
//! the computation runs exactly once even when two threads race for it; the
//! loser blocks until the winner's value is stored.

use crate::codec::{ImageCodec, ImageExtension, ImageInfo};
use crate::error::CodecError;
use crate::limits::Dimensions;
use std::fmt;
use std::sync::{Arc, OnceLock};

pub struct ImageAsset {
    data: Vec<u8>,
    extension: ImageExtension,
    codec: Arc<dyn ImageCodec>,
    info: OnceLock<Result<ImageInfo, CodecError>>,
    animatable: OnceLock<Result<Vec<u8>, CodecError>>,
}

impl ImageAsset {
    pub fn new(data: Vec<u8>, extension: ImageExtension, codec: Arc<dyn ImageCodec>) -> Self {
        Self { data, extension, codec, info: OnceLock::new(), animatable: OnceLock::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn extension(&self) -> ImageExtension {
        self.extension
    }

    pub fn byte_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Decoded dimensions and frame durations, decoding on first call
    pub fn info(&self) -> Result<&ImageInfo, CodecError> {
        self.info
            .get_or_init(|| {
                let frames = self.codec.decode(&self.data, self.extension)?;
                ImageInfo::from_frames(&frames)
                    .ok_or_else(|| CodecError::Decode("image has no frames".to_string()))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether the image has more than one frame.
    ///
    /// PNG is always reported as still without touching the decoder. A WebP
    /// that fails to decode is reported as still; the failure surfaces
    /// through [`ImageAsset::decoded_size`].
    pub fn is_animated(&self) -> bool {
        match self.extension {
            ImageExtension::Png => false,
            ImageExtension::Webp => self.info().map(ImageInfo::is_animated).unwrap_or(false),
        }
    }

    pub fn decoded_size(&self) -> Result<Dimensions, CodecError> {
        self.info().map(|info| info.dimensions)
    }

    /// The image re-encoded as WebP, computed once
    pub fn animation_encoded_bytes(&self) -> Result<&[u8], CodecError> {
        self.animatable
            .get_or_init(|| self.codec.encode_as_animatable(&self.data, self.extension))
            .as_ref()
            .map(Vec::as_slice)
            .map_err(Clone::clone)
    }

    /// The first frame as PNG bytes
    pub fn png_bytes(&self) -> Result<Vec<u8>, CodecError> {
        self.codec.encode_png(&self.data, self.extension)
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("extension", &self.extension)
            .field("byte_size", &self.data.len())
            .field("info", &self.info.get())
            .finish_non_exhaustive()
    }
}
