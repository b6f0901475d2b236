//! Where manifest file names are resolved to bytes

use crate::error::StickerPackError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads the bytes of a file named in a manifest.
pub trait AssetSource: Send + Sync {
    /// Fails with [`StickerPackError::FileNotFound`] when the name is unknown.
    fn load_file_bytes(&self, name: &str) -> Result<Vec<u8>, StickerPackError>;
}

/// Assets stored as files directly inside one directory
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetSource {
    fn load_file_bytes(&self, name: &str) -> Result<Vec<u8>, StickerPackError> {
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StickerPackError::InvalidFileName(name.to_string()));
        }

        let path = self.root.join(name);
        std::fs::read(&path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "asset read failed");
            StickerPackError::FileNotFound(name.to_string())
        })
    }
}

/// Assets held in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.files.insert(name.into(), data);
    }

    pub fn with_file(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(name, data);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn load_file_bytes(&self, name: &str) -> Result<Vec<u8>, StickerPackError> {
        self.files.get(name).cloned().ok_or_else(|| StickerPackError::FileNotFound(name.to_string()))
    }
}
