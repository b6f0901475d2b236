//! Configuration schema types for `stickerpack.toml`
//!
//! ```toml
//! [limits]
//! max_stickers_per_pack = 30
//! tray_image_dimensions = { width = 96, height = 96 }
//!
//! [validate]
//! strict = true
//!
//! [transfer]
//! bundle_identifier = "com.example.stickers"
//! ```

use crate::ingest::IngestOptions;
use crate::limits::Limits;
use crate::transfer::TransferOptions;
use serde::{Deserialize, Serialize};

/// Validation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Check identifier characters, link hosts and require emojis
    #[serde(default)]
    pub strict: bool,
}

/// Transfer settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Bundle identifier of the sending app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,
}

/// Complete `stickerpack.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StickerConfig {
    /// Limit overrides; unset fields keep the published values
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub validate: ValidateConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "limits.max_stickers_per_pack")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stickerpack.toml: '{}' {}", self.field, self.message)
    }
}

impl StickerConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors: Vec<ConfigValidationError> = self
            .limits
            .validate()
            .into_iter()
            .map(|message| ConfigValidationError { field: "limits".to_string(), message })
            .collect();

        if let Some(bundle) = &self.transfer.bundle_identifier {
            if bundle.trim().is_empty() {
                errors.push(ConfigValidationError {
                    field: "transfer.bundle_identifier".to_string(),
                    message: "must not be blank".to_string(),
                });
            }
        }

        errors
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions { strict: self.validate.strict }
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions { bundle_identifier: self.transfer.bundle_identifier.clone() }
    }
}
