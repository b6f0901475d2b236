//! Configuration for the `stickerpack` tool
//!
//! Provides types, discovery and loading for `stickerpack.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
