//! Asset loading
//!
//! Texture decoding for render backends. Elements only store the path; a
//! backend turns it into pixels through [`ImageData`].

pub mod image_loader;

pub use image_loader::ImageData;

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset file not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset loading failed
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),
}
