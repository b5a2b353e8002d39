//! UI Render Backend Trait
//!
//! Defines the interface between the UI core and the rendering surface.
//! Keeps element trees independent of any windowing or graphics library:
//! the core only asks for a surface, rectangle fills and texture blits.

use std::path::Path;

use super::element::Color;
use crate::assets::AssetError;
use crate::foundation::math::{Rect, Vec2};

slotmap::new_key_type! {
    /// Handle to a texture owned by a render backend
    pub struct TextureHandle;
}

/// Render backend errors
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// The drawable surface could not be created
    #[error("Surface creation failed: {0}")]
    Surface(String),

    /// A texture file could not be loaded
    #[error("Texture load failed: {0}")]
    Texture(#[from] AssetError),

    /// The finished frame could not be presented or saved
    #[error("Present failed: {0}")]
    Present(String),
}

/// Backend-agnostic rendering interface
///
/// Rectangles are absolute pixel coordinates, colours packed RGBA.
pub trait RenderBackend {
    /// Create the drawable surface, sized to the root element
    fn create_surface(&mut self, title: &str, size: Vec2) -> Result<(), BackendError>;

    /// Reset the surface before drawing a frame
    fn clear(&mut self);

    /// Fill a rectangle with a solid colour
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Decode an image file into a texture
    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, BackendError>;

    /// Stretch a texture over a rectangle
    fn blit(&mut self, texture: TextureHandle, rect: Rect);

    /// Release a texture; unknown handles are ignored
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Show the finished frame
    fn present(&mut self) -> Result<(), BackendError>;
}
