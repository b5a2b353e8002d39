//! Element - one node of the UI tree
//!
//! Geometry, paint and the callback registry of a single element. Hierarchy
//! links are arena indices owned by [`ElementTree`](super::tree::ElementTree),
//! which is also the only place that recomputes `absolute_position`.

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use super::backend::TextureHandle;
use super::tree::{ElementId, TreeError};
use crate::events::CallbackRegistry;
use crate::foundation::math::{Rect, Vec2};

/// Longest accepted element name, in bytes
pub const MAX_NAME_LEN: usize = 20;

/// Longest accepted texture path, in bytes
pub const MAX_TEXTURE_PATH_LEN: usize = 50;

/// Packed `0xRRGGBBAA` colour
///
/// An alpha of zero means "no fill": the draw pass skips the rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color(0);

    /// Pack four channels
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    /// Red channel
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether the draw pass should skip filling with this colour
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Invert the colour channels, keeping alpha
    pub const fn inverted(self) -> Self {
        Self(self.0 ^ 0xffff_ff00)
    }

    /// Channels as `[r, g, b, a]`
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// A node in the UI tree
pub struct Element {
    name: String,
    /// Type tag from the markup (`Div`, `Button`, ...), selects a builder
    pub element_type: String,
    /// Offset from the parent's absolute position (from the origin for a root)
    ///
    /// Call [`ElementTree::update`](super::tree::ElementTree::update) after
    /// changing it, or use
    /// [`ElementTree::set_relative_position`](super::tree::ElementTree::set_relative_position).
    pub relative_position: Vec2,
    pub(crate) absolute_position: Vec2,
    /// Width and height in pixels
    pub size: Vec2,
    /// Background fill
    pub color: Color,
    texture_path: Option<PathBuf>,
    texture: Option<TextureHandle>,

    pub(crate) parent: Option<ElementId>,
    pub(crate) first_child: Option<ElementId>,
    pub(crate) next_sibling: Option<ElementId>,

    pub(crate) callbacks: CallbackRegistry,
    /// Arbitrary payload, dropped with the element
    pub data: Option<Box<dyn Any>>,
}

impl Element {
    /// Create a detached element
    ///
    /// `texture_path` may be empty for an untextured element. Hierarchy links
    /// and callback lists start out empty.
    pub fn new(
        relative_position: Vec2,
        size: Vec2,
        texture_path: &str,
        color: Color,
        name: &str,
    ) -> Result<Self, TreeError> {
        if name.len() > MAX_NAME_LEN {
            return Err(TreeError::NameTooLong { name: name.to_string(), max: MAX_NAME_LEN });
        }
        if texture_path.len() > MAX_TEXTURE_PATH_LEN {
            return Err(TreeError::TexturePathTooLong {
                path: texture_path.to_string(),
                max: MAX_TEXTURE_PATH_LEN,
            });
        }

        Ok(Self {
            name: name.to_string(),
            element_type: String::new(),
            relative_position,
            absolute_position: relative_position,
            size,
            color,
            texture_path: (!texture_path.is_empty()).then(|| PathBuf::from(texture_path)),
            texture: None,
            parent: None,
            first_child: None,
            next_sibling: None,
            callbacks: CallbackRegistry::new(),
            data: None,
        })
    }

    /// Set the type tag (builder pattern)
    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = element_type.into();
        self
    }

    /// Attach a payload (builder pattern)
    pub fn with_data(mut self, data: Box<dyn Any>) -> Self {
        self.data = Some(data);
        self
    }

    /// Lookup name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Screen-space origin, derived from the ancestors
    pub fn absolute_position(&self) -> Vec2 {
        self.absolute_position
    }

    /// Screen-space rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.absolute_position, self.size)
    }

    /// Path of the background image, if any
    pub fn texture_path(&self) -> Option<&Path> {
        self.texture_path.as_deref()
    }

    /// Loaded background image
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Attach a loaded texture, returning the one it replaces
    ///
    /// The caller becomes responsible for releasing the returned handle.
    pub fn set_texture(&mut self, texture: Option<TextureHandle>) -> Option<TextureHandle> {
        std::mem::replace(&mut self.texture, texture)
    }

    /// Parent element, `None` for a root or a detached element
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Head of the child list
    pub fn first_child(&self) -> Option<ElementId> {
        self.first_child
    }

    /// Next element in the parent's child list
    pub fn next_sibling(&self) -> Option<ElementId> {
        self.next_sibling
    }

    /// Registered handlers
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Payload downcast to `T`
    pub fn data_ref<T: Any>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|data| data.downcast_ref::<T>())
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("element_type", &self.element_type)
            .field("relative_position", &(self.relative_position.x, self.relative_position.y))
            .field("absolute_position", &(self.absolute_position.x, self.absolute_position.y))
            .field("size", &(self.size.x, self.size.y))
            .field("color", &self.color)
            .field("texture_path", &self.texture_path)
            .field("texture", &self.texture)
            .field("parent", &self.parent)
            .field("callbacks", &self.callbacks)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        let color = Color::from_rgba(255, 0, 16, 128);
        assert_eq!(color.0, 0xff00_1080);
        assert_eq!(color.to_rgba(), [255, 0, 16, 128]);
        assert!(!color.is_transparent());
        assert!(Color::from_rgba(1, 2, 3, 0).is_transparent());
    }

    #[test]
    fn test_color_inversion_keeps_alpha() {
        let color = Color::from_rgba(255, 0, 0, 200);
        assert_eq!(color.inverted(), Color::from_rgba(0, 255, 255, 200));
        assert_eq!(color.inverted().inverted(), color);
    }

    #[test]
    fn test_new_element_is_detached() {
        let element = Element::new(
            Vec2::new(5, 6),
            Vec2::new(10, 20),
            "",
            Color::TRANSPARENT,
            "panel",
        )
        .unwrap();

        assert_eq!(element.name(), "panel");
        assert_eq!(element.absolute_position(), Vec2::new(5, 6));
        assert!(element.parent().is_none());
        assert!(element.first_child().is_none());
        assert!(element.texture_path().is_none());
        assert!(element.callbacks().is_empty());
    }

    #[test]
    fn test_name_and_path_limits() {
        let long_name = "n".repeat(MAX_NAME_LEN + 1);
        let result = Element::new(Vec2::zeros(), Vec2::zeros(), "", Color::TRANSPARENT, &long_name);
        assert!(matches!(result, Err(TreeError::NameTooLong { .. })));

        let long_path = "p".repeat(MAX_TEXTURE_PATH_LEN + 1);
        let result = Element::new(Vec2::zeros(), Vec2::zeros(), &long_path, Color::TRANSPARENT, "ok");
        assert!(matches!(result, Err(TreeError::TexturePathTooLong { .. })));
    }

    #[test]
    fn test_data_payload() {
        let element = Element::new(Vec2::zeros(), Vec2::zeros(), "", Color::TRANSPARENT, "d")
            .unwrap()
            .with_data(Box::new(String::from("payload")));

        assert_eq!(element.data_ref::<String>().map(String::as_str), Some("payload"));
        assert!(element.data_ref::<u32>().is_none());
    }
}
