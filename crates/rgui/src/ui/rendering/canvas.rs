//! Software render backend
//!
//! Draws into an in-memory RGBA image. Used by the demo and the tests in
//! place of a platform window; the finished frame can be written out as PNG.

use std::path::Path;

use image::{Rgba, RgbaImage};
use slotmap::SlotMap;

use crate::assets::ImageData;
use crate::foundation::math::{Rect, Vec2};
use crate::ui::backend::{BackendError, RenderBackend, TextureHandle};
use crate::ui::element::Color;

/// In-memory surface with its own texture store
pub struct SoftwareCanvas {
    surface: RgbaImage,
    textures: SlotMap<TextureHandle, ImageData>,
    clear_color: [u8; 4],
    frames_presented: u64,
}

impl SoftwareCanvas {
    /// Create a canvas; the surface is allocated by `create_surface`
    pub fn new() -> Self {
        Self {
            surface: RgbaImage::new(0, 0),
            textures: SlotMap::with_key(),
            clear_color: [0, 0, 0, 255],
            frames_presented: 0,
        }
    }

    /// Set the colour used by `clear` (builder pattern)
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color.to_rgba();
        self
    }

    /// Register already decoded pixels as a texture
    pub fn insert_texture(&mut self, image: ImageData) -> TextureHandle {
        self.textures.insert(image)
    }

    /// Surface pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.surface.width() || y >= self.surface.height() {
            return None;
        }
        let [r, g, b, a] = self.surface.get_pixel(x, y).0;
        Some(Color::from_rgba(r, g, b, a))
    }

    /// Surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of frames presented so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Write the current surface to a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), BackendError> {
        let path = path.as_ref();
        self.surface
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| BackendError::Present(format!("Failed to save {}: {}", path.display(), e)))?;
        log::info!("Saved frame to {}", path.display());
        Ok(())
    }

    /// Clip `rect` to the surface, as `(x0, y0, x1, y1)` with exclusive ends
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let (width, height) = self.surface.dimensions();
        let clamp_x = |x: i32| u32::try_from(x.max(0)).map_or(0, |x| x.min(width));
        let clamp_y = |y: i32| u32::try_from(y.max(0)).map_or(0, |y| y.min(height));

        let (x0, x1) = (clamp_x(rect.left()), clamp_x(rect.right()));
        let (y0, y1) = (clamp_y(rect.top()), clamp_y(rect.bottom()));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

impl Default for SoftwareCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SoftwareCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareCanvas")
            .field("size", &self.surface.dimensions())
            .field("textures", &self.textures.len())
            .field("frames_presented", &self.frames_presented)
            .finish()
    }
}

fn blend(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let alpha = u32::from(src[3]);
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * (255 - alpha)) / 255) as u8;
    [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), dst[3].max(src[3])]
}

impl RenderBackend for SoftwareCanvas {
    fn create_surface(&mut self, title: &str, size: Vec2) -> Result<(), BackendError> {
        let (Ok(width), Ok(height)) = (u32::try_from(size.x), u32::try_from(size.y)) else {
            return Err(BackendError::Surface(format!("Invalid surface size {}x{}", size.x, size.y)));
        };
        if width == 0 || height == 0 {
            return Err(BackendError::Surface(format!("Empty surface {}x{}", width, height)));
        }

        self.surface = RgbaImage::from_pixel(width, height, Rgba(self.clear_color));
        log::info!("Created {}x{} surface for '{}'", width, height, title);
        Ok(())
    }

    fn clear(&mut self) {
        let clear = Rgba(self.clear_color);
        for pixel in self.surface.pixels_mut() {
            *pixel = clear;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let fill = Rgba(color.to_rgba());
        for y in y0..y1 {
            for x in x0..x1 {
                self.surface.put_pixel(x, y, fill);
            }
        }
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, BackendError> {
        let image = ImageData::from_file(path)?;
        Ok(self.textures.insert(image))
    }

    fn blit(&mut self, texture: TextureHandle, rect: Rect) {
        let Some(image) = self.textures.get(texture) else {
            log::warn!("Blit of unknown texture {:?}", texture);
            return;
        };
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        if image.width == 0 || image.height == 0 {
            return;
        }

        // Nearest-neighbour stretch over the full, unclipped rectangle
        let (Ok(width), Ok(height)) = (u32::try_from(rect.size.x), u32::try_from(rect.size.y)) else {
            return;
        };
        for y in y0..y1 {
            let local_y = i64::from(y) - i64::from(rect.top());
            let src_y = (local_y * i64::from(image.height) / i64::from(height.max(1))) as u32;
            for x in x0..x1 {
                let local_x = i64::from(x) - i64::from(rect.left());
                let src_x = (local_x * i64::from(image.width) / i64::from(width.max(1))) as u32;
                let Some(src) = image.pixel(src_x.min(image.width - 1), src_y.min(image.height - 1)) else {
                    continue;
                };
                if src[3] == 0 {
                    continue;
                }
                let dst = self.surface.get_pixel(x, y).0;
                self.surface.put_pixel(x, y, Rgba(blend(src, dst)));
            }
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(texture).is_none() {
            log::debug!("Texture {:?} already released", texture);
        }
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: i32, height: i32) -> SoftwareCanvas {
        let mut canvas = SoftwareCanvas::new();
        canvas.create_surface("test", Vec2::new(width, height)).unwrap();
        canvas
    }

    #[test]
    fn test_rejects_empty_surface() {
        let mut canvas = SoftwareCanvas::new();
        assert!(canvas.create_surface("empty", Vec2::new(0, 10)).is_err());
        assert!(canvas.create_surface("negative", Vec2::new(-1, 10)).is_err());
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut canvas = canvas(20, 10);
        let red = Color::from_rgba(255, 0, 0, 255);

        canvas.fill_rect(Rect::new(Vec2::new(15, 5), Vec2::new(50, 50)), red);

        assert_eq!(canvas.pixel(15, 5), Some(red));
        assert_eq!(canvas.pixel(19, 9), Some(red));
        assert_eq!(canvas.pixel(14, 5), Some(Color::from_rgba(0, 0, 0, 255)));
        assert_eq!(canvas.pixel(20, 5), None);
    }

    #[test]
    fn test_clear_resets_surface() {
        let mut canvas = SoftwareCanvas::new().with_clear_color(Color::from_rgba(1, 2, 3, 255));
        canvas.create_surface("clear", Vec2::new(4, 4)).unwrap();
        canvas.fill_rect(Rect::new(Vec2::zeros(), Vec2::new(4, 4)), Color::from_rgba(9, 9, 9, 255));

        canvas.clear();

        assert_eq!(canvas.pixel(2, 2), Some(Color::from_rgba(1, 2, 3, 255)));
    }

    #[test]
    fn test_blit_stretches_texture() {
        let mut canvas = canvas(10, 10);
        let green = [0, 255, 0, 255];
        let texture = canvas.insert_texture(ImageData::solid_color(1, 1, green));

        canvas.blit(texture, Rect::new(Vec2::new(2, 2), Vec2::new(4, 4)));

        assert_eq!(canvas.pixel(2, 2), Some(Color::from_rgba(0, 255, 0, 255)));
        assert_eq!(canvas.pixel(5, 5), Some(Color::from_rgba(0, 255, 0, 255)));
        assert_eq!(canvas.pixel(7, 7), Some(Color::from_rgba(0, 0, 0, 255)));
    }

    #[test]
    fn test_blit_skips_transparent_texels() {
        let mut canvas = canvas(4, 4);
        let texture = canvas.insert_texture(ImageData::solid_color(2, 2, [255, 255, 255, 0]));

        canvas.blit(texture, Rect::new(Vec2::zeros(), Vec2::new(4, 4)));

        assert_eq!(canvas.pixel(1, 1), Some(Color::from_rgba(0, 0, 0, 255)));
    }

    #[test]
    fn test_destroy_texture_releases_it() {
        let mut canvas = canvas(4, 4);
        let texture = canvas.insert_texture(ImageData::solid_color(1, 1, [1, 1, 1, 255]));
        assert_eq!(canvas.texture_count(), 1);

        canvas.destroy_texture(texture);
        canvas.destroy_texture(texture);

        assert_eq!(canvas.texture_count(), 0);
    }

    #[test]
    fn test_load_missing_texture_fails() {
        let mut canvas = canvas(4, 4);
        let result = canvas.load_texture(Path::new("no/such/texture.png"));
        assert!(matches!(result, Err(BackendError::Texture(_))));
    }
}
