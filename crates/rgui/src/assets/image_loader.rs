//! Image loading utilities for texture data
//!
//! Decodes PNG files into straight RGBA8 pixels for the software canvas.

use std::path::Path;

use crate::assets::AssetError;

/// Decoded image, row-major RGBA8
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.exists() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image: {}", e)))?;

        // Convert to RGBA8 regardless of the source layout
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// RGBA value of one pixel
    ///
    /// `None` outside the image or past the end of a truncated buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = self.data.get(offset..offset + 4)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(bytes);
        Some(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_pixels() {
        let image = ImageData::solid_color(2, 3, [1, 2, 3, 4]);
        assert_eq!(image.data.len(), 2 * 3 * 4);
        assert_eq!(image.pixel(1, 2), Some([1, 2, 3, 4]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn test_large_dimensions_index_without_wrapping() {
        // 70000 * 70000 does not fit in a u32
        let image = ImageData { data: vec![0; 16], width: 70_000, height: 70_000 };
        assert_eq!(image.pixel(69_999, 69_999), None);
        assert_eq!(image.pixel(3, 0), Some([0; 4]));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn test_missing_file() {
        let result = ImageData::from_file("definitely/not/here.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_png_round_trip_through_image_crate() {
        let mut path = std::env::temp_dir();
        path.push(format!("rgui_image_loader_{}.png", std::process::id()));
        let source = image::RgbaImage::from_pixel(4, 2, image::Rgba([9, 8, 7, 255]));
        source.save(&path).unwrap();

        let loaded = ImageData::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((loaded.width, loaded.height), (4, 2));
        assert_eq!(loaded.pixel(3, 1), Some([9, 8, 7, 255]));
    }
}
