use crate::AssetError;
use std::path::Path;

/// Decoded texture in BGRA byte order, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexturePixels {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TexturePixels {
    /// Convert tightly packed RGBA8 rows into BGRA.
    pub fn from_rgba(mut rgba: Vec<u8>, width: u32, height: u32) -> Self {
        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        Self {
            pixels: rgba,
            width,
            height,
        }
    }

    /// A texture filled with one BGRA color.
    pub fn solid(width: u32, height: u32, bgra: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            pixels: bgra.repeat(count),
            width,
            height,
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

/// Source of decoded texture pixels.
pub trait TextureProvider {
    fn load(&self, path: &Path) -> Result<TexturePixels, AssetError>;
}

/// Decodes image files with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageTextureProvider;

impl TextureProvider for ImageTextureProvider {
    fn load(&self, path: &Path) -> Result<TexturePixels, AssetError> {
        let img = image::open(path).map_err(|e| AssetError::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::info!("loaded texture {} ({width}x{height})", path.display());
        Ok(TexturePixels::from_rgba(rgba.into_raw(), width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_reordered_to_bgra() {
        let tex = TexturePixels::from_rgba(vec![1, 2, 3, 4, 5, 6, 7, 8], 2, 1);
        assert_eq!(tex.pixels, vec![3, 2, 1, 4, 7, 6, 5, 8]);
        assert_eq!(tex.bytes_per_row(), 8);
    }

    #[test]
    fn solid_fills_every_pixel() {
        let tex = TexturePixels::solid(3, 2, [9, 8, 7, 255]);
        assert_eq!(tex.pixels.len(), 24);
        assert!(tex.pixels.chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
    }

    #[test]
    fn provider_decodes_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();

        let tex = ImageTextureProvider.load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(&tex.pixels[..4], &[50, 100, 200, 255]);
    }

    #[test]
    fn provider_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ImageTextureProvider
            .load(&dir.path().join("missing.bmp"))
            .unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }
}
