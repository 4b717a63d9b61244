//! # gcs_fetch image decoder
//!
//! A [`TextureDecoder`] that decodes PNG payloads with the `image` crate and
//! scales them to the requested [`TextureSize`].
//!
//! ## Usage
//!
//! ```no_run
//! use gcs_fetch_core::prelude::{DecodeError, TextureDecoder, TextureSize};
//! use gcs_fetch_image::ImageTextureDecoder;
//!
//! # fn run(png: &[u8]) -> Result<(), DecodeError> {
//! let texture = ImageTextureDecoder::default().decode_texture(png, TextureSize::default())?;
//! assert_eq!((texture.width, texture.height), (512, 512));
//! # Ok(())
//! # }
//! ```

use gcs_fetch_core::prelude::{DecodeError, TextureDecoder, TextureSize};
use image::imageops::FilterType;
use image::{ExtendedColorType, GenericImageView, ImageFormat, ImageResult, RgbaImage};
use std::path::Path;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// Row-major, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl Texture {
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Writes the texture as PNG regardless of the extension of `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
            ImageFormat::Png,
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageTextureDecoder {
    filter: FilterType,
}

impl Default for ImageTextureDecoder {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ImageTextureDecoder {
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl TextureDecoder for ImageTextureDecoder {
    type Texture = Texture;

    fn decode_texture(&self, bytes: &[u8], size: TextureSize) -> Result<Texture, DecodeError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| DecodeError::invalid("texture", e))?;

        let image = if image.dimensions() == (size.width, size.height) {
            image
        } else {
            image.resize_exact(size.width, size.height, self.filter)
        };

        let rgba = image.into_rgba8();
        Ok(Texture {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn scales_to_default_size() {
        let texture = ImageTextureDecoder::default()
            .decode_texture(&png(8, 4), TextureSize::default())
            .unwrap();

        assert_eq!((texture.width, texture.height), (512, 512));
        assert_eq!(texture.pixels.len(), 512 * 512 * 4);
    }

    #[test]
    fn honours_requested_size() {
        let size = TextureSize::new(16, 32).unwrap();
        let texture = ImageTextureDecoder::with_filter(FilterType::Nearest)
            .decode_texture(&png(64, 64), size)
            .unwrap();

        assert_eq!((texture.width, texture.height), (16, 32));
        let image = texture.into_image().unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn rejects_garbage() {
        let err = ImageTextureDecoder::default()
            .decode_texture(b"definitely not a png", TextureSize::default())
            .unwrap_err();

        assert!(matches!(
            err,
            DecodeError::InvalidPayload {
                expected: "texture",
                ..
            }
        ));
    }

    #[test]
    fn saves_png_whatever_the_extension() {
        let texture = ImageTextureDecoder::default()
            .decode_texture(&png(4, 4), TextureSize::new(8, 8).unwrap())
            .unwrap();
        let dir = std::env::temp_dir().join(format!("gcs_fetch_image_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["hero", "hero.jpg", "hero.png"] {
            let path = dir.join(name);
            texture.save_png(&path).unwrap();

            let bytes = std::fs::read(&path).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
            assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (8, 8));
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
