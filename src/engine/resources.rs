//! Image and font resources
//!
//! Assets are loaded once at start-up from the paths named in the config and
//! referenced afterwards by logical name only. The tables live in the
//! [`Context`](super::Context) for the whole run and are released together at
//! shutdown.
//!
//! Decoding (`decode_image`) is kept apart from the GPU upload so it can run
//! without a window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use macroquad::prelude::{load_ttf_font_from_bytes, FilterMode, Font, Texture2D};

use super::types::Size;
use crate::error::ResourceError;

/// Directory images are resolved against
pub const IMAGES_DIR: &str = "assets/images";
/// Directory fonts are resolved against
pub const FONTS_DIR: &str = "assets/fonts";

/// A texture uploaded to the renderer.
#[derive(Clone)]
pub struct ImageResource {
    pub name: String,
    pub texture: Texture2D,
    /// Pixel size of the source image
    pub size: Size,
}

/// A TTF font ready for text drawing.
#[derive(Clone)]
pub struct FontResource {
    pub name: String,
    pub font: Font,
}

impl std::fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResource")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource").field("name", &self.name).finish()
    }
}

/// Decode an image file into RGBA8 pixels.
pub fn decode_image(name: &str, path: &Path) -> Result<RgbaImage, ResourceError> {
    let decoded = image::open(path).map_err(|source| match source {
        image::ImageError::IoError(io) => ResourceError::Io {
            kind: "image",
            name: name.to_string(),
            path: path.to_path_buf(),
            source: io,
        },
        source => ResourceError::Image {
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        },
    })?;
    let rgba = decoded.to_rgba8();

    // Textures are addressed with 16-bit dimensions
    if rgba.width() > u16::MAX as u32 || rgba.height() > u16::MAX as u32 {
        return Err(ResourceError::ImageTooLarge {
            name: name.to_string(),
            width: rgba.width(),
            height: rgba.height(),
        });
    }
    Ok(rgba)
}

/// Logical name → loaded asset tables.
#[derive(Debug, Default)]
pub struct Resources {
    images: HashMap<String, ImageResource>,
    fonts: HashMap<String, FontResource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` and upload it as the texture called `name`.
    /// Replaces any image previously loaded under that name.
    pub fn load_image(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<&ImageResource, ResourceError> {
        let path = path.into();
        log::debug!("Loading image '{}' from {}", name, path.display());

        let rgba = decode_image(name, &path)?;
        let texture = Texture2D::from_rgba8(rgba.width() as u16, rgba.height() as u16, rgba.as_raw());
        texture.set_filter(FilterMode::Linear);

        let resource = ImageResource {
            name: name.to_string(),
            texture,
            size: Size::new(rgba.width() as f32, rgba.height() as f32),
        };
        self.images.insert(name.to_string(), resource);
        Ok(&self.images[name])
    }

    /// Read `path` and load it as the font called `name`.
    pub fn load_font(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<&FontResource, ResourceError> {
        let path = path.into();
        log::debug!("Loading font '{}' from {}", name, path.display());

        let bytes = std::fs::read(&path).map_err(|source| ResourceError::Io {
            kind: "font",
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        let font = load_ttf_font_from_bytes(&bytes).map_err(|e| ResourceError::Font {
            name: name.to_string(),
            path: path.clone(),
            message: format!("{:?}", e),
        })?;

        self.fonts.insert(name.to_string(), FontResource { name: name.to_string(), font });
        Ok(&self.fonts[name])
    }

    pub fn image(&self, name: &str) -> Option<&ImageResource> {
        self.images.get(name)
    }

    pub fn font(&self, name: &str) -> Option<&FontResource> {
        self.fonts.get(name)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Release every loaded asset.
    pub fn clear(&mut self) {
        self.fonts.clear();
        self.images.clear();
    }
}
