//! Disk-backed resources (font, templates, icon) behind in-memory
//! caches. Owned by the server state rather than globals so tests can
//! run isolated instances side by side.

use crate::config::CardConfig;
use crate::error::CardError;
use image::imageops::FilterType;
use image::RgbaImage;
use parking_lot::Mutex;
use rusttype::Font;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
pub struct ResourceCache {
    fonts: Mutex<HashMap<PathBuf, Arc<Font<'static>>>>,
    images: Mutex<HashMap<PathBuf, Arc<RgbaImage>>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify every resource the config points at exists on disk.
    /// Run before serving traffic so a bad deployment fails at startup,
    /// not on the first request.
    pub fn check(&self, cfg: &CardConfig) -> Result<(), CardError> {
        let mut paths: Vec<&Path> = vec![cfg.font_path.as_path()];
        paths.extend(cfg.templates.iter().map(|p| p.as_path()));
        if let Some(icon) = &cfg.icon_path {
            paths.push(icon.as_path());
        }
        for path in paths {
            if !path.is_file() {
                return Err(CardError::ResourceMissing { path: path.to_path_buf() });
            }
        }
        Ok(())
    }

    /// Parsed font, loaded once per path. Fonts are scalable, so a
    /// single entry serves every render size.
    pub fn font(&self, path: &Path) -> Result<Arc<Font<'static>>, CardError> {
        let mut fonts = self.fonts.lock();
        if let Some(font) = fonts.get(path) {
            return Ok(font.clone());
        }
        let bytes = read_resource(path)?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| CardError::Render(format!("unreadable font: {}", path.display())))?;
        let font = Arc::new(font);
        fonts.insert(path.to_path_buf(), font.clone());
        Ok(font)
    }

    /// Background template, decoded and pre-scaled to the card size.
    pub fn template(&self, path: &Path, width: u32, height: u32) -> Result<Arc<RgbaImage>, CardError> {
        self.image(path, width, height)
    }

    /// Corner icon, decoded and pre-scaled to a square.
    pub fn icon(&self, path: &Path, size: u32) -> Result<Arc<RgbaImage>, CardError> {
        self.image(path, size, size)
    }

    fn image(&self, path: &Path, width: u32, height: u32) -> Result<Arc<RgbaImage>, CardError> {
        let mut images = self.images.lock();
        if let Some(img) = images.get(path) {
            return Ok(img.clone());
        }
        let bytes = read_resource(path)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| CardError::Render(format!("decode {} failed: {e}", path.display())))?;
        let scaled = if decoded.width() == width && decoded.height() == height {
            decoded.to_rgba8()
        } else {
            decoded.resize_exact(width, height, FilterType::Lanczos3).to_rgba8()
        };
        let img = Arc::new(scaled);
        images.insert(path.to_path_buf(), img.clone());
        Ok(img)
    }

    /// Drop every cached entry; the next render reloads from disk.
    pub fn invalidate(&self) {
        self.fonts.lock().clear();
        self.images.lock().clear();
    }
}

fn read_resource(path: &Path) -> Result<Vec<u8>, CardError> {
    fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            CardError::ResourceMissing { path: path.to_path_buf() }
        } else {
            CardError::Render(format!("read {} failed: {e}", path.display()))
        }
    })
}
