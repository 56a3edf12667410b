//! Image catalog and the positioned sprites every actor is drawn with.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use se_core::animation::{AnimationController, FrameTarget};

use crate::collision::Aabb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    Missing(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(id) => write!(f, "image '{}' not found", id),
        }
    }
}

impl std::error::Error for ImageError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub size: Vec2,
}

/// Known images by identifier (file stem under `assets/images`).
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: HashMap<String, ImageInfo>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `.png` in `dir`. Only headers are read; pixels load lazily
    /// in the renderer.
    pub fn scan(dir: &Path) -> Result<Self, String> {
        let entries =
            fs::read_dir(dir).map_err(|e| format!("Failed to read {}: {e}", dir.display()))?;
        let mut catalog = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|e| format!("Failed to read {}: {e}", dir.display()))?
                .path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if !is_png {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match image::image_dimensions(&path) {
                Ok((w, h)) => catalog.insert(stem, path.clone(), Vec2::new(w as f32, h as f32)),
                Err(e) => log::warn!("Skipping image {}: {}", path.display(), e),
            }
        }
        Ok(catalog)
    }

    /// Startup variant: a missing or unreadable directory yields an empty
    /// catalog and every sprite renders as a placeholder.
    pub fn scan_or_empty(dir: &Path) -> Self {
        match Self::scan(dir) {
            Ok(catalog) => {
                log::info!("Indexed {} images from {}", catalog.len(), dir.display());
                catalog
            }
            Err(e) => {
                log::warn!("{}; sprites will use placeholders", e);
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, id: &str, path: PathBuf, size: Vec2) {
        self.images.insert(id.to_string(), ImageInfo { path, size });
    }

    pub fn get(&self, id: &str) -> Option<&ImageInfo> {
        self.images.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// An image drawn centred at `pos`. The hitbox size is fixed at creation.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: String,
    pub pos: Vec2,
    size: Vec2,
    catalog: Arc<ImageCatalog>,
}

impl Sprite {
    /// Size comes from the catalog entry for `image`, or `fallback_size`
    /// when the image is unknown.
    pub fn new(catalog: Arc<ImageCatalog>, image: &str, pos: Vec2, fallback_size: Vec2) -> Self {
        let size = match catalog.get(image) {
            Some(info) => info.size,
            None => {
                log::debug!("Sprite image '{}' missing, using placeholder", image);
                fallback_size
            }
        };
        Self {
            image: image.to_string(),
            pos,
            size,
            catalog,
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Switch to another image. An unknown id leaves the current image.
    pub fn set_image(&mut self, id: &str) -> Result<(), ImageError> {
        if !self.catalog.contains(id) {
            return Err(ImageError::Missing(id.to_string()));
        }
        if self.image != id {
            self.image = id.to_string();
        }
        Ok(())
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

impl FrameTarget for Sprite {
    type Error = ImageError;

    fn apply_frame(&mut self, image_id: &str) -> Result<(), ImageError> {
        self.set_image(image_id)
    }
}

pub trait Positioned {
    fn sprite(&self) -> &Sprite;

    fn position(&self) -> Vec2 {
        self.sprite().pos
    }

    fn hitbox(&self) -> Aabb {
        self.sprite().hitbox()
    }
}

impl Positioned for Sprite {
    fn sprite(&self) -> &Sprite {
        self
    }
}

pub trait Animated {
    fn animation(&self) -> &AnimationController;

    fn is_moving(&self) -> bool {
        self.animation().is_moving()
    }
}

/// In-memory catalog for tests: `(id, width, height)` triples.
#[cfg(test)]
pub(crate) fn catalog_with(ids: &[(&str, f32, f32)]) -> Arc<ImageCatalog> {
    let mut catalog = ImageCatalog::new();
    for (id, w, h) in ids {
        catalog.insert(id, PathBuf::from(format!("{}.png", id)), Vec2::new(*w, *h));
    }
    Arc::new(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_comes_from_catalog() {
        let catalog = catalog_with(&[("candy", 30.0, 20.0)]);
        let sprite = Sprite::new(catalog, "candy", Vec2::new(100.0, 50.0), Vec2::splat(8.0));
        assert_eq!(sprite.size(), Vec2::new(30.0, 20.0));
        let hitbox = sprite.hitbox();
        assert_eq!(hitbox.left(), 85.0);
        assert_eq!(hitbox.bottom(), 60.0);
    }

    #[test]
    fn unknown_image_uses_fallback_size() {
        let sprite = Sprite::new(
            Arc::new(ImageCatalog::new()),
            "goal",
            Vec2::ZERO,
            Vec2::new(56.0, 56.0),
        );
        assert_eq!(sprite.size(), Vec2::new(56.0, 56.0));
        assert_eq!(sprite.image(), "goal");
    }

    #[test]
    fn set_image_failure_keeps_previous_image() {
        let catalog = catalog_with(&[("sweet_idle_0", 40.0, 40.0), ("sweet_run_0", 44.0, 40.0)]);
        let mut sprite = Sprite::new(catalog, "sweet_idle_0", Vec2::ZERO, Vec2::ONE);

        assert_eq!(
            sprite.set_image("sweet_run_9"),
            Err(ImageError::Missing("sweet_run_9".to_string()))
        );
        assert_eq!(sprite.image(), "sweet_idle_0");

        sprite.set_image("sweet_run_0").unwrap();
        assert_eq!(sprite.image(), "sweet_run_0");
        // Hitbox stays the creation size.
        assert_eq!(sprite.size(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn scan_indexes_png_files_by_stem() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "se_images_test_{}_{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        image::RgbaImage::new(12, 7)
            .save(dir.join("candy.png"))
            .expect("write png");
        fs::write(dir.join("notes.txt"), "ignored").expect("write txt");

        let catalog = ImageCatalog::scan(&dir).expect("scan should succeed");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("candy").map(|i| i.size), Some(Vec2::new(12.0, 7.0)));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn scan_missing_dir_is_error() {
        let err = ImageCatalog::scan(Path::new("/nonexistent/images")).unwrap_err();
        assert!(err.contains("/nonexistent/images"));
        assert!(ImageCatalog::scan_or_empty(Path::new("/nonexistent/images")).is_empty());
    }
}
