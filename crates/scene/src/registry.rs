//! Image registry: decoded bitmaps keyed by image identifier.

use canvas::Bitmap;
use common::error::SceneResult;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot of decoded images available to shapes.
///
/// Reconstruction looks bitmaps up here, so the registry has to be filled
/// before any record that references it is applied.
#[derive(Clone, Debug, Default)]
pub struct ImageRegistry {
    images: HashMap<String, Arc<Bitmap>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded bitmap, replacing any previous image with the same id.
    pub fn insert(&mut self, image_id: impl Into<String>, bitmap: Bitmap) -> Arc<Bitmap> {
        let bitmap = Arc::new(bitmap);
        self.images.insert(image_id.into(), bitmap.clone());
        bitmap
    }

    /// Register an already shared bitmap.
    pub fn insert_shared(&mut self, image_id: impl Into<String>, bitmap: Arc<Bitmap>) {
        self.images.insert(image_id.into(), bitmap);
    }

    /// Decode `bytes` and register the result.
    pub fn decode_and_insert(&mut self, image_id: impl Into<String>, bytes: &[u8]) -> SceneResult<Arc<Bitmap>> {
        let bitmap = Bitmap::decode(bytes)?;
        Ok(self.insert(image_id, bitmap))
    }

    /// Load every decodable image in `dir`, keyed by file stem.
    ///
    /// Files that fail to decode are skipped with a warning. Returns the
    /// number of images loaded.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> SceneResult<usize> {
        let mut loaded = 0;

        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match Bitmap::open(&path) {
                Ok(bitmap) => {
                    debug!("loaded image {} ({}x{})", stem, bitmap.width(), bitmap.height());
                    self.insert(stem, bitmap);
                    loaded += 1;
                }
                Err(err) => warn!("skipping {}: {}", path.display(), err),
            }
        }

        Ok(loaded)
    }

    /// Look up a bitmap. Absence is not an error here; shapes that cannot
    /// resolve their image simply fail to draw.
    pub fn lookup(&self, image_id: &str) -> Option<Arc<Bitmap>> {
        self.images.get(image_id).cloned()
    }

    pub fn contains(&self, image_id: &str) -> bool {
        self.images.contains_key(image_id)
    }

    pub fn remove(&mut self, image_id: &str) -> Option<Arc<Bitmap>> {
        self.images.remove(image_id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Total decoded size of all registered images in bytes.
    pub fn memory_size(&self) -> usize {
        self.images.values().map(|b| b.memory_size()).sum()
    }
}
