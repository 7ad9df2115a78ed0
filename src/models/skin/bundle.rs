//! Custom skin bundles loaded from a directory of osu!mania assets.

use super::ini::ManiaIni;
use crate::error::GameError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decoded RGBA image, shared with whatever uploads it to the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl SkinImage {
    /// Height of the image when drawn `width` pixels wide.
    pub fn height_for_width(&self, width: f32) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        self.height as f32 / self.width as f32 * width
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkinBundle {
    pub name: String,
    pub ini: ManiaIni,
    images: HashMap<String, SkinImage>,
}

impl SkinBundle {
    pub fn new(name: impl Into<String>, ini: ManiaIni) -> Self {
        Self {
            name: name.into(),
            ini,
            images: HashMap::new(),
        }
    }

    pub fn insert_image(&mut self, key: impl Into<String>, image: SkinImage) {
        self.images.insert(key.into(), image);
    }

    pub fn image(&self, key: &str) -> Option<&SkinImage> {
        self.images.get(key)
    }

    pub fn image_keys(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    /// Loads `skin.ini` and every `mania-*` / `lighting*` image in `dir`.
    ///
    /// Images that fail to decode are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Result<Self, GameError> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ini = match find_case_insensitive(dir, "skin.ini")? {
            Some(path) => ManiaIni::parse(&String::from_utf8_lossy(&fs::read(path)?)),
            None => ManiaIni::default(),
        };

        let mut bundle = Self::new(name, ini);

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(key) = image_key(&path) else {
                continue;
            };

            match image::open(&path) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    bundle.insert_image(
                        key,
                        SkinImage {
                            width,
                            height,
                            rgba: Arc::from(rgba.into_raw()),
                        },
                    );
                }
                Err(e) => log::warn!("SKIN: Failed to decode {:?}: {}", path, e),
            }
        }

        log::info!(
            "SKIN: Loaded '{}' ({} images, hit position {})",
            bundle.name,
            bundle.images.len(),
            bundle.ini.hit_position
        );
        Ok(bundle)
    }
}

/// Lookup key for a skin image file, or `None` if the file is not one.
/// `mania-note1@2x.png` maps to `mania-note1`.
pub fn image_key(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
    let base = stem.strip_suffix("@2x").unwrap_or(&stem);

    (base.starts_with("mania-") || base.starts_with("lighting")).then(|| base.to_string())
}

fn find_case_insensitive(dir: &Path, name: &str) -> Result<Option<std::path::PathBuf>, GameError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(name));
        if matches {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_keys_strip_retina_suffix() {
        assert_eq!(image_key(Path::new("skin/mania-note1@2x.png")).as_deref(), Some("mania-note1"));
        assert_eq!(image_key(Path::new("Mania-Key1D.PNG")).as_deref(), Some("mania-key1d"));
        assert_eq!(image_key(Path::new("lightingN.jpg")).as_deref(), Some("lightingn"));
        assert_eq!(image_key(Path::new("hitcircle.png")), None);
        assert_eq!(image_key(Path::new("mania-note1.wav")), None);
    }

    #[test]
    fn loads_directory_bundle() {
        let dir = std::env::temp_dir().join(format!("rvsrg-skin-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("skin.ini"), "[Mania]\nHitPosition: 380\n").unwrap();
        image::RgbaImage::new(4, 2).save(dir.join("mania-note1@2x.png")).unwrap();
        fs::write(dir.join("mania-broken.png"), b"not a png").unwrap();
        fs::write(dir.join("readme.txt"), b"hello").unwrap();

        let bundle = SkinBundle::load_dir(&dir).unwrap();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(bundle.ini.hit_position, 380.0);
        let note = bundle.image("mania-note1").unwrap();
        assert_eq!((note.width, note.height), (4, 2));
        assert_eq!(note.rgba.len(), 4 * 2 * 4);
        assert_eq!(note.height_for_width(40.0), 20.0);
        assert!(bundle.image("mania-broken").is_none());
        assert_eq!(bundle.image_keys().count(), 1);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = SkinBundle::load_dir(Path::new("/no/such/skin")).unwrap_err();
        assert!(matches!(err, GameError::Io(_)));
    }
}
