//! Image loading abstraction used for album art and artist pictures.
//!
//! An [`Image`] is a cheap-to-clone handle around an undecoded source
//! (embedded picture bytes, a file, or a URL the host resolves) plus a cache
//! identity. Decoding is lazy: nothing is decoded until [`Image::load`], and
//! the decoded pixels can be dropped again with [`Image::unload`] while the
//! source is kept for later re-loading.
//!
//! Unlike the rest of the entity graph, images carry an explicit reference
//! count ([`Image::acquire`]/[`Image::release`]) so decoded pixel memory is
//! released deterministically: once the count returns to zero the decoded
//! representation is unloaded automatically. Code that retains an image
//! beyond the immediate caller must acquire it first.

use crate::ids::EntityId;
use crate::paths::AppDirs;
use crate::song::Song;
use sha1::{Digest, Sha1};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw encoded bytes, e.g. a picture embedded in file metadata.
    Bytes(Vec<u8>),
    /// A local file, e.g. a restored cache entry.
    File(PathBuf),
    /// A remote locator. The host resolves these; [`Image::load`] does not.
    Url(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("image source cannot be {0} here")]
    UnsupportedSource(&'static str),
}

struct ImageInner {
    cache_key: String,
    source: ImageSource,
    decoded: RefCell<Option<image::DynamicImage>>,
    refs: Cell<usize>,
}

#[derive(Clone)]
pub struct Image {
    inner: Rc<ImageInner>,
}

impl Image {
    /// Image from raw encoded bytes, cache-keyed by the SHA-1 of a
    /// caller-supplied unique string (a file path, a remote id, ...). The
    /// same unique data yields the same cache identity across sessions.
    pub fn from_bytes(bytes: Vec<u8>, unique: &str) -> Self {
        Self::build(ImageSource::Bytes(bytes), cache_key_for(unique))
    }

    /// Image from raw encoded bytes, cache-keyed by the song's id. Repeated
    /// reconciliation of the same song reuses one cache identity instead of
    /// re-encoding.
    pub fn for_song(bytes: Vec<u8>, song: &Song) -> Self {
        Self::build(ImageSource::Bytes(bytes), song.id().to_string())
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = cache_key_for(&path.to_string_lossy());
        Self::build(ImageSource::File(path), key)
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let key = cache_key_for(&url);
        Self::build(ImageSource::Url(url), key)
    }

    /// Image with an id-derived cache key, for callers with no stable
    /// unique data.
    pub fn from_bytes_with_id(bytes: Vec<u8>, id: EntityId) -> Self {
        Self::build(ImageSource::Bytes(bytes), id.to_string())
    }

    fn build(source: ImageSource, cache_key: String) -> Self {
        Self {
            inner: Rc::new(ImageInner {
                cache_key,
                source,
                decoded: RefCell::new(None),
                refs: Cell::new(0),
            }),
        }
    }

    pub fn cache_key(&self) -> &str {
        &self.inner.cache_key
    }

    pub fn source(&self) -> &ImageSource {
        &self.inner.source
    }

    /// Decode the source into memory. Idempotent: an already-loaded image
    /// returns immediately.
    pub fn load(&self) -> Result<(), ImageError> {
        if self.inner.decoded.borrow().is_some() {
            return Ok(());
        }
        let decoded = match &self.inner.source {
            ImageSource::Bytes(bytes) => image::load_from_memory(bytes)?,
            ImageSource::File(path) => image::open(path)?,
            ImageSource::Url(_) => return Err(ImageError::UnsupportedSource("a URL")),
        };
        *self.inner.decoded.borrow_mut() = Some(decoded);
        Ok(())
    }

    /// Drop the decoded pixels, keeping the source for later re-loading.
    pub fn unload(&self) {
        self.inner.decoded.borrow_mut().take();
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.decoded.borrow().is_some()
    }

    /// Decoded dimensions, if loaded.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.inner
            .decoded
            .borrow()
            .as_ref()
            .map(|img| (img.width(), img.height()))
    }

    /// Copy of the decoded pixels, if loaded.
    pub fn to_rgba8(&self) -> Option<image::RgbaImage> {
        self.inner.decoded.borrow().as_ref().map(|img| img.to_rgba8())
    }

    /// Take a reference on the decoded representation.
    pub fn acquire(&self) -> Image {
        self.inner.refs.set(self.inner.refs.get() + 1);
        self.clone()
    }

    /// Give a reference back; when the count returns to zero the decoded
    /// representation is unloaded.
    pub fn release(&self) {
        let refs = self.inner.refs.get();
        if refs == 0 {
            return;
        }
        self.inner.refs.set(refs - 1);
        if refs == 1 {
            self.unload();
        }
    }

    pub fn ref_count(&self) -> usize {
        self.inner.refs.get()
    }

    pub fn cache_path(&self, dirs: &AppDirs) -> PathBuf {
        dirs.art_cache_dir().join(&self.inner.cache_key)
    }

    /// Write the source bytes under the art cache dir, named by cache key.
    pub fn store_in_cache(&self, dirs: &AppDirs) -> Result<PathBuf, ImageError> {
        let ImageSource::Bytes(bytes) = &self.inner.source else {
            return Err(ImageError::UnsupportedSource("anything but raw bytes"));
        };
        let path = self.cache_path(dirs);
        fs::write(&path, bytes).map_err(|source| ImageError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Look up a previously cached image by the same unique data used to
    /// store it. Returns `None` when nothing is cached.
    pub fn restore_from_cache(dirs: &AppDirs, unique: &str) -> Option<Image> {
        let key = cache_key_for(unique);
        let path = dirs.art_cache_dir().join(&key);
        path.exists()
            .then(|| Self::build(ImageSource::File(path), key))
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Image {}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("cache_key", &self.inner.cache_key)
            .field("loaded", &self.is_loaded())
            .field("refs", &self.inner.refs.get())
            .finish_non_exhaustive()
    }
}

/// SHA-1 hex of the unique data, stable across sessions.
pub fn cache_key_for(unique: &str) -> String {
    use std::fmt::Write;

    let digest = Sha1::digest(unique.as_bytes());
    digest.iter().fold(String::with_capacity(40), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Small valid PNG for exercising decode paths in tests.
#[cfg(test)]
pub(crate) fn test_png_bytes() -> Vec<u8> {
    use std::io::Cursor;

    let pixels = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        test_png_bytes()
    }

    #[test]
    fn cache_key_is_stable_sha1_hex() {
        let a = cache_key_for("~/Music/album/track.flac");
        let b = cache_key_for("~/Music/album/track.flac");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, cache_key_for("~/Music/other.flac"));
    }

    #[test]
    fn load_decodes_and_unload_keeps_source() {
        let img = Image::from_bytes(png_bytes(), "unit-test");
        assert!(!img.is_loaded());
        img.load().unwrap();
        assert_eq!(img.size(), Some((2, 2)));

        img.unload();
        assert!(!img.is_loaded());
        img.load().unwrap();
        assert!(img.is_loaded());
    }

    #[test]
    fn decode_failure_is_typed() {
        let img = Image::from_bytes(vec![0, 1, 2, 3], "garbage");
        assert!(matches!(img.load(), Err(ImageError::Decode(_))));
    }

    #[test]
    fn release_to_zero_unloads() {
        let img = Image::from_bytes(png_bytes(), "refcount");
        img.load().unwrap();

        let held = img.acquire();
        let held_again = img.acquire();
        assert_eq!(img.ref_count(), 2);

        held.release();
        assert!(img.is_loaded());
        held_again.release();
        assert!(!img.is_loaded());

        // releasing past zero is a no-op
        img.release();
        assert_eq!(img.ref_count(), 0);
    }

    #[test]
    fn url_sources_are_not_decoded_here() {
        let img = Image::from_url("https://example.com/cover.jpg");
        assert!(matches!(
            img.load(),
            Err(ImageError::UnsupportedSource(_))
        ));
    }
}
