//! Font Resource Handling
//!
//! The binary-buffer and font-face surface tests consume: read-only blobs,
//! face handles selected by index, table injection for synthesizing fonts
//! from embedded byte arrays, and the fixture-file loader.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::error::{HarnessError, Result};
use crate::resources::resolve_resource_path;

/// An immutable, reference-counted byte buffer with explicit length.
///
/// Cloning shares the underlying storage, so handing a blob to a [`Face`]
/// or a [`FaceBuilder`] and dropping the original is cheap and safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Arc<[u8]>,
}

impl Blob {
    /// Create a blob copying from an in-memory byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Blob { data: bytes.into() }
    }

    /// Create a blob taking ownership of a byte vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Blob { data: bytes.into() }
    }

    /// Load a file's contents, failing on any read error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| HarnessError::ResourceLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Blob::from_vec(bytes))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A four-byte table tag, e.g. `GSUB` or `cmap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }
}

impl FromStr for Tag {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| HarnessError::InvalidTag(s.to_string()))?;
        Ok(Tag(bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            f.write_str(char::from(byte).encode_utf8(&mut [0; 4]))?;
        }
        Ok(())
    }
}

/// Handle to one logical font face within a resource.
///
/// Retains what it needs from the blob it was built from; the caller is
/// free to drop that blob immediately after construction.
#[derive(Debug, Clone)]
pub struct Face {
    data: Arc<[u8]>,
    index: u32,
    tables: BTreeMap<Tag, Arc<[u8]>>,
}

impl Face {
    /// Build a face from a blob at the given face index.
    pub fn new(blob: &Blob, index: u32) -> Self {
        Face {
            data: Arc::clone(&blob.data),
            index,
            tables: BTreeMap::new(),
        }
    }

    /// Face index within the source resource.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Raw bytes of the resource this face was built from.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Look up an injected table by tag. Only faces produced by a
    /// [`FaceBuilder`] carry tables.
    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(|data| data.as_ref())
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Builder synthesizing a face from individually injected tables, used by
/// fixtures that construct fonts from embedded byte arrays.
#[derive(Debug, Default)]
pub struct FaceBuilder {
    tables: BTreeMap<Tag, Arc<[u8]>>,
}

impl FaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a table under `tag`. The builder retains the blob's
    /// contents; a later table under the same tag replaces the earlier one.
    pub fn add_table(&mut self, tag: Tag, blob: &Blob) -> &mut Self {
        self.tables.insert(tag, Arc::clone(&blob.data));
        self
    }

    pub fn build(self) -> Face {
        Face {
            data: Arc::from(&[][..]),
            index: 0,
            tables: self.tables,
        }
    }
}

/// Open a font resource at face index 0. See
/// [`open_font_file_with_index`].
pub fn open_font_file(font_path: impl AsRef<Path>) -> Face {
    open_font_file_with_index(font_path, 0)
}

/// Open a font resource file for a test.
///
/// The path is resolved against the source root; a missing or unreadable
/// file means the test environment is broken, so the load failure is fatal
/// and names the resolved path. The returned face is owned by the caller.
pub fn open_font_file_with_index(font_path: impl AsRef<Path>, face_index: u32) -> Face {
    let resolved = resolve_resource_path(font_path);
    let blob = match Blob::from_file(&resolved) {
        Ok(blob) => blob,
        Err(error) => panic!("font {} not found: {error}", resolved.display()),
    };
    info!(path = %resolved.display(), bytes = blob.len(), "loaded font resource");
    let face = Face::new(&blob, face_index);
    drop(blob);
    face
}
