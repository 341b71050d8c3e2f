//! Domain models for album backups
//!
//! Albums and photos are fetched fresh on every run; nothing here is
//! persisted apart from the manifest built from [`ManifestEntry`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Albums
// =============================================================================

/// Pseudo-album ids understood by the source service besides real album ids
pub const WALL_ALBUM: &str = "wall";
pub const PROFILE_ALBUM: &str = "profile";
pub const SAVED_ALBUM: &str = "saved";

/// Source API version sent with every request unless overridden
pub const DEFAULT_API_VERSION: &str = "5.131";

/// Largest page `photos.get` returns, and so the most photos one run copies
pub const MAX_PHOTO_COUNT: u32 = 1000;

/// Photo album owned by a source user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
}

impl Album {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// The three well-known albums every user has, in listing order
    pub fn pseudo_albums() -> Vec<Album> {
        vec![
            Album::new(WALL_ALBUM, "wall photos"),
            Album::new(PROFILE_ALBUM, "profile photos"),
            Album::new(SAVED_ALBUM, "saved photos"),
        ]
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, '{}'", self.id, self.title)
    }
}

// =============================================================================
// Resolution tags
// =============================================================================

/// Size variant identifier, declared smallest to largest.
///
/// The derived `Ord` follows declaration order, so
/// `S < M < O < P < Q < R < X < Y < Z < W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTag {
    S,
    M,
    O,
    P,
    Q,
    R,
    X,
    Y,
    Z,
    W,
}

impl ResolutionTag {
    pub const ALL: [ResolutionTag; 10] = [
        ResolutionTag::S,
        ResolutionTag::M,
        ResolutionTag::O,
        ResolutionTag::P,
        ResolutionTag::Q,
        ResolutionTag::R,
        ResolutionTag::X,
        ResolutionTag::Y,
        ResolutionTag::Z,
        ResolutionTag::W,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTag::S => "s",
            ResolutionTag::M => "m",
            ResolutionTag::O => "o",
            ResolutionTag::P => "p",
            ResolutionTag::Q => "q",
            ResolutionTag::R => "r",
            ResolutionTag::X => "x",
            ResolutionTag::Y => "y",
            ResolutionTag::Z => "z",
            ResolutionTag::W => "w",
        }
    }
}

impl FromStr for ResolutionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown resolution tag: {}", s))
    }
}

impl fmt::Display for ResolutionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Photos
// =============================================================================

/// One resolved photo, ready to upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Output name without extension; starts as the like count
    pub file_name: String,
    /// Download URL of the selected variant
    pub url: String,
    pub resolution_tag: ResolutionTag,
    /// Upload time, unix seconds
    pub timestamp: i64,
    pub likes: u64,
}

impl Photo {
    pub fn new(url: impl Into<String>, resolution_tag: ResolutionTag, timestamp: i64, likes: u64) -> Self {
        Self {
            file_name: likes.to_string(),
            url: url.into(),
            resolution_tag,
            timestamp,
            likes,
        }
    }

    /// Name used at the destination, `<file_name>.jpg`
    pub fn output_name(&self) -> String {
        format!("{}.jpg", self.file_name)
    }
}

/// Destination folder for an owner's album: `id{owner_id}_{album_id}`
pub fn folder_name(owner_id: &str, album_id: &str) -> String {
    format!("id{}_{}", owner_id, album_id)
}

/// Resolved photos of one album, in upload order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoBatch {
    pub owner_id: String,
    pub album_id: String,
    pub photos: Vec<Photo>,
}

impl PhotoBatch {
    pub fn new(owner_id: impl Into<String>, album_id: impl Into<String>, photos: Vec<Photo>) -> Self {
        Self {
            owner_id: owner_id.into(),
            album_id: album_id.into(),
            photos,
        }
    }

    pub fn folder_name(&self) -> String {
        folder_name(&self.owner_id, &self.album_id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

// =============================================================================
// Manifest & destinations
// =============================================================================

/// One line of the manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_name: String,
    pub size: ResolutionTag,
}

impl From<&Photo> for ManifestEntry {
    fn from(photo: &Photo) -> Self {
        Self {
            file_name: photo.output_name(),
            size: photo.resolution_tag,
        }
    }
}

/// Folder reference handed back by an uploader.
///
/// Best effort: returned even when creation failed. `id` is set by
/// backends that address folders by id rather than path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFolder {
    pub path: String,
    pub id: Option<String>,
}

impl RemoteFolder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
