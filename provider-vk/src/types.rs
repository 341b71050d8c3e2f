//! VK API response types
//!
//! Only the fields the backup reads are declared; everything else in the
//! payload is ignored.

use serde::Deserialize;

/// Every VK method answers with either `response` or `error`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: i64,
    pub error_msg: String,
}

/// `{count, items}` page returned by list methods
#[derive(Debug, Deserialize)]
pub struct ItemsPage<T> {
    #[serde(default)]
    pub count: u64,
    pub items: Vec<T>,
}

/// photos.getAlbums item
///
/// See: https://dev.vk.com/method/photos.getAlbums
#[derive(Debug, Deserialize)]
pub struct AlbumItem {
    pub id: i64,
    pub title: String,
}

/// photos.get item with `extended=1`
///
/// See: https://dev.vk.com/method/photos.get
#[derive(Debug, Deserialize)]
pub struct PhotoItem {
    pub id: i64,
    /// Upload time, unix seconds
    pub date: i64,
    #[serde(default)]
    pub sizes: Vec<PhotoSize>,
    #[serde(default)]
    pub likes: Likes,
}

/// One size variant; `type` is the resolution tag letter
#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Likes {
    pub count: u64,
}
