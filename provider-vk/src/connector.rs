//! VK API connector
//!
//! Two read-only calls, each issued once: `photos.getAlbums` for the album
//! listing and `photos.get` for link resolution. The token travels as the
//! `access_token` query parameter together with the API version `v`.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::TimeZone;
use core_library::dedup;
use core_library::models::{
    Album, Photo, PhotoBatch, ResolutionTag, DEFAULT_API_VERSION, MAX_PHOTO_COUNT,
};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, VkError};
use crate::types::{AlbumItem, ApiEnvelope, ItemsPage, PhotoItem};

/// VK API base URL
const VK_API_BASE: &str = "https://api.vk.com/method";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// VK API connector
///
/// # Example
///
/// ```ignore
/// use provider_vk::VkConnector;
///
/// let connector = VkConnector::new(http_client, vk_token);
/// let albums = connector.list_albums("1").await?;
/// let batch = connector.resolve_links("1", "profile", 5, &chrono::Local).await?;
/// ```
pub struct VkConnector {
    http_client: Arc<dyn HttpClient>,
    access_token: String,
    api_version: String,
}

impl VkConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// List the albums of `owner_id` and print them to stdout.
    ///
    /// The real albums come first, then the wall/profile/saved
    /// pseudo-albums.
    ///
    /// # Errors
    ///
    /// Fails when the request fails, the status is not a success, or the
    /// body lacks the `response` payload. The failure is logged at ERROR.
    #[instrument(skip(self))]
    pub async fn list_albums(&self, owner_id: &str) -> Result<Vec<Album>> {
        match self.fetch_albums(owner_id).await {
            Ok(albums) => {
                println!("{}", render_album_listing(owner_id, &albums));
                Ok(albums)
            }
            Err(e) => {
                error!("Error while getting albums list. Please check vk token: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_albums(&self, owner_id: &str) -> Result<Vec<Album>> {
        let page: ItemsPage<AlbumItem> = self
            .call("photos.getAlbums", &[("owner_id", owner_id.to_string())])
            .await?;

        debug!(count = page.items.len(), "Fetched album list");

        let mut albums: Vec<Album> = page
            .items
            .into_iter()
            .map(|item| Album::new(item.id.to_string(), item.title))
            .collect();
        albums.extend(Album::pseudo_albums());

        Ok(albums)
    }

    /// Resolve download links for up to `count` photos of an album.
    ///
    /// Each photo keeps its largest known size variant and is named by its
    /// like count. The batch is sorted by likes (ascending, stable) and equal
    /// neighbors are renamed by [`dedup::disambiguate`] with dates in `tz`.
    ///
    /// # Errors
    ///
    /// [`VkError::InvalidCount`] for a count outside `1..=1000`, otherwise
    /// as [`list_albums`](Self::list_albums). Exactly one ERROR is logged
    /// and no batch is produced.
    #[instrument(skip(self, tz))]
    pub async fn resolve_links<Tz>(
        &self,
        owner_id: &str,
        album_id: &str,
        count: u32,
        tz: &Tz,
    ) -> Result<PhotoBatch>
    where
        Tz: TimeZone + Sync,
        Tz::Offset: Display,
    {
        match self.fetch_photos(owner_id, album_id, count).await {
            Ok(mut photos) => {
                photos.sort_by_key(|photo| photo.likes);
                dedup::disambiguate(&mut photos, tz);

                info!(
                    "All links for {} photos from album '{}' obtained successfully",
                    photos.len(),
                    album_id
                );
                Ok(PhotoBatch::new(owner_id, album_id, photos))
            }
            Err(e) => {
                error!("Error while obtaining links for photos from album '{}': {}", album_id, e);
                Err(e)
            }
        }
    }

    async fn fetch_photos(&self, owner_id: &str, album_id: &str, count: u32) -> Result<Vec<Photo>> {
        if count == 0 || count > MAX_PHOTO_COUNT {
            return Err(VkError::InvalidCount {
                count,
                max: MAX_PHOTO_COUNT,
            });
        }

        let page: ItemsPage<PhotoItem> = self
            .call(
                "photos.get",
                &[
                    ("owner_id", owner_id.to_string()),
                    ("album_id", album_id.to_string()),
                    ("count", count.to_string()),
                    ("extended", "1".to_string()),
                ],
            )
            .await?;

        debug!(total = page.count, returned = page.items.len(), "Fetched photo page");

        Ok(page.items.into_iter().filter_map(select_largest).collect())
    }

    /// Issue one GET against a VK method and unwrap the envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let mut request = HttpRequest::new(HttpMethod::Get, format!("{}/{}", VK_API_BASE, method))
            .timeout(REQUEST_TIMEOUT);
        for (key, value) in params {
            request = request.query(key, value);
        }
        let request = request
            .query("access_token", &self.access_token)
            .query("v", &self.api_version);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| VkError::NetworkError(e.to_string()))?;

        parse_envelope(method, &response)
    }
}

fn parse_envelope<T: DeserializeOwned>(method: &str, response: &HttpResponse) -> Result<T> {
    if !response.is_success() {
        debug!(method, status = response.status, "VK request failed");
        return Err(VkError::ApiError {
            status_code: response.status,
            message: String::from_utf8_lossy(&response.body).to_string(),
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_slice(&response.body)
        .map_err(|e| VkError::ParseError(format!("{}: {}", method, e)))?;

    if let Some(err) = envelope.error {
        return Err(VkError::MethodError {
            code: err.error_code,
            message: err.error_msg,
        });
    }

    envelope.response.ok_or(VkError::MissingResponse)
}

/// Largest variant under the fixed tag order; unknown tags are ignored.
fn select_largest(item: PhotoItem) -> Option<Photo> {
    let best = item
        .sizes
        .into_iter()
        .filter_map(|size| {
            let tag = size.kind.parse::<ResolutionTag>().ok()?;
            Some((tag, size.url))
        })
        .max_by_key(|(tag, _)| *tag);

    match best {
        Some((tag, url)) => Some(Photo::new(url, tag, item.date, item.likes.count)),
        None => {
            warn!(photo_id = item.id, "Photo has no known size variant, skipped");
            None
        }
    }
}

/// Human-readable album listing, one `id, 'title'` line per album
pub fn render_album_listing(owner_id: &str, albums: &[Album]) -> String {
    let mut listing = format!(
        "User with id '{}' has the following albums (id, 'title'):\n",
        owner_id
    );
    for album in albums {
        listing.push('\n');
        listing.push_str(&album.to_string());
    }
    listing
}
