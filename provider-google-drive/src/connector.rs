//! Google Drive API connector implementation
//!
//! Implements `PhotoUploader` for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_library::models::{Photo, RemoteFolder};
use core_library::uploader::PhotoUploader;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::types::{DriveFile, ErrorResponse, FileMetadata, FilesListResponse, FOLDER_MIME_TYPE};

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Media upload endpoint
const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";

const MULTIPART_BOUNDARY: &str = "album_backup_3f1c9a7e5d2b4860";

const API_TIMEOUT: Duration = Duration::from_secs(30);

const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

/// Google Drive uploader
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveUploader;
/// use core_library::PhotoUploader;
///
/// let uploader = GoogleDriveUploader::new(http_client, access_token);
/// let folder = uploader.create_folder("id1_profile").await;
/// uploader.upload_batch(&folder, &batch.photos).await;
/// ```
pub struct GoogleDriveUploader {
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token with the `drive` scope
    access_token: String,
}

impl GoogleDriveUploader {
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
        }
    }

    /// Find a non-trashed folder called `name`. Returns its id.
    #[instrument(skip(self))]
    pub async fn find_folder(&self, name: &str) -> Result<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            escape_query_literal(name),
            FOLDER_MIME_TYPE
        );

        let request = HttpRequest::new(HttpMethod::Get, format!("{}/files", DRIVE_API_BASE))
            .query("q", &query)
            .query("spaces", "drive")
            .query("fields", "files(id,name)")
            .query("pageSize", "1");

        let response = self.send_api(request).await?;
        let list: FilesListResponse = response
            .json()
            .map_err(|e| GoogleDriveError::ParseError(format!("files list: {}", e)))?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Create a folder at the root of My Drive. Returns its id.
    #[instrument(skip(self))]
    pub async fn make_folder(&self, name: &str) -> Result<String> {
        let request = HttpRequest::new(HttpMethod::Post, format!("{}/files", DRIVE_API_BASE))
            .query("fields", "id")
            .json(&FileMetadata::folder(name))?;

        let response = self.send_api(request).await?;
        let file: DriveFile = response
            .json()
            .map_err(|e| GoogleDriveError::ParseError(format!("created folder: {}", e)))?;

        Ok(file.id)
    }

    /// Fetch the source photo. Source URLs are public, no token is sent.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<Bytes> {
        let request = HttpRequest::new(HttpMethod::Get, url).timeout(TRANSFER_TIMEOUT);
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(GoogleDriveError::DownloadFailed {
                status_code: response.status,
                url: url.to_string(),
            });
        }

        debug!(bytes = response.body.len(), "Downloaded source photo");
        Ok(response.body)
    }

    /// Create a JPEG file from `data` inside `parent` (Drive root if `None`).
    /// Returns the new file id.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload_file(&self, parent: Option<&str>, name: &str, data: Bytes) -> Result<String> {
        let metadata = serde_json::to_vec(&FileMetadata::file(name, parent))
            .map_err(|e| GoogleDriveError::ParseError(e.to_string()))?;

        let request = HttpRequest::new(HttpMethod::Post, DRIVE_UPLOAD_URL)
            .query("uploadType", "multipart")
            .query("fields", "id")
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(multipart_related(&metadata, &data))
            .timeout(TRANSFER_TIMEOUT);

        let response = self.send_api(request).await?;
        let file: DriveFile = response
            .json()
            .map_err(|e| GoogleDriveError::ParseError(format!("uploaded file: {}", e)))?;

        Ok(file.id)
    }

    async fn upload_photo(&self, folder: &RemoteFolder, photo: &Photo) -> Result<String> {
        let data = self.download(&photo.url).await?;
        self.upload_file(folder.id.as_deref(), &photo.output_name(), data)
            .await
    }

    /// Authorized API call; any non-2xx status becomes an error.
    async fn send_api(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = if request.timeout.is_none() {
            request.timeout(API_TIMEOUT)
        } else {
            request
        };
        let request = request
            .bearer_token(self.access_token.as_str())
            .header("Accept", "application/json");

        let response = self.http_client.execute(request).await?;
        let status = response.status;

        if response.is_success() {
            debug!("API request succeeded: status={}", status);
            return Ok(response);
        }

        let message = match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(body) => body.error.message,
            Err(_) => String::from_utf8_lossy(&response.body).to_string(),
        };

        if status == 401 {
            Err(GoogleDriveError::AuthenticationFailed(message))
        } else {
            Err(GoogleDriveError::ApiError {
                status_code: status,
                message,
            })
        }
    }
}

/// Quote a value for a Drive `q` string literal.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Two-part `multipart/related` body: JSON metadata, then the JPEG bytes.
fn multipart_related(metadata: &[u8], data: &[u8]) -> Bytes {
    let mut body = Vec::with_capacity(metadata.len() + data.len() + 256);

    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    Bytes::from(body)
}

#[async_trait]
impl PhotoUploader for GoogleDriveUploader {
    fn backend_name(&self) -> &'static str {
        "Google Drive"
    }

    async fn create_folder(&self, name: &str) -> RemoteFolder {
        match self.find_folder(name).await {
            Ok(Some(id)) => {
                warn!(
                    "Error while creating folder \"{}\": already exists (Google Drive)",
                    name
                );
                return RemoteFolder::new(name).with_id(id);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Folder lookup failed, creating"),
        }

        match self.make_folder(name).await {
            Ok(id) => {
                info!("Folder \"{}\" created successfully (Google Drive)", name);
                RemoteFolder::new(name).with_id(id)
            }
            Err(e) => {
                error!("Error while creating folder \"{}\". (Google Drive): {}", name, e);
                RemoteFolder::new(name)
            }
        }
    }

    async fn upload_batch(&self, folder: &RemoteFolder, photos: &[Photo]) {
        for photo in photos {
            match self.upload_photo(folder, photo).await {
                Ok(id) => {
                    debug!(file_id = %id, "Created Drive file");
                    info!(
                        "File \"{}\" successfully uploaded to folder \"{}\" (Google Drive)",
                        photo.output_name(),
                        folder.path
                    );
                }
                Err(e) => error!(
                    "Error while uploading file \"{}\" to folder \"{}\" (Google Drive): {}",
                    photo.output_name(),
                    folder.path,
                    e
                ),
            }
        }
    }
}
