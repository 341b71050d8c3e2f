//! Yandex Disk REST connector
//!
//! - `PUT /v1/disk/resources?path=<folder>`: 201 created, 409 already exists
//! - `POST /v1/disk/resources/upload?path=<folder>/<file>&url=<source>`:
//!   202 accepted

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_library::models::{Photo, RemoteFolder};
use core_library::uploader::PhotoUploader;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, YandexDiskError};

/// Yandex Disk resources endpoint
const RESOURCES_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources";

const UPLOAD_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources/upload";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const BACKEND_NAME: &str = "Yandex Disk";

/// Outcome of a folder creation that is not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
}

/// Error body returned by the Disk API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: String,
}

pub struct YandexDiskUploader {
    http_client: Arc<dyn HttpClient>,
    /// Full `Authorization` header value, `OAuth <token>`
    authorization: String,
}

impl YandexDiskUploader {
    /// Create an uploader for a Yandex Disk OAuth token.
    ///
    /// The token may be given bare or already prefixed with `OAuth `.
    pub fn new(http_client: Arc<dyn HttpClient>, token: &str) -> Self {
        let token = token.trim();
        let authorization = if token.starts_with("OAuth ") {
            token.to_string()
        } else {
            format!("OAuth {}", token)
        };

        Self {
            http_client,
            authorization,
        }
    }

    /// Create a folder at the root of the disk.
    ///
    /// # Errors
    ///
    /// Any status other than 201 or 409, or a transport failure.
    #[instrument(skip(self))]
    pub async fn make_folder(&self, name: &str) -> Result<FolderStatus> {
        let request = HttpRequest::new(HttpMethod::Put, RESOURCES_URL).query("path", name);
        let response = self.send(request).await?;

        match response.status {
            201 => Ok(FolderStatus::Created),
            409 => Ok(FolderStatus::AlreadyExists),
            status => Err(api_error(status, &response)),
        }
    }

    /// Ask Yandex Disk to fetch `photo.url` into `<folder>/<file_name>.jpg`.
    ///
    /// # Errors
    ///
    /// Any status other than 202, or a transport failure.
    #[instrument(skip(self, photo), fields(file = %photo.output_name()))]
    pub async fn upload_from_url(&self, folder: &str, photo: &Photo) -> Result<()> {
        let path = format!("{}/{}", folder, photo.output_name());
        let request = HttpRequest::new(HttpMethod::Post, UPLOAD_URL)
            .query("path", &path)
            .query("url", &photo.url);

        let response = self.send(request).await?;

        match response.status {
            202 => Ok(()),
            status => Err(api_error(status, &response)),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = request
            .header("Authorization", self.authorization.as_str())
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "Yandex Disk responded");
        Ok(response)
    }
}

fn api_error(status_code: u16, response: &HttpResponse) -> YandexDiskError {
    let message = match serde_json::from_slice::<ApiErrorBody>(&response.body) {
        Ok(body) if !body.message.is_empty() => format!("{} ({})", body.message, body.error),
        _ => String::from_utf8_lossy(&response.body).to_string(),
    };

    YandexDiskError::ApiError {
        status_code,
        message,
    }
}

#[async_trait]
impl PhotoUploader for YandexDiskUploader {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn create_folder(&self, name: &str) -> RemoteFolder {
        match self.make_folder(name).await {
            Ok(FolderStatus::Created) => {
                info!("Folder \"{}\" created successfully (Yandex Disk)", name);
            }
            Ok(FolderStatus::AlreadyExists) => {
                warn!(
                    "Error while creating folder \"{}\": already exists (Yandex Disk)",
                    name
                );
            }
            Err(e) => {
                error!(
                    "Error while creating folder \"{}\". Please check if yandex token is correct (Yandex Disk): {}",
                    name, e
                );
            }
        }

        RemoteFolder::new(name)
    }

    async fn upload_batch(&self, folder: &RemoteFolder, photos: &[Photo]) {
        for photo in photos {
            match self.upload_from_url(&folder.path, photo).await {
                Ok(()) => info!(
                    "File \"{}\" successfully uploaded to folder \"{}\" (Yandex Disk)",
                    photo.output_name(),
                    folder.path
                ),
                Err(e) => error!(
                    "Error while uploading file \"{}\" to folder \"{}\" (Yandex Disk): {}",
                    photo.output_name(),
                    folder.path,
                    e
                ),
            }
        }
    }
}
