//! # Backup Pipeline
//!
//! One run, strictly in sequence:
//!
//! 1. resolve links for the album (VK), dates rendered in local time
//! 2. create the folder on Yandex Disk and upload every photo
//! 3. write the manifest
//! 4. authorize against Google Drive
//! 5. create the folder on Google Drive and upload every photo
//!
//! Nothing past step 1 depends on the success of an earlier step apart from
//! the Drive token. Failures are logged where they happen and the run goes
//! on; [`RunSummary`] reports what happened at a glance.

use crate::error::Result;
use crate::CoreDependencies;
use chrono::Local;
use core_auth::{AuthError, AuthManager};
use core_library::manifest::write_manifest;
use core_library::models::{Album, PhotoBatch};
use core_library::uploader::PhotoUploader;
use core_runtime::config::RunConfig;
use provider_google_drive::GoogleDriveUploader;
use provider_vk::VkConnector;
use provider_yandex_disk::YandexDiskUploader;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Photos resolved from the source album
    pub photos: usize,
    pub manifest_written: bool,
    pub drive_authorized: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} photos resolved, manifest {}, Google Drive {}",
            self.photos,
            if self.manifest_written { "written" } else { "not written" },
            if self.drive_authorized { "authorized" } else { "skipped" }
        )
    }
}

/// Primary façade exposed to the CLI.
#[derive(Clone)]
pub struct BackupService {
    deps: Arc<CoreDependencies>,
    auth_timeout: Option<Duration>,
}

impl BackupService {
    pub fn new(deps: CoreDependencies) -> Self {
        Self {
            deps: Arc::new(deps),
            auth_timeout: None,
        }
    }

    /// Bound the interactive Google authorization
    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = Some(timeout);
        self
    }

    /// List the albums of a VK user and print them.
    #[instrument(skip(self, source_token))]
    pub async fn list_albums(
        &self,
        owner_id: &str,
        source_token: &str,
        api_version: &str,
    ) -> Result<Vec<Album>> {
        let vk = VkConnector::new(Arc::clone(&self.deps.http_client), source_token.to_string())
            .with_api_version(api_version);

        Ok(vk.list_albums(owner_id).await?)
    }

    /// Run a full backup. Never fails; see the module docs.
    #[instrument(skip(self, config), fields(folder = %config.folder_name()))]
    pub async fn run(&self, config: &RunConfig) -> RunSummary {
        let mut summary = RunSummary::default();

        let vk = VkConnector::new(
            Arc::clone(&self.deps.http_client),
            config.source_token.clone(),
        )
        .with_api_version(config.api_version.as_str());

        let batch = match vk
            .resolve_links(
                &config.source_user_id,
                &config.album_id,
                config.photo_count,
                &Local,
            )
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                debug!(error = %e, "No batch, skipping uploads and manifest");
                return summary;
            }
        };
        summary.photos = batch.len();

        let yandex = YandexDiskUploader::new(
            Arc::clone(&self.deps.http_client),
            &config.destination_token,
        );
        self.upload(&yandex, &batch).await;

        summary.manifest_written = write_manifest(
            self.deps.filesystem.as_ref(),
            &batch.photos,
            &config.manifest_path,
        )
        .await
        .is_ok();

        if let Some(token) = self.authorize_drive(config).await {
            summary.drive_authorized = true;
            let drive = GoogleDriveUploader::new(Arc::clone(&self.deps.http_client), token);
            self.upload(&drive, &batch).await;
        }

        info!("Backup finished: {}", summary);
        summary
    }

    async fn upload(&self, uploader: &dyn PhotoUploader, batch: &PhotoBatch) {
        debug!(backend = uploader.backend_name(), photos = batch.len(), "Uploading batch");

        let folder = uploader.create_folder(&batch.folder_name()).await;
        uploader.upload_batch(&folder, &batch.photos).await;
    }

    async fn authorize_drive(&self, config: &RunConfig) -> Option<String> {
        let mut auth = AuthManager::new(
            Arc::clone(&self.deps.http_client),
            Arc::clone(&self.deps.filesystem),
            config.client_secrets_path.clone(),
            config.token_cache_path.clone(),
        );
        if let Some(timeout) = self.auth_timeout {
            auth = auth.with_timeout(timeout);
        }

        match auth.authorize().await {
            Ok(token) => Some(token),
            Err(AuthError::SecretsMissing { path }) => {
                error!(
                    "File \"{}\" not found. Unable to authorize to Google Drive",
                    path
                );
                None
            }
            Err(e) => {
                error!("Unable to authorize to Google Drive: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use async_trait::async_trait;
    use bridge_desktop::TokioFileSystem;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use bridge_traits::{LogLevel, MemoryLogger};
    use bytes::Bytes;
    use core_runtime::logging::LoggerSinkLayer;
    use mockall::mock;
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};
    use tracing_subscriber::layer::SubscriberExt;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    const VK_PHOTOS: &str = r#"{"response": {"count": 5, "items": [
        {"id": 1, "date": 1672574400, "likes": {"count": 50}, "sizes": [{"type": "z", "url": "https://img/50"}]},
        {"id": 2, "date": 1672574400, "likes": {"count": 10}, "sizes": [{"type": "w", "url": "https://img/10"}]},
        {"id": 3, "date": 1672574400, "likes": {"count": 40}, "sizes": [{"type": "x", "url": "https://img/40"}]},
        {"id": 4, "date": 1672574400, "likes": {"count": 20}, "sizes": [{"type": "y", "url": "https://img/20"}]},
        {"id": 5, "date": 1672574400, "likes": {"count": 30}, "sizes": [{"type": "r", "url": "https://img/30"}]}
    ]}}"#;

    fn response(status: u16, body: impl Into<Bytes>) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    fn capture_logs() -> (Arc<MemoryLogger>, tracing::subscriber::DefaultGuard) {
        let sink = Arc::new(MemoryLogger::default());
        let subscriber = tracing_subscriber::registry().with(LoggerSinkLayer::new(sink.clone()));
        (sink, tracing::subscriber::set_default(subscriber))
    }

    fn service(mock: MockHttpClient) -> BackupService {
        BackupService::new(CoreDependencies::new(
            Arc::new(mock),
            Arc::new(TokioFileSystem::new()),
        ))
        .with_auth_timeout(Duration::from_millis(50))
    }

    fn config(dir: &TempDir) -> RunConfig {
        RunConfig::builder()
            .source_user_id("1")
            .album_id("profile")
            .source_token("vk-token")
            .destination_token("y0_token")
            .manifest_path(dir.path().join("files_info.json"))
            .client_secrets_path(dir.path().join("credentials.json"))
            .token_cache_path(dir.path().join("token.json"))
            .build()
            .unwrap()
    }

    fn write_cached_token(path: &Path) {
        let expires_at = chrono::Utc::now().timestamp() + 3600;
        std::fs::write(
            path,
            format!(
                r#"{{"access_token": "ya29.cached", "refresh_token": "1//r", "expires_at": {}}}"#,
                expires_at
            ),
        )
        .unwrap();
    }

    fn messages_about(logs: &MemoryLogger, level: LogLevel, backend: &str) -> usize {
        logs.messages(level)
            .iter()
            .filter(|m| m.contains(backend))
            .count()
    }

    #[tokio::test]
    async fn test_full_run() {
        let dir = tempdir().unwrap();
        write_cached_token(&dir.path().join("token.json"));

        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url.starts_with("https://api.vk.com/method/photos.get?"))
            .times(1)
            .returning(|_| Ok(response(200, VK_PHOTOS)));
        mock.expect_execute()
            .withf(|req| req.method == HttpMethod::Put && req.url.contains("cloud-api.yandex.net"))
            .times(1)
            .returning(|_| Ok(response(201, "{}")));
        mock.expect_execute()
            .withf(|req| req.url.starts_with("https://cloud-api.yandex.net/v1/disk/resources/upload?"))
            .times(5)
            .returning(|req| {
                if req.url.contains("path=id1_profile%2F30.jpg") {
                    Ok(response(500, "{}"))
                } else {
                    Ok(response(202, "{}"))
                }
            });
        mock.expect_execute()
            .withf(|req| req.url.starts_with("https://www.googleapis.com/drive/v3/files?q="))
            .times(1)
            .returning(|req| {
                assert_eq!(
                    req.headers.get("Authorization").map(String::as_str),
                    Some("Bearer ya29.cached")
                );
                Ok(response(200, r#"{"files": [{"id": "folder-1"}]}"#))
            });
        mock.expect_execute()
            .withf(|req| req.method == HttpMethod::Get && req.url.starts_with("https://img/"))
            .times(5)
            .returning(|_| Ok(response(200, Bytes::from_static(b"jpeg"))));
        mock.expect_execute()
            .withf(|req| req.url.starts_with("https://www.googleapis.com/upload/drive/v3/files?"))
            .times(5)
            .returning(|_| Ok(response(200, r#"{"id": "f"}"#)));

        let (logs, _guard) = capture_logs();
        let config = config(&dir);
        let summary = service(mock).run(&config).await;

        assert_eq!(
            summary,
            RunSummary {
                photos: 5,
                manifest_written: true,
                drive_authorized: true,
            }
        );

        assert_eq!(messages_about(&logs, LogLevel::Info, "successfully uploaded to folder \"id1_profile\" (Yandex Disk)"), 4);
        assert_eq!(messages_about(&logs, LogLevel::Error, "(Yandex Disk)"), 1);
        assert_eq!(messages_about(&logs, LogLevel::Info, "(Google Drive)"), 5);
        assert_eq!(messages_about(&logs, LogLevel::Warn, "already exists (Google Drive)"), 1);

        // The manifest lists every photo, uploaded or not.
        let manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&config.manifest_path).unwrap()).unwrap();
        let names: Vec<&str> = manifest
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["file_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["10.jpg", "20.jpg", "30.jpg", "40.jpg", "50.jpg"]);
        assert_eq!(manifest[0]["size"], "w");
    }

    #[tokio::test]
    async fn test_forbidden_source_stops_run() {
        let dir = tempdir().unwrap();
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(403, "Forbidden")));

        let (logs, _guard) = capture_logs();
        let config = config(&dir);
        let summary = service(mock).run(&config).await;

        assert_eq!(summary, RunSummary::default());
        assert_eq!(logs.count(LogLevel::Error), 1);
        assert!(!config.manifest_path.exists());
    }

    #[tokio::test]
    async fn test_missing_client_secrets_skips_drive() {
        let dir = tempdir().unwrap();
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url.contains("api.vk.com"))
            .times(1)
            .returning(|_| Ok(response(200, VK_PHOTOS)));
        mock.expect_execute()
            .withf(|req| req.url.contains("cloud-api.yandex.net"))
            .times(6)
            .returning(|req| {
                if req.method == HttpMethod::Put {
                    Ok(response(409, "{}"))
                } else {
                    Ok(response(202, "{}"))
                }
            });

        let (logs, _guard) = capture_logs();
        let config = config(&dir);
        let summary = service(mock).run(&config).await;

        assert_eq!(summary.photos, 5);
        assert!(summary.manifest_written);
        assert!(!summary.drive_authorized);

        let errors = logs.messages(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("credentials.json\" not found. Unable to authorize to Google Drive"));
        assert_eq!(messages_about(&logs, LogLevel::Warn, "already exists (Yandex Disk)"), 1);
    }

    #[tokio::test]
    async fn test_unwritable_manifest_does_not_stop_uploads() {
        let dir = tempdir().unwrap();
        write_cached_token(&dir.path().join("token.json"));

        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url.contains("api.vk.com"))
            .times(1)
            .returning(|_| Ok(response(200, VK_PHOTOS)));
        mock.expect_execute()
            .withf(|req| req.url.contains("cloud-api.yandex.net"))
            .times(6)
            .returning(|req| {
                let status = if req.method == HttpMethod::Put { 201 } else { 202 };
                Ok(response(status, "{}"))
            });
        mock.expect_execute()
            .withf(|req| req.url.contains("googleapis.com") || req.url.starts_with("https://img/"))
            .times(1 + 5 + 5)
            .returning(|req| {
                if req.url.contains("/drive/v3/files?q=") {
                    Ok(response(200, r#"{"files": [{"id": "folder-1"}]}"#))
                } else if req.url.starts_with("https://img/") {
                    Ok(response(200, Bytes::from_static(b"jpeg")))
                } else {
                    Ok(response(200, r#"{"id": "f"}"#))
                }
            });

        let mut config = config(&dir);
        // A directory cannot be overwritten with a file.
        config.manifest_path = dir.path().to_path_buf();

        let summary = service(mock).run(&config).await;

        assert!(!summary.manifest_written);
        assert!(summary.drive_authorized);
    }

    #[tokio::test]
    async fn test_list_albums() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.url.starts_with("https://api.vk.com/method/photos.getAlbums?")
                    && req.url.contains("access_token=vk-token")
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"response": {"count": 1, "items": [{"id": 272, "title": "Summer"}]}}"#,
                ))
            });

        let albums = service(mock)
            .list_albums("1", "vk-token", "5.131")
            .await
            .unwrap();

        assert_eq!(albums.len(), 4);
        assert_eq!(albums[0], Album::new("272", "Summer"));
    }

    #[tokio::test]
    async fn test_list_albums_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, r#"{"error": {"error_code": 5, "error_msg": "User authorization failed"}}"#)));

        let err = service(mock)
            .list_albums("1", "bad", "5.131")
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Source(_)));
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            photos: 5,
            manifest_written: true,
            drive_authorized: false,
        };
        assert_eq!(
            summary.to_string(),
            "5 photos resolved, manifest written, Google Drive skipped"
        );
    }
}
