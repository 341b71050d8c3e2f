//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, filesystem)
//! into the backup pipeline. Desktop hosts enable the `desktop-shims`
//! feature (the default), which depends on `bridge-desktop` and provides
//! [`bootstrap_desktop`].

pub mod backup;
pub mod error;

pub use backup::{BackupService, RunSummary};
pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{http::HttpClient, storage::FileSystemAccess};

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub filesystem: Arc<dyn FileSystemAccess>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(http_client: Arc<dyn HttpClient>, filesystem: Arc<dyn FileSystemAccess>) -> Self {
        Self {
            http_client,
            filesystem,
        }
    }
}

/// Build a [`BackupService`] backed by reqwest and the tokio filesystem.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// let service = core_service::bootstrap_desktop()?;
/// let albums = service.list_albums("1", "vk-token", "5.131").await?;
/// # Ok(())
/// # }
/// ```
#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub fn bootstrap_desktop() -> Result<BackupService> {
    let http_client = bridge_desktop::ReqwestHttpClient::new()
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    Ok(BackupService::new(CoreDependencies::new(
        Arc::new(http_client),
        Arc::new(bridge_desktop::TokioFileSystem::new()),
    )))
}
