use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("VK error: {0}")]
    Source(#[from] provider_vk::VkError),

    #[error("Yandex Disk error: {0}")]
    YandexDisk(#[from] provider_yandex_disk::YandexDiskError),

    #[error("Google Drive error: {0}")]
    GoogleDrive(#[from] provider_google_drive::GoogleDriveError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
