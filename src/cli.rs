use bridge_traits::LogLevel;
use clap::{Parser, Subcommand};
use core_runtime::config::{
    DEFAULT_API_VERSION, DEFAULT_CLIENT_SECRETS_PATH, DEFAULT_LOG_PATH, DEFAULT_MANIFEST_PATH,
    DEFAULT_PHOTO_COUNT, DEFAULT_TOKEN_CACHE_PATH,
};
use core_runtime::logging::LogFormat;
use std::path::PathBuf;

/// Back up a VK photo album to Yandex Disk and Google Drive.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
    /// VK access token
    #[arg(long, env = "VK_TOKEN", global = true, hide_env_values = true)]
    pub(crate) vk_token: Option<String>,
    /// Run log, appended to on every run
    #[arg(long, global = true, default_value = DEFAULT_LOG_PATH)]
    pub(crate) log_file: PathBuf,
    /// Lowest level written to the console and the run log
    #[arg(long, global = true, default_value = "info", value_parser = parse_log_level)]
    pub(crate) log_level: LogLevel,
    /// Console format: compact, pretty or json
    #[arg(long, global = true, default_value = "compact", value_parser = parse_log_format)]
    pub(crate) log_format: LogFormat,
    /// VK API version
    #[arg(long, global = true, default_value = DEFAULT_API_VERSION)]
    pub(crate) api_version: String,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the albums of a VK user
    Albums {
        /// VK user id
        #[arg(long)]
        user_id: String,
    },
    /// Copy an album to Yandex Disk and Google Drive
    Backup {
        /// VK user id
        #[arg(long)]
        user_id: String,
        /// Album id, or one of wall, profile, saved
        #[arg(long)]
        album_id: String,
        /// Yandex Disk OAuth token
        #[arg(long, env = "YANDEX_TOKEN", hide_env_values = true)]
        yandex_token: String,
        /// Number of photos to copy
        #[arg(long, default_value_t = DEFAULT_PHOTO_COUNT)]
        count: u32,
        /// Where to write the manifest
        #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
        manifest: PathBuf,
        /// Google OAuth client-secrets file
        #[arg(long, default_value = DEFAULT_CLIENT_SECRETS_PATH)]
        client_secrets: PathBuf,
        /// Cached Google token
        #[arg(long, default_value = DEFAULT_TOKEN_CACHE_PATH)]
        token_cache: PathBuf,
        /// Seconds to wait for the browser during Google authorization
        #[arg(long, default_value_t = 300)]
        auth_timeout: u64,
    },
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level: {}", s))
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
}
