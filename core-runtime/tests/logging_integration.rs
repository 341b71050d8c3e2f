//! Integration tests for logging system
//!
//! `init_logging` installs a process-wide subscriber, so only one test in
//! this binary calls it.

use bridge_desktop::FileLoggerSink;
use bridge_traits::time::LogLevel;
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_init_logging_writes_run_log() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("backup_log.log");
    let sink = Arc::new(FileLoggerSink::open(&log_path).unwrap());

    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_console(false)
        .with_logger_sink(sink);

    let guard = init_logging(config).unwrap();

    tracing::info!(target: "provider_vk", "All links for 5 photos from album 'profile' obtained successfully");
    tracing::warn!(target: "provider_yandex_disk", "Error while creating folder \"id1_profile\": already exists (Yandex Disk)");
    tracing::error!(target: "core_library", "Error while writing files_info.json");
    tracing::debug!(target: "provider_vk", "filtered out at info");
    tracing::info!(target: "hyper", "dependency noise is held at warn");

    drop(guard);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" INFO All links for 5 photos"));
    assert!(lines[1].contains(" WARNING Error while creating folder"));
    assert!(lines[2].contains(" ERROR Error while writing"));

    let second = init_logging(LoggingConfig::default().with_console(false));
    assert!(second.is_err());
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Pretty)
        .with_level(LogLevel::Warn)
        .with_console(false)
        .with_target(true);

    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.console);
    assert!(config.display_target);
    assert!(config.logger_sink.is_none());
}

#[test]
fn test_token_redaction() {
    assert_eq!(redact_if_sensitive("refresh_token", "1//0g"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("client_secret", "GOCSPX"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("owner_id", "1"), "1");
}
