//! Append-only run log file

use bridge_traits::{
    error::{BridgeError, Result},
    time::{LogEntry, LogLevel, LoggerSink},
};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes each entry as one line:
/// `2024-01-31 12:00:00,123 INFO message key=value`
///
/// The file is opened in append mode so successive runs accumulate in the
/// same log.
pub struct FileLoggerSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    min_level: LogLevel,
}

impl FileLoggerSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_min_level(path, LogLevel::Info)
    }

    pub fn with_min_level(path: impl AsRef<Path>, min_level: LogLevel) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            min_level,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format_line(entry: &LogEntry) -> String {
        let mut line = format!(
            "{} {} {}",
            entry
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S,%3f"),
            entry.level.as_str(),
            entry.message
        );

        let mut fields: Vec<_> = entry.fields.iter().collect();
        fields.sort();
        for (key, value) in fields {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }

        line.push('\n');
        line
    }
}

impl LoggerSink for FileLoggerSink {
    fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level < self.min_level {
            return Ok(());
        }

        let line = Self::format_line(&entry);
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| BridgeError::OperationFailed("log writer poisoned".to_string()))?;
        writer.write_all(line.as_bytes())?;
        // Flush per line so a crash keeps everything logged so far.
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| BridgeError::OperationFailed("log writer poisoned".to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_are_appended_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup_log.log");

        let sink = FileLoggerSink::open(&path).unwrap();
        sink.log(LogEntry::new(LogLevel::Info, "provider_vk", "fetched 5 photos"))
            .unwrap();
        sink.log(
            LogEntry::new(LogLevel::Warn, "provider_yandex_disk", "folder exists")
                .with_field("status", "409"),
        )
        .unwrap();
        sink.log(LogEntry::new(LogLevel::Debug, "provider_vk", "dropped"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" INFO fetched 5 photos"));
        assert!(lines[1].ends_with(" WARNING folder exists status=409"));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup_log.log");

        FileLoggerSink::open(&path)
            .unwrap()
            .log(LogEntry::new(LogLevel::Error, "t", "first run"))
            .unwrap();
        FileLoggerSink::open(&path)
            .unwrap()
            .log(LogEntry::new(LogLevel::Info, "t", "second run"))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("ERROR first run"));
    }

    #[test]
    fn test_timestamp_format() {
        let entry = LogEntry::new(LogLevel::Info, "t", "msg");
        let line = FileLoggerSink::format_line(&entry);

        // "YYYY-MM-DD HH:MM:SS,mmm INFO msg\n"
        let stamp = &line[..23];
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[19..20], ",");
        assert_eq!(&line[23..], " INFO msg\n");
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("backup_log.log");

        assert!(matches!(
            FileLoggerSink::open(&path),
            Err(BridgeError::Io(_))
        ));
    }
}
