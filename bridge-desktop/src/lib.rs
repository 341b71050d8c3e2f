//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for a command-line run on
//! macOS, Windows or Linux.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `LoggerSink` appending timestamped lines to the run log file
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FileLoggerSink, ReqwestHttpClient, TokioFileSystem};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let fs = TokioFileSystem::new();
//!     let sink = FileLoggerSink::open("backup_log.log")?;
//! }
//! ```

mod filesystem;
mod http;
mod log_sink;

pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use log_sink::FileLoggerSink;
