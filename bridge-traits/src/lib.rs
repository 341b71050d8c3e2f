//! # Host Bridge Traits
//!
//! Capability traits the backup core needs from its host.
//!
//! ## Overview
//!
//! Every component that talks to the outside world (the VK API, Yandex Disk,
//! Google Drive, the local disk, the run log) does so through one of the
//! traits below. The desktop implementations live in `bridge-desktop`;
//! tests substitute mocks or in-memory fakes.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP request/response
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Manifest, token cache and log files
//! - [`LoggerSink`](time::LoggerSink) - Mirror structured log events to a host sink
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and keep the message actionable
//! (status code, path, underlying cause).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so they can be shared behind
//! `Arc<dyn Trait>` between the components of a run.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::FileSystemAccess;
pub use time::{LogEntry, LogLevel, LoggerSink, MemoryLogger};
