//! # Core Runtime Module
//!
//! Provides the runtime infrastructure shared by every album-backup crate:
//! - Logging and tracing infrastructure
//! - Run configuration
//!
//! ## Overview
//!
//! Logging is set up once at process start with [`logging::init_logging`],
//! which returns a guard that flushes the host sink when the run ends. The
//! parameters of a backup run are collected in [`config::RunConfig`] and
//! validated before any remote call is made.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
