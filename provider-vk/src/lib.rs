//! # VK Photo Source
//!
//! Reads albums and photos through the VK API.
//!
//! ## Overview
//!
//! This module provides:
//! - Album listing for a user, including the wall/profile/saved pseudo-albums
//! - Link resolution: the largest size variant of each photo, named by its
//!   like count and disambiguated by upload date

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{render_album_listing, VkConnector};
pub use error::{Result, VkError};
