//! Filename disambiguation
//!
//! Photos are named by like count, so equal names are common. A single
//! forward pass compares each photo with its successor; when the names are
//! equal both get their own upload date appended as `(dd-mm-yy)`.
//!
//! Names are compared as they stand at that point of the pass. With three
//! equal names in a row the first pair is renamed and the third photo keeps
//! its bare name. Equal names that are not neighbors are left alone.

use crate::models::Photo;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use tracing::debug;

/// Disambiguate equal adjacent file names in place.
///
/// Dates are rendered in `tz`; the CLI passes [`chrono::Local`].
pub fn disambiguate<Tz>(photos: &mut [Photo], tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    for i in 0..photos.len().saturating_sub(1) {
        if photos[i].file_name != photos[i + 1].file_name {
            continue;
        }

        let first = date_suffix(photos[i].timestamp, tz);
        let second = date_suffix(photos[i + 1].timestamp, tz);

        debug!(name = %photos[i].file_name, %first, %second, "Renaming duplicate file names");

        photos[i].file_name.push_str(&first);
        photos[i + 1].file_name.push_str(&second);
    }
}

fn date_suffix<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
    utc.with_timezone(tz).format("(%d-%m-%y)").to_string()
}
