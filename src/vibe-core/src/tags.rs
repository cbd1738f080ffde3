//! The tag bag: the partial set of metadata fields extracted from a single
//! media file, and the typed failures the extraction boundary can report.
//!
//! Extraction itself lives with the plugin doing the scanning (see the
//! `local-plugin` crate); this module only defines the contract. The
//! reconciliation engine ([`crate::reconcile`]) consumes a [`TagData`] and
//! never performs extraction, so it never sees a [`MetaError`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Raw metadata read from one media file. Every field is optional; an
/// absent field means the file simply did not carry that tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagData {
    #[serde(default)]
    pub title: Option<String>,
    /// Artist names, already split on the configured separator and trimmed.
    #[serde(default)]
    pub artists: Option<Vec<String>>,
    #[serde(default)]
    pub album_name: Option<String>,
    /// Album-artist names; falls back to `artists` during reconciliation.
    #[serde(default)]
    pub album_artists: Option<Vec<String>>,
    /// Raw bytes of the first embedded picture, undecoded.
    #[serde(default)]
    pub picture_data: Option<Vec<u8>>,
    #[serde(default)]
    pub disc_number: Option<u32>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub isrc: Option<String>,
    #[serde(default)]
    pub explicit: Option<bool>,
    #[serde(default)]
    pub composers: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

impl TagData {
    /// True when no field at all was extracted. Applying an empty bag is a
    /// no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artists.is_none()
            && self.album_name.is_none()
            && self.album_artists.is_none()
            && self.picture_data.is_none()
            && self.disc_number.is_none()
            && self.track_number.is_none()
            && self.isrc.is_none()
            && self.explicit.is_none()
            && self.composers.is_none()
            && self.publisher.is_none()
            && self.date.is_none()
            && self.lyrics.is_none()
    }
}

/// Typed failures from the tag-extraction boundary.
///
/// These propagate to the immediate caller of the extraction operation;
/// plugins are expected to branch on the variants.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("file does not exist or is not accessible: {path}")]
    Unreadable { path: PathBuf },
    #[error("missing decoder components: {}", .0.join(", "))]
    MissingDecoders(Vec<String>),
    #[error("source is not a valid or well-formed media file: {detail}")]
    InvalidSource { detail: String },
    #[error("metadata extraction timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bag_is_empty() {
        assert!(TagData::default().is_empty());
    }

    #[test]
    fn any_field_makes_bag_non_empty() {
        let data = TagData {
            lyrics: Some("la la".into()),
            ..Default::default()
        };
        assert!(!data.is_empty());
    }

    #[test]
    fn bag_round_trips_through_json() {
        let data = TagData {
            title: Some("Intro".into()),
            artists: Some(vec!["Jane Doe".into()]),
            track_number: Some(3),
            date: NaiveDate::from_ymd_opt(2021, 6, 1),
            ..Default::default()
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: TagData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn missing_decoders_lists_components() {
        let err = MetaError::MissingDecoders(vec!["mp3".into(), "aac".into()]);
        assert_eq!(err.to_string(), "missing decoder components: mp3, aac");
    }
}
