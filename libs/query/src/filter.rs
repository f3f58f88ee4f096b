//! Search request normalization.
//!
//! Raw `(key, value)` pairs arrive in request order from the query string or a
//! form body. Normalization rules:
//! - values are trimmed; a pair whose value is empty is skipped before its key is examined
//! - recognized keys store the value, later duplicates overwrite earlier ones
//! - the first unrecognized key aborts normalization
//! - `type` and `limit` are validated only after every key has been accepted

use crate::{RequestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row limit applied when the request carries no `limit`.
pub const DEFAULT_LIMIT: u64 = 25;

/// The three disjoint search modes selected by the request `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    MusicSearch,
    AudioSearch,
    IndexedBooks,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [Self::MusicSearch, Self::AudioSearch, Self::IndexedBooks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MusicSearch => "music-search",
            Self::AudioSearch => "audio-search",
            Self::IndexedBooks => "indexed-books",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| RequestError::UnknownSearchType(s.to_string()))
    }
}

/// Normalized, non-empty search fields plus the row limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub lyricist: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub limit: u64,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            title: None,
            composer: None,
            lyricist: None,
            artist: None,
            album: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FilterSet {
    /// True when no text filter is present (the limit does not count).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.composer.is_none()
            && self.lyricist.is_none()
            && self.artist.is_none()
            && self.album.is_none()
    }

    /// Artist or album filters pull in the recordings join for music searches.
    pub fn has_recording_filter(&self) -> bool {
        self.artist.is_some() || self.album.is_some()
    }
}

/// A normalized request: the selected mode and its filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub mode: SearchMode,
    pub filters: FilterSet,
}

impl SearchRequest {
    pub fn from_items(items: &[(String, String)]) -> Result<Self> {
        Self::from_items_with_default_limit(items, DEFAULT_LIMIT)
    }

    pub fn from_items_with_default_limit(
        items: &[(String, String)],
        default_limit: u64,
    ) -> Result<Self> {
        let mut filters = FilterSet {
            limit: default_limit,
            ..FilterSet::default()
        };
        let mut search_type: Option<&str> = None;
        let mut raw_limit: Option<&str> = None;

        for (key, value) in items {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let slot = match key.as_str() {
                "type" => {
                    search_type = Some(value);
                    continue;
                }
                "limit" => {
                    raw_limit = Some(value);
                    continue;
                }
                "title" => &mut filters.title,
                "composer" => &mut filters.composer,
                "lyricist" => &mut filters.lyricist,
                "artist" => &mut filters.artist,
                "album" => &mut filters.album,
                other => return Err(RequestError::UnknownFilter(other.to_string())),
            };
            *slot = Some(value.to_string());
        }

        if let Some(raw) = raw_limit {
            filters.limit = parse_limit(raw)?;
        }

        let mode = search_type
            .ok_or(RequestError::MissingSearchType)?
            .parse::<SearchMode>()?;

        Ok(Self { mode, filters })
    }
}

fn parse_limit(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(RequestError::InvalidLimit(raw.to_string())),
    }
}
