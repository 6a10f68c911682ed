// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Title used when an upstream record carries none
pub const UNTITLED_EPISODE: &str = "Untitled Episode";

/// Kind of episode as declared by `itunes:episodeType`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeType {
    #[default]
    Full,
    Trailer,
    Bonus,
}

impl EpisodeType {
    /// Interpret a feed token; anything unrecognised is a full episode
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "trailer" => EpisodeType::Trailer,
            "bonus" => EpisodeType::Bonus,
            _ => EpisodeType::Full,
        }
    }
}

/// The normalized episode shape every source adapter produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEpisode {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    /// Release date exactly as the source sent it
    pub release_date: Option<String>,
    /// Whole seconds, `0` when unknown
    pub duration_seconds: u64,
    pub duration_formatted: String,
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_length: Option<u64>,
    pub episode_url: Option<String>,
    pub artwork_url: Option<String>,
    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
    pub episode_type: EpisodeType,
    pub explicit: bool,
}

impl CanonicalEpisode {
    /// Parsed release date, if the raw value is understood
    pub fn parsed_release_date(&self) -> Option<DateTime<FixedOffset>> {
        self.release_date.as_deref().and_then(parse_release_date)
    }
}

/// Parse the date formats seen in feeds and directory responses.
///
/// RFC 2822 (`pubDate`) and RFC 3339 (directory `releaseDate`) cover nearly
/// everything; a few relaxed variants and bare dates are accepted as well.
pub fn parse_release_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt);
    }

    let formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%a, %d %b %Y %H:%M %z",
        "%d %b %Y %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];
    for format in formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt);
        }
    }

    // Bare calendar dates are taken as midnight UTC
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
