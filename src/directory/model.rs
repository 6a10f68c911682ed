// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Podcast-level record from a directory lookup or search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPodcast {
    pub collection_id: u64,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub collection_censored_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub collection_view_url: Option<String>,
    #[serde(default)]
    pub artwork_url60: Option<String>,
    #[serde(default)]
    pub artwork_url100: Option<String>,
    #[serde(default)]
    pub artwork_url600: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub track_count: Option<u64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub primary_genre_name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub content_advisory_rating: Option<String>,
}

/// Episode-level record from a directory lookup with `entity=podcastEpisode`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEpisode {
    #[serde(default)]
    pub track_id: Option<u64>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Length in milliseconds
    #[serde(default)]
    pub track_time_millis: Option<f64>,
    #[serde(default)]
    pub track_view_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub episode_url: Option<String>,
    #[serde(default)]
    pub artwork_url600: Option<String>,
    #[serde(default)]
    pub artwork_url160: Option<String>,
    #[serde(default)]
    pub episode_guid: Option<String>,
}

/// One entry of the `results` array, discriminated by `wrapperType`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "wrapperType")]
pub enum DirectoryRecord {
    #[serde(rename = "track")]
    Podcast(DirectoryPodcast),
    #[serde(rename = "podcastEpisode")]
    Episode(DirectoryEpisode),
    #[serde(other)]
    Other,
}

/// Raw directory response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct DirectoryResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

impl DirectoryResponse {
    /// Decode each result on its own so one odd entry does not sink the rest
    pub(crate) fn records(self) -> Vec<DirectoryRecord> {
        self.results
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }
}

/// A podcast together with its directory-listed episodes
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryLookup {
    pub podcast: DirectoryPodcast,
    pub episodes: Vec<DirectoryEpisode>,
}

impl DirectoryLookup {
    /// Split lookup records into the podcast and its episodes.
    ///
    /// Returns `None` when no podcast record is present.
    pub fn from_records(records: Vec<DirectoryRecord>) -> Option<Self> {
        let mut podcast = None;
        let mut episodes = Vec::new();

        for record in records {
            match record {
                DirectoryRecord::Podcast(p) if podcast.is_none() => podcast = Some(p),
                DirectoryRecord::Episode(e) => episodes.push(e),
                _ => {}
            }
        }

        podcast.map(|podcast| DirectoryLookup { podcast, episodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_JSON: &str = r#"{
      "resultCount": 3,
      "results": [
        {
          "wrapperType": "track",
          "kind": "podcast",
          "collectionId": 12345,
          "collectionName": "Test Podcast",
          "artistName": "Test Publisher",
          "feedUrl": "https://example.com/feed.xml",
          "artworkUrl600": "https://example.com/600.jpg",
          "trackCount": 2,
          "primaryGenreName": "Comedy",
          "genres": ["Comedy", "Podcasts"]
        },
        {
          "wrapperType": "podcastEpisode",
          "kind": "podcast-episode",
          "trackId": 1,
          "trackName": "Episode 1",
          "releaseDate": "2024-01-01T12:00:00Z",
          "trackTimeMillis": 1800000
        },
        {
          "wrapperType": "podcastEpisode",
          "trackId": 2,
          "trackName": "Episode 2"
        }
      ]
    }"#;

    #[test]
    fn records_are_discriminated_by_wrapper_type() {
        let response: DirectoryResponse = serde_json::from_str(LOOKUP_JSON).unwrap();
        let records = response.records();

        assert_eq!(records.len(), 3);
        assert!(matches!(records[0], DirectoryRecord::Podcast(_)));
        assert!(matches!(records[1], DirectoryRecord::Episode(_)));
    }

    #[test]
    fn lookup_splits_podcast_and_episodes() {
        let response: DirectoryResponse = serde_json::from_str(LOOKUP_JSON).unwrap();
        let lookup = DirectoryLookup::from_records(response.records()).unwrap();

        assert_eq!(lookup.podcast.collection_id, 12345);
        assert_eq!(lookup.podcast.genres, vec!["Comedy", "Podcasts"]);
        assert_eq!(lookup.episodes.len(), 2);
        assert_eq!(lookup.episodes[0].track_time_millis, Some(1_800_000.0));
        assert!(lookup.episodes[1].release_date.is_none());
    }

    #[test]
    fn unknown_wrapper_types_are_ignored() {
        let json = r#"{"results": [{"wrapperType": "collection", "collectionId": 1}]}"#;
        let response: DirectoryResponse = serde_json::from_str(json).unwrap();
        let records = response.records();

        assert_eq!(records, vec![DirectoryRecord::Other]);
        assert!(DirectoryLookup::from_records(records).is_none());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let json = r#"{"results": [{"wrapperType": "track", "collectionName": "No id"}]}"#;
        let response: DirectoryResponse = serde_json::from_str(json).unwrap();
        assert!(response.records().is_empty());
    }
}
