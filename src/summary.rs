// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;

use crate::analytics::{Cadence, EpisodeAnalytics, analyze};
use crate::directory::DirectoryPodcast;
use crate::episode::CanonicalEpisode;
use crate::feed::{FeedChannel, FeedOwner};
use crate::merge::{EpisodeSource, Reconciled};

/// Maximum number of episodes in the preview list
const RECENT_EPISODE_LIMIT: usize = 10;
/// Maximum characters kept from a preview description
const PREVIEW_DESCRIPTION_CHARS: usize = 200;
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_PODCAST_TYPE: &str = "episodic";

const BASE_WEEKLY_LISTENERS: f64 = 5000.0;
const DOWNLOADS_PER_LISTENER: f64 = 0.7;

const GENRE_MULTIPLIERS: &[(&str, f64)] = &[
    ("True Crime", 2.5),
    ("News", 2.0),
    ("Comedy", 1.8),
    ("Sports", 1.7),
    ("Business", 1.6),
    ("Technology", 1.5),
    ("Health & Fitness", 1.4),
];
const DEFAULT_GENRE_MULTIPLIER: f64 = 1.0;

/// Denormalized podcast detail record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodcastSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub artwork: Artwork,
    pub metadata: PodcastMetadata,
    pub categories: Categories,
    pub stats: PodcastStats,
    pub episode_source: EpisodeSource,
    pub episode_insights: Option<EpisodeAnalytics>,
    pub recent_episodes: Vec<EpisodePreview>,
    pub estimated_metrics: PopularityEstimate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artwork {
    pub url_60: Option<String>,
    pub url_100: Option<String>,
    pub url_600: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodcastMetadata {
    pub feed_url: Option<String>,
    pub directory_url: Option<String>,
    pub directory_id: u64,
    pub website: Option<String>,
    pub copyright: Option<String>,
    pub author: Option<String>,
    pub owner: Option<FeedOwner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Categories {
    pub genres: Vec<String>,
    pub primary_genre: Option<String>,
    pub feed_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodcastStats {
    pub episode_count: u64,
    pub release_date: Option<String>,
    pub latest_episode_date: Option<String>,
    pub country: Option<String>,
    pub language: String,
    pub explicit: bool,
    /// `episodic` or `serial`
    pub podcast_type: String,
    pub publishing_frequency: Cadence,
}

/// Short form of an episode for the preview list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodePreview {
    pub id: String,
    pub title: String,
    pub description: String,
    pub release_date: Option<String>,
    pub duration_seconds: u64,
    pub duration_formatted: String,
    pub url: Option<String>,
    pub audio_url: Option<String>,
}

impl EpisodePreview {
    fn from_episode(episode: &CanonicalEpisode) -> Self {
        Self {
            id: episode.id.clone(),
            title: episode.title.clone(),
            description: episode
                .description
                .as_deref()
                .map(|text| truncate_chars(text, PREVIEW_DESCRIPTION_CHARS))
                .unwrap_or_default(),
            release_date: episode.release_date.clone(),
            duration_seconds: episode.duration_seconds,
            duration_formatted: episode.duration_formatted.clone(),
            url: episode.episode_url.clone(),
            audio_url: episode.audio_url.clone(),
        }
    }
}

/// Illustrative audience estimate; never a measured figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityEstimate {
    pub estimated_weekly_listeners: u64,
    pub estimated_downloads_per_episode: u64,
    pub confidence: &'static str,
    pub note: &'static str,
}

/// Everything the compositor needs for one podcast
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    pub podcast: &'a DirectoryPodcast,
    /// Parsed feed channel, when the feed could be loaded
    pub channel: Option<&'a FeedChannel>,
    pub episodes: &'a Reconciled,
}

/// Multiplier applied to the baseline audience for a primary genre
pub fn genre_multiplier(primary_genre: Option<&str>) -> f64 {
    primary_genre
        .and_then(|genre| {
            GENRE_MULTIPLIERS
                .iter()
                .find(|(name, _)| *name == genre)
                .map(|(_, multiplier)| *multiplier)
        })
        .unwrap_or(DEFAULT_GENRE_MULTIPLIER)
}

/// Estimate audience size from genre and catalogue size
pub fn estimate_popularity(primary_genre: Option<&str>, episode_count: u64) -> PopularityEstimate {
    let episode_factor = ((episode_count + 1) as f64).log10();
    let weekly = (BASE_WEEKLY_LISTENERS * genre_multiplier(primary_genre) * episode_factor).floor();
    let downloads = (weekly * DOWNLOADS_PER_LISTENER).floor();

    PopularityEstimate {
        estimated_weekly_listeners: weekly as u64,
        estimated_downloads_per_episode: downloads as u64,
        confidence: "low",
        note: "Estimates based on genre, episode count, and industry averages",
    }
}

/// Assemble the podcast detail record. Feed values win over directory values.
pub fn compose_summary(inputs: SummaryInputs<'_>) -> PodcastSummary {
    let SummaryInputs {
        podcast,
        channel,
        episodes,
    } = inputs;

    let insights = analyze(&episodes.episodes);
    let recent = most_recent_first(&episodes.episodes);

    let episode_count = podcast
        .track_count
        .filter(|count| *count > 0)
        .unwrap_or(episodes.episodes.len() as u64);

    let publishing_frequency = insights
        .as_ref()
        .map(|stats| stats.publishing_frequency)
        .unwrap_or(Cadence::Unknown);

    let latest_episode_date = recent
        .first()
        .and_then(|episode| episode.release_date.clone());

    PodcastSummary {
        id: podcast.collection_id.to_string(),
        name: podcast
            .collection_name
            .clone()
            .or_else(|| channel.map(|c| c.title.clone()))
            .unwrap_or_default(),
        publisher: podcast.artist_name.clone(),
        description: channel
            .and_then(|c| c.description.clone())
            .or_else(|| podcast.collection_censored_name.clone()),
        artwork: Artwork {
            url_60: podcast.artwork_url60.clone(),
            url_100: podcast.artwork_url100.clone(),
            url_600: podcast
                .artwork_url600
                .clone()
                .or_else(|| channel.and_then(|c| c.image_url.clone())),
        },
        metadata: PodcastMetadata {
            feed_url: podcast
                .feed_url
                .clone()
                .or_else(|| channel.map(|c| c.feed_url.to_string())),
            directory_url: podcast.collection_view_url.clone(),
            directory_id: podcast.collection_id,
            website: channel.and_then(|c| c.website.clone()),
            copyright: channel.and_then(|c| c.copyright.clone()),
            author: channel
                .and_then(|c| c.author.clone())
                .or_else(|| podcast.artist_name.clone()),
            owner: channel.and_then(|c| c.owner.clone()),
        },
        categories: Categories {
            genres: podcast.genres.clone(),
            primary_genre: podcast.primary_genre_name.clone(),
            feed_categories: channel.map(|c| c.categories.clone()).unwrap_or_default(),
        },
        stats: PodcastStats {
            episode_count,
            release_date: podcast.release_date.clone(),
            latest_episode_date,
            country: podcast.country.clone(),
            language: channel
                .and_then(|c| c.language.clone())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            explicit: channel.is_some_and(FeedChannel::is_explicit)
                || podcast.content_advisory_rating.as_deref() == Some("Explicit"),
            podcast_type: channel
                .and_then(|c| c.podcast_type.clone())
                .unwrap_or_else(|| DEFAULT_PODCAST_TYPE.to_string()),
            publishing_frequency,
        },
        episode_source: episodes.source,
        episode_insights: insights,
        recent_episodes: recent
            .into_iter()
            .take(RECENT_EPISODE_LIMIT)
            .map(EpisodePreview::from_episode)
            .collect(),
        estimated_metrics: estimate_popularity(
            podcast.primary_genre_name.as_deref(),
            episodes.episodes.len() as u64,
        ),
    }
}

/// Episodes ordered by release date, newest first; undated ones keep their
/// relative order at the end
fn most_recent_first(episodes: &[CanonicalEpisode]) -> Vec<&CanonicalEpisode> {
    let mut ordered: Vec<_> = episodes
        .iter()
        .map(|episode| (episode.parsed_release_date(), episode))
        .collect();
    ordered.sort_by(|(a, _), (b, _)| b.cmp(a));
    ordered.into_iter().map(|(_, episode)| episode).collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
