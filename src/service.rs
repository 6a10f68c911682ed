// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request orchestration shared by the HTTP API and the CLI.
//!
//! Each request runs sequentially: directory lookup first, then the feed,
//! because the feed URL is often only known once the lookup returns.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::adapt::{from_directory, from_feed_item};
use crate::analytics::{EpisodeAnalytics, analyze};
use crate::directory::{DirectoryClient, DirectoryPodcast};
use crate::episode::CanonicalEpisode;
use crate::error::{RequestError, ServiceError};
use crate::feed::{FeedChannel, FeedClient, is_url};
use crate::http::HttpClient;
use crate::merge::{EpisodeSource, FeedEpisodes, reconcile, reconcile_richer};
use crate::summary::{PodcastSummary, SummaryInputs, compose_summary};
use crate::transcript::{TranscriptResponse, extract_transcript};

pub const DEFAULT_EPISODE_LIMIT: usize = 100;

/// Upstream clients used to serve requests
#[derive(Clone)]
pub struct Clients {
    pub directory: Arc<dyn DirectoryClient>,
    pub feeds: Arc<dyn FeedClient>,
    /// Plain HTTP access for transcript pages
    pub http: Arc<dyn HttpClient>,
    pub search_limit: usize,
}

/// Parameters for an episode listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeListRequest {
    pub podcast_id: Option<String>,
    pub feed_url: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl EpisodeListRequest {
    /// Validate raw parameters as they arrive from a query string
    pub fn from_params(
        podcast_id: Option<&str>,
        feed_url: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Result<Self, RequestError> {
        let podcast_id = non_blank(podcast_id);
        let feed_url = non_blank(feed_url);

        if podcast_id.is_none() && feed_url.is_none() {
            return Err(RequestError::Missing(
                "Either podcast_id or feed_url is required",
            ));
        }

        Ok(Self {
            podcast_id,
            feed_url,
            limit: parse_count("limit", limit, DEFAULT_EPISODE_LIMIT)?,
            offset: parse_count("offset", offset, 0)?,
        })
    }
}

/// One page of canonical episodes plus analytics over the full set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeListResponse {
    pub podcast_id: Option<String>,
    pub feed_url: Option<String>,
    pub episode_source: EpisodeSource,
    pub total_episodes: usize,
    pub offset: usize,
    pub limit: usize,
    pub episodes: Vec<CanonicalEpisode>,
    pub analytics: Option<EpisodeAnalytics>,
}

/// Parameters for a transcript lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptRequest {
    pub episode_id: Option<String>,
    pub page_url: Option<String>,
    pub audio_url: Option<String>,
}

impl TranscriptRequest {
    pub fn from_params(
        episode_id: Option<&str>,
        page_url: Option<&str>,
        audio_url: Option<&str>,
    ) -> Result<Self, RequestError> {
        let request = Self {
            episode_id: non_blank(episode_id),
            page_url: non_blank(page_url),
            audio_url: non_blank(audio_url),
        };

        if request.episode_id.is_none() && request.page_url.is_none() && request.audio_url.is_none()
        {
            return Err(RequestError::Missing(
                "Episode ID, URL, or audio_url is required",
            ));
        }

        Ok(request)
    }
}

/// List a podcast's episodes, preferring the feed over the directory
pub async fn list_episodes(
    clients: &Clients,
    request: &EpisodeListRequest,
) -> Result<EpisodeListResponse, ServiceError> {
    let mut directory_episodes = Vec::new();
    let mut discovered_feed_url = None;

    if let Some(podcast_id) = &request.podcast_id {
        debug!(podcast_id = %podcast_id, "Looking up podcast in directory");
        if let Some(lookup) = clients.directory.lookup(podcast_id).await? {
            directory_episodes = lookup.episodes.iter().map(from_directory).collect();
            discovered_feed_url = lookup.podcast.feed_url;
        }
    }

    let feed_url = request.feed_url.clone().or(discovered_feed_url);
    let (_, feed_episodes) = load_feed(clients.feeds.as_ref(), feed_url.as_deref()).await;

    let reconciled = reconcile(directory_episodes, feed_episodes);
    let total_episodes = reconciled.episodes.len();
    let analytics = analyze(&reconciled.episodes);
    let episodes = paginate(reconciled.episodes, request.offset, request.limit);

    Ok(EpisodeListResponse {
        podcast_id: request.podcast_id.clone(),
        feed_url,
        episode_source: reconciled.source,
        total_episodes,
        offset: request.offset,
        limit: request.limit,
        episodes,
        analytics,
    })
}

/// Build the detail record for a podcast; `None` when the directory has no match
pub async fn podcast_detail(
    clients: &Clients,
    podcast_id: Option<&str>,
) -> Result<Option<PodcastSummary>, ServiceError> {
    let podcast_id =
        non_blank(podcast_id).ok_or(RequestError::Missing("Podcast ID is required"))?;

    let Some(lookup) = clients.directory.lookup(&podcast_id).await? else {
        return Ok(None);
    };

    let directory_episodes = lookup.episodes.iter().map(from_directory).collect();
    let (channel, feed_episodes) =
        load_feed(clients.feeds.as_ref(), lookup.podcast.feed_url.as_deref()).await;
    let reconciled = reconcile_richer(directory_episodes, feed_episodes);

    Ok(Some(compose_summary(SummaryInputs {
        podcast: &lookup.podcast,
        channel: channel.as_ref(),
        episodes: &reconciled,
    })))
}

/// Search the directory for podcasts
pub async fn search_podcasts(
    clients: &Clients,
    term: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<DirectoryPodcast>, ServiceError> {
    let term = non_blank(term).ok_or(RequestError::Missing("Search term is required"))?;
    let limit = limit.unwrap_or(clients.search_limit);

    Ok(clients.directory.search(&term, limit).await?)
}

/// Look for a transcript on the episode's web page
pub async fn fetch_transcript(
    clients: &Clients,
    request: &TranscriptRequest,
) -> Result<TranscriptResponse, ServiceError> {
    let transcript = match request.page_url.as_deref() {
        Some(page_url) if is_url(page_url) => scrape_page(clients.http.as_ref(), page_url).await,
        _ => None,
    };

    Ok(match transcript {
        Some(text) => TranscriptResponse::available(request.episode_id.clone(), text),
        None => TranscriptResponse::unavailable(request.episode_id.clone()),
    })
}

async fn scrape_page(http: &dyn HttpClient, page_url: &str) -> Option<String> {
    match http.get(page_url).await {
        Ok(response) if response.is_success() => {
            extract_transcript(&String::from_utf8_lossy(&response.body))
        }
        Ok(response) => {
            warn!(page_url, status = response.status, "Transcript page returned an error status");
            None
        }
        Err(e) => {
            warn!(page_url, error = %e, "Failed to fetch transcript page");
            None
        }
    }
}

/// Fetch and normalize a feed. Failures are logged and reported as unavailable.
async fn load_feed(
    feeds: &dyn FeedClient,
    feed_url: Option<&str>,
) -> (Option<FeedChannel>, FeedEpisodes) {
    let Some(feed_url) = feed_url else {
        return (None, FeedEpisodes::Unavailable);
    };

    match feeds.fetch_feed(feed_url).await {
        Ok(channel) => {
            let episodes = channel
                .items
                .iter()
                .map(|item| from_feed_item(item, channel.image_url.as_deref()))
                .collect();
            (Some(channel), FeedEpisodes::Parsed(episodes))
        }
        Err(e) => {
            warn!(feed_url, error = %e, "Feed unavailable, falling back to directory episodes");
            (None, FeedEpisodes::Unavailable)
        }
    }
}

/// Slice one page out of the episode list
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

pub(crate) fn parse_count(
    field: &'static str,
    value: Option<&str>,
    default: usize,
) -> Result<usize, RequestError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| RequestError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
