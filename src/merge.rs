// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Choosing which episode set is authoritative.
//!
//! The policy is last-successful-source-wins: a parsed feed replaces the
//! directory listing wholesale. Fields are never blended across sources, so
//! anything only the directory carried (artwork, for instance) is dropped
//! when the feed wins.

use std::fmt;

use serde::Serialize;

use crate::episode::CanonicalEpisode;

/// Outcome of trying to load episodes from a feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEpisodes {
    /// The feed was fetched and parsed
    Parsed(Vec<CanonicalEpisode>),
    /// No feed URL, or the fetch/parse failed
    Unavailable,
}

/// Which upstream the final episode set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeSource {
    Feed,
    Directory,
    None,
}

impl fmt::Display for EpisodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EpisodeSource::Feed => "feed",
            EpisodeSource::Directory => "directory",
            EpisodeSource::None => "none",
        })
    }
}

/// The authoritative episode set together with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub source: EpisodeSource,
    pub episodes: Vec<CanonicalEpisode>,
}

/// Pick the authoritative episode set.
///
/// A successfully parsed feed wins outright, even when it lists no items.
/// Otherwise the directory episodes are used, and when those are empty too
/// the result is an empty set rather than an error.
pub fn reconcile(directory: Vec<CanonicalEpisode>, feed: FeedEpisodes) -> Reconciled {
    match feed {
        FeedEpisodes::Parsed(episodes) => Reconciled {
            source: EpisodeSource::Feed,
            episodes,
        },
        FeedEpisodes::Unavailable if !directory.is_empty() => Reconciled {
            source: EpisodeSource::Directory,
            episodes: directory,
        },
        FeedEpisodes::Unavailable => Reconciled {
            source: EpisodeSource::None,
            episodes: Vec::new(),
        },
    }
}

/// Like [`reconcile`], but an empty feed does not hide a non-empty directory set.
///
/// Used for the podcast detail record, which shows whichever set has content.
pub fn reconcile_richer(directory: Vec<CanonicalEpisode>, feed: FeedEpisodes) -> Reconciled {
    match feed {
        FeedEpisodes::Parsed(episodes) if episodes.is_empty() && !directory.is_empty() => {
            reconcile(directory, FeedEpisodes::Unavailable)
        }
        feed => reconcile(directory, feed),
    }
}
