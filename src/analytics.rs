// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Serialize, Serializer};

use crate::duration::format_seconds;
use crate::episode::CanonicalEpisode;

/// Number of most recent release gaps that feed the cadence estimate
const MAX_GAPS: usize = 20;

/// Publishing cadence derived from the mean gap between episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    MultiplePerWeek,
    Weekly,
    Biweekly,
    Monthly,
    Irregular,
    Unknown,
}

impl Cadence {
    pub fn label(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::MultiplePerWeek => "multiple times per week",
            Cadence::Weekly => "weekly",
            Cadence::Biweekly => "biweekly",
            Cadence::Monthly => "monthly",
            Cadence::Irregular => "irregular",
            Cadence::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Cadence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classify a mean gap in days. Upper bounds are inclusive.
pub fn classify_cadence(mean_gap_days: Option<f64>) -> Cadence {
    let Some(days) = mean_gap_days.filter(|d| d.is_finite()) else {
        return Cadence::Unknown;
    };

    if days <= 1.5 {
        Cadence::Daily
    } else if days <= 4.0 {
        Cadence::MultiplePerWeek
    } else if days <= 9.0 {
        Cadence::Weekly
    } else if days <= 18.0 {
        Cadence::Biweekly
    } else if days <= 35.0 {
        Cadence::Monthly
    } else {
        Cadence::Irregular
    }
}

/// Aggregate statistics over an episode set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeAnalytics {
    pub total_episodes: usize,
    pub average_duration_seconds: u64,
    pub average_duration_formatted: String,
    pub min_duration_seconds: u64,
    pub max_duration_seconds: u64,
    pub first_episode_date: Option<DateTime<Utc>>,
    pub latest_episode_date: Option<DateTime<Utc>>,
    pub average_days_between_episodes: Option<f64>,
    pub publishing_frequency: Cadence,
    pub episodes_by_year: BTreeMap<i32, usize>,
    pub explicit_episodes: usize,
    pub explicit_percentage: String,
}

/// Compute analytics for an episode set; `None` when there are no episodes
pub fn analyze(episodes: &[CanonicalEpisode]) -> Option<EpisodeAnalytics> {
    if episodes.is_empty() {
        return None;
    }

    let durations = DurationStats::from_episodes(episodes);

    let mut dates: Vec<DateTime<Utc>> = episodes
        .iter()
        .filter_map(|episode| episode.parsed_release_date())
        .map(|dt| dt.with_timezone(&Utc))
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let mean_gap = mean_gap_days(&dates);

    let explicit_episodes = episodes.iter().filter(|episode| episode.explicit).count();

    Some(EpisodeAnalytics {
        total_episodes: episodes.len(),
        average_duration_seconds: durations.average,
        average_duration_formatted: format_seconds(durations.average),
        min_duration_seconds: durations.min,
        max_duration_seconds: durations.max,
        first_episode_date: dates.last().copied(),
        latest_episode_date: dates.first().copied(),
        average_days_between_episodes: mean_gap,
        publishing_frequency: classify_cadence(mean_gap),
        episodes_by_year: episodes_by_year(&dates),
        explicit_episodes,
        explicit_percentage: format_percentage(explicit_episodes, episodes.len()),
    })
}

#[derive(Debug, Default)]
struct DurationStats {
    average: u64,
    min: u64,
    max: u64,
}

impl DurationStats {
    fn from_episodes(episodes: &[CanonicalEpisode]) -> Self {
        let known: Vec<u64> = episodes
            .iter()
            .map(|episode| episode.duration_seconds)
            .filter(|seconds| *seconds > 0)
            .collect();

        if known.is_empty() {
            return Self::default();
        }

        let total: u128 = known.iter().map(|seconds| u128::from(*seconds)).sum();
        let mean = total as f64 / known.len() as f64;

        Self {
            average: mean.round() as u64,
            min: known.iter().copied().min().unwrap_or(0),
            max: known.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Mean whole-day gap over the most recent consecutive releases.
///
/// `dates` must be sorted most recent first.
fn mean_gap_days(dates: &[DateTime<Utc>]) -> Option<f64> {
    let gaps: Vec<i64> = dates
        .windows(2)
        .take(MAX_GAPS)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();

    if gaps.is_empty() {
        return None;
    }

    Some(gaps.iter().sum::<i64>() as f64 / gaps.len() as f64)
}

fn episodes_by_year(dates: &[DateTime<Utc>]) -> BTreeMap<i32, usize> {
    let mut by_year = BTreeMap::new();
    for date in dates {
        *by_year.entry(date.year()).or_insert(0) += 1;
    }
    by_year
}

fn format_percentage(count: usize, total: usize) -> String {
    let percentage = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{:.1}%", percentage)
}
