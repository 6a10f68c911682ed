// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Source adapters: map directory and feed records onto [`CanonicalEpisode`].
//!
//! Each canonical field is produced by one small extraction function per
//! source. The rule tables below list, per field, where the value comes from
//! and what is substituted when the source lacks it.

use scraper::Html;

use crate::directory::DirectoryEpisode;
use crate::duration::{RawDuration, format_seconds, parse_duration};
use crate::episode::{CanonicalEpisode, EpisodeType, UNTITLED_EPISODE};
use crate::feed::{FeedItem, is_explicit_token};

use FieldDefault::{Absent, False, SameAs, Text, Zero};

/// Value a canonical field takes when its source is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Left empty (`null` in JSON)
    Absent,
    Zero,
    False,
    Text(&'static str),
    /// Copied from another canonical field
    SameAs(&'static str),
}

/// Source with no counterpart for a field
pub const NO_SOURCE: &str = "-";

/// Where a canonical field comes from and what replaces it when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub source: &'static str,
    pub default: FieldDefault,
}

const fn rule(field: &'static str, source: &'static str, default: FieldDefault) -> FieldRule {
    FieldRule {
        field,
        source,
        default,
    }
}

pub const DIRECTORY_FIELD_RULES: &[FieldRule] = &[
    rule("id", "trackId", SameAs("title")),
    rule("title", "trackName", Text(UNTITLED_EPISODE)),
    rule("description", "description | shortDescription", Absent),
    rule("description_html", NO_SOURCE, Absent),
    rule("release_date", "releaseDate", Absent),
    rule("duration_seconds", "trackTimeMillis / 1000", Zero),
    rule("audio_url", "previewUrl | episodeUrl", Absent),
    rule("episode_url", "trackViewUrl", Absent),
    rule("artwork_url", "artworkUrl600 | artworkUrl160", Absent),
    rule("episode_number", NO_SOURCE, Absent),
    rule("season_number", NO_SOURCE, Absent),
    rule("episode_type", NO_SOURCE, Text("full")),
    rule("explicit", NO_SOURCE, False),
];

pub const FEED_FIELD_RULES: &[FieldRule] = &[
    rule("id", "guid | link | title", SameAs("title")),
    rule("title", "title", Text(UNTITLED_EPISODE)),
    rule("description", "content:encoded | description (text)", Absent),
    rule("description_html", "content:encoded | description", Absent),
    rule("release_date", "pubDate", Absent),
    rule("duration_seconds", "itunes:duration", Zero),
    rule("audio_url", "enclosure@url", Absent),
    rule("episode_url", "link", Absent),
    rule("artwork_url", "itunes:image | channel image", Absent),
    rule("episode_number", "itunes:episode", Absent),
    rule("season_number", "itunes:season", Absent),
    rule("episode_type", "itunes:episodeType", Text("full")),
    rule("explicit", "itunes:explicit", False),
];

/// An upstream episode record tagged with the shape it arrived in
#[derive(Debug, Clone, Copy)]
pub enum SourceEpisode<'a> {
    Directory(&'a DirectoryEpisode),
    Feed {
        item: &'a FeedItem,
        /// Channel artwork used when the item has none of its own
        channel_artwork: Option<&'a str>,
    },
}

impl SourceEpisode<'_> {
    pub fn into_canonical(self) -> CanonicalEpisode {
        match self {
            SourceEpisode::Directory(episode) => from_directory(episode),
            SourceEpisode::Feed {
                item,
                channel_artwork,
            } => from_feed_item(item, channel_artwork),
        }
    }
}

/// Normalize a directory episode record
pub fn from_directory(episode: &DirectoryEpisode) -> CanonicalEpisode {
    let title = directory_fields::title(episode);
    let duration_seconds = directory_fields::duration_seconds(episode);

    CanonicalEpisode {
        id: directory_fields::id(episode, &title),
        description: directory_fields::description(episode),
        description_html: None,
        release_date: episode.release_date.clone(),
        duration_seconds,
        duration_formatted: format_seconds(duration_seconds),
        audio_url: directory_fields::audio_url(episode),
        audio_type: None,
        audio_length: None,
        episode_url: episode.track_view_url.clone(),
        artwork_url: directory_fields::artwork_url(episode),
        episode_number: None,
        season_number: None,
        episode_type: EpisodeType::Full,
        explicit: false,
        title,
    }
}

/// Normalize a feed item
pub fn from_feed_item(item: &FeedItem, channel_artwork: Option<&str>) -> CanonicalEpisode {
    let title = feed_fields::title(item);
    let duration_seconds = feed_fields::duration_seconds(item);
    let enclosure = item.enclosure.as_ref();

    CanonicalEpisode {
        id: feed_fields::id(item, &title),
        description: feed_fields::description(item),
        description_html: feed_fields::description_html(item),
        release_date: item.pub_date.clone(),
        duration_seconds,
        duration_formatted: format_seconds(duration_seconds),
        audio_url: enclosure.map(|e| e.url.clone()),
        audio_type: enclosure.and_then(|e| e.mime_type.clone()),
        audio_length: enclosure.and_then(|e| e.length),
        episode_url: item.link.clone(),
        artwork_url: item
            .image
            .clone()
            .or_else(|| channel_artwork.map(String::from)),
        episode_number: feed_fields::positive_number(item.episode.as_deref()),
        season_number: feed_fields::positive_number(item.season.as_deref()),
        episode_type: item
            .episode_type
            .as_deref()
            .map(EpisodeType::from_token)
            .unwrap_or_default(),
        explicit: item.explicit.as_deref().is_some_and(is_explicit_token),
        title,
    }
}

/// Reduce markup to its text, collapsing whitespace
pub fn html_to_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let text: String = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

mod directory_fields {
    use super::*;

    pub(super) fn title(episode: &DirectoryEpisode) -> String {
        non_blank(episode.track_name.as_deref())
            .unwrap_or(UNTITLED_EPISODE)
            .to_string()
    }

    pub(super) fn id(episode: &DirectoryEpisode, title: &str) -> String {
        episode
            .track_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| title.to_string())
    }

    pub(super) fn description(episode: &DirectoryEpisode) -> Option<String> {
        non_blank(episode.description.as_deref())
            .or_else(|| non_blank(episode.short_description.as_deref()))
            .map(html_to_text)
            .filter(|text| !text.is_empty())
    }

    pub(super) fn duration_seconds(episode: &DirectoryEpisode) -> u64 {
        let raw = episode
            .track_time_millis
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map(|ms| RawDuration::from_millis(ms as u64));
        parse_duration(raw)
    }

    pub(super) fn audio_url(episode: &DirectoryEpisode) -> Option<String> {
        non_blank(episode.preview_url.as_deref())
            .or_else(|| non_blank(episode.episode_url.as_deref()))
            .map(String::from)
    }

    pub(super) fn artwork_url(episode: &DirectoryEpisode) -> Option<String> {
        non_blank(episode.artwork_url600.as_deref())
            .or_else(|| non_blank(episode.artwork_url160.as_deref()))
            .map(String::from)
    }
}

mod feed_fields {
    use super::*;

    pub(super) fn title(item: &FeedItem) -> String {
        non_blank(item.title.as_deref())
            .unwrap_or(UNTITLED_EPISODE)
            .to_string()
    }

    pub(super) fn id(item: &FeedItem, title: &str) -> String {
        non_blank(item.guid.as_deref())
            .or_else(|| non_blank(item.link.as_deref()))
            .unwrap_or(title)
            .to_string()
    }

    pub(super) fn description_html(item: &FeedItem) -> Option<String> {
        non_blank(item.content.as_deref())
            .or_else(|| non_blank(item.description.as_deref()))
            .map(String::from)
    }

    pub(super) fn description(item: &FeedItem) -> Option<String> {
        description_html(item)
            .map(|markup| html_to_text(&markup))
            .filter(|text| !text.is_empty())
    }

    pub(super) fn duration_seconds(item: &FeedItem) -> u64 {
        parse_duration(item.duration.as_deref().map(RawDuration::Text))
    }

    pub(super) fn positive_number(value: Option<&str>) -> Option<u32> {
        non_blank(value)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Map, Value, json};

    use crate::feed::FeedEnclosure;

    fn full_directory_episode() -> DirectoryEpisode {
        DirectoryEpisode {
            track_id: Some(1000123),
            track_name: Some("Directory Episode".to_string()),
            description: Some("<p>Hello &amp; welcome</p>".to_string()),
            short_description: None,
            release_date: Some("2024-01-15T10:00:00Z".to_string()),
            track_time_millis: Some(3_723_000.0),
            track_view_url: Some("https://podcasts.example.com/ep".to_string()),
            preview_url: Some("https://cdn.example.com/ep.mp3".to_string()),
            episode_url: Some("https://cdn.example.com/full.mp3".to_string()),
            artwork_url600: Some("https://cdn.example.com/600.jpg".to_string()),
            artwork_url160: Some("https://cdn.example.com/160.jpg".to_string()),
            episode_guid: Some("guid-1".to_string()),
        }
    }

    fn full_feed_item() -> FeedItem {
        FeedItem {
            guid: Some("guid-abc".to_string()),
            link: Some("https://example.com/ep1".to_string()),
            title: Some("Feed Episode".to_string()),
            description: Some("Short text".to_string()),
            content: Some("<p>Rich <em>text</em></p>".to_string()),
            pub_date: Some("Mon, 01 Jan 2024 12:00:00 +0000".to_string()),
            duration: Some("45:30".to_string()),
            enclosure: Some(FeedEnclosure {
                url: "https://example.com/ep1.mp3".to_string(),
                mime_type: Some("audio/mpeg".to_string()),
                length: Some(42),
            }),
            image: Some("https://example.com/ep1.jpg".to_string()),
            episode: Some("12".to_string()),
            season: Some("3".to_string()),
            episode_type: Some("bonus".to_string()),
            explicit: Some("yes".to_string()),
        }
    }

    #[test]
    fn directory_adapter_maps_all_fields() {
        let episode = from_directory(&full_directory_episode());

        assert_eq!(episode.id, "1000123");
        assert_eq!(episode.title, "Directory Episode");
        assert_eq!(episode.description.as_deref(), Some("Hello & welcome"));
        assert!(episode.description_html.is_none());
        assert_eq!(episode.release_date.as_deref(), Some("2024-01-15T10:00:00Z"));
        assert_eq!(episode.duration_seconds, 3723);
        assert_eq!(episode.duration_formatted, "1:02:03");
        assert_eq!(
            episode.audio_url.as_deref(),
            Some("https://cdn.example.com/ep.mp3")
        );
        assert_eq!(
            episode.episode_url.as_deref(),
            Some("https://podcasts.example.com/ep")
        );
        assert_eq!(
            episode.artwork_url.as_deref(),
            Some("https://cdn.example.com/600.jpg")
        );
        assert_eq!(episode.episode_type, EpisodeType::Full);
        assert!(!episode.explicit);
    }

    #[test]
    fn directory_adapter_defaults_for_empty_record() {
        let episode = from_directory(&DirectoryEpisode::default());

        assert_eq!(episode.title, UNTITLED_EPISODE);
        assert_eq!(episode.id, UNTITLED_EPISODE);
        assert!(episode.description.is_none());
        assert!(episode.release_date.is_none());
        assert_eq!(episode.duration_seconds, 0);
        assert_eq!(episode.duration_formatted, "0:00");
        assert!(episode.audio_url.is_none());
        assert!(episode.artwork_url.is_none());
        assert!(episode.episode_number.is_none());
        assert!(episode.season_number.is_none());
        assert_eq!(episode.episode_type, EpisodeType::Full);
        assert!(!episode.explicit);
    }

    #[test]
    fn directory_id_falls_back_to_title() {
        let record = DirectoryEpisode {
            track_name: Some("Only a title".to_string()),
            ..Default::default()
        };
        assert_eq!(from_directory(&record).id, "Only a title");
    }

    #[test]
    fn directory_audio_and_artwork_fallbacks() {
        let record = DirectoryEpisode {
            episode_url: Some("https://cdn.example.com/full.mp3".to_string()),
            artwork_url160: Some("https://cdn.example.com/160.jpg".to_string()),
            ..Default::default()
        };
        let episode = from_directory(&record);

        assert_eq!(
            episode.audio_url.as_deref(),
            Some("https://cdn.example.com/full.mp3")
        );
        assert_eq!(
            episode.artwork_url.as_deref(),
            Some("https://cdn.example.com/160.jpg")
        );
    }

    #[test]
    fn directory_description_falls_back_to_short_description() {
        let record = DirectoryEpisode {
            description: Some("   ".to_string()),
            short_description: Some("Short".to_string()),
            ..Default::default()
        };
        assert_eq!(from_directory(&record).description.as_deref(), Some("Short"));
    }

    #[test]
    fn directory_negative_duration_is_unknown() {
        let record = DirectoryEpisode {
            track_time_millis: Some(-10.0),
            ..Default::default()
        };
        assert_eq!(from_directory(&record).duration_seconds, 0);
    }

    #[test]
    fn feed_adapter_maps_all_fields() {
        let episode = from_feed_item(&full_feed_item(), Some("https://example.com/show.jpg"));

        assert_eq!(episode.id, "guid-abc");
        assert_eq!(episode.title, "Feed Episode");
        assert_eq!(episode.description.as_deref(), Some("Rich text"));
        assert_eq!(
            episode.description_html.as_deref(),
            Some("<p>Rich <em>text</em></p>")
        );
        assert_eq!(
            episode.release_date.as_deref(),
            Some("Mon, 01 Jan 2024 12:00:00 +0000")
        );
        assert_eq!(episode.duration_seconds, 2730);
        assert_eq!(episode.duration_formatted, "45:30");
        assert_eq!(
            episode.audio_url.as_deref(),
            Some("https://example.com/ep1.mp3")
        );
        assert_eq!(episode.audio_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(episode.audio_length, Some(42));
        assert_eq!(
            episode.episode_url.as_deref(),
            Some("https://example.com/ep1")
        );
        assert_eq!(
            episode.artwork_url.as_deref(),
            Some("https://example.com/ep1.jpg")
        );
        assert_eq!(episode.episode_number, Some(12));
        assert_eq!(episode.season_number, Some(3));
        assert_eq!(episode.episode_type, EpisodeType::Bonus);
        assert!(episode.explicit);
    }

    #[test]
    fn feed_adapter_defaults_for_empty_item() {
        let episode = from_feed_item(&FeedItem::default(), None);

        assert_eq!(episode.title, UNTITLED_EPISODE);
        assert_eq!(episode.id, UNTITLED_EPISODE);
        assert!(episode.description.is_none());
        assert!(episode.description_html.is_none());
        assert_eq!(episode.duration_seconds, 0);
        assert!(episode.audio_url.is_none());
        assert!(episode.artwork_url.is_none());
        assert_eq!(episode.episode_type, EpisodeType::Full);
        assert!(!episode.explicit);
    }

    #[test]
    fn feed_id_precedence_is_guid_then_link_then_title() {
        let mut item = full_feed_item();
        assert_eq!(from_feed_item(&item, None).id, "guid-abc");

        item.guid = None;
        assert_eq!(from_feed_item(&item, None).id, "https://example.com/ep1");

        item.link = None;
        assert_eq!(from_feed_item(&item, None).id, "Feed Episode");
    }

    #[test]
    fn feed_artwork_falls_back_to_channel() {
        let item = FeedItem {
            image: None,
            ..full_feed_item()
        };
        let episode = from_feed_item(&item, Some("https://example.com/show.jpg"));
        assert_eq!(
            episode.artwork_url.as_deref(),
            Some("https://example.com/show.jpg")
        );
    }

    #[test]
    fn feed_description_falls_back_to_plain_description() {
        let item = FeedItem {
            content: None,
            ..full_feed_item()
        };
        let episode = from_feed_item(&item, None);
        assert_eq!(episode.description.as_deref(), Some("Short text"));
        assert_eq!(episode.description_html.as_deref(), Some("Short text"));
    }

    #[test]
    fn feed_numbers_must_be_positive_integers() {
        let item = FeedItem {
            episode: Some("0".to_string()),
            season: Some("two".to_string()),
            ..full_feed_item()
        };
        let episode = from_feed_item(&item, None);
        assert!(episode.episode_number.is_none());
        assert!(episode.season_number.is_none());
    }

    #[test]
    fn feed_explicit_only_for_explicit_tokens() {
        let item = FeedItem {
            explicit: Some("clean".to_string()),
            ..full_feed_item()
        };
        assert!(!from_feed_item(&item, None).explicit);
    }

    #[test]
    fn tagged_source_dispatches_to_adapter() {
        let record = full_directory_episode();
        let item = full_feed_item();

        assert_eq!(
            SourceEpisode::Directory(&record).into_canonical(),
            from_directory(&record)
        );
        assert_eq!(
            SourceEpisode::Feed {
                item: &item,
                channel_artwork: None
            }
            .into_canonical(),
            from_feed_item(&item, None)
        );
    }

    const RULED_FIELDS: [&str; 13] = [
        "id",
        "title",
        "description",
        "description_html",
        "release_date",
        "duration_seconds",
        "audio_url",
        "episode_url",
        "artwork_url",
        "episode_number",
        "season_number",
        "episode_type",
        "explicit",
    ];

    fn as_json(episode: &CanonicalEpisode) -> Map<String, Value> {
        match serde_json::to_value(episode).unwrap() {
            Value::Object(map) => map,
            other => panic!("Expected an object, got {other}"),
        }
    }

    fn field(record: &Map<String, Value>, name: &str) -> Value {
        record.get(name).cloned().unwrap_or(Value::Null)
    }

    fn expected_default(default: FieldDefault, record: &Map<String, Value>) -> Value {
        match default {
            FieldDefault::Absent => Value::Null,
            FieldDefault::Zero => json!(0),
            FieldDefault::False => json!(false),
            FieldDefault::Text(text) => json!(text),
            FieldDefault::SameAs(other) => field(record, other),
        }
    }

    #[test]
    fn rule_tables_cover_every_canonical_field() {
        for table in [DIRECTORY_FIELD_RULES, FEED_FIELD_RULES] {
            assert_eq!(table.len(), RULED_FIELDS.len());
            for name in RULED_FIELDS {
                assert!(
                    table.iter().any(|rule| rule.field == name),
                    "missing rule for {name}"
                );
            }
        }
    }

    #[test]
    fn empty_records_take_the_declared_defaults() {
        let directory = as_json(&from_directory(&DirectoryEpisode::default()));
        for rule in DIRECTORY_FIELD_RULES {
            assert_eq!(
                field(&directory, rule.field),
                expected_default(rule.default, &directory),
                "directory field {}",
                rule.field
            );
        }

        let feed = as_json(&from_feed_item(&FeedItem::default(), None));
        for rule in FEED_FIELD_RULES {
            assert_eq!(
                field(&feed, rule.field),
                expected_default(rule.default, &feed),
                "feed field {}",
                rule.field
            );
        }
    }

    #[test]
    fn unsourced_directory_fields_keep_defaults_on_full_records() {
        let directory = as_json(&from_directory(&full_directory_episode()));
        for rule in DIRECTORY_FIELD_RULES.iter().filter(|rule| rule.source == NO_SOURCE) {
            assert_eq!(
                field(&directory, rule.field),
                expected_default(rule.default, &directory),
                "directory field {}",
                rule.field
            );
        }
    }

    #[test]
    fn sourced_fields_are_filled_from_full_records() {
        let directory = as_json(&from_directory(&full_directory_episode()));
        let feed = as_json(&from_feed_item(&full_feed_item(), None));

        for (table, record) in [(DIRECTORY_FIELD_RULES, &directory), (FEED_FIELD_RULES, &feed)] {
            for rule in table.iter().filter(|rule| rule.source != NO_SOURCE) {
                assert_ne!(
                    field(record, rule.field),
                    Value::Null,
                    "field {} should come from {}",
                    rule.field,
                    rule.source
                );
            }
        }
    }

    #[test]
    fn html_to_text_strips_markup() {
        assert_eq!(
            html_to_text("<p>Line one</p>\n<p>Line  <a href=\"#\">two</a></p>"),
            "Line one Line two"
        );
        assert_eq!(html_to_text("plain"), "plain");
    }
}
