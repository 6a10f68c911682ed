// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::FeedError;

/// Channel-level data of a parsed podcast feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedChannel {
    pub title: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub author: Option<String>,
    pub owner: Option<FeedOwner>,
    pub website: Option<String>,
    /// Raw `itunes:explicit` token
    pub explicit: Option<String>,
    /// `itunes:type`, either `episodic` or `serial`
    pub podcast_type: Option<String>,
    pub categories: Vec<String>,
    pub image_url: Option<String>,
    pub feed_url: Url,
    pub items: Vec<FeedItem>,
}

impl FeedChannel {
    /// Whether the channel declares itself explicit
    pub fn is_explicit(&self) -> bool {
        self.explicit.as_deref().is_some_and(is_explicit_token)
    }
}

/// Owner block from `itunes:owner`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FeedOwner {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A single feed `<item>`, kept close to the wire format
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// `content:encoded` markup
    pub content: Option<String>,
    pub pub_date: Option<String>,
    pub duration: Option<String>,
    pub enclosure: Option<FeedEnclosure>,
    pub image: Option<String>,
    pub episode: Option<String>,
    pub season: Option<String>,
    pub episode_type: Option<String>,
    pub explicit: Option<String>,
}

/// The media file attached to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEnclosure {
    pub url: String,
    pub mime_type: Option<String>,
    pub length: Option<u64>,
}

/// Whether an `itunes:explicit` token means explicit content
pub fn is_explicit_token(token: &str) -> bool {
    matches!(
        token.trim().to_ascii_lowercase().as_str(),
        "yes" | "true" | "explicit"
    )
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse RSS feed XML bytes into a FeedChannel
pub fn parse_feed(xml_bytes: &[u8], feed_url: Url) -> Result<FeedChannel, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;
    let itunes = channel.itunes_ext();

    let items = channel.items().iter().map(parse_item).collect();

    let image_url = itunes
        .and_then(|ext| ext.image())
        .and_then(non_empty)
        .or_else(|| channel.image().and_then(|img| non_empty(img.url())));

    let author = itunes
        .and_then(|ext| ext.author())
        .and_then(non_empty)
        .or_else(|| channel.managing_editor().and_then(non_empty));

    let owner = itunes.and_then(|ext| ext.owner()).map(|owner| FeedOwner {
        name: owner.name().and_then(non_empty),
        email: owner.email().and_then(non_empty),
    });

    let mut categories: Vec<String> = itunes
        .map(|ext| {
            ext.categories()
                .iter()
                .filter_map(|category| non_empty(category.text()))
                .collect()
        })
        .unwrap_or_default();
    if categories.is_empty() {
        categories = channel
            .categories()
            .iter()
            .filter_map(|category| non_empty(category.name()))
            .collect();
    }

    Ok(FeedChannel {
        title: channel.title().trim().to_string(),
        description: non_empty(channel.description()),
        language: channel.language().and_then(non_empty),
        copyright: channel.copyright().and_then(non_empty),
        author,
        owner,
        website: non_empty(channel.link()),
        explicit: itunes.and_then(|ext| ext.explicit()).and_then(non_empty),
        podcast_type: itunes.and_then(|ext| ext.r#type()).and_then(non_empty),
        categories,
        image_url,
        feed_url,
        items,
    })
}

fn parse_item(item: &rss::Item) -> FeedItem {
    let itunes = item.itunes_ext();

    let enclosure = item.enclosure().and_then(|enclosure| {
        non_empty(enclosure.url()).map(|url| FeedEnclosure {
            url,
            mime_type: non_empty(enclosure.mime_type()),
            length: enclosure.length().trim().parse().ok(),
        })
    });

    FeedItem {
        guid: item.guid().and_then(|g| non_empty(g.value())),
        link: item.link().and_then(non_empty),
        title: item.title().and_then(non_empty),
        description: item.description().and_then(non_empty),
        content: item.content().and_then(non_empty),
        pub_date: item.pub_date().and_then(non_empty),
        duration: itunes.and_then(|ext| ext.duration()).and_then(non_empty),
        enclosure,
        image: itunes.and_then(|ext| ext.image()).and_then(non_empty),
        episode: itunes.and_then(|ext| ext.episode()).and_then(non_empty),
        season: itunes.and_then(|ext| ext.season()).and_then(non_empty),
        episode_type: itunes.and_then(|ext| ext.episode_type()).and_then(non_empty),
        explicit: itunes.and_then(|ext| ext.explicit()).and_then(non_empty),
    }
}
