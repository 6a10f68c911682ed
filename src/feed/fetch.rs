// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::FeedError;
use crate::http::HttpClient;

use super::parse::{FeedChannel, parse_feed};

/// Fetch-and-parse access to podcast feeds
#[async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> Result<FeedChannel, FeedError>;
}

/// Feed client that downloads feeds over HTTP
#[derive(Clone)]
pub struct HttpFeedClient<C> {
    client: C,
}

impl<C: HttpClient> HttpFeedClient<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HttpClient> FeedClient for HttpFeedClient<C> {
    async fn fetch_feed(&self, url: &str) -> Result<FeedChannel, FeedError> {
        fetch_feed(&self.client, url).await
    }
}

/// Fetch raw feed bytes from a URL (without parsing)
pub async fn fetch_feed_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Bytes, FeedError> {
    let response = client
        .get(url)
        .await
        .map_err(|e| FeedError::FetchFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !response.is_success() {
        return Err(FeedError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}

/// Fetch and parse a podcast feed from a URL
pub async fn fetch_feed<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<FeedChannel, FeedError> {
    let feed_url = Url::parse(url)?;
    let bytes = fetch_feed_bytes(client, url).await?;
    parse_feed(&bytes, feed_url)
}

/// Determine if a string looks like an HTTP(S) URL
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
