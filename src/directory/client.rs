// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use url::Url;

use crate::error::DirectoryError;
use crate::http::HttpClient;

use super::model::{DirectoryLookup, DirectoryPodcast, DirectoryRecord, DirectoryResponse};

/// Podcast directory lookup and search
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Look up a podcast and its listed episodes; `None` when there is no match
    async fn lookup(&self, podcast_id: &str) -> Result<Option<DirectoryLookup>, DirectoryError>;

    /// Search podcasts by free-text term
    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<DirectoryPodcast>, DirectoryError>;
}

/// Directory client for the iTunes Search/Lookup API
#[derive(Clone)]
pub struct ItunesDirectory<C> {
    client: C,
    base_url: Url,
    lookup_limit: usize,
}

impl<C: HttpClient> ItunesDirectory<C> {
    /// Create a directory client rooted at `base_url`
    pub fn new(client: C, base_url: &str, lookup_limit: usize) -> Result<Self, DirectoryError> {
        // Keep a trailing slash so `join` appends instead of replacing
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            client,
            base_url,
            lookup_limit,
        })
    }

    fn lookup_url(&self, podcast_id: &str) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.join("lookup")?;
        url.query_pairs_mut()
            .append_pair("id", podcast_id)
            .append_pair("entity", "podcastEpisode")
            .append_pair("limit", &self.lookup_limit.to_string());
        Ok(url)
    }

    fn search_url(&self, term: &str, limit: usize) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.join("search")?;
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("media", "podcast")
            .append_pair("entity", "podcast")
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn fetch_records(&self, url: &Url) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        let response = self
            .client
            .get(url.as_str())
            .await
            .map_err(|e| DirectoryError::FetchFailed {
                url: url.to_string(),
                source: e,
            })?;

        if !response.is_success() {
            return Err(DirectoryError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        let parsed: DirectoryResponse =
            serde_json::from_slice(&response.body).map_err(|e| DirectoryError::JsonParseFailed {
                url: url.to_string(),
                source: e,
            })?;

        Ok(parsed.records())
    }
}

#[async_trait]
impl<C: HttpClient> DirectoryClient for ItunesDirectory<C> {
    async fn lookup(&self, podcast_id: &str) -> Result<Option<DirectoryLookup>, DirectoryError> {
        let url = self.lookup_url(podcast_id)?;
        let records = self.fetch_records(&url).await?;
        Ok(DirectoryLookup::from_records(records))
    }

    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<DirectoryPodcast>, DirectoryError> {
        let url = self.search_url(term, limit)?;
        let records = self.fetch_records(&url).await?;

        Ok(records
            .into_iter()
            .filter_map(|record| match record {
                DirectoryRecord::Podcast(podcast) => Some(podcast),
                _ => None,
            })
            .collect())
    }
}
