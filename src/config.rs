// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::directory::ItunesDirectory;
use crate::error::DirectoryError;
use crate::feed::HttpFeedClient;
use crate::http::ReqwestClient;
use crate::service::Clients;

pub const DEFAULT_DIRECTORY_URL: &str = "https://itunes.apple.com";

/// Runtime settings for the aggregator
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the directory API
    pub directory_url: String,
    /// `limit` sent with directory lookups (episodes per podcast)
    pub lookup_limit: usize,
    /// Default number of search results
    pub search_limit: usize,
    /// Per-request timeout for every upstream fetch
    pub request_timeout: Duration,
    /// Address the HTTP API binds to
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            lookup_limit: 200,
            search_limit: 50,
            request_timeout: Duration::from_secs(30),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Errors building the upstream clients from a [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl Config {
    /// Build the reqwest-backed clients described by this configuration
    pub fn build_clients(&self) -> Result<Clients, ConfigError> {
        let http = ReqwestClient::with_timeout(self.request_timeout)?;
        let directory = ItunesDirectory::new(http.clone(), &self.directory_url, self.lookup_limit)?;

        Ok(Clients {
            directory: Arc::new(directory),
            feeds: Arc::new(HttpFeedClient::new(http.clone())),
            http: Arc::new(http),
            search_limit: self.search_limit,
        })
    }
}
