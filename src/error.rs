// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors that can occur when fetching or parsing RSS feeds
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for feed {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur when talking to the podcast directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory request to {url} failed: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} from directory at {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse directory response from {url}: {source}")]
    JsonParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid directory URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors caused by the caller's input, raised before any upstream call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: '{value}' is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },
}

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    UpstreamFetch,
    UpstreamTimeout,
    UpstreamParse,
}

/// Top-level errors for aggregation requests
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Request(_) => ErrorKind::InputValidation,
            ServiceError::Directory(DirectoryError::FetchFailed { source, .. })
            | ServiceError::Feed(FeedError::FetchFailed { source, .. })
                if source.is_timeout() =>
            {
                ErrorKind::UpstreamTimeout
            }
            ServiceError::Directory(DirectoryError::JsonParseFailed { .. })
            | ServiceError::Feed(FeedError::ParseFailed(_)) => ErrorKind::UpstreamParse,
            ServiceError::Directory(_) | ServiceError::Feed(_) => ErrorKind::UpstreamFetch,
        }
    }
}
