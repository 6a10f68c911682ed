pub mod adapt;
pub mod analytics;
pub mod config;
pub mod directory;
pub mod duration;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod merge;
pub mod server;
pub mod service;
pub mod summary;
pub mod transcript;

// Re-export main types for convenience
pub use analytics::{Cadence, EpisodeAnalytics, analyze, classify_cadence};
pub use config::{Config, ConfigError};
pub use directory::{DirectoryClient, DirectoryPodcast, ItunesDirectory};
pub use duration::{format_duration, parse_duration};
pub use episode::{CanonicalEpisode, EpisodeType};
pub use error::{DirectoryError, ErrorKind, FeedError, RequestError, ServiceError};
pub use feed::{FeedChannel, FeedClient, HttpFeedClient, fetch_feed, is_url, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use merge::{EpisodeSource, Reconciled, reconcile, reconcile_richer};
pub use service::{
    Clients, EpisodeListRequest, EpisodeListResponse, TranscriptRequest, fetch_transcript,
    list_episodes, podcast_detail, search_podcasts,
};
pub use summary::{PodcastSummary, estimate_popularity};
pub use transcript::TranscriptResponse;
