// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::directory::DirectoryPodcast;
use crate::error::{ErrorKind, ServiceError};
use crate::service::{
    self, Clients, EpisodeListRequest, EpisodeListResponse, TranscriptRequest, parse_count,
};
use crate::summary::PodcastSummary;
use crate::transcript::TranscriptResponse;

type AppState = Arc<Clients>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).options(preflight))
        .route("/api/episodes", get(list_episodes).options(preflight))
        .route(
            "/api/episodes/transcript",
            get(episode_transcript).options(preflight),
        )
        .route("/api/podcasts/{id}", get(podcast_detail).options(preflight))
        .route("/api/search", get(search).options(preflight))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the API until the process is stopped
pub async fn serve(clients: Clients, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(Arc::new(clients))).await
}

/// Error responses produced by the handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    Upstream {
        context: &'static str,
        source: ServiceError,
    },
}

impl ApiError {
    /// Classify a service error, attaching `context` for upstream failures
    fn from_service(context: &'static str, err: ServiceError) -> Self {
        match err.kind() {
            ErrorKind::InputValidation => ApiError::BadRequest(err.to_string()),
            kind => {
                error!(?kind, error = %err, "{context}");
                ApiError::Upstream {
                    context,
                    source: err,
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Upstream { context, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": context, "message": source.to_string() })),
            )
                .into_response(),
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Default, Deserialize)]
struct EpisodesQuery {
    podcast_id: Option<String>,
    feed_url: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

async fn list_episodes(
    State(clients): State<AppState>,
    Query(query): Query<EpisodesQuery>,
) -> Result<Json<EpisodeListResponse>, ApiError> {
    let request = EpisodeListRequest::from_params(
        query.podcast_id.as_deref(),
        query.feed_url.as_deref(),
        query.limit.as_deref(),
        query.offset.as_deref(),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    service::list_episodes(&clients, &request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service("Failed to fetch episodes", e))
}

async fn podcast_detail(
    State(clients): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PodcastSummary>, ApiError> {
    match service::podcast_detail(&clients, Some(&id)).await {
        Ok(Some(summary)) => Ok(Json(summary)),
        Ok(None) => Err(ApiError::NotFound("Podcast not found")),
        Err(e) => Err(ApiError::from_service("Failed to fetch podcast details", e)),
    }
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptQuery {
    id: Option<String>,
    url: Option<String>,
    audio_url: Option<String>,
}

async fn episode_transcript(
    State(clients): State<AppState>,
    Query(query): Query<TranscriptQuery>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let request = TranscriptRequest::from_params(
        query.id.as_deref(),
        query.url.as_deref(),
        query.audio_url.as_deref(),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    service::fetch_transcript(&clients, &request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service("Failed to fetch transcript", e))
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    term: Option<String>,
    limit: Option<String>,
}

async fn search(
    State(clients): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<DirectoryPodcast>>, ApiError> {
    let limit = parse_count("limit", query.limit.as_deref(), clients.search_limit)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    service::search_podcasts(&clients, query.term.as_deref(), Some(limit))
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service("Failed to search podcasts", e))
}
