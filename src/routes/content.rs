use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppResult;
use crate::middleware::request_id::RequestId;
use crate::models::ContentItem;
use crate::services::HomePayload;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub trending_movies: Vec<ContentItem>,
    pub trending_tv: Vec<ContentItem>,
    pub combined: Vec<ContentItem>,
}

#[derive(Debug, Serialize)]
pub struct PopularResponse {
    pub popular_movies: Vec<ContentItem>,
    pub popular_tv: Vec<ContentItem>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ContentItem>,
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: BTreeMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct GenreBrowseResponse {
    pub movies: Vec<ContentItem>,
    pub tv_shows: Vec<ContentItem>,
    pub combined: Vec<ContentItem>,
}

// Handlers

/// Full categorized home screen. Always 200; failed shelves arrive empty.
pub async fn netflix(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<HomePayload> {
    tracing::info!(request_id = %request_id, "Building home screen payload");
    Json(state.content.home().await)
}

pub async fn trending(State(state): State<AppState>) -> Json<TrendingResponse> {
    let (movies, tv) = state.content.trending().await;
    let combined = [movies.as_slice(), tv.as_slice()].concat();

    Json(TrendingResponse {
        trending_movies: movies,
        trending_tv: tv,
        combined,
    })
}

pub async fn popular(State(state): State<AppState>) -> Json<PopularResponse> {
    let (movies, tv) = state.content.popular().await;

    Json(PopularResponse {
        popular_movies: movies,
        popular_tv: tv,
    })
}

/// Keyword search; 400 on an empty or whitespace-only query.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = state.content.search(&params.q, params.page).await?;

    Ok(Json(SearchResponse {
        results,
        query: params.q,
        page: params.page,
    }))
}

pub async fn genres(State(state): State<AppState>) -> Json<GenresResponse> {
    Json(GenresResponse {
        genres: state.content.genres().await,
    })
}

pub async fn by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i64>,
    Query(params): Query<PageQuery>,
) -> Json<GenreBrowseResponse> {
    let (movies, tv_shows) = state.content.by_genre(genre_id, params.page).await;
    let combined = [movies.as_slice(), tv_shows.as_slice()].concat();

    Json(GenreBrowseResponse {
        movies,
        tv_shows,
        combined,
    })
}

/// Movie detail lookup; 404 when the catalog has no usable record.
pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<ContentItem>> {
    let item = state.content.movie_details(movie_id).await?;
    Ok(Json(item))
}

/// TV show detail lookup; 404 when the catalog has no usable record.
pub async fn show_details(
    State(state): State<AppState>,
    Path(tv_id): Path<i64>,
) -> AppResult<Json<ContentItem>> {
    let item = state.content.show_details(tv_id).await?;
    Ok(Json(item))
}
