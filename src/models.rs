use serde::{Deserialize, Serialize};

/// Base URL for TMDB-hosted artwork. Size segment is appended per use.
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/";

const BACKDROP_SIZE: &str = "original";
const POSTER_SIZE: &str = "w500";

/// Whether an item came from the movie or the TV side of the catalog.
/// Decides which videos endpoint trailer enrichment hits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

/// Canonical content item returned to the client.
///
/// Both movies and TV shows are flattened into this one shape; field names
/// match the JSON payload the frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    /// Full artwork URL, absent (not empty) when the catalog has no backdrop.
    /// Shelf assembly filters on this field.
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub genre_ids: Vec<i64>,
    pub adult: bool,
    pub runtime: Option<f64>,
    /// YouTube trailer key, populated lazily by trailer enrichment.
    pub video_key: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw catalog record as TMDB returns it. Movies carry `title`/`release_date`,
/// shows carry `name`/`first_air_date`; everything else overlaps.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTitle {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub runtime: Option<f64>,
}

impl From<RawTitle> for ContentItem {
    fn from(raw: RawTitle) -> Self {
        // A record with a `title` field is a movie; shows only have `name`.
        let media_type = if raw.title.is_some() {
            MediaType::Movie
        } else {
            MediaType::Tv
        };

        Self {
            id: raw.id,
            media_type,
            title: raw.title.or(raw.name).unwrap_or_default(),
            overview: raw.overview.unwrap_or_default(),
            backdrop_path: raw
                .backdrop_path
                .map(|p| format!("{IMAGE_BASE}{BACKDROP_SIZE}{p}")),
            poster_path: raw
                .poster_path
                .map(|p| format!("{IMAGE_BASE}{POSTER_SIZE}{p}")),
            release_date: raw.release_date.or(raw.first_air_date).unwrap_or_default(),
            vote_average: raw.vote_average.unwrap_or(0.0),
            genre_ids: raw.genre_ids,
            adult: raw.adult,
            runtime: raw.runtime,
            video_key: None,
        }
    }
}

/// One page of list results from TMDB (`/trending`, `/discover`, `/search`, ...)
#[derive(Debug, Deserialize)]
pub struct TitlePage {
    #[serde(default)]
    pub results: Vec<RawTitle>,
}

/// Entry from `/genre/{movie|tv}/list`
#[derive(Debug, Clone, Deserialize)]
pub struct GenreEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
}

/// Entry from `/{movie|tv}/{id}/videos`
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}
