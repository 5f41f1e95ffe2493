use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::models::{ContentItem, GenreEntry, GenreList, MediaType, RawTitle, TitlePage};
use crate::services::catalog::CatalogClient;
use crate::services::videos;

/// Public content operations consumed by the HTTP layer.
///
/// List operations degrade to empty results when the catalog misbehaves;
/// only direct-by-id lookups and input validation surface errors.
pub struct ContentService {
    pub(crate) catalog: CatalogClient,
}

impl ContentService {
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Fetches one list endpoint and normalizes every record.
    pub(crate) async fn fetch_list(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Vec<ContentItem>> {
        let page: TitlePage = self.catalog.get(path, params).await?;
        Ok(page.results.into_iter().map(ContentItem::from).collect())
    }

    pub async fn trending_movies(&self, window: &str) -> AppResult<Vec<ContentItem>> {
        self.fetch_list(&format!("/trending/movie/{window}"), &[])
            .await
    }

    pub async fn trending_shows(&self, window: &str) -> AppResult<Vec<ContentItem>> {
        self.fetch_list(&format!("/trending/tv/{window}"), &[]).await
    }

    pub async fn popular_movies(&self, page: u32) -> AppResult<Vec<ContentItem>> {
        self.fetch_list("/movie/popular", &[("page", page.to_string())])
            .await
    }

    pub async fn popular_shows(&self, page: u32) -> AppResult<Vec<ContentItem>> {
        self.fetch_list("/tv/popular", &[("page", page.to_string())])
            .await
    }

    pub async fn top_rated_movies(&self, page: u32) -> AppResult<Vec<ContentItem>> {
        self.fetch_list("/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    pub async fn now_playing_movies(&self) -> AppResult<Vec<ContentItem>> {
        self.fetch_list("/movie/now_playing", &[]).await
    }

    pub async fn movies_by_genre(&self, genre_id: i64, page: u32) -> AppResult<Vec<ContentItem>> {
        self.fetch_list(
            "/discover/movie",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    pub async fn shows_by_genre(&self, genre_id: i64, page: u32) -> AppResult<Vec<ContentItem>> {
        self.fetch_list(
            "/discover/tv",
            &[
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    /// Parametrized discover query, used for the specialized home shelves.
    pub async fn discover_movies(&self, params: &[(&str, String)]) -> AppResult<Vec<ContentItem>> {
        self.fetch_list("/discover/movie", params).await
    }

    /// Trending movies and shows (day window), each side contained.
    pub async fn trending(&self) -> (Vec<ContentItem>, Vec<ContentItem>) {
        let (movies, shows) = tokio::join!(self.trending_movies("day"), self.trending_shows("day"));
        (movies.unwrap_or_default(), shows.unwrap_or_default())
    }

    /// Popular movies and shows, page 1, each side contained.
    pub async fn popular(&self) -> (Vec<ContentItem>, Vec<ContentItem>) {
        let (movies, shows) = tokio::join!(self.popular_movies(1), self.popular_shows(1));
        (movies.unwrap_or_default(), shows.unwrap_or_default())
    }

    /// Genre browse across both catalogs, each side contained.
    pub async fn by_genre(&self, genre_id: i64, page: u32) -> (Vec<ContentItem>, Vec<ContentItem>) {
        let (movies, shows) = tokio::join!(
            self.movies_by_genre(genre_id, page),
            self.shows_by_genre(genre_id, page)
        );
        (movies.unwrap_or_default(), shows.unwrap_or_default())
    }

    /// Keyword search across movies and shows, merged and sorted by rating.
    pub async fn search(&self, query: &str, page: u32) -> AppResult<Vec<ContentItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let params = [("query", query.to_string()), ("page", page.to_string())];
        let (movies, shows) = tokio::join!(
            self.fetch_list("/search/movie", &params),
            self.fetch_list("/search/tv", &params)
        );

        // Movies first, then shows; the stable sort keeps that order on ties
        let mut results = movies.unwrap_or_default();
        results.extend(shows.unwrap_or_default());
        sort_by_rating(&mut results);

        tracing::info!(query = %query, results = results.len(), "Content search completed");

        Ok(results)
    }

    /// Merged genre id -> name mapping across both catalogs.
    pub async fn genres(&self) -> BTreeMap<i64, String> {
        let (movie_genres, show_genres) = tokio::join!(
            self.catalog.get::<GenreList>("/genre/movie/list", &[]),
            self.catalog.get::<GenreList>("/genre/tv/list", &[])
        );

        merge_genres(
            movie_genres.map(|g| g.genres).unwrap_or_default(),
            show_genres.map(|g| g.genres).unwrap_or_default(),
        )
    }

    /// Single movie lookup with trailer enrichment.
    pub async fn movie_details(&self, id: i64) -> AppResult<ContentItem> {
        let raw: RawTitle = self
            .catalog
            .get(&format!("/movie/{id}"), &[])
            .await
            .map_err(|e| {
                tracing::debug!(id, error = %e, "Movie lookup failed");
                AppError::NotFound("Movie not found".to_string())
            })?;

        let mut item = ContentItem::from(raw);
        item.video_key = videos::resolve_trailer(&self.catalog, id, MediaType::Movie).await;

        Ok(item)
    }

    /// Single TV show lookup with trailer enrichment.
    pub async fn show_details(&self, id: i64) -> AppResult<ContentItem> {
        let raw: RawTitle = self
            .catalog
            .get(&format!("/tv/{id}"), &[])
            .await
            .map_err(|e| {
                tracing::debug!(id, error = %e, "TV show lookup failed");
                AppError::NotFound("TV show not found".to_string())
            })?;

        let mut item = ContentItem::from(raw);
        item.video_key = videos::resolve_trailer(&self.catalog, id, MediaType::Tv).await;

        Ok(item)
    }
}

fn sort_by_rating(items: &mut [ContentItem]) {
    items.sort_by(|a, b| {
        b.vote_average
            .partial_cmp(&a.vote_average)
            .unwrap_or(Ordering::Equal)
    });
}

fn merge_genres(
    movie_genres: Vec<GenreEntry>,
    show_genres: Vec<GenreEntry>,
) -> BTreeMap<i64, String> {
    let mut merged = BTreeMap::new();
    for genre in movie_genres {
        merged.insert(genre.id, genre.name);
    }
    // Movie names win when both catalogs reuse an id
    for genre in show_genres {
        merged.entry(genre.id).or_insert(genre.name);
    }
    merged
}
