use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;

use crate::error::AppResult;
use crate::models::ContentItem;
use crate::services::content::ContentService;
use crate::services::videos;

/// Hard cap on shelf length in the final payload
const SHELF_MAX: usize = 30;
/// Merged candidates considered per shelf before filtering
const CANDIDATE_WINDOW: usize = 40;

/// Vote-count floor and release cutoff for the "originals" discover query
const ORIGINALS_MIN_VOTES: &str = "1000";
const ORIGINALS_CUTOFF: &str = "2020-01-01";

/// TMDB genre ids used for the fixed shelf battery
mod genre {
    pub const ACTION: i64 = 28;
    pub const COMEDY: i64 = 35;
    pub const DRAMA: i64 = 18;
    pub const SCIFI: i64 = 878;
    pub const HORROR: i64 = 27;
    pub const THRILLER: i64 = 53;
    pub const FANTASY: i64 = 14;
    pub const ADVENTURE: i64 = 12;
    pub const ANIMATION: i64 = 16;
    pub const CRIME: i64 = 80;
}

/// The categorized home screen: one bounded, deduplicated shelf per row.
/// Built fresh on every request; field order matches the client payload.
#[derive(Debug, Default, Serialize)]
pub struct HomePayload {
    pub trending: Vec<ContentItem>,
    pub now_playing: Vec<ContentItem>,
    pub popular_movies: Vec<ContentItem>,
    pub popular_series: Vec<ContentItem>,
    pub top_rated: Vec<ContentItem>,
    pub action: Vec<ContentItem>,
    pub comedy: Vec<ContentItem>,
    pub drama: Vec<ContentItem>,
    pub scifi: Vec<ContentItem>,
    pub horror: Vec<ContentItem>,
    pub thriller: Vec<ContentItem>,
    pub fantasy: Vec<ContentItem>,
    pub adventure: Vec<ContentItem>,
    pub animation: Vec<ContentItem>,
    pub tv_drama: Vec<ContentItem>,
    pub tv_comedy: Vec<ContentItem>,
    pub crime: Vec<ContentItem>,
    pub netflix_originals: Vec<ContentItem>,
    pub recently_added: Vec<ContentItem>,
}

impl HomePayload {
    /// Shelves in payload order, for iteration in logging and tests.
    pub fn shelves(&self) -> [(&'static str, &[ContentItem]); 19] {
        [
            ("trending", &self.trending),
            ("now_playing", &self.now_playing),
            ("popular_movies", &self.popular_movies),
            ("popular_series", &self.popular_series),
            ("top_rated", &self.top_rated),
            ("action", &self.action),
            ("comedy", &self.comedy),
            ("drama", &self.drama),
            ("scifi", &self.scifi),
            ("horror", &self.horror),
            ("thriller", &self.thriller),
            ("fantasy", &self.fantasy),
            ("adventure", &self.adventure),
            ("animation", &self.animation),
            ("tv_drama", &self.tv_drama),
            ("tv_comedy", &self.tv_comedy),
            ("crime", &self.crime),
            ("netflix_originals", &self.netflix_originals),
            ("recently_added", &self.recently_added),
        ]
    }
}

impl ContentService {
    /// Builds the full home screen in two fan-out stages.
    ///
    /// Stage one issues the whole query battery concurrently and joins on all
    /// of it; a failed branch degrades to an empty list without touching its
    /// siblings. Stage two runs per shelf: window, backdrop filter, dedup,
    /// then a concurrent round of trailer lookups before the final cap.
    pub async fn home(&self) -> HomePayload {
        let recent_cutoff = (Utc::now() - chrono::Duration::days(365))
            .format("%Y-%m-%d")
            .to_string();

        let originals_params = [
            ("sort_by", "vote_average.desc".to_string()),
            ("vote_count.gte", ORIGINALS_MIN_VOTES.to_string()),
            ("primary_release_date.gte", ORIGINALS_CUTOFF.to_string()),
        ];
        let recently_added_params = [
            ("sort_by", "primary_release_date.desc".to_string()),
            ("primary_release_date.gte", recent_cutoff),
        ];

        let (
            trending_movies,
            trending_shows,
            popular_movies_1,
            popular_movies_2,
            popular_shows_1,
            popular_shows_2,
            top_rated,
            now_playing,
            action_1,
            action_2,
            comedy_1,
            comedy_2,
            drama_1,
            drama_2,
            scifi,
            horror,
            thriller,
            fantasy,
            adventure,
            animation,
            tv_drama,
            tv_comedy,
            tv_crime,
            originals,
            recently_added,
        ) = tokio::join!(
            self.trending_movies("day"),
            self.trending_shows("day"),
            self.popular_movies(1),
            self.popular_movies(2),
            self.popular_shows(1),
            self.popular_shows(2),
            self.top_rated_movies(1),
            self.now_playing_movies(),
            self.movies_by_genre(genre::ACTION, 1),
            self.movies_by_genre(genre::ACTION, 2),
            self.movies_by_genre(genre::COMEDY, 1),
            self.movies_by_genre(genre::COMEDY, 2),
            self.movies_by_genre(genre::DRAMA, 1),
            self.movies_by_genre(genre::DRAMA, 2),
            self.movies_by_genre(genre::SCIFI, 1),
            self.movies_by_genre(genre::HORROR, 1),
            self.movies_by_genre(genre::THRILLER, 1),
            self.movies_by_genre(genre::FANTASY, 1),
            self.movies_by_genre(genre::ADVENTURE, 1),
            self.movies_by_genre(genre::ANIMATION, 1),
            self.shows_by_genre(genre::DRAMA, 1),
            self.shows_by_genre(genre::COMEDY, 1),
            self.shows_by_genre(genre::CRIME, 1),
            self.discover_movies(&originals_params),
            self.discover_movies(&recently_added_params),
        );

        // Multi-page categories concatenate in page order; mixed shelves
        // concatenate movies before shows. Dedup later keeps first-seen.
        let trending = [
            settle(trending_movies, "trending"),
            settle(trending_shows, "trending"),
        ]
        .concat();
        let popular_movies = [
            settle(popular_movies_1, "popular_movies"),
            settle(popular_movies_2, "popular_movies"),
        ]
        .concat();
        let popular_series = [
            settle(popular_shows_1, "popular_series"),
            settle(popular_shows_2, "popular_series"),
        ]
        .concat();
        let action = [settle(action_1, "action"), settle(action_2, "action")].concat();
        let comedy = [settle(comedy_1, "comedy"), settle(comedy_2, "comedy")].concat();
        let drama = [settle(drama_1, "drama"), settle(drama_2, "drama")].concat();

        let (
            trending,
            now_playing,
            popular_movies,
            popular_series,
            top_rated,
            action,
            comedy,
            drama,
            scifi,
            horror,
            thriller,
            fantasy,
            adventure,
            animation,
            tv_drama,
            tv_comedy,
            crime,
            netflix_originals,
            recently_added,
        ) = tokio::join!(
            self.finish_shelf(trending),
            self.finish_shelf(settle(now_playing, "now_playing")),
            self.finish_shelf(popular_movies),
            self.finish_shelf(popular_series),
            self.finish_shelf(settle(top_rated, "top_rated")),
            self.finish_shelf(action),
            self.finish_shelf(comedy),
            self.finish_shelf(drama),
            self.finish_shelf(settle(scifi, "scifi")),
            self.finish_shelf(settle(horror, "horror")),
            self.finish_shelf(settle(thriller, "thriller")),
            self.finish_shelf(settle(fantasy, "fantasy")),
            self.finish_shelf(settle(adventure, "adventure")),
            self.finish_shelf(settle(animation, "animation")),
            self.finish_shelf(settle(tv_drama, "tv_drama")),
            self.finish_shelf(settle(tv_comedy, "tv_comedy")),
            self.finish_shelf(settle(tv_crime, "crime")),
            self.finish_shelf(settle(originals, "netflix_originals")),
            self.finish_shelf(settle(recently_added, "recently_added")),
        );

        let payload = HomePayload {
            trending,
            now_playing,
            popular_movies,
            popular_series,
            top_rated,
            action,
            comedy,
            drama,
            scifi,
            horror,
            thriller,
            fantasy,
            adventure,
            animation,
            tv_drama,
            tv_comedy,
            crime,
            netflix_originals,
            recently_added,
        };

        let total: usize = payload.shelves().iter().map(|(_, s)| s.len()).sum();
        tracing::info!(items = total, "Home payload assembled");

        payload
    }

    /// Second-stage shelf pipeline: window, backdrop filter, dedup, trailer
    /// fan-out, final cap.
    async fn finish_shelf(&self, candidates: Vec<ContentItem>) -> Vec<ContentItem> {
        let mut shelf = select_candidates(candidates);

        // Trailer lookups are independent per item; spawn the whole round
        // and join in order. A failed or panicked lookup leaves the item
        // without a key.
        let mut lookups = Vec::new();
        for (idx, item) in shelf.iter().enumerate() {
            if item.video_key.is_some() {
                continue;
            }
            let catalog = self.catalog.clone();
            let (id, media_type) = (item.id, item.media_type);
            lookups.push((
                idx,
                tokio::spawn(
                    async move { videos::resolve_trailer(&catalog, id, media_type).await },
                ),
            ));
        }

        for (idx, task) in lookups {
            if let Ok(Some(key)) = task.await {
                shelf[idx].video_key = Some(key);
            }
        }

        shelf.truncate(SHELF_MAX);
        shelf
    }
}

/// Per-branch containment: a failed branch serves its shelf empty.
fn settle(branch: AppResult<Vec<ContentItem>>, shelf: &str) -> Vec<ContentItem> {
    match branch {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(shelf, error = %e, "Shelf branch failed, serving it empty");
            Vec::new()
        }
    }
}

/// Applies the candidate window, drops items without a backdrop, and
/// deduplicates by id with first occurrence winning.
fn select_candidates(candidates: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .take(CANDIDATE_WINDOW)
        .filter(|item| item.backdrop_path.is_some() && seen.insert(item.id))
        .collect()
}
