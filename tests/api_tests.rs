use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flixboard::routes::{create_router, AppState};
use flixboard::services::{CatalogClient, ContentService};

fn test_app(server: &MockServer) -> axum::Router {
    let catalog = CatalogClient::new(
        server.uri(),
        vec!["key1".to_string(), "key2".to_string()],
        Duration::from_secs(2),
    )
    .unwrap();

    create_router(AppState {
        content: Arc::new(ContentService::new(catalog)),
    })
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn movie(id: i64, title: &str, vote: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": "a movie",
        "backdrop_path": format!("/b{id}.jpg"),
        "poster_path": format!("/p{id}.jpg"),
        "release_date": "2021-06-01",
        "vote_average": vote,
        "genre_ids": [28],
        "adult": false
    })
}

fn show(id: i64, name: &str, vote: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": "a show",
        "backdrop_path": format!("/b{id}.jpg"),
        "poster_path": format!("/p{id}.jpg"),
        "first_air_date": "2020-02-02",
        "vote_average": vote,
        "genre_ids": [18],
        "adult": false
    })
}

fn page(results: Vec<Value>) -> Value {
    json!({ "results": results })
}

async fn mock_list(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let (status, body) = get_json(test_app(&server), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_merges_and_sorts_by_rating() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "superman"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![
            movie(101, "Superman", 8.1),
            movie(102, "Superman Returns", 6.5),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .and(query_param("query", "superman"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![
            show(201, "Superman: The Animated Series", 8.1),
            show(202, "Lois & Clark", 7.2),
        ])))
        .mount(&server)
        .await;

    let (status, body) = get_json(test_app(&server), "/api/content/search?q=superman").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "superman");
    assert_eq!(body["page"], 1);

    let results = body["results"].as_array().unwrap();
    assert!(!results.is_empty());

    // Descending by rating; the 8.1 tie keeps the movie ahead of the show
    let ids: Vec<i64> = results.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![101, 201, 202, 102]);

    let votes: Vec<f64> = results
        .iter()
        .map(|r| r["vote_average"].as_f64().unwrap())
        .collect();
    assert!(votes.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let server = MockServer::start().await;

    let (status, body) = get_json(test_app(&server), "/api/content/search?q=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_search_degrades_when_one_side_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![movie(1, "Hit", 7.0)])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = get_json(test_app(&server), "/api/content/search?q=hit").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_movie_details_with_trailer() {
    let server = MockServer::start().await;

    mock_list(
        &server,
        "/movie/550",
        json!({
            "id": 550,
            "title": "Fight Club",
            "overview": "A ticking-time-bomb insomniac",
            "backdrop_path": "/fc.jpg",
            "poster_path": "/fcp.jpg",
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "runtime": 139.0,
            "adult": false
        }),
    )
    .await;

    mock_list(
        &server,
        "/movie/550/videos",
        json!({
            "results": [
                {"site": "Vimeo", "type": "Trailer", "key": "nope"},
                {"site": "YouTube", "type": "Teaser", "key": "fc-teaser"},
                {"site": "YouTube", "type": "Trailer", "key": "fc-trailer"}
            ]
        }),
    )
    .await;

    let (status, body) = get_json(test_app(&server), "/api/content/movie/550").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 550);
    assert!(!body["title"].as_str().unwrap().is_empty());
    assert_eq!(body["media_type"], "movie");
    assert_eq!(
        body["backdrop_path"],
        "https://image.tmdb.org/t/p/original/fc.jpg"
    );
    assert_eq!(
        body["poster_path"],
        "https://image.tmdb.org/t/p/w500/fcp.jpg"
    );
    assert_eq!(body["runtime"], 139.0);
    // First qualifying video in upstream order
    assert_eq!(body["video_key"], "fc-teaser");
}

#[tokio::test]
async fn test_movie_details_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/-1"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"status_code": 34, "status_message": "not found"})),
        )
        .mount(&server)
        .await;

    let (status, body) = get_json(test_app(&server), "/api/content/movie/-1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");
}

#[tokio::test]
async fn test_show_details_uses_tv_endpoints() {
    let server = MockServer::start().await;

    mock_list(
        &server,
        "/tv/1396",
        json!({
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "backdrop_path": "/bb.jpg",
            "vote_average": 8.9
        }),
    )
    .await;

    mock_list(
        &server,
        "/tv/1396/videos",
        json!({"results": [{"site": "YouTube", "type": "Trailer", "key": "bb-trailer"}]}),
    )
    .await;

    let (status, body) = get_json(test_app(&server), "/api/content/tv/1396").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1396);
    assert_eq!(body["title"], "Breaking Bad");
    assert_eq!(body["media_type"], "tv");
    assert_eq!(body["release_date"], "2008-01-20");
    assert_eq!(body["video_key"], "bb-trailer");
}

#[tokio::test]
async fn test_genres_merge_prefers_movie_names() {
    let server = MockServer::start().await;

    mock_list(
        &server,
        "/genre/movie/list",
        json!({"genres": [{"id": 18, "name": "Drama"}, {"id": 28, "name": "Action"}]}),
    )
    .await;
    mock_list(
        &server,
        "/genre/tv/list",
        json!({"genres": [{"id": 18, "name": "Drama & Soap"}, {"id": 80, "name": "Crime"}]}),
    )
    .await;

    let (status, body) = get_json(test_app(&server), "/api/content/genres").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genres"]["18"], "Drama");
    assert_eq!(body["genres"]["28"], "Action");
    assert_eq!(body["genres"]["80"], "Crime");
}

#[tokio::test]
async fn test_trending_combines_both_catalogs() {
    let server = MockServer::start().await;

    mock_list(
        &server,
        "/trending/movie/day",
        page(vec![movie(1, "Movie A", 7.0), movie(2, "Movie B", 6.0)]),
    )
    .await;
    mock_list(&server, "/trending/tv/day", page(vec![show(3, "Show C", 8.0)])).await;

    let (status, body) = get_json(test_app(&server), "/api/content/trending").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trending_movies"].as_array().unwrap().len(), 2);
    assert_eq!(body["trending_tv"].as_array().unwrap().len(), 1);
    assert_eq!(body["combined"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_genre_browse_forwards_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "12"))
        .and(query_param("page", "3"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![movie(5, "Adv", 6.5)])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/discover/tv"))
        .and(query_param("with_genres", "12"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![show(6, "Adv TV", 6.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(test_app(&server), "/api/content/genre/12?page=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);
    assert_eq!(body["tv_shows"].as_array().unwrap().len(), 1);
    assert_eq!(body["combined"].as_array().unwrap().len(), 2);
}

/// Mounts success responses for the whole home-screen battery, except the
/// horror discover branch which fails with a 500. The trending-movies page
/// is caller-supplied so tests can vary its contents.
async fn mount_home_battery(server: &MockServer, trending_movies: Value) {
    mock_list(server, "/trending/movie/day", trending_movies).await;
    mock_list(
        server,
        "/trending/tv/day",
        page((0..5).map(|i| show(1100 + i, "Trend TV", 7.0)).collect()),
    )
    .await;

    // Popular movie pages overlap so the shelf exercises dedup
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            (0..25).map(|i| movie(1200 + i, "Popular", 6.0)).collect(),
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            (10..35).map(|i| movie(1200 + i, "Popular", 6.0)).collect(),
        )))
        .mount(server)
        .await;

    mock_list(
        server,
        "/tv/popular",
        page((0..8).map(|i| show(1300 + i, "Popular TV", 6.5)).collect()),
    )
    .await;
    mock_list(
        server,
        "/movie/top_rated",
        page((0..8).map(|i| movie(1400 + i, "Top", 8.5)).collect()),
    )
    .await;
    mock_list(
        server,
        "/movie/now_playing",
        page((0..8).map(|i| movie(1500 + i, "Now", 6.8)).collect()),
    )
    .await;

    // Genre discover branches; horror (27) is the simulated failure
    for genre_id in [28, 35, 18, 878, 53, 14, 12, 16] {
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("with_genres", genre_id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                (0..6)
                    .map(|i| movie(genre_id * 100 + i, "Genre", 6.0))
                    .collect(),
            )))
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "27"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(server)
        .await;

    for genre_id in [18, 35, 80] {
        Mock::given(method("GET"))
            .and(path("/discover/tv"))
            .and(query_param("with_genres", genre_id.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                (0..6)
                    .map(|i| show(10_000 + genre_id * 100 + i, "Genre TV", 6.0))
                    .collect(),
            )))
            .mount(server)
            .await;
    }

    // Specialized discover queries
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("sort_by", "vote_average.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            (0..6).map(|i| movie(2000 + i, "Original", 8.8)).collect(),
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("sort_by", "primary_release_date.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            (0..6).map(|i| movie(2100 + i, "Recent", 5.5)).collect(),
        )))
        .mount(server)
        .await;

    // Trailer enrichment round: one answer for every videos endpoint
    Mock::given(method("GET"))
        .and(path_regex(r"^/(movie|tv)/\d+/videos$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"results": [{"site": "YouTube", "type": "Trailer", "key": "shared-trailer"}]}),
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_home_contains_failed_branch_and_keeps_shelf_invariants() {
    let server = MockServer::start().await;
    mount_home_battery(
        &server,
        page((0..5).map(|i| movie(1000 + i, "Trend", 7.0)).collect()),
    )
    .await;

    let (status, body) = get_json(test_app(&server), "/api/content/netflix").await;

    // Degraded shelves never fail the request
    assert_eq!(status, StatusCode::OK);

    let shelves = body.as_object().unwrap();
    assert_eq!(shelves.len(), 19);

    // The failed horror branch serves an empty shelf; siblings are intact
    assert!(shelves["horror"].as_array().unwrap().is_empty());
    for (name, shelf) in shelves {
        if name == "horror" {
            continue;
        }
        assert!(
            !shelf.as_array().unwrap().is_empty(),
            "shelf {name} unexpectedly empty"
        );
    }

    for (name, shelf) in shelves {
        let items = shelf.as_array().unwrap();
        assert!(items.len() <= 30, "shelf {name} exceeds the cap");

        let ids: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len(), "shelf {name} has duplicate ids");

        for item in items {
            assert!(
                item["backdrop_path"].is_string(),
                "shelf {name} kept an item without a backdrop"
            );
            assert_eq!(item["video_key"], "shared-trailer");
        }
    }

    // Overlapping popular pages were deduplicated, first page first
    let popular: Vec<i64> = shelves["popular_movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(&popular[..5], &[1200, 1201, 1202, 1203, 1204]);
}

#[tokio::test]
async fn test_home_filters_items_without_backdrops() {
    let server = MockServer::start().await;

    // Trending movies mixes items with and without artwork
    let mut bare = movie(9001, "No Art", 7.0);
    bare["backdrop_path"] = Value::Null;
    mount_home_battery(&server, page(vec![bare, movie(9002, "With Art", 7.0)])).await;

    let app = test_app(&server);
    let (status, body) = get_json(app, "/api/content/netflix").await;

    assert_eq!(status, StatusCode::OK);
    let trending: Vec<i64> = body["trending"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert!(!trending.contains(&9001));
    assert!(trending.contains(&9002));
}

#[tokio::test]
async fn test_request_id_header_roundtrip() {
    let server = MockServer::start().await;
    let app = test_app(&server);

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "3fa85f64-5717-4562-b3fc-2c963f66afa6")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "3fa85f64-5717-4562-b3fc-2c963f66afa6"
    );
}
