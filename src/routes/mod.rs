use std::sync::Arc;

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::services::ContentService;

pub mod content;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Content routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/content/netflix", get(content::netflix))
        .route("/content/trending", get(content::trending))
        .route("/content/popular", get(content::popular))
        .route("/content/search", get(content::search))
        .route("/content/genres", get(content::genres))
        .route("/content/genre/:genre_id", get(content::by_genre))
        .route("/content/movie/:movie_id", get(content::movie_details))
        .route("/content/tv/:tv_id", get(content::show_details))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
