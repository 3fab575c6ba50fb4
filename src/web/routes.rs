// src/web/routes.rs

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::cache::CacheDevises;
use super::handlers;

pub fn router(cache: Arc<CacheDevises>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/script.js", get(handlers::script))
        .route("/api/currency", get(handlers::currency))
        .route("/api/calc", post(handlers::calc))
        .layer(Extension(cache))
}
