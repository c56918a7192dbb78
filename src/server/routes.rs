use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::auth::extractor::AuthenticatedUser;
use crate::books::record::BookRecord;
use crate::server::error::{ApiError, ApiResult};
use crate::server::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn books_router() -> Router<AppState> {
    Router::new()
        .route("/api/books/search", get(search_books))
        .route("/api/books/isbn/{isbn}", get(lookup_isbn))
}

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(|| async { "ok" }))
}

async fn search_books(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<SearchParams>,
) -> Json<Vec<BookRecord>> {
    info!(user_id = %user.user_id, query = %params.q, "book search");
    Json(state.books.search_by_text(&params.q).await)
}

async fn lookup_isbn(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(isbn): Path<String>,
) -> ApiResult<Json<BookRecord>> {
    info!(user_id = %user.user_id, isbn = %isbn, "isbn lookup");
    state
        .books
        .lookup_by_isbn(&isbn)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no book with isbn {}", isbn.trim())))
}
