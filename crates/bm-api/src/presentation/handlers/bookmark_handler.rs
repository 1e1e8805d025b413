use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::presentation::dto::{
    BookmarkPageResponse, BookmarkQuery, BookmarkResponse, CreateBookmarkRequest,
    DeleteBookmarkResponse, UpdateBookmarkRequest,
};
use crate::presentation::extract::{ValidatedJson, ValidatedQuery};
use crate::{ApiResult, AppState};

pub async fn create_bookmark(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBookmarkRequest>,
) -> ApiResult<(StatusCode, Json<BookmarkResponse>)> {
    let bookmark = state.bookmarks.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(bookmark.into())))
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookmarkQuery>,
) -> ApiResult<Json<BookmarkPageResponse>> {
    let page = state.bookmarks.find_all(query.into()).await?;
    Ok(Json(page.into()))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookmarkResponse>> {
    let bookmark = state.bookmarks.find_one(&id).await?;
    Ok(Json(bookmark.into()))
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBookmarkRequest>,
) -> ApiResult<Json<BookmarkResponse>> {
    let bookmark = state.bookmarks.update(&id, payload.into()).await?;
    Ok(Json(bookmark.into()))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteBookmarkResponse>> {
    state.bookmarks.remove(&id).await?;
    Ok(Json(DeleteBookmarkResponse::removed(&id)))
}
