#![allow(dead_code)]

use utoipa::OpenApi;

use crate::presentation::dto::{
    BookmarkPageResponse, BookmarkResponse, CreateBookmarkRequest, DeleteBookmarkResponse,
    UpdateBookmarkRequest,
};
use crate::{ErrorResponse, HealthStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz_doc,
        metrics_doc,
        openapi_doc,
        bookmark_create_doc,
        bookmark_list_doc,
        bookmark_get_doc,
        bookmark_update_doc,
        bookmark_delete_doc
    ),
    components(schemas(
        HealthStatus,
        ErrorResponse,
        CreateBookmarkRequest,
        UpdateBookmarkRequest,
        BookmarkResponse,
        BookmarkPageResponse,
        DeleteBookmarkResponse
    )),
    tags(
        (name = "bookmark", description = "Bookmark CRUD"),
        (name = "health", description = "Service health")
    )
)]
pub struct BookmarkApiDoc;

pub fn document() -> utoipa::openapi::OpenApi {
    BookmarkApiDoc::openapi()
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, body = HealthStatus), (status = 503, body = HealthStatus))
)]
fn healthz_doc() {}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses((status = 200, content_type = "text/plain", body = String))
)]
fn metrics_doc() {}

#[utoipa::path(
    get,
    path = "/v1/openapi.json",
    responses((status = 200, body = serde_json::Value))
)]
fn openapi_doc() {}

#[utoipa::path(
    post,
    path = "/bookmark",
    tag = "bookmark",
    request_body = CreateBookmarkRequest,
    responses(
        (status = 201, body = BookmarkResponse),
        (status = 400, body = ErrorResponse)
    )
)]
fn bookmark_create_doc() {}

#[utoipa::path(
    get,
    path = "/bookmark",
    tag = "bookmark",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number, default 1"),
        ("limit" = Option<u32>, Query, description = "Page size, default 10; 0 returns every match"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on title or description")
    ),
    responses(
        (status = 200, body = BookmarkPageResponse),
        (status = 400, body = ErrorResponse)
    )
)]
fn bookmark_list_doc() {}

#[utoipa::path(
    get,
    path = "/bookmark/{id}",
    tag = "bookmark",
    params(("id" = String, Path, description = "Bookmark id")),
    responses(
        (status = 200, body = BookmarkResponse),
        (status = 404, body = ErrorResponse)
    )
)]
fn bookmark_get_doc() {}

#[utoipa::path(
    patch,
    path = "/bookmark/{id}",
    tag = "bookmark",
    params(("id" = String, Path, description = "Bookmark id")),
    request_body = UpdateBookmarkRequest,
    responses(
        (status = 200, body = BookmarkResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    )
)]
fn bookmark_update_doc() {}

#[utoipa::path(
    delete,
    path = "/bookmark/{id}",
    tag = "bookmark",
    params(("id" = String, Path, description = "Bookmark id")),
    responses(
        (status = 200, body = DeleteBookmarkResponse),
        (status = 404, body = ErrorResponse)
    )
)]
fn bookmark_delete_doc() {}
