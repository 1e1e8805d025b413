use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use bm_core::http::{self, HttpLimits};
use bm_core::{config, db, logging, metrics, server};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod openapi;
pub mod presentation;
pub mod shared;

#[cfg(test)]
mod integration_tests;

use application::ports::repositories::BookmarkRepository;
use application::services::BookmarkService;
use domain::entities::Bookmark;
use infrastructure::database::{MemoryRepository, MongoBookmarkRepository};
use presentation::handlers::bookmark_handler;
use shared::AppError;

pub const SERVICE_NAME: &str = "bm-api";

#[derive(Clone)]
pub struct AppState {
    pub(crate) bookmarks: Arc<BookmarkService>,
    repository: Arc<dyn BookmarkRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        Self {
            bookmarks: Arc::new(BookmarkService::new(Arc::clone(&repository))),
            repository,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    code: &'static str,
    message: String,
    details: Option<Value>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let code = err.code();
        match err {
            AppError::NotFound(message) => ApiError::new(StatusCode::NOT_FOUND, code, message),
            AppError::Validation { message, details } => {
                ApiError::new(StatusCode::BAD_REQUEST, code, message).with_details(details)
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let payload = ErrorResponse {
            code: self.code,
            message: self.message,
            details: self.details,
        };
        (self.status, Json(payload)).into_response()
    }
}

pub(crate) type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Mongo {
        uri: String,
        database: Option<String>,
    },
    Memory,
}

pub struct BookmarkApiConfig {
    pub addr: SocketAddr,
    pub store: StoreConfig,
    pub limits: HttpLimits,
}

/// Reads the service configuration from the environment. `MONGODB_URI` is
/// only required when the MongoDB store is selected.
pub fn load_config(in_memory: bool) -> Result<BookmarkApiConfig> {
    let addr = config::socket_addr_from_env("BOOKMARK_API_ADDR", "0.0.0.0:3000")?;
    let defaults = HttpLimits::default();
    let limits = HttpLimits {
        request_timeout: Duration::from_secs(config::parsed_env(
            "BOOKMARK_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?),
        max_body_bytes: config::parsed_env("BOOKMARK_MAX_BODY_BYTES", defaults.max_body_bytes)?,
    };
    let store = if in_memory {
        StoreConfig::Memory
    } else {
        StoreConfig::Mongo {
            uri: config::required_env("MONGODB_URI")?,
            database: config::optional_env("MONGODB_DATABASE"),
        }
    };
    Ok(BookmarkApiConfig {
        addr,
        store,
        limits,
    })
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_endpoint))
        .route("/v1/openapi.json", get(openapi_json))
        .route(
            "/bookmark",
            get(bookmark_handler::list_bookmarks).post(bookmark_handler::create_bookmark),
        )
        .route(
            "/bookmark/:id",
            get(bookmark_handler::get_bookmark)
                .patch(bookmark_handler::update_bookmark)
                .delete(bookmark_handler::delete_bookmark),
        )
        .with_state(state);

    http::apply_service_layers(router, SERVICE_NAME, limits)
}

pub async fn run(config: BookmarkApiConfig) -> Result<()> {
    logging::init(SERVICE_NAME);
    metrics::init(SERVICE_NAME);

    let repository: Arc<dyn BookmarkRepository> = match &config.store {
        StoreConfig::Mongo { uri, database } => {
            let database = db::connect(uri, SERVICE_NAME, database.as_deref()).await?;
            Arc::new(MongoBookmarkRepository::new(&database))
        }
        StoreConfig::Memory => {
            tracing::warn!("using in-memory bookmark store; data is lost on shutdown");
            Arc::new(MemoryRepository::<Bookmark>::new())
        }
    };

    let router = build_router(AppState::new(repository), config.limits);
    server::serve(config.addr, router, server::shutdown_signal()).await
}

async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.ping().await {
        Ok(_) => (StatusCode::OK, Json(HealthStatus { status: "ok".into() })),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable".into(),
                }),
            )
        }
    }
}

async fn metrics_endpoint() -> impl IntoResponse {
    metrics::metrics_response(SERVICE_NAME)
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi::document())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_status_from_app_error() {
        let not_found = ApiError::from(AppError::not_found("Bookmark with id x not found"));
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.code, "NOT_FOUND");
        assert_eq!(not_found.message, "Bookmark with id x not found");

        let invalid = ApiError::from(AppError::Validation {
            message: "bad".into(),
            details: Some(serde_json::json!({ "title": [] })),
        });
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert!(invalid.details.is_some());

        let db = ApiError::from(AppError::Database("down".into()));
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.code, "DB_ERROR");
    }

    #[test]
    fn in_memory_config_skips_mongodb_uri() {
        let config = load_config(true).expect("config");
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.limits, HttpLimits::default());
    }
}
