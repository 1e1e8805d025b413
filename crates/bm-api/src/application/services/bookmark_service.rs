use crate::application::ports::repositories::{
    BookmarkRepository, Filter, FindOptions, Page, PaginateOptions, UpdateOptions,
};
use crate::domain::entities::{Bookmark, BookmarkPatch, NewBookmark};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

pub struct BookmarkService {
    repository: Arc<dyn BookmarkRepository>,
}

impl BookmarkService {
    pub fn new(repository: Arc<dyn BookmarkRepository>) -> Self {
        Self { repository }
    }

    /// Title or description contains `search`, ignoring case. Empty search matches everything.
    pub fn search_filter(search: Option<&str>) -> Filter {
        match search {
            Some(term) if !term.is_empty() => Filter::Or(vec![
                Filter::contains(Bookmark::FIELD_TITLE, term),
                Filter::contains(Bookmark::FIELD_DESCRIPTION, term),
            ]),
            _ => Filter::All,
        }
    }

    pub async fn create(&self, input: NewBookmark) -> Result<Bookmark, AppError> {
        let bookmark = self.repository.create(input).await?;
        info!(bookmark_id = %bookmark.bookmark_id(), "bookmark created");
        Ok(bookmark)
    }

    pub async fn find_all(&self, query: BookmarkListQuery) -> Result<Page<Bookmark>, AppError> {
        let filter = Self::search_filter(query.search.as_deref());
        let options = PaginateOptions {
            page: query.page,
            limit: query.limit,
            sort: None,
        };
        debug!(?filter, page = options.page(), limit = options.limit(), "listing bookmarks");
        self.repository.find_and_paginate(&filter, &options).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Bookmark, AppError> {
        self.repository
            .find_by_id(id, &FindOptions::default())
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: &str, patch: BookmarkPatch) -> Result<Bookmark, AppError> {
        let bookmark = self
            .repository
            .find_by_id_and_update(id, &patch, &UpdateOptions::return_new())
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(bookmark_id = %id, "bookmark updated");
        Ok(bookmark)
    }

    pub async fn remove(&self, id: &str) -> Result<Bookmark, AppError> {
        let bookmark = self
            .repository
            .find_by_id_and_delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(bookmark_id = %id, "bookmark removed");
        Ok(bookmark)
    }
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Bookmark with id {id} not found"))
}
