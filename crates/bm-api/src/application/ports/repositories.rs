use crate::domain::entities::{Bookmark, Entity};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Typed query over an entity's serialized fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    /// Matches the record with this id; a malformed id matches nothing.
    Id(String),
    /// Case-insensitive literal substring match. On array fields any element may match.
    Contains { field: String, needle: String },
    Or(Vec<Filter>),
}

impl Filter {
    pub fn by_id(id: &str) -> Self {
        Filter::Id(id.to_string())
    }

    pub fn contains(field: &str, needle: &str) -> Self {
        Filter::Contains {
            field: field.to_string(),
            needle: needle.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// Fields to keep in a lean read. `id` is always returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub fields: Vec<String>,
}

impl Projection {
    pub fn include(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindOptions {
    pub sort: Option<Sort>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    /// Return the document as it is after the update instead of before.
    pub return_new: bool,
}

impl UpdateOptions {
    pub fn return_new() -> Self {
        Self { return_new: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginateOptions {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<Sort>,
}

impl PaginateOptions {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page().saturating_sub(1)) * u64::from(self.limit())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Generic data access over one document collection. Every read hands back
/// owned values; an update or delete that matches nothing yields `None`.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn create(&self, input: T::Create) -> Result<T, AppError>;

    async fn find_one(&self, filter: &Filter, options: &FindOptions) -> Result<Option<T>, AppError>;

    async fn find_by_id(&self, id: &str, options: &FindOptions) -> Result<Option<T>, AppError> {
        self.find_one(&Filter::by_id(id), options).await
    }

    async fn find_all(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>, AppError>;

    /// Lean read returning only the projected fields as plain JSON objects.
    async fn find_projected(
        &self,
        filter: &Filter,
        projection: &Projection,
        options: &FindOptions,
    ) -> Result<Vec<Value>, AppError>;

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &T::Patch,
        options: &UpdateOptions,
    ) -> Result<Option<T>, AppError>;

    async fn find_by_id_and_update(
        &self,
        id: &str,
        patch: &T::Patch,
        options: &UpdateOptions,
    ) -> Result<Option<T>, AppError> {
        self.find_one_and_update(&Filter::by_id(id), patch, options)
            .await
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<T>, AppError>;

    async fn find_by_id_and_delete(&self, id: &str) -> Result<Option<T>, AppError> {
        self.find_one_and_delete(&Filter::by_id(id)).await
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AppError>;

    /// Returns the number of removed documents.
    async fn delete_many(&self, filter: &Filter) -> Result<u64, AppError>;

    /// Runs the page query and the total count concurrently. `limit == 0`
    /// disables paging and returns the whole result set.
    async fn find_and_paginate(
        &self,
        filter: &Filter,
        options: &PaginateOptions,
    ) -> Result<Page<T>, AppError> {
        let page = options.page();
        let limit = options.limit();
        // A zero limit lists every match.
        let bounded = limit > 0;
        let find_options = FindOptions {
            sort: options.sort.clone(),
            skip: bounded.then(|| options.skip()),
            limit: bounded.then(|| u64::from(limit)),
        };

        let (data, total) = tokio::try_join!(
            self.find_all(filter, &find_options),
            self.count(filter)
        )?;

        Ok(Page {
            data,
            total,
            page,
            limit,
        })
    }

    /// Readiness probe for the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}

pub trait BookmarkRepository: Repository<Bookmark> {}

impl<R: Repository<Bookmark> + ?Sized> BookmarkRepository for R {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_options_use_defaults() {
        let options = PaginateOptions::default();
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(), 10);
        assert_eq!(options.skip(), 0);
    }

    #[test]
    fn paginate_options_compute_skip() {
        let options = PaginateOptions {
            page: Some(3),
            limit: Some(25),
            sort: None,
        };
        assert_eq!(options.skip(), 50);
    }

    #[test]
    fn page_zero_does_not_underflow() {
        let options = PaginateOptions {
            page: Some(0),
            limit: Some(5),
            sort: None,
        };
        assert_eq!(options.skip(), 0);
    }
}
