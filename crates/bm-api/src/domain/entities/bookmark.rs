use super::Entity;
use crate::domain::value_objects::BookmarkId;
use crate::shared::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved link with its title, optional description and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    id: BookmarkId,
    title: String,
    url: String,
    description: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields supplied when a bookmark is created. Omitted optional fields fall
/// back to an empty description and no tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BookmarkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Bookmark {
    pub const FIELD_TITLE: &'static str = "title";
    pub const FIELD_DESCRIPTION: &'static str = "description";

    /// Restores a bookmark from stored parts.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: BookmarkId,
        title: String,
        url: String,
        description: String,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            url,
            description,
            tags,
            created_at,
            updated_at,
        }
    }

    pub fn bookmark_id(&self) -> &BookmarkId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Bookmark {
    type Create = NewBookmark;
    type Patch = BookmarkPatch;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn create(id: String, input: NewBookmark, now: DateTime<Utc>) -> Result<Self, AppError> {
        let id = BookmarkId::new(id).map_err(AppError::Serialization)?;
        Ok(Self::from_parts(
            id,
            input.title,
            input.url,
            input.description.unwrap_or_default(),
            input.tags.unwrap_or_default(),
            now,
            now,
        ))
    }

    fn apply(&mut self, patch: &BookmarkPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        self.updated_at = now;
    }
}
