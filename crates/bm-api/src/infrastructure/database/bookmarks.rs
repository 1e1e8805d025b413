use super::mongo_repository::{MongoModel, MongoRepository};
use crate::domain::entities::{Bookmark, BookmarkPatch, NewBookmark};
use crate::domain::value_objects::BookmarkId;
use crate::shared::AppError;
use chrono::{DateTime, TimeZone, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

pub type MongoBookmarkRepository = MongoRepository<Bookmark>;

/// Stored layout of the `bookmarks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

fn to_utc(value: BsonDateTime) -> Result<DateTime<Utc>, AppError> {
    Utc.timestamp_millis_opt(value.timestamp_millis())
        .single()
        .ok_or_else(|| AppError::Serialization("Invalid timestamp".to_string()))
}

impl MongoModel for Bookmark {
    const COLLECTION: &'static str = "bookmarks";

    type Document = BookmarkDocument;

    fn new_document(id: ObjectId, input: NewBookmark, now: BsonDateTime) -> BookmarkDocument {
        BookmarkDocument {
            id,
            title: input.title,
            url: input.url,
            description: input.description.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn from_document(document: BookmarkDocument) -> Result<Bookmark, AppError> {
        let id = BookmarkId::new(document.id.to_hex())
            .map_err(|err| AppError::Serialization(format!("Invalid BookmarkId: {err}")))?;

        Ok(Bookmark::from_parts(
            id,
            document.title,
            document.url,
            document.description,
            document.tags,
            to_utc(document.created_at)?,
            to_utc(document.updated_at)?,
        ))
    }

    fn update_document(patch: &BookmarkPatch, now: BsonDateTime) -> Result<Document, AppError> {
        let mut set = bson::to_document(patch)?;
        set.insert("updatedAt", now);
        Ok(doc! { "$set": set })
    }
}
