pub mod bookmark;

pub use bookmark::{Bookmark, BookmarkPatch, NewBookmark};

use crate::shared::AppError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record kept in one document collection.
///
/// The serialized form doubles as the field namespace for repository filters,
/// projections and sorting, so field names used in a `Filter` are the
/// serialized (camelCase) names, with `id` standing for the store's key.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Input accepted by `Repository::create`.
    type Create: Send + Sync + 'static;
    /// Partial update accepted by the `*_and_update` operations.
    type Patch: Send + Sync + 'static;

    fn id(&self) -> &str;

    /// Builds a fresh record around a store-assigned id.
    fn create(id: String, input: Self::Create, now: DateTime<Utc>) -> Result<Self, AppError>;

    /// Applies the fields present in `patch`, leaving the rest untouched.
    fn apply(&mut self, patch: &Self::Patch, now: DateTime<Utc>);
}
