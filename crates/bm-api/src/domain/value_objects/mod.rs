pub mod bookmark_id;

pub use bookmark_id::BookmarkId;
