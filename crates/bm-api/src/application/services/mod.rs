pub mod bookmark_service;

pub use bookmark_service::{BookmarkListQuery, BookmarkService};
