pub mod bookmark_dto;

pub use bookmark_dto::{
    BookmarkPageResponse, BookmarkQuery, BookmarkResponse, CreateBookmarkRequest,
    DeleteBookmarkResponse, UpdateBookmarkRequest,
};
