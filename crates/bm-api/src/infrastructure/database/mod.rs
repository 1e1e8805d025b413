pub mod bookmarks;
pub mod memory_repository;
pub mod mongo_repository;

pub use bookmarks::{BookmarkDocument, MongoBookmarkRepository};
pub use memory_repository::MemoryRepository;
pub use mongo_repository::{MongoModel, MongoRepository};
