pub mod bookmark_handler;
