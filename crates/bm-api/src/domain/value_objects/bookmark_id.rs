use serde::{Deserialize, Serialize};
use std::fmt;

const OBJECT_ID_HEX_LEN: usize = 24;

/// Identifier of a stored bookmark: the document store's 12-byte id in lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookmarkId(String);

impl BookmarkId {
    pub fn new(value: String) -> Result<Self, String> {
        if value.is_empty() {
            return Err("BookmarkId cannot be empty".to_string());
        }
        if value.len() != OBJECT_ID_HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid BookmarkId format: {value}"));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BookmarkId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookmarkId> for String {
    fn from(value: BookmarkId) -> Self {
        value.0
    }
}
