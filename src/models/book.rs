//! Book model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single bookshelf entry.
///
/// Identity is positional: a book is addressed by its index in the
/// last-fetched sequence, never by a stable key. The presence checks mirror
/// the form-side rule (non-empty, no trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}
