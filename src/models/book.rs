//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::author::Author;
use crate::error::AppError;

/// Book with its author resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    pub title: Option<String>,
    /// Catalog identifier, not checked for uniqueness
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author: Author,
}

/// Reference to an author inside a book body; only `id` is read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: Option<i64>,
}

/// Create or update book request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author: Option<AuthorRef>,
}

/// Book fields once the author reference is known to be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i64,
}

impl TryFrom<BookPayload> for BookData {
    type Error = AppError;

    /// Fails with [`AppError::MissingAuthor`] when `author` or its `id` is absent
    fn try_from(payload: BookPayload) -> Result<Self, Self::Error> {
        let author_id = payload
            .author
            .and_then(|author| author.id)
            .ok_or(AppError::MissingAuthor)?;

        Ok(Self {
            title: payload.title,
            isbn: payload.isbn,
            publication_date: payload.publication_date,
            author_id,
        })
    }
}
