//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Author record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    /// Store-assigned identifier
    pub id: i64,
    pub name: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// Create or update author request.
///
/// A client-supplied `id` is accepted in the body but never read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorPayload {
    pub name: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

impl Author {
    /// Overwrite the mutable fields, leaving `id` untouched
    pub fn apply(&mut self, payload: AuthorPayload) {
        self.name = payload.name;
        self.birthdate = payload.birthdate;
    }
}

impl From<&Author> for AuthorPayload {
    fn from(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            birthdate: author.birthdate,
        }
    }
}
