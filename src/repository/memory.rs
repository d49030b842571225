//! In-process store implementing both repositories.
//!
//! Selected with a `memory://` database URL. Rows live in ordered maps keyed
//! by id, ids are handed out sequentially from 1, and the foreign key from
//! books to authors is enforced exactly as the PostgreSQL schema does it.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorRepository, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorPayload},
        book::{Book, BookData},
    },
};

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, BookData>,
    last_author_id: i64,
    last_book_id: i64,
}

impl Tables {
    fn resolve(&self, id: i64, data: &BookData) -> AppResult<Book> {
        let author = self.authors.get(&data.author_id).cloned().ok_or_else(|| {
            AppError::Internal(format!("Book {} references missing author {}", id, data.author_id))
        })?;
        Ok(Book {
            id,
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            publication_date: data.publication_date,
            author,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    async fn save(&self, id: Option<i64>, data: &AuthorPayload) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let id = match id {
            Some(id) if tables.authors.contains_key(&id) => id,
            Some(id) => return Err(AppError::NotFound(format!("Author {} not found", id))),
            None => {
                tables.last_author_id += 1;
                tables.last_author_id
            }
        };

        let author = Author {
            id,
            name: data.name.clone(),
            birthdate: data.birthdate,
        };
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&id) {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        if tables.books.values().any(|book| book.author_id == id) {
            return Err(AppError::Conflict(format!("Author {} still has books", id)));
        }
        tables.authors.remove(&id);
        Ok(())
    }

    /// Always succeeds: the store lives in this process, so `/ready` never reports 503 for it
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        tables
            .books
            .get(&id)
            .map(|data| tables.resolve(id, data))
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        tables
            .books
            .iter()
            .map(|(id, data)| tables.resolve(*id, data))
            .collect()
    }

    async fn find_by_author_id(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        tables
            .books
            .iter()
            .filter(|(_, data)| data.author_id == author_id)
            .map(|(id, data)| tables.resolve(*id, data))
            .collect()
    }

    async fn save(&self, id: Option<i64>, data: &BookData) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.authors.contains_key(&data.author_id) {
            return Err(AppError::Validation(format!("Author {} not found", data.author_id)));
        }
        let id = match id {
            Some(id) if tables.books.contains_key(&id) => id,
            Some(id) => return Err(AppError::NotFound(format!("Book {} not found", id))),
            None => {
                tables.last_book_id += 1;
                tables.last_book_id
            }
        };

        tables.books.insert(id, data.clone());
        tables.resolve(id, data)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Always succeeds: the store lives in this process, so `/ready` never reports 503 for it
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
