//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use authors::{AuthorRepository, PgAuthorRepository};
pub use books::{BookRepository, PgBookRepository};
pub use memory::MemoryStore;

/// Main repository struct holding one handle per collection
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a PostgreSQL-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgAuthorRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool)),
        }
    }

    /// Create a repository over a fresh in-process store
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            authors: Arc::new(store.clone()),
            books: Arc::new(store),
        }
    }

    /// Round-trip to the backing store of every collection
    pub async fn ping(&self) -> AppResult<()> {
        self.authors.ping().await?;
        self.books.ping().await
    }
}
