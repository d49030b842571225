//! Business logic services

pub mod authors;
pub mod books;

use std::sync::Arc;

use crate::{error::AppResult, repository::Repository};

pub use authors::{AuthorService, StoreAuthorService};
pub use books::{BookService, StoreBookService};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: Arc<dyn AuthorService>,
    pub books: Arc<dyn BookService>,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: Arc::new(StoreAuthorService::new(repository.clone())),
            books: Arc::new(StoreBookService::new(repository.clone())),
            repository,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
