//! Books service

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookData},
    repository::Repository,
};

/// Book operations exposed to the HTTP layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn get_by_id(&self, id: i64) -> AppResult<Book>;

    /// Books whose author is `author_id`, empty when none match
    async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>>;

    /// Persist a new book after checking that its author exists
    async fn create(&self, data: BookData) -> AppResult<Book>;

    /// Replace every field of an existing book
    async fn update(&self, id: i64, data: BookData) -> AppResult<Book>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct StoreBookService {
    repository: Repository,
}

impl StoreBookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn ensure_author_exists(&self, author_id: i64) -> AppResult<()> {
        match self.repository.authors.find_by_id(author_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation(format!("Author {} not found", author_id))),
        }
    }
}

#[async_trait]
impl BookService for StoreBookService {
    async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.find_all().await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        self.repository.books.find_by_author_id(author_id).await
    }

    async fn create(&self, data: BookData) -> AppResult<Book> {
        self.ensure_author_exists(data.author_id).await?;

        let book = self.repository.books.save(None, &data).await?;
        tracing::info!("Created book id={} author_id={}", book.id, book.author.id);
        Ok(book)
    }

    async fn update(&self, id: i64, data: BookData) -> AppResult<Book> {
        self.get_by_id(id).await?;
        self.ensure_author_exists(data.author_id).await?;

        let book = self.repository.books.save(Some(id), &data).await?;
        tracing::info!("Updated book id={}", book.id);
        Ok(book)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;
        self.repository.books.delete_by_id(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
