//! Authors service

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorPayload},
    repository::Repository,
};

/// Author operations exposed to the HTTP layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn get_by_id(&self, id: i64) -> AppResult<Author>;

    async fn create(&self, data: AuthorPayload) -> AppResult<Author>;

    /// Overwrite `name` and `birthdate` of an existing author
    async fn update(&self, id: i64, data: AuthorPayload) -> AppResult<Author>;

    /// Delete an author that no book references
    async fn delete(&self, id: i64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct StoreAuthorService {
    repository: Repository,
}

impl StoreAuthorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AuthorService for StoreAuthorService {
    async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.find_all().await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn create(&self, data: AuthorPayload) -> AppResult<Author> {
        let author = self.repository.authors.save(None, &data).await?;
        tracing::info!("Created author id={}", author.id);
        Ok(author)
    }

    async fn update(&self, id: i64, data: AuthorPayload) -> AppResult<Author> {
        let mut author = self.get_by_id(id).await?;
        author.apply(data);

        // A concurrent delete between the lookup and the save surfaces as NotFound
        let author = self
            .repository
            .authors
            .save(Some(author.id), &AuthorPayload::from(&author))
            .await?;
        tracing::info!("Updated author id={}", author.id);
        Ok(author)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;

        let books = self.repository.books.find_by_author_id(id).await?;
        if !books.is_empty() {
            tracing::warn!("Refusing to delete author id={} with {} book(s)", id, books.len());
            return Err(AppError::Conflict(format!(
                "Cannot delete author {}: {} book(s) still reference it",
                id,
                books.len()
            )));
        }

        self.repository.authors.delete_by_id(id).await?;
        tracing::info!("Deleted author id={}", id);
        Ok(())
    }
}
