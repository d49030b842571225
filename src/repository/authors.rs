//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorPayload},
};

/// Persistence access for the authors collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>>;

    /// All authors in ascending id order
    async fn find_all(&self) -> AppResult<Vec<Author>>;

    /// Insert when `id` is `None`, otherwise overwrite the existing row.
    ///
    /// Updating a row that no longer exists yields [`AppError::NotFound`].
    async fn save(&self, id: Option<i64>, data: &AuthorPayload) -> AppResult<Author>;

    /// Remove a row; [`AppError::NotFound`] when nothing was deleted and
    /// [`AppError::Conflict`] while books still reference the author.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, name, birthdate FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name, birthdate FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn save(&self, id: Option<i64>, data: &AuthorPayload) -> AppResult<Author> {
        match id {
            None => {
                let row = sqlx::query_as::<_, Author>(
                    r#"
                    INSERT INTO authors (name, birthdate)
                    VALUES ($1, $2)
                    RETURNING id, name, birthdate
                    "#,
                )
                .bind(&data.name)
                .bind(data.birthdate)
                .fetch_one(&self.pool)
                .await?;
                Ok(row)
            }
            Some(id) => sqlx::query_as::<_, Author>(
                r#"
                UPDATE authors SET name = $1, birthdate = $2
                WHERE id = $3
                RETURNING id, name, birthdate
                "#,
            )
            .bind(&data.name)
            .bind(data.birthdate)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id))),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(format!("Author {} still has books", id))
                }
                e => AppError::Database(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
