//! Books repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{author::Author, book::{Book, BookData}},
};

/// Persistence access for the books collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// All books in ascending id order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_author_id(&self, author_id: i64) -> AppResult<Vec<Book>>;

    /// Insert when `id` is `None`, otherwise overwrite the existing row.
    ///
    /// Yields [`AppError::NotFound`] when the row to update is gone and
    /// [`AppError::Validation`] when `data.author_id` names no author.
    async fn save(&self, id: Option<i64>, data: &BookData) -> AppResult<Book>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}

/// Book joined with its author
#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: Option<String>,
    isbn: Option<String>,
    publication_date: Option<NaiveDate>,
    author_id: i64,
    author_name: Option<String>,
    author_birthdate: Option<NaiveDate>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            isbn: row.isbn,
            publication_date: row.publication_date,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                birthdate: row.author_birthdate,
            },
        }
    }
}

const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.isbn, b.publication_date,
    a.id AS author_id, a.name AS author_name, a.birthdate AS author_birthdate
"#;

fn unknown_author(author_id: i64) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::Validation(format!("Author {} not found", author_id))
        }
        e => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id ORDER BY b.id",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_author_id(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.author_id = $1 ORDER BY b.id",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn save(&self, id: Option<i64>, data: &BookData) -> AppResult<Book> {
        // The data-modifying CTE lets one round-trip return the joined author
        match id {
            None => {
                let query = format!(
                    r#"
                    WITH b AS (
                        INSERT INTO books (title, isbn, publication_date, author_id)
                        VALUES ($1, $2, $3, $4)
                        RETURNING *
                    )
                    SELECT {} FROM b JOIN authors a ON a.id = b.author_id
                    "#,
                    BOOK_COLUMNS
                );
                let row = sqlx::query_as::<_, BookRow>(&query)
                    .bind(&data.title)
                    .bind(&data.isbn)
                    .bind(data.publication_date)
                    .bind(data.author_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(unknown_author(data.author_id))?;
                Ok(row.into())
            }
            Some(id) => {
                let query = format!(
                    r#"
                    WITH b AS (
                        UPDATE books
                        SET title = $1, isbn = $2, publication_date = $3, author_id = $4
                        WHERE id = $5
                        RETURNING *
                    )
                    SELECT {} FROM b JOIN authors a ON a.id = b.author_id
                    "#,
                    BOOK_COLUMNS
                );
                sqlx::query_as::<_, BookRow>(&query)
                    .bind(&data.title)
                    .bind(&data.isbn)
                    .bind(data.publication_date)
                    .bind(data.author_id)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(unknown_author(data.author_id))?
                    .map(Book::from)
                    .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
