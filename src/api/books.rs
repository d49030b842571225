//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookData, BookPayload},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// List the books of one author
#[utoipa::path(
    get,
    path = "/api/books/author/{author_id}",
    tag = "books",
    params(("author_id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by this author, possibly empty", body = Vec<Book>)
    )
)]
pub async fn list_books_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<i64>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_by_author(author_id).await?;
    Ok(Json(books))
}

/// Create a book.
///
/// Answers 200 rather than 201 for compatibility with existing clients.
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book created", body = Book),
        (status = 400, description = "Missing author reference (plain text body) or unknown author", body = String, content_type = "text/plain")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Json<Book>> {
    let data = BookData::try_from(payload)?;
    let book = state.services.books.create(data).await?;
    Ok(Json(book))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Missing author reference (plain text body) or unknown author", body = String, content_type = "text/plain"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Json<Book>> {
    let data = BookData::try_from(payload)?;
    let book = state.services.books.update(id, data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use mockall::predicate::eq;
    use serde_json::json;

    use crate::{
        api::testing::{app, body_json, send},
        error::AppError,
        models::{author::Author, book::Book},
        services::{authors::MockAuthorService, books::MockBookService},
    };

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: Some(title.to_string()),
            isbn: Some(format!("ISBN00{}", id)),
            publication_date: None,
            author: Author {
                id: 1,
                name: Some("John".into()),
                birthdate: None,
            },
        }
    }

    #[tokio::test]
    async fn list_books() {
        let mut books = MockBookService::new();
        books
            .expect_list()
            .returning(|| Ok(vec![book(1, "Book One"), book(2, "Book Two")]));

        let (status, body) = send(app(MockAuthorService::new(), books), "GET", "/api/books", None).await;
        assert_eq!(status, StatusCode::OK);
        let body = body_json(&body);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["title"], "Book One");
        assert_eq!(body[1]["id"], 2);
        assert_eq!(body[1]["title"], "Book Two");
    }

    #[tokio::test]
    async fn get_book() {
        let mut books = MockBookService::new();
        books
            .expect_get_by_id()
            .with(eq(1))
            .returning(|id| Ok(book(id, "Book One")));

        let (status, body) = send(app(MockAuthorService::new(), books), "GET", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(&body)["title"], "Book One");
        assert_eq!(body_json(&body)["author"]["name"], "John");
    }

    #[tokio::test]
    async fn list_books_by_author() {
        let mut books = MockBookService::new();
        books
            .expect_list_by_author()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(vec![book(1, "Book One"), book(2, "Book Two")]));

        let (status, body) = send(app(MockAuthorService::new(), books), "GET", "/api/books/author/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(&body)[1]["title"], "Book Two");
    }

    #[tokio::test]
    async fn create_book_is_200() {
        let mut books = MockBookService::new();
        books
            .expect_create()
            .withf(|data| data.author_id == 1 && data.title.as_deref() == Some("New Book"))
            .times(1)
            .returning(|_| Ok(book(1, "New Book")));

        let (status, body) = send(
            app(MockAuthorService::new(), books),
            "POST",
            "/api/books",
            Some(json!({"title": "New Book", "isbn": "ISBN003", "author": {"id": 1}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(&body)["id"], 1);
        assert_eq!(body_json(&body)["title"], "New Book");
    }

    #[tokio::test]
    async fn create_book_without_author_is_400() {
        let mut books = MockBookService::new();
        books.expect_create().never();

        let (status, body) = send(
            app(MockAuthorService::new(), books),
            "POST",
            "/api/books",
            Some(json!({"id": 1, "title": "New Book", "isbn": "ISBN003", "publicationDate": "2020-01-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], b"Author must be provided.");
    }

    #[tokio::test]
    async fn create_book_with_unknown_author_is_400() {
        let mut books = MockBookService::new();
        books
            .expect_create()
            .returning(|data| Err(AppError::Validation(format!("Author {} not found", data.author_id))));

        let (status, body) = send(
            app(MockAuthorService::new(), books),
            "POST",
            "/api/books",
            Some(json!({"title": "New Book", "author": {"id": 77}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&body)["message"], "Author 77 not found");
    }

    #[tokio::test]
    async fn update_book() {
        let mut books = MockBookService::new();
        books
            .expect_update()
            .withf(|id, data| *id == 1 && data.title.as_deref() == Some("Updated Title"))
            .times(1)
            .returning(|id, _| Ok(book(id, "Updated Title")));

        let (status, body) = send(
            app(MockAuthorService::new(), books),
            "PUT",
            "/api/books/1",
            Some(json!({"id": 1, "title": "Updated Title", "isbn": "ISBN001", "author": {"id": 1}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(&body)["title"], "Updated Title");
    }

    #[tokio::test]
    async fn update_missing_book_is_404() {
        let mut books = MockBookService::new();
        books
            .expect_update()
            .returning(|id, _| Err(AppError::NotFound(format!("Book {} not found", id))));

        let (status, body) = send(
            app(MockAuthorService::new(), books),
            "PUT",
            "/api/books/9",
            Some(json!({"title": "Updated Title", "author": {"id": 1}})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn delete_book_is_204() {
        let mut books = MockBookService::new();
        books
            .expect_delete()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        let (status, _) = send(app(MockAuthorService::new(), books), "DELETE", "/api/books/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
