//! Data models for the library catalog

pub mod author;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorPayload};
pub use book::{AuthorRef, Book, BookData, BookPayload};
