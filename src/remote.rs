//! Remote books API
//!
//! The consumed surface is three routes on a single endpoint:
//! `GET /api/books` (full shelf, display order), `POST /api/books`
//! (`{title, author}` body) and `DELETE /api/books?index={n}` (zero-based
//! position in the last-fetched order).

use async_trait::async_trait;
use reqwest::Response;

use crate::error::{ClientError, ClientResult};
use crate::models::Book;

/// The remote collection the view synchronizes against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteLibrary: Send + Sync {
    /// Fetch the full shelf in display order.
    async fn list(&self) -> ClientResult<Vec<Book>>;

    /// Append a book to the shelf. Any success status counts; the response
    /// body is ignored.
    async fn create(&self, book: Book) -> ClientResult<()>;

    /// Remove the book at a zero-based position in the last-fetched order.
    async fn delete(&self, index: usize) -> ClientResult<()>;
}

/// HTTP implementation of [`RemoteLibrary`].
pub struct BooksApi {
    http: reqwest::Client,
    base_url: String,
}

impl BooksApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url.trim_end_matches('/'))
    }

    fn accepted(response: Response) -> ClientResult<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::Rejected {
                status: response.status(),
            })
        }
    }
}

#[async_trait]
impl RemoteLibrary for BooksApi {
    async fn list(&self) -> ClientResult<Vec<Book>> {
        let response = Self::accepted(self.http.get(self.books_url()).send().await?)?;
        Ok(response.json().await?)
    }

    async fn create(&self, book: Book) -> ClientResult<()> {
        Self::accepted(self.http.post(self.books_url()).json(&book).send().await?)?;
        Ok(())
    }

    async fn delete(&self, index: usize) -> ClientResult<()> {
        let url = format!("{}?index={}", self.books_url(), index);
        Self::accepted(self.http.delete(url).send().await?)?;
        Ok(())
    }
}
