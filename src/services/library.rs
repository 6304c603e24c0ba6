//! Library catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookForm},
    pagination,
    repository::Repository,
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One catalog page plus the total book count. Pages past the end are
    /// valid and come back empty.
    pub async fn list_page(&self, page: i64) -> AppResult<(Vec<Book>, i64)> {
        let page = checked_page(page)?;
        let books = self
            .repository
            .books
            .list_page(pagination::PAGE_SIZE, pagination::offset(page))
            .await?;
        let total = self.repository.books.count().await?;
        Ok((books, total))
    }

    /// One page of search results plus the count of all matches. A search
    /// that matches nothing is reported as not found, never as an empty
    /// result page.
    pub async fn search_page(&self, term: &str, page: i64) -> AppResult<(Vec<Book>, i64)> {
        let page = checked_page(page)?;
        let total = self.repository.books.count_matching(term).await?;
        if total == 0 {
            return Err(AppError::NotFound(
                "No books have been found from that search".to_string(),
            ));
        }
        let books = self
            .repository
            .books
            .search_page(term, pagination::PAGE_SIZE, pagination::offset(page))
            .await?;
        Ok((books, total))
    }

    /// Get a single book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get(id).await
    }

    /// Validate and store a new book
    pub async fn create_book(&self, form: &BookForm) -> AppResult<Book> {
        form.validate().map_err(|e| AppError::Validation(e.into()))?;
        self.repository.books.create(&form.to_new_book()).await
    }

    /// Validate and apply new values to an existing book
    pub async fn update_book(&self, id: i64, form: &BookForm) -> AppResult<Book> {
        // Not-found wins over validation for a missing ID
        self.repository.books.get(id).await?;
        form.validate().map_err(|e| AppError::Validation(e.into()))?;
        self.repository.books.update(id, &form.to_new_book()).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}

/// Pages are 1-based; zero or negative pages would turn into negative
/// query offsets.
fn checked_page(page: i64) -> AppResult<i64> {
    if page < 1 {
        return Err(AppError::NotFound("That page does not exist".to_string()));
    }
    Ok(page)
}
