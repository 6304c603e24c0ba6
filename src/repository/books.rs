//! Books repository

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook},
};

/// Substring match across title, author, genre and the year rendered as
/// text. SQLite's LOWER folds ASCII only, so the bound pattern is folded
/// the same way: ASCII matches case-insensitively, anything else by its
/// exact spelling.
const MATCH_CLAUSE: &str = "LOWER(title) LIKE ?
       OR LOWER(author) LIKE ?
       OR LOWER(genre) LIKE ?
       OR CAST(year AS TEXT) LIKE ?";

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.to_ascii_lowercase())
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: SqlitePool,
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of books in the catalog
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of the catalog, newest first
    pub async fn list_page(&self, limit: i64, offset: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Count books where any searchable field contains the term
    pub async fn count_matching(&self, term: &str) -> AppResult<i64> {
        let pattern = like_pattern(term);
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM books WHERE {MATCH_CLAUSE}"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// One page of books matching the term, newest first
    pub async fn search_page(&self, term: &str, limit: i64, offset: i64) -> AppResult<Vec<Book>> {
        let pattern = like_pattern(term);
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT * FROM books WHERE {MATCH_CLAUSE}
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::book_not_found)
    }

    /// Insert a new book and return the stored row
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO books (title, author, genre, year, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.year)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    /// Apply new field values to an existing book
    pub async fn update(&self, id: i64, book: &NewBook) -> AppResult<Book> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, author = ?, genre = ?, year = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.year)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::book_not_found());
        }
        self.get(id).await
    }

    /// Remove a book permanently
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::book_not_found());
        }
        Ok(())
    }
}
