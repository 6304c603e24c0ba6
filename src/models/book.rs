//! Book model and form types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw form submission for creating or updating a book.
///
/// Every field is kept as the submitted string so a failed validation can
/// re-render the form with the visitor's input intact. Conversion to typed
/// values happens in [`BookForm::to_new_book`] after validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "Please provide a value for \"title\""))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = not_blank, message = "Please provide a name for \"author\""))]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
}

/// Validated values ready to be stored.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i64>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

impl BookForm {
    /// Convert the raw form into typed values. Blank optional fields become
    /// `None`; a year that does not parse as an integer is treated as unset.
    pub fn to_new_book(&self) -> NewBook {
        let genre = if self.genre.trim().is_empty() {
            None
        } else {
            Some(self.genre.clone())
        };
        let year = self.year.trim().parse::<i64>().ok();

        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            genre,
            year,
        }
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}
