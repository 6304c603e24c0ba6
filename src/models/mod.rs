//! Data models for Libretto

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookForm, NewBook};
