//! Libretto Library Catalog
//!
//! A small library-catalog web application: server-rendered pages for
//! listing, searching, creating, editing and deleting book records.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
pub mod web;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
