//! HTTP surface: routing and the server-rendered pages

pub mod books;
pub mod health;
pub mod views;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(books::catalog_redirect))
        .route("/health", get(health::health_check))
        // Catalog
        .route("/books", get(books::catalog_redirect).post(books::submit_search))
        .route("/books/allbooks/page/:page", get(books::list_books))
        .route("/books/search/:query/page/:page", get(books::search_books))
        // Book records
        .route("/books/new", get(books::new_book_form).post(books::create_book))
        .route("/books/:id", get(books::edit_book_form))
        .route("/books/:id/edit", get(books::edit_book_form).post(books::update_book))
        .route("/books/:id/delete", post(books::delete_book))
        .fallback(books::not_found)
        .layer(middleware::map_response(method_fallback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A known path with an unhandled method gets a bare 405 from the method
/// router; the site answers it like any other unknown route.
async fn method_fallback(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return books::not_found().await.into_response();
    }
    response
}
