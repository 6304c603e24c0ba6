//! Book catalog pages and form handlers

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::BookForm,
    pagination::Pager,
    web::views,
    AppState,
};

/// Body of the search box on the listing pages
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

/// The catalog listing is the front page; `/` and `/books` both land on it
pub async fn catalog_redirect() -> Redirect {
    Redirect::to("/books/allbooks/page/1")
}

/// GET /books/allbooks/page/:page — paginated catalog, newest first
pub async fn list_books(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> AppResult<Html<String>> {
    let page = parse_page(&page)?;
    let (books, total) = state.services.library.list_page(page).await?;

    let pager = Pager::new("/books/allbooks", page, total);
    Ok(Html(views::catalog_page("Library", &books, &pager)))
}

/// GET /books/search/:query/page/:page — paginated search results
pub async fn search_books(
    State(state): State<AppState>,
    Path((query, page)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let page = parse_page(&page)?;
    let (books, total) = state.services.library.search_page(&query, page).await?;

    // Path parameters arrive decoded; hrefs need the term encoded again
    let base = format!("/books/search/{}", urlencoding::encode(&query));
    let pager = Pager::new(base, page, total);
    Ok(Html(views::catalog_page("Library-Search", &books, &pager)))
}

/// POST /books — search box submission, redirects into the search pages
pub async fn submit_search(Form(form): Form<SearchForm>) -> Redirect {
    let target = format!("/books/search/{}/page/1", urlencoding::encode(&form.search));
    Redirect::to(&target)
}

/// GET /books/new — empty creation form
pub async fn new_book_form() -> Html<String> {
    Html(views::book_form_page(
        "New Book",
        &BookForm::default(),
        None,
        &FieldErrors::default(),
    ))
}

/// POST /books/new — create a book, or re-show the form with the
/// submitted values and what was wrong with them
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.library.create_book(&form).await {
        Ok(book) => {
            tracing::info!(id = book.id, title = %book.title, "book created");
            Ok(Redirect::to(&format!("/books/{}/edit", book.id)).into_response())
        }
        Err(AppError::Validation(errors)) => Ok(Html(views::book_form_page(
            "New Book",
            &form,
            None,
            &errors,
        ))
        .into_response()),
        Err(err) => Err(err),
    }
}

/// GET /books/:id and GET /books/:id/edit — the detail view is the edit
/// form, titled after the book itself
pub async fn edit_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_book_id(&id)?;
    let book = state.services.library.get_book(id).await?;

    let form = BookForm::from(&book);
    Ok(Html(views::book_form_page(
        &book.title,
        &form,
        Some(book.id),
        &FieldErrors::default(),
    )))
}

/// POST /books/:id/edit — apply the form, or re-show it with errors and
/// the identifier preserved so a resubmission still targets the same book
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = parse_book_id(&id)?;
    match state.services.library.update_book(id, &form).await {
        Ok(book) => {
            tracing::info!(id = book.id, "book updated");
            Ok(Redirect::to("/books").into_response())
        }
        Err(AppError::Validation(errors)) => Ok(Html(views::book_form_page(
            "Edit Book",
            &form,
            Some(id),
            &errors,
        ))
        .into_response()),
        Err(err) => Err(err),
    }
}

/// POST /books/:id/delete — remove a book permanently
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_book_id(&id)?;
    state.services.library.delete_book(id).await?;
    tracing::info!(id, "book deleted");
    Ok(Redirect::to("/books"))
}

/// Fallback for every route nothing else matched
pub async fn not_found() -> AppError {
    AppError::NotFound("That page does not exist".to_string())
}

// An identifier that is not a number can never name a book; report it the
// same way as a valid but absent one.
fn parse_book_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::book_not_found())
}

fn parse_page(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::NotFound("That page does not exist".to_string()))
}
