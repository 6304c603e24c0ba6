//! End-to-end tests for the catalog pages, driven through the router
//! in-process against an in-memory database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use libretto::{
    repository::{self, Repository},
    services::Services,
    web, AppConfig, AppState,
};

async fn test_app() -> Router {
    let pool = repository::connect_in_memory()
        .await
        .expect("in-memory pool");
    let services = Services::new(Repository::new(pool));
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    web::router(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// GET a page; returns status, Location header (if any) and body.
async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().expect("location header").to_string());
    (status, location, body_string(response).await)
}

/// POST a urlencoded form; returns status, Location header and body.
async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().expect("location header").to_string());
    (status, location, body_string(response).await)
}

/// Create a book through the form and return its ID, taken from the
/// redirect to the edit page.
async fn create_book(app: &Router, form: &str) -> i64 {
    let (status, location, _) = post_form(app, "/books/new", form).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let location = location.expect("redirect location");
    location
        .strip_prefix("/books/")
        .and_then(|rest| rest.strip_suffix("/edit"))
        .expect("edit redirect")
        .parse()
        .expect("book id")
}

#[tokio::test]
async fn front_page_and_books_redirect_to_the_first_catalog_page() {
    let app = test_app().await;

    let (status, location, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books/allbooks/page/1"));

    let (status, location, _) = get(&app, "/books").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books/allbooks/page/1"));
}

#[tokio::test]
async fn created_book_appears_in_the_listing() {
    let app = test_app().await;

    let id = create_book(
        &app,
        "title=The+Martian&author=Andy+Weir&genre=Science+Fiction&year=2014",
    )
    .await;

    let (status, _, body) = get(&app, "/books/allbooks/page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Library</h1>"));
    assert!(body.contains(&format!("<a href=\"/books/{id}\">The Martian</a>")));
    assert!(body.contains("Andy Weir"));
}

#[tokio::test]
async fn invalid_creation_re_renders_the_form_with_input_and_errors() {
    let app = test_app().await;

    let (status, _, body) =
        post_form(&app, "/books/new", "title=&author=+++&genre=Fantasy&year=").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please provide a value for &quot;title&quot;"));
    assert!(body.contains("Please provide a name for &quot;author&quot;"));
    // The visitor's input survives the round trip
    assert!(body.contains("value=\"Fantasy\""));
    assert!(body.contains("action=\"/books/new\""));
}

#[tokio::test]
async fn detail_and_edit_render_the_same_prefilled_form() {
    let app = test_app().await;
    let id = create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=1815").await;

    for uri in [format!("/books/{id}"), format!("/books/{id}/edit")] {
        let (status, _, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Emma</title>"));
        assert!(body.contains("value=\"Jane Austen\""));
        assert!(body.contains("value=\"1815\""));
        assert!(body.contains(&format!("action=\"/books/{id}/edit\"")));
        assert!(body.contains(&format!("action=\"/books/{id}/delete\"")));
    }
}

#[tokio::test]
async fn successful_update_redirects_to_the_listing_and_persists() {
    let app = test_app().await;
    let id = create_book(&app, "title=Emm&author=Jane+Austen&genre=&year=").await;

    let (status, location, _) = post_form(
        &app,
        &format!("/books/{id}/edit"),
        "title=Emma&author=Jane+Austen&genre=Classic&year=1815",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));

    let (_, _, body) = get(&app, &format!("/books/{id}")).await;
    assert!(body.contains("value=\"Emma\""));
    assert!(body.contains("value=\"Classic\""));
}

#[tokio::test]
async fn invalid_update_re_renders_with_the_identifier_preserved() {
    let app = test_app().await;
    let id = create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, _, body) = post_form(
        &app,
        &format!("/books/{id}/edit"),
        "title=&author=Jane+Austen&genre=&year=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Edit Book</h1>"));
    assert!(body.contains("Please provide a value for &quot;title&quot;"));
    assert!(body.contains(&format!("action=\"/books/{id}/edit\"")));
}

#[tokio::test]
async fn deleted_book_is_gone_from_the_catalog() {
    let app = test_app().await;
    let id = create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, location, _) = post_form(&app, &format!("/books/{id}/delete"), "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/books"));

    let (status, _, body) = get(&app, &format!("/books/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("I do not have that book"));
}

#[tokio::test]
async fn search_finds_matching_books_only() {
    let app = test_app().await;
    create_book(&app, "title=Moby+Dick&author=Herman+Melville&genre=&year=1851").await;
    create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=1815").await;

    let (status, _, body) = get(&app, "/books/search/moby/page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Library-Search</h1>"));
    assert!(body.contains("Moby Dick"));
    assert!(!body.contains("Emma"));
}

#[tokio::test]
async fn search_with_no_matches_is_a_not_found_page() {
    let app = test_app().await;
    create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, _, body) = get(&app, "/books/search/whale/page/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No books have been found from that search"));
    assert!(body.contains("<title>ERROR</title>"));
}

#[tokio::test]
async fn search_box_redirects_to_the_encoded_search_page() {
    let app = test_app().await;

    let (status, location, _) = post_form(&app, "/books", "search=moby+dick").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location.as_deref(),
        Some("/books/search/moby%20dick/page/1")
    );
}

#[tokio::test]
async fn encoded_search_terms_are_decoded_before_matching() {
    let app = test_app().await;
    create_book(&app, "title=Moby+Dick&author=Herman+Melville&genre=&year=").await;

    let (status, _, body) = get(&app, "/books/search/moby%20dick/page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Moby Dick"));
}

#[tokio::test]
async fn seven_books_spread_over_two_pages_newest_first() {
    let app = test_app().await;
    for i in 1..=7 {
        create_book(&app, &format!("title=Book+{i}&author=Author&genre=&year=")).await;
    }

    let (status, _, body) = get(&app, "/books/allbooks/page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 5);
    assert!(body.contains("Book 7"));
    assert!(body.contains("Book 3"));
    assert!(!body.contains("Book 2"));
    assert!(body.contains("<span class=\"current\">1</span>"));
    assert!(body.contains("<a href=\"/books/allbooks/page/2\">2</a>"));

    let (status, _, body) = get(&app, "/books/allbooks/page/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 2);
    assert!(body.contains("Book 2"));
    assert!(body.contains("Book 1"));
    assert!(!body.contains("Book 3"));
}

#[tokio::test]
async fn search_results_paginate_like_the_catalog() {
    let app = test_app().await;
    for i in 1..=6 {
        create_book(&app, &format!("title=Whale+{i}&author=Ishmael&genre=&year=")).await;
    }
    create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, _, body) = get(&app, "/books/search/whale/page/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 1);
    assert!(body.contains("Whale 1"));
    assert!(body.contains("<a href=\"/books/search/whale/page/1\">1</a>"));
    assert!(body.contains("<span class=\"current\">2</span>"));
}

#[tokio::test]
async fn page_past_the_end_renders_an_empty_table() {
    let app = test_app().await;
    create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, _, body) = get(&app, "/books/allbooks/page/9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 0);
}

#[tokio::test]
async fn page_at_the_integer_limit_renders_an_empty_table() {
    let app = test_app().await;
    create_book(&app, "title=Emma&author=Jane+Austen&genre=&year=").await;

    let (status, _, body) = get(&app, "/books/allbooks/page/9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 0);
}

#[tokio::test]
async fn bad_page_numbers_are_not_found() {
    let app = test_app().await;

    for uri in ["/books/allbooks/page/0", "/books/allbooks/page/nope"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("That page does not exist"));
    }
}

#[tokio::test]
async fn non_numeric_and_unknown_book_ids_are_not_found() {
    let app = test_app().await;

    for uri in ["/books/42", "/books/not-a-number"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("I do not have that book"));
    }
}

#[tokio::test]
async fn unknown_routes_fall_back_to_the_error_page() {
    let app = test_app().await;

    let (status, _, body) = get(&app, "/totally/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("That page does not exist"));
    assert!(body.contains("<title>ERROR</title>"));
}

#[tokio::test]
async fn wrong_method_on_a_known_path_renders_the_not_found_page() {
    let app = test_app().await;

    // /books/:id only answers GET
    let (status, _, body) = post_form(&app, "/books/42", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("That page does not exist"));

    // /books/:id/delete only answers POST
    let (status, _, body) = get(&app, "/books/42/delete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("That page does not exist"));
}

#[tokio::test]
async fn database_failures_render_the_error_page_with_status_500() {
    let pool = repository::connect_in_memory()
        .await
        .expect("in-memory pool");
    let services = Services::new(Repository::new(pool.clone()));
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    let app = web::router(state);
    pool.close().await;

    let (status, _, body) = get(&app, "/books/allbooks/page/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("<title>ERROR</title>"));
    assert!(body.contains("Something went wrong on our side"));
}

#[tokio::test]
async fn health_reports_status_and_version() {
    let app = test_app().await;

    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let value: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(value["status"], "healthy");
    assert!(value["version"].is_string());
}
