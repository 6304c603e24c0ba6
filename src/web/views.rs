//! Server-rendered HTML for the catalog pages.
//!
//! The markup is deliberately plain: a handful of helpers build each page
//! as a string, and every user-provided value passes through [`escape`].

use crate::{
    error::FieldErrors,
    models::{Book, BookForm},
    pagination::Pager,
};

/// Replace the characters that would change the structure of the page.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         </head>\n\
         <body>\n{}</body>\n\
         </html>\n",
        escape(title),
        body
    )
}

fn book_row(book: &Book) -> String {
    format!(
        "<tr><td><a href=\"/books/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        book.id,
        escape(&book.title),
        escape(&book.author),
        escape(book.genre.as_deref().unwrap_or("")),
        book.year.map(|y| y.to_string()).unwrap_or_default(),
    )
}

fn page_links(pager: &Pager) -> String {
    let mut out = String::from("<div class=\"pagination\">\n");
    for page in pager.page_numbers() {
        if pager.is_current(page) {
            out.push_str(&format!("<span class=\"current\">{page}</span>\n"));
        } else {
            out.push_str(&format!("<a href=\"{}\">{page}</a>\n", pager.href(page)));
        }
    }
    out.push_str("</div>\n");
    out
}

/// The listing page, shared by the full catalog and search results.
pub fn catalog_page(title: &str, books: &[Book], pager: &Pager) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(title));

    body.push_str(
        "<form method=\"post\" action=\"/books\">\n\
         <input type=\"text\" name=\"search\" placeholder=\"Search\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n",
    );
    body.push_str("<p><a href=\"/books/new\">Create New Book</a></p>\n");

    body.push_str(
        "<table>\n<thead>\n\
         <tr><th>Title</th><th>Author</th><th>Genre</th><th>Year</th></tr>\n\
         </thead>\n<tbody>\n",
    );
    for book in books {
        body.push_str(&book_row(book));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str(&page_links(pager));

    layout(title, &body)
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        "<p><label for=\"{name}\">{label}</label> \
         <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"></p>\n",
        escape(value),
    )
}

/// The creation and edit form. When `book_id` is set the form posts to the
/// book's edit route and a delete form is shown alongside it; otherwise it
/// posts to the creation route.
pub fn book_form_page(
    title: &str,
    form: &BookForm,
    book_id: Option<i64>,
    errors: &FieldErrors,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(title));

    if !errors.is_empty() {
        body.push_str("<div class=\"errors\">\n<ul>\n");
        for error in errors.iter() {
            body.push_str(&format!("<li>{}</li>\n", escape(&error.message)));
        }
        body.push_str("</ul>\n</div>\n");
    }

    let action = match book_id {
        Some(id) => format!("/books/{id}/edit"),
        None => "/books/new".to_string(),
    };
    let submit_label = if book_id.is_some() {
        "Update Book"
    } else {
        "Create New Book"
    };

    body.push_str(&format!("<form method=\"post\" action=\"{action}\">\n"));
    body.push_str(&text_input("Title", "title", &form.title));
    body.push_str(&text_input("Author", "author", &form.author));
    body.push_str(&text_input("Genre", "genre", &form.genre));
    body.push_str(&text_input("Year", "year", &form.year));
    body.push_str(&format!(
        "<button type=\"submit\">{submit_label}</button>\n</form>\n"
    ));

    if let Some(id) = book_id {
        body.push_str(&format!(
            "<form method=\"post\" action=\"/books/{id}/delete\">\n\
             <button type=\"submit\">Delete Book</button>\n\
             </form>\n"
        ));
    }
    body.push_str("<p><a href=\"/books\">Cancel</a></p>\n");

    layout(title, &body)
}

/// The shared error page. The title is always "ERROR"; the message tells
/// the visitor what actually went wrong.
pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>Page Not Found</h1>\n<p>{}</p>\n<p><a href=\"/books\">Back to the catalog</a></p>\n",
        escape(message),
    );
    layout("ERROR", &body)
}
