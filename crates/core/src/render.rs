//! HTML rendering for the catalog views
//!
//! Pure functions from view data to markup. Every value that originates in
//! the store or the request is escaped before it reaches the page.

use crate::book::Book;
use crate::filter::FilterCriteria;
use crate::pagination::PageResult;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

/// Attributes shown in the detail view, in display order, with their labels
const DETAIL_ATTRIBUTES: &[(&str, &str)] = &[
    ("price", "Price"),
    ("price_excl_tax", "Price (excl. tax)"),
    ("price_incl_tax", "Price (incl. tax)"),
    ("tax", "Tax"),
    ("availability", "Availability"),
    ("rating", "Rating"),
    ("number_of_reviews", "Reviews"),
    ("product_type", "Product type"),
];

/// Stylesheet served at `/static/style.css`
pub const STYLESHEET: &str = r#"body {
  font-family: system-ui, sans-serif;
  margin: 0 auto;
  max-width: 72rem;
  padding: 1rem 2rem;
  color: #1f2933;
}
a { color: #0b6bcb; text-decoration: none; }
a:hover { text-decoration: underline; }
header h1 { margin-bottom: 0.25rem; }
form.filters { display: flex; gap: 0.5rem; margin: 1rem 0; }
form.filters input[type=search] { flex: 1; padding: 0.4rem; }
ul.books { list-style: none; padding: 0; display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 1rem; }
ul.books li { border: 1px solid #d9e2ec; border-radius: 4px; padding: 0.75rem; }
ul.books img { max-width: 100%; display: block; margin-bottom: 0.5rem; }
.category { color: #627d98; font-size: 0.85rem; }
.price { font-weight: bold; }
nav.pagination { display: flex; gap: 1rem; align-items: center; margin: 1.5rem 0; }
table.details th { text-align: left; padding-right: 1rem; }
.empty, .error { color: #9b1c1c; }
"#;

/// Link to a list page that preserves the active filters
pub fn page_href(criteria: &FilterCriteria, page: u64) -> String {
    let mut href = format!("/?page={page}");
    if let Some(search) = &criteria.search {
        href.push_str(&format!("&search={}", urlencoding::encode(search)));
    }
    if let Some(category) = &criteria.category {
        href.push_str(&format!("&category={}", urlencoding::encode(category)));
    }
    href
}

/// Link to a book's detail page
pub fn book_href(book: &Book) -> String {
    format!("/book/{}", urlencoding::encode(&book.upc))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"/static/style.css\">\n</head>\n\
         <body>\n<header><h1><a href=\"/\">Bookshelf</a></h1></header>\n<main>\n{}</main>\n</body>\n</html>\n",
        text(title),
        body
    )
}

fn render_filters(result: &PageResult<Book>, criteria: &FilterCriteria) -> String {
    let search = criteria.search.as_deref().unwrap_or("");
    let selected = criteria.category.as_deref();

    let mut options = String::from("<option value=\"\">All categories</option>\n");
    for category in &result.categories {
        let marker = if Some(category.as_str()) == selected {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            attr(category),
            marker,
            text(category)
        ));
    }

    format!(
        "<form class=\"filters\" method=\"get\" action=\"/\">\n\
         <input type=\"search\" name=\"search\" placeholder=\"Search by title\" value=\"{}\">\n\
         <select name=\"category\">\n{}</select>\n\
         <button type=\"submit\">Filter</button>\n</form>\n",
        attr(search),
        options
    )
}

fn render_card(book: &Book) -> String {
    let mut card = String::from("<li>\n");
    if let Some(image) = book.attribute_text("image_url") {
        card.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            attr(&image),
            attr(&book.title)
        ));
    }
    card.push_str(&format!(
        "<a href=\"{}\">{}</a>\n<div class=\"category\">{}</div>\n",
        attr(&book_href(book)),
        text(&book.title),
        text(&book.category)
    ));
    if let Some(price) = book.attribute_text("price") {
        card.push_str(&format!("<div class=\"price\">{}</div>\n", text(&price)));
    }
    card.push_str("</li>\n");
    card
}

fn render_pagination(result: &PageResult<Book>, criteria: &FilterCriteria) -> String {
    if result.total_pages == 0 {
        return String::new();
    }

    let mut nav = String::from("<nav class=\"pagination\">\n");
    if result.has_previous() {
        let previous = result.page.min(result.total_pages + 1) - 1;
        nav.push_str(&format!(
            "<a rel=\"prev\" href=\"{}\">&laquo; Previous</a>\n",
            attr(&page_href(criteria, previous))
        ));
    }
    nav.push_str(&format!(
        "<span>Page {} of {}</span>\n",
        result.page, result.total_pages
    ));
    if result.has_next() {
        nav.push_str(&format!(
            "<a rel=\"next\" href=\"{}\">Next &raquo;</a>\n",
            attr(&page_href(criteria, result.page + 1))
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

/// Render the paginated list view
pub fn render_list(result: &PageResult<Book>, criteria: &FilterCriteria) -> String {
    let mut body = render_filters(result, criteria);

    body.push_str(&format!(
        "<p class=\"summary\">{} book(s) found</p>\n",
        result.total_matching
    ));

    if result.items.is_empty() {
        body.push_str("<p class=\"empty\">No books on this page.</p>\n");
    } else {
        body.push_str("<ul class=\"books\">\n");
        for book in &result.items {
            body.push_str(&render_card(book));
        }
        body.push_str("</ul>\n");
    }

    body.push_str(&render_pagination(result, criteria));
    layout("Bookshelf", &body)
}

/// Render the detail view for one book
pub fn render_book(book: &Book) -> String {
    let mut body = format!("<article>\n<h2>{}</h2>\n", text(&book.title));

    if let Some(image) = book.attribute_text("image_url") {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            attr(&image),
            attr(&book.title)
        ));
    }

    body.push_str("<table class=\"details\">\n");
    body.push_str(&format!("<tr><th>UPC</th><td>{}</td></tr>\n", text(&book.upc)));
    body.push_str(&format!(
        "<tr><th>Category</th><td><a href=\"{}\">{}</a></td></tr>\n",
        attr(&page_href(
            &FilterCriteria::new(None, Some(book.category.as_str())),
            1
        )),
        text(&book.category)
    ));
    for (key, label) in DETAIL_ATTRIBUTES {
        if let Some(value) = book.attribute_text(key) {
            body.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                label,
                text(&value)
            ));
        }
    }
    body.push_str("</table>\n");

    if let Some(description) = book.attribute_text("description") {
        body.push_str(&format!(
            "<section class=\"description\">\n<h3>Description</h3>\n<p>{}</p>\n</section>\n",
            text(&description)
        ));
    }

    body.push_str("<p><a href=\"/\">&laquo; Back to catalog</a></p>\n</article>\n");
    layout(&book.title, &body)
}

/// Render the page shown when a lookup finds nothing
pub fn render_not_found(message: &str) -> String {
    let body = format!(
        "<h2>Not Found</h2>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">&laquo; Back to catalog</a></p>\n",
        text(message)
    );
    layout("Not Found", &body)
}

/// Render the page shown when the catalog cannot serve a request
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h2>Something went wrong</h2>\n<p class=\"error\">{}</p>\n",
        text(message)
    );
    layout("Error", &body)
}
