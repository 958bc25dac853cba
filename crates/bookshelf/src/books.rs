use crate::catalog::Catalog;
use crate::prelude::{println, *};
use bookshelf_core::book::Book;
use bookshelf_core::filter::FilterCriteria;
use bookshelf_core::pagination::PageResult;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct ListOptions {
    /// Page number (1-indexed); missing or invalid values mean page 1
    #[arg(short, long, allow_hyphen_values = true)]
    pub page: Option<String>,

    /// Case-insensitive substring of the title
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact category name
    #[arg(short, long)]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct ShowOptions {
    /// Book UPC
    #[clap(env = "BOOKSHELF_UPC")]
    pub upc: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// List output with the echoed filters
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub result: PageResult<Book>,
}

pub async fn list(options: ListOptions, catalog: Catalog) -> Result<()> {
    let output = list_data(Arc::new(catalog), &options).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", format_list_text(&output));
    }

    Ok(())
}

pub async fn show(options: ShowOptions, catalog: Catalog) -> Result<()> {
    let upc = options.upc.clone();
    let book = tokio::task::spawn_blocking(move || catalog.get_by_identifier(&upc)).await??;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        print!("{}", format_book_text(&book));
    }

    Ok(())
}

/// Fetches one page of the catalog for the given options
pub async fn list_data(catalog: Arc<Catalog>, options: &ListOptions) -> Result<ListOutput> {
    let criteria = FilterCriteria::new(options.search.as_deref(), options.category.as_deref());
    let request = catalog.page_request(options.page.as_deref());

    let result = tokio::task::spawn_blocking({
        let criteria = criteria.clone();
        move || catalog.list_page(&criteria, request)
    })
    .await??;

    Ok(ListOutput {
        search: criteria.search,
        category: criteria.category,
        result,
    })
}

/// Shell command that lists `page` with the same filters
fn list_command(search: Option<&str>, category: Option<&str>, page: u64) -> String {
    let mut command = format!("bookshelf list --page {page}");
    if let Some(search) = search {
        command.push_str(&format!(" --search {search:?}"));
    }
    if let Some(category) = category {
        command.push_str(&format!(" --category {category:?}"));
    }
    command
}

fn format_list_text(output: &ListOutput) -> String {
    let result = &output.result;
    let search = output.search.as_deref();
    let category = output.category.as_deref();
    let mut text = String::new();

    text.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    text.push_str(&format!(
        "{}\n",
        format!(
            "BOOKS (Page {} of {}, {} matching)",
            result.page, result.total_pages, result.total_matching
        )
        .bright_cyan()
        .bold()
    ));
    if let Some(search) = search {
        text.push_str(&format!("{}: {}\n", "Search".green(), search));
    }
    if let Some(category) = category {
        text.push_str(&format!("{}: {}\n", "Category".green(), category));
    }
    text.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if result.items.is_empty() {
        text.push_str(&format!("\n{}\n", "No books on this page.".yellow()));
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row!["#", "UPC", "Title", "Category", "Price"]);
        for (idx, book) in result.items.iter().enumerate() {
            let position = result.first_position() + idx as u64;
            let price = book.attribute_text("price").unwrap_or_default();
            table.add_row(prettytable::row![
                position,
                &book.upc,
                &book.title,
                &book.category,
                price
            ]);
        }
        text.push('\n');
        text.push_str(&table.to_string());
    }

    text.push_str(&format!("\n{}:\n", "To navigate".bright_white().bold()));
    if result.has_next() {
        text.push_str(&format!(
            "  {}: {}\n",
            "Next page".green(),
            list_command(search, category, result.page + 1).cyan()
        ));
    }
    if result.has_previous() {
        let previous = result.page.min(result.total_pages + 1) - 1;
        text.push_str(&format!(
            "  {}: {}\n",
            "Previous page".green(),
            list_command(search, category, previous.max(1)).cyan()
        ));
    }
    text.push_str(&format!(
        "  {}: {}\n",
        "Categories".green(),
        result.categories.join(", ")
    ));
    if let Some(first) = result.items.first() {
        text.push_str(&format!(
            "  {}: {}\n",
            "Read a book".green(),
            format!("bookshelf show {}", first.upc).cyan()
        ));
    }

    text.push('\n');
    text
}

fn format_book_text(book: &Book) -> String {
    let mut text = String::new();

    text.push_str(&format!("\n{}\n", book.title.bright_white().bold()));
    text.push_str(&format!("{}\n\n", "=".repeat(80).bright_cyan()));

    let mut table = new_table();
    table.add_row(prettytable::row!["UPC", &book.upc]);
    table.add_row(prettytable::row!["Category", &book.category]);
    for key in book.attributes.keys() {
        if key == "description" {
            continue;
        }
        if let Some(value) = book.attribute_text(key) {
            table.add_row(prettytable::row![key, value]);
        }
    }
    text.push_str(&table.to_string());

    if let Some(description) = book.attribute_text("description") {
        text.push_str(&format!("\n{}\n{}\n", "Description".green().bold(), description));
    }

    text.push('\n');
    text
}
