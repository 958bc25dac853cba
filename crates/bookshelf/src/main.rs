use crate::prelude::{println, *};
use clap::Parser;

mod books;
mod catalog;
mod config;
mod error;
mod logger;
mod prelude;
mod store;
mod web;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse a scraped book collection: paginated listing, title search, category filter and per-book detail pages"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    #[clap(flatten)]
    store: config::StoreOptions,

    /// Whether to display additional information.
    #[clap(long, env = "BOOKSHELF_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the catalog over HTTP
    Serve(crate::web::ServeOptions),

    /// Print one page of the catalog
    List(crate::books::ListOptions),

    /// Print a single book by UPC
    Show(crate::books::ShowOptions),

    /// Print the SQLite schema the ingestion process must create
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = App::parse();
    logger::init(app.global.verbose);

    if app.global.verbose {
        tracing::debug!("Global options: {:?}", app.global);
    }

    match app.command {
        SubCommands::Schema => {
            let sql = store::sqlite::schema_sql(&app.global.store.collection)?;
            println!("{sql}");
            Ok(())
        }
        SubCommands::Serve(options) => {
            let catalog = app.global.store.open_catalog()?;
            crate::web::run(options, catalog).await
        }
        SubCommands::List(options) => {
            let catalog = app.global.store.open_catalog()?;
            crate::books::list(options, catalog).await
        }
        SubCommands::Show(options) => {
            let catalog = app.global.store.open_catalog()?;
            crate::books::show(options, catalog).await
        }
    }
}
