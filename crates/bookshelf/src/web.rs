//! HTTP surface of the catalog
//!
//! Axum-based server exposing the list view, the detail view, the stylesheet
//! and a health probe.

pub mod handlers;

use crate::catalog::Catalog;
use crate::prelude::*;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "BOOKSHELF_PORT", default_value = "5000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "BOOKSHELF_HOST", default_value = "127.0.0.1")]
    pub host: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Create the router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_books))
        .route("/book/{upc}", get(handlers::book_detail))
        .route("/static/style.css", get(handlers::stylesheet))
        .route("/health", get(handlers::health))
        .fallback(handlers::fallback)
        .with_state(state)
}

pub async fn run(options: ServeOptions, catalog: Catalog) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);

    let app = router(AppState::new(catalog)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Bookshelf listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::scenario_books;
    use crate::store::JsonStore;

    async fn spawn_server() -> String {
        let catalog = Catalog::with_default_page_size(Arc::new(JsonStore::from_books(
            scenario_books(),
        )));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(AppState::new(catalog)))
                .await
                .unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_end_to_end_over_http() {
        let base = spawn_server().await;

        let response = reqwest::get(format!("{base}/?category=Tech&page=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body = response.text().await.unwrap();
        assert!(body.contains("20 book(s) found"));
        assert!(body.contains("No books on this page."));

        let response = reqwest::get(format!("{base}/book/upc0003")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response.text().await.unwrap().contains("Poetry Volume 3"));

        let response = reqwest::get(format!("{base}/book/nope")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert!(response.text().await.unwrap().contains("Book not found"));

        let response = reqwest::get(format!("{base}/static/style.css")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/css"));

        let response = reqwest::get(format!("{base}/nowhere")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
