//! HTTP request handlers
//!
//! Catalog calls block on storage, so they run on the blocking pool.

use super::AppState;
use crate::catalog::Catalog;
use crate::prelude::Error;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bookshelf_core::filter::FilterCriteria;
use bookshelf_core::render;
use serde::Serialize;

/// Query parameters of the list view
///
/// Kept as raw strings so malformed values are normalized instead of
/// rejected. When a key repeats, the first occurrence wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "search" => &mut params.search,
                "category" => &mut params.category,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.search.as_deref(), self.category.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::NotFound { upc } => {
                tracing::debug!("Book not found: {}", upc);
                (
                    StatusCode::NOT_FOUND,
                    Html(render::render_not_found("Book not found")),
                )
                    .into_response()
            }
            Error::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Html(render::render_error(
                        "The catalog is temporarily unavailable. Please try again later.",
                    )),
                )
                    .into_response()
            }
            Error::Config(_) | Error::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::render_error("Unexpected error.")),
                )
                    .into_response()
            }
        }
    }
}

async fn with_catalog<T, F>(state: &AppState, f: F) -> Result<T, Error>
where
    F: FnOnce(&Catalog) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let catalog = state.catalog.clone();
    tokio::task::spawn_blocking(move || f(catalog.as_ref()))
        .await
        .map_err(|e| Error::Internal(format!("catalog task failed: {e}")))?
}

/// `GET /`
pub async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, Error> {
    let params = ListParams::from_pairs(pairs);
    let criteria = params.criteria();
    let request = state.catalog.page_request(params.page.as_deref());

    let html = with_catalog(&state, move |catalog| {
        let result = catalog.list_page(&criteria, request)?;
        Ok(render::render_list(&result, &criteria))
    })
    .await?;

    Ok(Html(html))
}

/// `GET /book/{upc}`
pub async fn book_detail(
    State(state): State<AppState>,
    Path(upc): Path<String>,
) -> Result<Html<String>, Error> {
    let book = with_catalog(&state, move |catalog| catalog.get_by_identifier(&upc)).await?;
    Ok(Html(render::render_book(&book)))
}

/// `GET /static/style.css`
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        render::STYLESHEET,
    )
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(render::render_not_found("Page not found")),
    )
}
