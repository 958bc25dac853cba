//! Catalog query service
//!
//! Composes filter construction and pagination with a storage collaborator.
//! Every operation is a stateless read; storage failures propagate as-is.

use crate::prelude::Error;
use crate::store::BookStore;
use bookshelf_core::book::{Book, Field};
use bookshelf_core::filter::{build_predicate, FilterCriteria, Predicate};
use bookshelf_core::pagination::{PageRequest, PageResult};
use std::sync::Arc;

pub struct Catalog {
    store: Arc<dyn BookStore>,
    page_size: u64,
}

impl Catalog {
    pub fn new(store: Arc<dyn BookStore>, page_size: u64) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    #[cfg(test)]
    pub fn with_default_page_size(store: Arc<dyn BookStore>) -> Self {
        Self::new(store, bookshelf_core::pagination::DEFAULT_PAGE_SIZE)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Page request for a raw `page` value, using the configured page size
    pub fn page_request(&self, raw_page: Option<&str>) -> PageRequest {
        PageRequest::from_query(raw_page, self.page_size)
    }

    /// One page of books matching `criteria`
    ///
    /// `categories` always lists every category in the collection, whatever
    /// the filter.
    pub fn list_page(
        &self,
        criteria: &FilterCriteria,
        request: PageRequest,
    ) -> Result<PageResult<Book>, Error> {
        let predicate = build_predicate(criteria);

        let total_matching = self.store.count(&predicate)?;
        let items = self.store.find(&predicate, request.window())?;

        let mut categories = self.store.distinct(Field::Category)?;
        categories.sort();
        categories.dedup();

        tracing::debug!(
            "list_page search={:?} category={:?} page={} -> {} of {} matching",
            criteria.search,
            criteria.category,
            request.page(),
            items.len(),
            total_matching
        );

        Ok(PageResult::new(items, request, total_matching, categories))
    }

    /// Exact lookup by identifier
    pub fn get_by_identifier(&self, upc: &str) -> Result<Book, Error> {
        let book = self.store.find_one(&Predicate::by_identifier(upc))?;

        tracing::debug!("get_by_identifier upc={} found={}", upc, book.is_some());

        book.ok_or_else(|| Error::NotFound {
            upc: upc.to_string(),
        })
    }
}
