//! Core library for bookshelf
//!
//! This crate implements the **Functional Core** of the bookshelf catalog,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The bookshelf project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`bookshelf_core`** (this crate): Pure query-construction, pagination and rendering
//!   functions with zero I/O
//! - **`bookshelf`**: Storage access, the catalog service, the HTTP server and the CLI
//!   (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`book`]: The `Book` document model and its queryable fields
//! - [`filter`]: Translation of untrusted query values into a literal-matching predicate
//! - [`pagination`]: Page normalization and window math
//! - [`render`]: HTML views for the list, detail and error pages
//!
//! # Example Usage
//!
//! ```rust
//! use bookshelf_core::book::Book;
//! use bookshelf_core::filter::{build_predicate, FilterCriteria};
//! use bookshelf_core::pagination::PageRequest;
//!
//! let books = vec![
//!     Book::new("u1", "The Sword of Shannara", "Fantasy"),
//!     Book::new("u2", "Dune", "Fiction"),
//! ];
//!
//! let predicate = build_predicate(&FilterCriteria::new(Some("SWORD"), None));
//! let matching: Vec<&Book> = books.iter().filter(|b| predicate.matches(b)).collect();
//! assert_eq!(matching.len(), 1);
//!
//! let window = PageRequest::from_query(Some("-3"), 20).window();
//! assert_eq!(window.offset, 0);
//! ```

pub mod book;
pub mod filter;
pub mod pagination;
pub mod render;
