//! Filter construction for catalog queries
//!
//! Turns raw, untrusted query-string values into a [`Predicate`] over the
//! book collection. Search text is always matched as a literal substring:
//! it is escaped before any pattern compilation and never reaches a storage
//! engine as live pattern syntax.

use crate::book::{Book, Field};
use regex::{Regex, RegexBuilder};

/// Upper bound on the compiled size of a title pattern
const TITLE_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Request-scoped filter values, normalized
///
/// Both fields are trimmed; values that are empty after trimming are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl FilterCriteria {
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        Self {
            search: normalize(search),
            category: normalize(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// How a title constraint is evaluated in memory
#[derive(Debug, Clone)]
pub enum TitleMatcher {
    /// Escaped, case-insensitive pattern
    Pattern(Regex),
    /// Lowercased needle, used when the pattern could not be compiled
    Folded(String),
}

impl TitleMatcher {
    fn compile(text: &str) -> Self {
        match RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .size_limit(TITLE_PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(re) => TitleMatcher::Pattern(re),
            Err(_) => TitleMatcher::Folded(text.to_lowercase()),
        }
    }

    pub fn is_match(&self, title: &str) -> bool {
        match self {
            TitleMatcher::Pattern(re) => re.is_match(title),
            TitleMatcher::Folded(needle) => title.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Case-insensitive literal substring constraint on the title
#[derive(Debug, Clone)]
pub struct TitleFilter {
    text: String,
    matcher: TitleMatcher,
}

impl TitleFilter {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let matcher = TitleMatcher::compile(&text);
        Self { text, matcher }
    }

    /// The literal search text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matcher(&self) -> &TitleMatcher {
        &self.matcher
    }

    pub fn is_match(&self, title: &str) -> bool {
        self.matcher.is_match(title)
    }
}

impl PartialEq for TitleFilter {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for TitleFilter {}

/// Conjunction of optional constraints over a book
///
/// An empty predicate matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub title: Option<TitleFilter>,
    pub category: Option<String>,
    pub upc: Option<String>,
}

impl Predicate {
    /// Matches every book
    pub fn all() -> Self {
        Self::default()
    }

    /// Exact identifier lookup
    pub fn by_identifier(upc: impl Into<String>) -> Self {
        Self {
            upc: Some(upc.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.upc.is_none()
    }

    /// Equality constraints as `(field, value)` pairs, in a fixed order
    pub fn equalities(&self) -> Vec<(Field, &str)> {
        let mut out = Vec::new();
        if let Some(category) = &self.category {
            out.push((Field::Category, category.as_str()));
        }
        if let Some(upc) = &self.upc {
            out.push((Field::Upc, upc.as_str()));
        }
        out
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(title) = &self.title {
            if !title.is_match(&book.title) {
                return false;
            }
        }
        self.equalities()
            .into_iter()
            .all(|(field, value)| book.field(field) == value)
    }
}

/// Build the predicate for a set of filter criteria
///
/// Search text becomes a case-insensitive literal substring match on the
/// title; the category becomes a case-sensitive equality. Both combine with
/// AND. Absent criteria add no constraint.
pub fn build_predicate(criteria: &FilterCriteria) -> Predicate {
    Predicate {
        title: criteria.search.as_deref().map(TitleFilter::new),
        category: criteria.category.clone(),
        upc: None,
    }
}
