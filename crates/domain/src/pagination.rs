//! Cursor pagination over an ordered list.
//!
//! The cursor of an item is its id, so a page can be resumed as long as the
//! item is still present. A cursor that is no longer in the list restarts
//! from the beginning instead of failing.

use launch_catalog::Launch;

use crate::error::{DomainError, Result};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Items that can be addressed by a pagination cursor.
pub trait Cursor {
    fn cursor(&self) -> String;
}

impl Cursor for Launch {
    fn cursor(&self) -> String {
        self.id.to_string()
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<T> {
    /// Cursor of the last item, empty when the page is empty.
    pub cursor: String,
    pub has_more: bool,
    pub items: Vec<T>,
}

impl<T> Connection<T> {
    /// Create empty connection
    pub fn empty() -> Self {
        Self {
            cursor: String::new(),
            has_more: false,
            items: Vec::new(),
        }
    }
}

/// A page of launches.
pub type LaunchConnection = Connection<Launch>;

/// Pagination arguments as received from the client.
#[derive(Debug, Clone, Default)]
pub struct PaginationInput {
    /// Number of items to return; must be at least 1.
    pub page_size: Option<i32>,
    /// Return items after the one with this cursor.
    pub after: Option<String>,
}

impl PaginationInput {
    pub fn new(page_size: Option<i32>, after: Option<String>) -> Self {
        Self { page_size, after }
    }

    /// Validates the arguments and returns the effective page size.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when `page_size` is below 1.
    pub fn page_size(&self) -> Result<usize> {
        match self.page_size {
            None => Ok(DEFAULT_PAGE_SIZE),
            Some(size) if size >= 1 => usize::try_from(size)
                .map_err(|_| DomainError::Validation(format!("pageSize {size} is too large"))),
            Some(size) => Err(DomainError::Validation(format!(
                "pageSize must be >= 1, got {size}"
            ))),
        }
    }
}

/// Returns up to `page_size` items following `after`.
///
/// `items` must be in a stable order across calls for cursor chaining to
/// visit every item exactly once.
pub fn paginate<T: Cursor + Clone>(
    items: &[T],
    after: Option<&str>,
    page_size: usize,
) -> Connection<T> {
    let start = after
        .and_then(|cursor| items.iter().position(|item| item.cursor() == cursor))
        .map_or(0, |position| position + 1);
    let end = start.saturating_add(page_size).min(items.len());

    let page = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
    if page.is_empty() {
        return Connection::empty();
    }

    Connection {
        cursor: page.last().map(Cursor::cursor).unwrap_or_default(),
        has_more: end < items.len(),
        items: page,
    }
}
