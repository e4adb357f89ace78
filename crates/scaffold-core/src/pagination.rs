//! Paging and sorting types for list reads.

use crate::Filter;
use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// The first page.
    pub const DEFAULT_PAGE: u32 = 1;
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a new page request. Page `0` is treated as the first page.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(Self::DEFAULT_PAGE),
            page_size: page_size.min(Self::MAX_SIZE),
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_SIZE)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    #[serde(alias = "ASC")]
    Asc,
    /// Descending order.
    #[default]
    #[serde(alias = "DESC")]
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Everything a paginated list read needs.
///
/// `sort_field` falls back to the entity's creation-timestamp column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: PageRequest,
    pub order: SortOrder,
    pub sort_field: Option<String>,
    pub filter: Option<Filter>,
}

impl ListQuery {
    /// Page 1, ten rows, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page window.
    #[must_use]
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = PageRequest::new(page, page_size);
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the sort column.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset_is_one_indexed() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(5, 15).offset(), 60);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let req = PageRequest::new(0, 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_request_max_size() {
        let req = PageRequest::new(1, 1000);
        assert_eq!(req.page_size, PageRequest::MAX_SIZE);
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::new();
        assert_eq!(query.page, PageRequest::new(1, 10));
        assert_eq!(query.order, SortOrder::Desc);
        assert!(query.sort_field.is_none());
        assert!(query.filter.is_none());
    }

    #[test]
    fn test_sort_order_serde() {
        let asc: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        let desc: SortOrder = serde_json::from_str("\"DESC\"").unwrap();
        assert_eq!(asc, SortOrder::Asc);
        assert_eq!(desc.as_sql(), "DESC");
    }
}
