//! Query parameters for list endpoints.

use scaffold_core::{Filter, ListQuery, PageRequest, ScaffoldResult, SortOrder};
use serde::Deserialize;

/// `?page=&page_size=&order=&sort_field=&filter=`
///
/// `filter` is URL-encoded JSON, normalized with [`Filter::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

impl ListParams {
    /// Parses the `filter` parameter, if any.
    pub fn parsed_filter(&self) -> ScaffoldResult<Option<Filter>> {
        self.filter.as_deref().map(Filter::parse).transpose()
    }

    /// Builds a paginated query.
    pub fn into_list_query(self) -> ScaffoldResult<ListQuery> {
        let filter = self.parsed_filter()?;
        Ok(ListQuery {
            page: PageRequest::new(
                self.page.unwrap_or(PageRequest::DEFAULT_PAGE),
                self.page_size.unwrap_or(PageRequest::DEFAULT_SIZE),
            ),
            order: self.order.unwrap_or_default(),
            sort_field: self.sort_field,
            filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = ListParams::default().into_list_query().unwrap();
        assert_eq!(query, ListQuery::new());
    }

    #[test]
    fn test_filter_is_parsed() {
        let params = ListParams {
            page: Some(2),
            filter: Some(r#"{"status":[1,2]}"#.to_string()),
            ..ListParams::default()
        };
        let query = params.into_list_query().unwrap();
        assert_eq!(query.page.offset(), 10);
        assert_eq!(query.filter, Some(Filter::one_of("status", [1, 2])));
    }

    #[test]
    fn test_malformed_filter_is_rejected() {
        let params = ListParams {
            filter: Some("{status".to_string()),
            ..ListParams::default()
        };
        assert!(params.into_list_query().is_err());
    }
}
