//! Canonical search request parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SortError;
use crate::taxonomy::SortOption;

/// Name of the textual query parameter.
pub const QUERY_PARAM_QUERY: &str = "q";
/// Name of the filter parameter.
pub const QUERY_PARAM_FILTER: &str = "f";
/// Name of the sort parameter.
pub const QUERY_PARAM_SORT: &str = "s";
/// Name of the page size parameter.
pub const QUERY_PARAM_SIZE: &str = "size";
/// Name of the page number parameter.
pub const QUERY_PARAM_PAGE: &str = "page";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Provider query parameters, ordered by name.
pub type QueryParams = BTreeMap<String, String>;

/// Merges `extra` into `params` without overriding keys already present.
pub fn merge_missing(params: &mut QueryParams, extra: QueryParams) {
    for (key, value) in extra {
        params.entry(key).or_insert(value);
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns true for [`SortDirection::Descending`].
    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }
}

/// A parsed `s` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// The option to sort by.
    pub option: SortOption,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortDirective {
    /// Creates a directive.
    pub fn new(option: SortOption, direction: SortDirection) -> Self {
        Self { option, direction }
    }

    /// Parses a sort parameter value (e.g., "-duration" for descending).
    pub fn parse(s: &str) -> Result<Self, SortError> {
        let (name, direction) = match s.strip_prefix('-') {
            Some(stripped) => (stripped, SortDirection::Descending),
            None => (s, SortDirection::Ascending),
        };
        let option = SortOption::parse(name).ok_or_else(|| SortError::Unsupported {
            criterion: s.to_string(),
        })?;
        Ok(Self { option, direction })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction.is_descending() {
            write!(f, "-{}", self.option)
        } else {
            write!(f, "{}", self.option)
        }
    }
}

/// Parameters shared by every kind of search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonSearchParams {
    /// Results per page.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Requested page (1-based).
    #[serde(default)]
    pub page: Option<u32>,
    /// Canonical fields to return for every result.
    #[serde(default)]
    pub fields: Vec<String>,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CommonSearchParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            page: None,
            fields: Vec::new(),
        }
    }
}

impl CommonSearchParams {
    /// Sets the page size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the requested fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Parses a comma-separated `fields` value.
    pub fn parse_fields(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect()
    }
}

/// A canonical text search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSearchRequest {
    /// Textual query (`q`).
    pub query: String,
    /// Filter expression in canonical syntax (`f`).
    #[serde(default)]
    pub filter: Option<String>,
    /// Sort criterion in wire form (`s`), e.g. `-duration`.
    #[serde(default)]
    pub sort: Option<String>,
    /// Size, page and fields.
    #[serde(default)]
    pub common: CommonSearchParams,
}

impl TextSearchRequest {
    /// Creates a request for a textual query with default common params.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the sort criterion.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets the common parameters.
    pub fn with_common(mut self, common: CommonSearchParams) -> Self {
        self.common = common;
        self
    }
}
