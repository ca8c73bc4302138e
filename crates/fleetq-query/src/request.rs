//! List endpoint requests: `q`, paging and sorting.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    entity::Entity,
    error::{QueryError, Result},
    fiql::append_filter,
};

/// Prefix of the management API.
pub const REST_PREFIX: [&str; 2] = ["rest", "v1"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Parses `field`, `field:asc` or `field:desc` (case-insensitive direction).
impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.trim().split_once(':') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (s.trim(), None),
        };

        if field.is_empty() {
            return Err(QueryError::InvalidSort(s.to_string()));
        }

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return Err(QueryError::InvalidSort(s.to_string())),
        };

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Joins sort clauses into the `sort` parameter value.
pub fn build_sort(sorts: &[Sort]) -> String {
    sorts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A `GET /rest/v1/<entity>` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub entity: Entity,
    pub query: String,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Vec<Sort>,
}

impl ListRequest {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            query: String::new(),
            offset: None,
            limit: None,
            sort: Vec::new(),
        }
    }

    /// Replaces the query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// AND-appends a filter to the current query.
    pub fn filter(mut self, filter: &str) -> Self {
        self.query = append_filter(&self.query, filter);
        self
    }

    /// AND-appends a free-text search over the entity's search fields.
    pub fn search(self, term: &str) -> Self {
        let search = self.entity.search(term);
        self.filter(&search)
    }

    /// Selects a 1-based page. Page 0 is treated as the first page.
    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        self.offset = Some((page - 1).saturating_mul(per_page));
        self.limit = Some(per_page);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort.push(sort);
        self
    }

    /// Query parameters in the order they are sent.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.query.trim().is_empty() {
            params.push(("q", self.query.clone()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if !self.sort.is_empty() {
            params.push(("sort", build_sort(&self.sort)));
        }
        params
    }

    /// Resolves the request against the server's base URL.
    ///
    /// Any path on the base URL is kept as a prefix, so servers mounted
    /// under a sub-path work.
    pub fn url(&self, base: &str) -> Result<Url> {
        let mut url = Url::parse(base)?;

        url.path_segments_mut()
            .map_err(|_| QueryError::CannotBeABase(base.to_string()))?
            .pop_if_empty()
            .extend(REST_PREFIX)
            .push(self.entity.path());

        let params = self.params();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        debug!("list request for {}: {url}", self.entity);
        Ok(url)
    }
}
