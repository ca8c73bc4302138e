//! FIQL/RSQL query building for update-management list views.
//!
//! The string helpers live in [`fiql`], single comparisons in [`condition`],
//! and the translation of dashboard filter rows in [`filter`]. [`request`]
//! turns a query into a list endpoint URL.

pub mod action;
pub mod condition;
pub mod entity;
pub mod error;
pub mod fiql;
pub mod filter;
pub mod request;

pub use condition::{build_condition, Condition, Operator, Value};
pub use entity::{build_search, Entity};
pub use error::{QueryError, Result};
pub use fiql::{
    append_filter, build_wildcard_search, combine_with_and, combine_with_or, escape_value, group,
};
pub use filter::{build_query_from_filter_values, FilterOperator, FilterOptions, FilterValue};
pub use request::{ListRequest, Sort, SortDirection};
