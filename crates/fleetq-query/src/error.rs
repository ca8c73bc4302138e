//! Error types for fleetq-query.
//!
//! The builder functions themselves never fail; errors only come from parsing
//! user supplied text and from assembling request URLs.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error("Unknown FIQL operator: {0}")]
    #[diagnostic(
        code(fleetq_query::unknown_operator),
        help("Use one of ==, !=, =gt=, =ge=, =lt=, =le=, =in=, =out=")
    )]
    UnknownOperator(String),

    #[error("Unknown entity: {0}")]
    #[diagnostic(
        code(fleetq_query::unknown_entity),
        help("Run `fleetq entities` to list the supported entities")
    )]
    UnknownEntity(String),

    #[error("Invalid filter `{input}`: {reason}")]
    #[diagnostic(
        code(fleetq_query::invalid_filter),
        help("Filters are written as field:operator:value, e.g. name:contains:edge")
    )]
    InvalidFilter { input: String, reason: String },

    #[error("Invalid sort `{0}`")]
    #[diagnostic(
        code(fleetq_query::invalid_sort),
        help("Sorts are written as field or field:asc / field:desc")
    )]
    InvalidSort(String),

    #[error("Failed to parse filter values: {0}")]
    #[diagnostic(
        code(fleetq_query::invalid_filters_json),
        help("Filter files must hold a JSON array of objects with field, operator and value keys")
    )]
    InvalidFilters(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    #[diagnostic(
        code(fleetq_query::invalid_base_url),
        help("Provide an absolute URL such as http://localhost:8080")
    )]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Base URL `{0}` cannot carry a path")]
    #[diagnostic(code(fleetq_query::cannot_be_a_base))]
    CannotBeABase(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
