//! Translation of dashboard filter state into FIQL.
//!
//! The dashboard speaks in UI operators (`contains`, `greaterThan`, ...). The
//! backend has no substring operator, so string matches become `==` against a
//! wildcard pattern.

use std::{
    collections::{BTreeMap, BTreeSet},
    convert::Infallible,
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    condition::{build_condition, Condition, Operator, Value},
    error::{QueryError, Result},
    fiql::{combine_with_and, escape_pattern},
};

/// Operator vocabulary of the dashboard's filter widgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    Unknown(String),
}

impl FilterOperator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThan => "lessThan",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Unknown(word) => word,
        }
    }

    /// Maps to the backend operator. Unrecognized words fall back to `==`.
    pub fn backend_operator(&self) -> Operator {
        match self {
            Self::Equals | Self::Contains | Self::StartsWith | Self::EndsWith => Operator::Eq,
            Self::NotEquals => Operator::Ne,
            Self::GreaterThan => Operator::Gt,
            Self::GreaterThanOrEqual => Operator::Ge,
            Self::LessThan => Operator::Lt,
            Self::LessThanOrEqual => Operator::Le,
            Self::In => Operator::In,
            Self::NotIn => Operator::Out,
            Self::Unknown(_) => Operator::Eq,
        }
    }

    pub fn is_string_match(&self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }

    pub fn is_multi_valued(&self) -> bool {
        self.backend_operator().is_multi_valued()
    }

    /// Wraps `value` in the wildcard markers of a string match operator.
    fn decorate(&self, value: &str) -> Option<String> {
        match self {
            Self::Contains => Some(format!("*{value}*")),
            Self::StartsWith => Some(format!("{value}*")),
            Self::EndsWith => Some(format!("*{value}")),
            _ => None,
        }
    }
}

impl From<&str> for FilterOperator {
    fn from(word: &str) -> Self {
        match word.trim() {
            "equals" | "eq" | "is" => Self::Equals,
            "notEquals" | "ne" | "isNot" => Self::NotEquals,
            "contains" => Self::Contains,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "greaterThan" | "gt" | "after" => Self::GreaterThan,
            "greaterThanOrEqual" | "ge" => Self::GreaterThanOrEqual,
            "lessThan" | "lt" | "before" => Self::LessThan,
            "lessThanOrEqual" | "le" => Self::LessThanOrEqual,
            "in" | "isAnyOf" => Self::In,
            "notIn" | "isNoneOf" => Self::NotIn,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for FilterOperator {
    fn from(word: String) -> Self {
        Self::from(word.as_str())
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl FromStr for FilterOperator {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filter row as produced by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterValue {
    pub field: String,
    pub operator: FilterOperator,
    /// `null` or a missing value means the widget was cleared.
    #[serde(default)]
    pub value: Value,
}

impl FilterValue {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<FilterOperator>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Parses `field:operator:value`.
///
/// For multi-valued operators the value is split on `,`. Everything after the
/// second `:` is the value, so values may contain colons themselves.
impl FromStr for FilterValue {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            QueryError::InvalidFilter {
                input: s.to_string(),
                reason: reason.to_string(),
            }
        };

        let mut parts = s.splitn(3, ':');
        let field = parts.next().map(str::trim).unwrap_or_default();
        let operator = parts.next().ok_or_else(|| invalid("missing operator"))?;
        let value = parts.next().ok_or_else(|| invalid("missing value"))?;

        if field.is_empty() {
            return Err(invalid("field is empty"));
        }

        let operator = FilterOperator::from(operator);
        let value = if operator.is_multi_valued() {
            Value::List(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(Value::from)
                    .collect(),
            )
        } else {
            Value::from(value.trim())
        };

        Ok(Self {
            field: field.to_string(),
            operator,
            value,
        })
    }
}

/// Parses a JSON array of filter rows.
pub fn parse_filter_values(json: &str) -> Result<Vec<FilterValue>> {
    Ok(serde_json::from_str(json)?)
}

/// Per-entity knobs for [`build_query_from_filter_values`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// UI field name to backend field name.
    pub field_map: BTreeMap<String, String>,

    /// Fields whose values are backend syntax and are inserted verbatim.
    pub raw_fields: BTreeSet<String>,
}

impl FilterOptions {
    pub fn map_field(mut self, ui: impl Into<String>, backend: impl Into<String>) -> Self {
        self.field_map.insert(ui.into(), backend.into());
        self
    }

    pub fn raw_field(mut self, field: impl Into<String>) -> Self {
        self.raw_fields.insert(field.into());
        self
    }

    pub fn backend_field<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_map.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Raw fields may be named by either their UI or backend name.
    pub fn is_raw(&self, ui_field: &str, backend_field: &str) -> bool {
        self.raw_fields.contains(ui_field) || self.raw_fields.contains(backend_field)
    }
}

/// Converts one filter row into a backend condition, or `None` when the row
/// does not constrain anything.
pub fn to_condition(filter: &FilterValue, options: &FilterOptions) -> Option<Condition> {
    if filter.field.trim().is_empty() {
        debug!("skipping filter without a field");
        return None;
    }

    let value = filter.value.clone().without_blank_items();
    if value.is_blank() {
        debug!("skipping blank filter on `{}`", filter.field);
        return None;
    }

    let field = options.backend_field(&filter.field);
    let operator = filter.operator.backend_operator();

    if let FilterOperator::Unknown(word) = &filter.operator {
        debug!("unknown filter operator `{word}` on `{}`, using ==", filter.field);
    }

    let value = if options.is_raw(&filter.field, field) {
        value.into_raw()
    } else if filter.operator.is_string_match() {
        let text = value.as_text();
        let pattern = filter
            .operator
            .decorate(text.trim())
            .unwrap_or_else(|| text.clone());
        Value::Raw(escape_pattern(&pattern))
    } else {
        value
    };

    Some(Condition::new(field, operator, value))
}

/// Translates dashboard filter rows into one AND-combined FIQL string.
///
/// # Examples
///
/// ```
/// use fleetq_query::filter::{build_query_from_filter_values, FilterOptions, FilterValue};
///
/// let filters = [FilterValue::new("name", "contains", "foo")];
/// let query = build_query_from_filter_values(&filters, &FilterOptions::default());
/// assert_eq!(query, "name==*foo*");
/// ```
pub fn build_query_from_filter_values(filters: &[FilterValue], options: &FilterOptions) -> String {
    let conditions = filters
        .iter()
        .filter_map(|filter| to_condition(filter, options))
        .map(|condition| build_condition(&condition))
        .collect::<Vec<_>>();

    let query = combine_with_and(conditions);
    trace!("filter values rendered as `{query}`");
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_produces_wildcards() {
        let filters = [FilterValue::new("name", "contains", "foo")];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "name==*foo*"
        );
    }

    #[test]
    fn test_starts_and_ends_with() {
        let filters = [
            FilterValue::new("name", "startsWith", "edge"),
            FilterValue::new("version", "endsWith", "-rc"),
        ];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "name==edge*;version==*-rc"
        );
    }

    #[test]
    fn test_string_match_with_spaces_is_quoted() {
        let filters = [FilterValue::new("description", "contains", "  lab rack ")];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "description==\"*lab rack*\""
        );
    }

    #[test]
    fn test_comparison_operators() {
        let filters = [
            FilterValue::new("lastcontrollerrequestat", "greaterThan", 1000i64),
            FilterValue::new("lastcontrollerrequestat", "lessThanOrEqual", 2000i64),
            FilterValue::new("weight", "greaterThanOrEqual", 10i64),
            FilterValue::new("weight", "lessThan", 20i64),
            FilterValue::new("updatestatus", "notEquals", "error"),
        ];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "lastcontrollerrequestat=gt=1000;lastcontrollerrequestat=le=2000;\
             weight=ge=10;weight=lt=20;updatestatus!=error"
        );
    }

    #[test]
    fn test_unknown_operator_defaults_to_equals() {
        let filters = [FilterValue::new("name", "fuzzy", "gw")];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "name==gw"
        );
    }

    #[test]
    fn test_in_and_not_in() {
        let filters = [
            FilterValue::new("updatestatus", "in", vec!["error", "pending"]),
            FilterValue::new("tag", "notIn", vec!["lab"]),
        ];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "updatestatus=in=(error,pending);tag=out=(lab)"
        );
    }

    #[test]
    fn test_field_map_is_applied() {
        let options = FilterOptions::default().map_field("controllerId", "controllerid");
        let filters = [FilterValue::new("controllerId", "equals", "dev-1")];
        assert_eq!(
            build_query_from_filter_values(&filters, &options),
            "controllerid==dev-1"
        );
    }

    #[test]
    fn test_raw_fields_bypass_escaping() {
        let options = FilterOptions::default()
            .map_field("attr", "attribute.hw")
            .raw_field("attr");
        let filters = [FilterValue::new("attr", "contains", "rev 2*")];
        assert_eq!(
            build_query_from_filter_values(&filters, &options),
            "attribute.hw==rev 2*"
        );
    }

    #[test]
    fn test_raw_field_by_backend_name() {
        let options = FilterOptions::default()
            .map_field("ds", "assignedds.name")
            .raw_field("assignedds.name");
        let filters = [FilterValue::new("ds", "equals", "a b")];
        assert_eq!(
            build_query_from_filter_values(&filters, &options),
            "assignedds.name==a b"
        );
    }

    #[test]
    fn test_blank_filters_are_skipped() {
        let filters = [
            FilterValue::new("name", "contains", "  "),
            FilterValue::new("tag", "in", Vec::<String>::new()),
            FilterValue::new("", "equals", "x"),
            FilterValue::new("version", "equals", "1.0"),
        ];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "version==1.0"
        );
    }

    #[test]
    fn test_empty_filters() {
        assert_eq!(
            build_query_from_filter_values(&[], &FilterOptions::default()),
            ""
        );
    }

    #[test]
    fn test_parse_filter_spec() {
        let filter: FilterValue = "name:contains:gw:01".parse().unwrap();
        assert_eq!(filter.field, "name");
        assert_eq!(filter.operator, FilterOperator::Contains);
        assert_eq!(filter.value, Value::from("gw:01"));

        let filter: FilterValue = "updatestatus:in:error, pending".parse().unwrap();
        assert_eq!(filter.value, Value::from(vec!["error", "pending"]));
    }

    #[test]
    fn test_parse_filter_spec_errors() {
        assert!(matches!(
            "name".parse::<FilterValue>(),
            Err(QueryError::InvalidFilter { .. })
        ));
        assert!(matches!(
            "name:equals".parse::<FilterValue>(),
            Err(QueryError::InvalidFilter { .. })
        ));
        assert!(matches!(
            ":equals:x".parse::<FilterValue>(),
            Err(QueryError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_parse_filter_values_json() {
        let filters = parse_filter_values(
            r#"[
                {"field": "name", "operator": "contains", "value": "foo"},
                {"field": "id", "operator": "in", "value": [1, 2]}
            ]"#,
        )
        .unwrap();

        assert_eq!(filters.len(), 2);
        assert_eq!(filters[1].operator, FilterOperator::In);
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "name==*foo*;id=in=(1,2)"
        );
    }

    #[test]
    fn test_parse_filter_values_rejects_garbage() {
        assert!(matches!(
            parse_filter_values("{"),
            Err(QueryError::InvalidFilters(_))
        ));
    }

    #[test]
    fn test_filter_operator_serde() {
        let op: FilterOperator = serde_json::from_str("\"greaterThan\"").unwrap();
        assert_eq!(op, FilterOperator::GreaterThan);
        assert_eq!(serde_json::to_string(&op).unwrap(), "\"greaterThan\"");

        let op: FilterOperator = serde_json::from_str("\"near\"").unwrap();
        assert_eq!(op, FilterOperator::Unknown("near".into()));
    }

    #[test]
    fn test_blank_list_items_are_dropped() {
        let filters = [FilterValue::new("tag", "in", vec!["", "lab", " "])];
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "tag=in=(lab)"
        );
    }

    #[test]
    fn test_null_and_missing_values_are_skipped() {
        let filters = parse_filter_values(
            r#"[
                {"field": "name", "operator": "equals", "value": null},
                {"field": "tag", "operator": "in"},
                {"field": "version", "operator": "startsWith", "value": "2."}
            ]"#,
        )
        .unwrap();

        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].value, Value::Null);
        assert_eq!(
            build_query_from_filter_values(&filters, &FilterOptions::default()),
            "version==2.*"
        );
    }

    #[test]
    fn test_parse_filter_spec_trims_scalar_value() {
        let filter: FilterValue = "name:equals: os ".parse().unwrap();
        assert_eq!(filter.value, Value::from("os"));
        assert_eq!(
            build_query_from_filter_values(&[filter], &FilterOptions::default()),
            "name==os"
        );
    }
}
