//! Single FIQL comparisons.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::{
    error::{QueryError, Result},
    fiql::escape_value,
};

/// A backend comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "=gt=")]
    Gt,
    #[serde(rename = "=ge=")]
    Ge,
    #[serde(rename = "=lt=")]
    Lt,
    #[serde(rename = "=le=")]
    Le,
    #[serde(rename = "=in=")]
    In,
    #[serde(rename = "=out=")]
    Out,
}

impl Operator {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => "=gt=",
            Self::Ge => "=ge=",
            Self::Lt => "=lt=",
            Self::Le => "=le=",
            Self::In => "=in=",
            Self::Out => "=out=",
        }
    }

    /// Whether the operator takes a parenthesised value list.
    pub const fn is_multi_valued(self) -> bool {
        matches!(self, Self::In | Self::Out)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "=gt=" | ">" => Ok(Self::Gt),
            "=ge=" | ">=" => Ok(Self::Ge),
            "=lt=" | "<" => Ok(Self::Lt),
            "=le=" | "<=" => Ok(Self::Le),
            "=in=" => Ok(Self::In),
            "=out=" => Ok(Self::Out),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }
}

/// The right hand side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A cleared widget; never constrains anything.
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<Value>),
    /// Backend-native text inserted without escaping.
    #[serde(skip_deserializing)]
    Raw(String),
}

impl Value {
    /// Blank text, blank raw text and empty lists carry no constraint.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) | Self::Raw(s) => s.trim().is_empty(),
            Self::List(values) => values.iter().all(Value::is_blank),
            Self::Null => true,
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Drops blank elements from a list. Other values are returned as is.
    pub fn without_blank_items(self) -> Self {
        match self {
            Self::List(values) => {
                Self::List(values.into_iter().filter(|v| !v.is_blank()).collect())
            }
            other => other,
        }
    }

    /// The value as plain text, without any escaping.
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) | Self::Raw(s) => s.clone(),
            Self::List(values) => values
                .iter()
                .map(Value::as_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Converts text (recursively, for lists) into [`Value::Raw`].
    pub fn into_raw(self) -> Self {
        match self {
            Self::Text(s) => Self::Raw(s),
            Self::List(values) => Self::List(values.into_iter().map(Value::into_raw).collect()),
            other => other,
        }
    }

    /// Renders the value for the right hand side of a comparison.
    pub fn render(&self) -> String {
        match self {
            Self::Null => escape_value(""),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => escape_value(s),
            Self::Raw(s) => s.clone(),
            Self::List(values) => {
                let items = values.iter().map(Value::render).collect::<Vec<_>>();
                format!("({})", items.join(","))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Self::Number)
            .unwrap_or_else(|| Self::Text(value.to_string()))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A `field<operator>value` comparison.
///
/// The field is expected to be non-empty, and list values are expected only
/// with `=in=`/`=out=`; neither is checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Ne, value)
    }

    pub fn is_in<T: Into<Value>>(field: impl Into<String>, values: Vec<T>) -> Self {
        Self::new(field, Operator::In, values)
    }

    pub fn not_in<T: Into<Value>>(field: impl Into<String>, values: Vec<T>) -> Self {
        Self::new(field, Operator::Out, values)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator, self.value.render())
    }
}

/// Renders a condition as `field<op>value`, or `field<op>(v1,v2,...)` for lists.
///
/// # Examples
///
/// ```
/// use fleetq_query::condition::{build_condition, Condition};
///
/// let condition = Condition::is_in("updatestatus", vec!["error", "pending"]);
/// assert_eq!(build_condition(&condition), "updatestatus=in=(error,pending)");
/// ```
pub fn build_condition(condition: &Condition) -> String {
    condition.to_string()
}
