//! String level FIQL/RSQL helpers.
//!
//! These functions work on already rendered query fragments. `;` is AND, `,` is
//! OR, and AND binds tighter than OR, so mixing the two needs parentheses.

use std::sync::LazyLock;

use regex::Regex;

/// RSQL AND separator.
pub const AND: &str = ";";
/// RSQL OR separator.
pub const OR: &str = ",";

static PLAIN_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.\-_]+$").expect("unable to compile plain value regex")
});

static PLAIN_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.\-_*]+$").expect("unable to compile plain pattern regex")
});

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Escapes a value for use on the right hand side of a comparison.
///
/// Values made only of ASCII letters, digits, `.`, `-` and `_` are returned
/// unchanged. Anything else is wrapped in double quotes, with backslashes and
/// embedded double quotes escaped.
///
/// # Examples
///
/// ```
/// use fleetq_query::fiql::escape_value;
///
/// assert_eq!(escape_value("abc123"), "abc123");
/// assert_eq!(escape_value("a b"), "\"a b\"");
/// assert_eq!(escape_value("a\"b"), "\"a\\\"b\"");
/// ```
pub fn escape_value(value: &str) -> String {
    if PLAIN_VALUE_RE.is_match(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Escapes a wildcard pattern.
///
/// Same rule as [`escape_value`], except `*` is a plain character so the
/// wildcard markers survive unquoted.
pub fn escape_pattern(pattern: &str) -> String {
    if PLAIN_PATTERN_RE.is_match(pattern) {
        pattern.to_string()
    } else {
        quote(pattern)
    }
}

/// Builds a `field==*value*` substring match.
///
/// The value is trimmed first; a blank value gives an empty string so the
/// result can be fed straight into [`combine_with_and`] or [`append_filter`].
///
/// # Examples
///
/// ```
/// use fleetq_query::fiql::build_wildcard_search;
///
/// assert_eq!(build_wildcard_search("name", "foo"), "name==*foo*");
/// assert_eq!(build_wildcard_search("name", "   "), "");
/// ```
pub fn build_wildcard_search(field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    format!("{field}=={}", escape_pattern(&format!("*{value}*")))
}

/// Returns `true` if `query` has a `;` or `,` outside of parentheses and
/// quoted strings.
pub fn has_top_level_separator(query: &str) -> bool {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;

    for c in query.chars() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' | ',' if depth == 0 => return true,
            _ => {}
        }
    }

    false
}

/// Wraps `query` in parentheses when it contains a bare AND/OR separator.
///
/// # Examples
///
/// ```
/// use fleetq_query::fiql::group;
///
/// assert_eq!(group("a==1;b==2"), "(a==1;b==2)");
/// assert_eq!(group("a==1"), "a==1");
/// assert_eq!(group("a=in=(1,2)"), "a=in=(1,2)");
/// ```
pub fn group(query: &str) -> String {
    if has_top_level_separator(query) {
        format!("({query})")
    } else {
        query.to_string()
    }
}

fn combine<I>(parts: I, separator: &str) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let parts: Vec<I::Item> = parts
        .into_iter()
        .filter(|part| !part.as_ref().trim().is_empty())
        .collect();

    let mut combined = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            combined.push_str(separator);
        }
        combined.push_str(part.as_ref());
    }
    combined
}

/// Joins the non-blank parts with `;`.
pub fn combine_with_and<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    combine(parts, AND)
}

/// Joins the non-blank parts with `,`.
pub fn combine_with_or<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    combine(parts, OR)
}

/// AND-appends `filter` to `base`, grouping either side when it would
/// otherwise change precedence.
///
/// # Examples
///
/// ```
/// use fleetq_query::fiql::append_filter;
///
/// assert_eq!(append_filter("a==1,b==2", "c==3"), "(a==1,b==2);c==3");
/// assert_eq!(append_filter("", "c==3"), "c==3");
/// ```
pub fn append_filter(base: &str, filter: &str) -> String {
    match (base.trim().is_empty(), filter.trim().is_empty()) {
        (true, true) => String::new(),
        (true, false) => filter.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}{AND}{}", group(base), group(filter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_values() {
        assert_eq!(escape_value("abc123"), "abc123");
        assert_eq!(escape_value("1.2.3-rc_1"), "1.2.3-rc_1");
    }

    #[test]
    fn test_escape_quotes_when_needed() {
        assert_eq!(escape_value("a b"), "\"a b\"");
        assert_eq!(escape_value("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_value("a\\b"), "\"a\\\\b\"");
        assert_eq!(escape_value("a;b"), "\"a;b\"");
        assert_eq!(escape_value("*"), "\"*\"");
    }

    #[test]
    fn test_escape_empty_value() {
        assert_eq!(escape_value(""), "\"\"");
    }

    #[test]
    fn test_escape_non_ascii_is_quoted() {
        assert_eq!(escape_value("café"), "\"café\"");
    }

    #[test]
    fn test_escape_pattern_keeps_wildcards() {
        assert_eq!(escape_pattern("*foo*"), "*foo*");
        assert_eq!(escape_pattern("*foo bar*"), "\"*foo bar*\"");
    }

    #[test]
    fn test_wildcard_search() {
        assert_eq!(build_wildcard_search("name", "foo"), "name==*foo*");
        assert_eq!(build_wildcard_search("name", "  foo  "), "name==*foo*");
        assert_eq!(build_wildcard_search("name", "  "), "");
        assert_eq!(build_wildcard_search("name", ""), "");
    }

    #[test]
    fn test_wildcard_search_quotes_spaces() {
        assert_eq!(
            build_wildcard_search("description", "edge gateway"),
            "description==\"*edge gateway*\""
        );
    }

    #[test]
    fn test_group_wraps_bare_separators() {
        assert_eq!(group("a==1;b==2"), "(a==1;b==2)");
        assert_eq!(group("a==1,b==2"), "(a==1,b==2)");
        assert_eq!(group("(a==1,b==2);c==3"), "((a==1,b==2);c==3)");
    }

    #[test]
    fn test_group_passes_through() {
        assert_eq!(group("a==1"), "a==1");
        assert_eq!(group("(a==1;b==2)"), "(a==1;b==2)");
        assert_eq!(group("a=in=(1,2,3)"), "a=in=(1,2,3)");
        assert_eq!(group("name==\"x;y,z\""), "name==\"x;y,z\"");
        assert_eq!(group(""), "");
    }

    #[test]
    fn test_group_handles_escaped_quotes() {
        assert_eq!(group(r#"name=="a\";b""#), r#"name=="a\";b""#);
        assert_eq!(group(r#"name=="a\"";b==1"#), r#"(name=="a\"";b==1)"#);
    }

    #[test]
    fn test_combine_drops_blanks() {
        assert_eq!(combine_with_and(["a==1", "", "b==2"]), "a==1;b==2");
        assert_eq!(combine_with_or(["a==1", "  ", "b==2"]), "a==1,b==2");
        assert_eq!(combine_with_and(["", " "]), "");
        assert_eq!(combine_with_or(Vec::<String>::new()), "");
    }

    #[test]
    fn test_append_filter_groups_base() {
        assert_eq!(append_filter("a==1,b==2", "c==3"), "(a==1,b==2);c==3");
        assert_eq!(append_filter("a==1", "c==3"), "a==1;c==3");
        assert_eq!(append_filter("a==1", "b==2,c==3"), "a==1;(b==2,c==3)");
    }

    #[test]
    fn test_append_filter_blank_sides() {
        assert_eq!(append_filter("", "c==3"), "c==3");
        assert_eq!(append_filter("a==1", " "), "a==1");
        assert_eq!(append_filter("", ""), "");
    }
}
