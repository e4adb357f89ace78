//! Filter expressions for Dao queries.

use crate::{FieldValue, ScaffoldError, ScaffoldResult};
use serde::Serialize;
use serde_json::Value;

/// A tagged filter expression.
///
/// `And` with no children matches every row; `Or` with no children and
/// `OneOf` with no values match nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// `field = value` (`IS NULL` for [`FieldValue::Null`]).
    Equals { field: String, value: FieldValue },
    /// `field IN (values)`.
    OneOf { field: String, values: Vec<FieldValue> },
    /// Every child must match.
    And(Vec<Filter>),
    /// At least one child must match.
    Or(Vec<Filter>),
}

impl Filter {
    /// Equality condition.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Set-membership condition.
    #[must_use]
    pub fn one_of<V, I>(field: impl Into<String>, values: I) -> Self
    where
        V: Into<FieldValue>,
        I: IntoIterator<Item = V>,
    {
        Self::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Conjunction.
    #[must_use]
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    /// Disjunction.
    #[must_use]
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// Filter matching every row.
    #[must_use]
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Normalizes a loosely-typed JSON filter.
    ///
    /// * an object becomes an `And` of its keys; array values become
    ///   `OneOf`, scalars become `Equals`
    /// * an array becomes an `Or` of its normalized elements
    /// * `null` matches everything
    pub fn from_json(value: &Value) -> ScaffoldResult<Self> {
        match value {
            Value::Null => Ok(Self::all()),
            Value::Object(map) => {
                let mut conditions = Vec::with_capacity(map.len());
                for (field, raw) in map {
                    conditions.push(Self::condition_from_json(field, raw)?);
                }
                if conditions.len() == 1 {
                    Ok(conditions.remove(0))
                } else {
                    Ok(Self::And(conditions))
                }
            }
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(_) | Value::Array(_) => Self::from_json(item),
                    other => Err(ScaffoldError::validation(format!(
                        "filter list entries must be objects, got {}",
                        other
                    ))),
                })
                .collect::<ScaffoldResult<Vec<_>>>()
                .map(Self::Or),
            other => Err(ScaffoldError::validation(format!(
                "filter must be an object or a list of objects, got {}",
                other
            ))),
        }
    }

    fn condition_from_json(field: &str, raw: &Value) -> ScaffoldResult<Self> {
        let scoped = |e: ScaffoldError| ScaffoldError::validation(format!("filter field '{}': {}", field, e));
        match raw {
            Value::Array(items) => {
                let values = items
                    .iter()
                    .map(FieldValue::from_json)
                    .collect::<ScaffoldResult<Vec<_>>>()
                    .map_err(scoped)?;
                Ok(Self::OneOf {
                    field: field.to_string(),
                    values,
                })
            }
            scalar => Ok(Self::Equals {
                field: field.to_string(),
                value: FieldValue::from_json(scalar).map_err(scoped)?,
            }),
        }
    }

    /// Parses a JSON-encoded filter string (as received in a query string).
    pub fn parse(raw: &str) -> ScaffoldResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_json(&value)
    }

    /// Every field name referenced by this expression.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Equals { field, .. } | Self::OneOf { field, .. } => out.push(field),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }

    /// Rejects references to fields outside `allowed`.
    pub fn ensure_fields(&self, allowed: &[&str]) -> ScaffoldResult<()> {
        match self.fields().into_iter().find(|f| !allowed.contains(f)) {
            Some(unknown) => Err(ScaffoldError::validation(format!("unknown field '{}'", unknown))),
            None => Ok(()),
        }
    }

    /// Evaluates the expression against a record exposed through `lookup`.
    pub fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<FieldValue>,
    {
        match self {
            Self::Equals { field, value } => lookup(field).is_some_and(|v| v.matches(value)),
            Self::OneOf { field, values } => {
                lookup(field).is_some_and(|v| values.iter().any(|candidate| v.matches(candidate)))
            }
            Self::And(children) => children.iter().all(|c| c.matches(lookup)),
            Self::Or(children) => children.iter().any(|c| c.matches(lookup)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, FieldValue)]) -> HashMap<String, FieldValue> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    fn test_array_value_becomes_one_of() {
        let filter = Filter::from_json(&json!({"status": [1, 2]})).unwrap();
        assert_eq!(filter, Filter::one_of("status", [1, 2]));
    }

    #[test]
    fn test_object_becomes_and() {
        let filter = Filter::from_json(&json!({"status": 1, "username": "ada"})).unwrap();
        match filter {
            Filter::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(children.contains(&Filter::eq("status", 1)));
                assert!(children.contains(&Filter::eq("username", "ada")));
            }
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_list_of_objects_is_normalized_recursively() {
        let filter = Filter::from_json(&json!([
            {"status": [1, 2]},
            {"username": "ada"}
        ]))
        .unwrap();
        assert_eq!(
            filter,
            Filter::or(vec![Filter::one_of("status", [1, 2]), Filter::eq("username", "ada")])
        );
    }

    #[test]
    fn test_null_matches_everything() {
        assert_eq!(Filter::from_json(&json!(null)).unwrap(), Filter::all());
    }

    #[test]
    fn test_rejects_malformed_filters() {
        assert!(Filter::from_json(&json!(5)).is_err());
        assert!(Filter::from_json(&json!([1, 2])).is_err());
        assert!(Filter::from_json(&json!({"status": [[1]]})).is_err());
        assert!(Filter::from_json(&json!({"status": {"gt": 1}})).is_err());
        assert!(Filter::parse("{not json").is_err());
    }

    #[test]
    fn test_parse_query_string_filter() {
        let filter = Filter::parse(r#"{"status":[1,2]}"#).unwrap();
        assert_eq!(filter, Filter::one_of("status", [1, 2]));
    }

    #[test]
    fn test_ensure_fields() {
        let filter = Filter::and(vec![Filter::eq("status", 1), Filter::or(vec![Filter::eq("nope", 1)])]);
        assert_eq!(filter.fields(), vec!["status", "nope"]);
        assert!(filter.ensure_fields(&["status", "nope"]).is_ok());
        assert!(filter.ensure_fields(&["status"]).is_err());
    }

    #[test]
    fn test_serializes_for_log_metadata() {
        let value = serde_json::to_value(Filter::one_of("status", [1, 2])).unwrap();
        assert_eq!(value, json!({"one_of": {"field": "status", "values": [1, 2]}}));
    }

    #[test]
    fn test_matches() {
        let row = record(&[("status", FieldValue::Int(2)), ("username", "ada".into())]);
        let lookup = |f: &str| row.get(f).cloned();

        assert!(Filter::one_of("status", [1, 2]).matches(&lookup));
        assert!(!Filter::one_of("status", [3]).matches(&lookup));
        assert!(Filter::and(vec![Filter::eq("status", 2), Filter::eq("username", "ada")]).matches(&lookup));
        assert!(Filter::or(vec![Filter::eq("status", 9), Filter::eq("username", "ada")]).matches(&lookup));
        assert!(Filter::all().matches(&lookup));
        assert!(!Filter::or(Vec::new()).matches(&lookup));
        assert!(!Filter::eq("missing", 1).matches(&lookup));
    }
}
