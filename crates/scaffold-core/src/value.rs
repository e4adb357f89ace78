//! Column values and partial-update patches.

use crate::{ScaffoldError, ScaffoldResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{self, Display};
use uuid::Uuid;

/// A single column value, independent of the storage driver.
///
/// Deserializes from plain JSON scalars, so strings always arrive as
/// [`FieldValue::Text`]. Comparisons treat a `Text` holding a UUID or an
/// RFC 3339 timestamp as equal to the typed variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Text(String),
    /// UUID, stored as its hyphenated string form.
    Uuid(Uuid),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Converts a JSON scalar into a field value.
    ///
    /// Arrays and objects are rejected; list semantics belong to
    /// [`Filter::OneOf`](crate::Filter::OneOf).
    pub fn from_json(value: &Value) -> ScaffoldResult<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| ScaffoldError::validation(format!("unsupported number: {}", n))),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(ScaffoldError::validation(format!(
                "expected a scalar value, got {}",
                value
            ))),
        }
    }

    /// Returns true for [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Decodes this value into a concrete Rust type.
    pub fn decode<T: FromFieldValue>(self) -> ScaffoldResult<T> {
        T::from_field_value(self)
    }

    /// Compares two values the way a SQL predicate would.
    ///
    /// Returns `None` when the values are not comparable, including any
    /// comparison against `NULL` other than `NULL` itself.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.partial_cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.partial_cmp(b),
            (Self::Uuid(a), Self::Text(b)) => Uuid::parse_str(b).ok().map(|b| a.cmp(&b)),
            (Self::Text(a), Self::Uuid(b)) => Uuid::parse_str(a).ok().map(|a| a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.partial_cmp(b),
            (Self::Timestamp(a), Self::Text(b)) => parse_timestamp(b).map(|b| a.cmp(&b)),
            (Self::Text(a), Self::Timestamp(b)) => parse_timestamp(a).map(|a| a.cmp(b)),
            _ => None,
        }
    }

    /// Returns true when both values compare equal.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Total ordering used for sorting; `NULL` sorts first, incomparable
    /// values keep their relative order.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            _ => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Uuid(u) => write!(f, "{}", u),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from a [`FieldValue`] into a concrete column type.
pub trait FromFieldValue: Sized {
    /// Performs the conversion.
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self>;
}

fn mismatch(expected: &str, value: &FieldValue) -> ScaffoldError {
    ScaffoldError::validation(format!("expected {}, got {}", expected, value))
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            FieldValue::Int(0) => Ok(false),
            FieldValue::Int(1) => Ok(true),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Int(i) => Ok(i),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        let wide = i64::from_field_value(value)?;
        i32::try_from(wide).map_err(|_| ScaffoldError::validation(format!("{} is out of range", wide)))
    }
}

impl FromFieldValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Float(x) => Ok(x),
            FieldValue::Int(i) => Ok(i as f64),
            other => Err(mismatch("number", &other)),
        }
    }
}

impl FromFieldValue for Uuid {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Uuid(u) => Ok(u),
            FieldValue::Text(ref s) => Uuid::parse_str(s).map_err(|_| mismatch("uuid", &value)),
            other => Err(mismatch("uuid", &other)),
        }
    }
}

impl FromFieldValue for DateTime<Utc> {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Timestamp(t) => Ok(t),
            FieldValue::Text(ref s) => parse_timestamp(s).ok_or_else(|| mismatch("timestamp", &value)),
            other => Err(mismatch("timestamp", &other)),
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue) -> ScaffoldResult<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

/// An ordered set of column assignments for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    assignments: Vec<(String, FieldValue)>,
}

impl Patch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment, replacing any earlier one for the same field.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field.into(), value.into());
        self
    }

    fn insert(&mut self, field: String, value: FieldValue) {
        if let Some(slot) = self.assignments.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.assignments.push((field, value));
        }
    }

    /// Builds a patch from a JSON object of `field: scalar` pairs.
    pub fn from_json(value: &Value) -> ScaffoldResult<Self> {
        let Value::Object(map) = value else {
            return Err(ScaffoldError::validation("patch must be a JSON object"));
        };

        let mut patch = Self::new();
        for (field, raw) in map {
            let value = FieldValue::from_json(raw)
                .map_err(|e| ScaffoldError::validation(format!("field '{}': {}", field, e)))?;
            patch.insert(field.clone(), value);
        }
        Ok(patch)
    }

    /// Returns true if the patch assigns the given field.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.assignments.iter().any(|(f, _)| f == field)
    }

    /// Returns true if the patch has no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.assignments.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Field names assigned by this patch.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|(f, _)| f.as_str())
    }
}
