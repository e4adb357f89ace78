//! The uniform result envelope returned by every Dao operation.
//!
//! Callers branch on [`ResultCode`], not on `error` alone: a missing row is
//! reported with `error: true` and [`ResultCode::NotFound`], which is not a
//! storage failure.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Outcome tag of a Dao call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Success,
    Created,
    NotFound,
    DatabaseError,
}

impl ResultCode {
    /// Whether this code reports an unsuccessful outcome.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::NotFound | Self::DatabaseError)
    }

    /// HTTP status code a controller should answer with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::Created => 201,
            Self::NotFound => 404,
            Self::DatabaseError => 500,
        }
    }

    /// Machine-readable name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Created => "CREATED",
            Self::NotFound => "NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

impl Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `status` block of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub error: bool,
    pub code: ResultCode,
}

impl Status {
    const fn of(code: ResultCode) -> Self {
        Self {
            error: code.is_error(),
            code,
        }
    }
}

/// Result envelope: `{ status: { error, code }, message, result }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// `Success` carrying a value.
    pub fn success(message: impl Into<String>, result: T) -> Self {
        Self {
            status: Status::of(ResultCode::Success),
            message: message.into(),
            result: Some(result),
        }
    }

    /// `Created` carrying the new identifier.
    pub fn created(message: impl Into<String>, result: T) -> Self {
        Self {
            status: Status::of(ResultCode::Created),
            message: message.into(),
            result: Some(result),
        }
    }

    /// `NotFound` with no result.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(ResultCode::NotFound, message)
    }

    /// `DatabaseError` with no result.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::failure(ResultCode::DatabaseError, message)
    }

    fn failure(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::of(code),
            message: message.into(),
            result: None,
        }
    }

    /// Attaches a result to an error envelope.
    ///
    /// Only `delete` uses this, to report an affected count of zero
    /// alongside `NotFound`.
    #[must_use]
    pub fn with_result(mut self, result: T) -> Self {
        self.result = Some(result);
        self
    }

    /// The outcome code.
    #[must_use]
    pub const fn code(&self) -> ResultCode {
        self.status.code
    }

    /// Whether the envelope reports an unsuccessful outcome.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status.error
    }

    /// Maps the carried result.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        Envelope {
            status: self.status,
            message: self.message,
            result: self.result.map(f),
        }
    }

    /// Consumes the envelope, returning the result.
    pub fn into_result(self) -> Option<T> {
        self.result
    }
}

/// Envelope for paginated reads, carrying the total matching row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountedEnvelope<T> {
    #[serde(flatten)]
    pub envelope: Envelope<T>,
    pub count: Option<u64>,
}

impl<T> CountedEnvelope<T> {
    /// `Success` with a page and the total count.
    pub fn success(message: impl Into<String>, result: T, count: u64) -> Self {
        Self {
            envelope: Envelope::success(message, result),
            count: Some(count),
        }
    }

    /// `DatabaseError` with neither result nor count.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self {
            envelope: Envelope::database_error(message),
            count: None,
        }
    }

    /// The outcome code.
    #[must_use]
    pub const fn code(&self) -> ResultCode {
        self.envelope.status.code
    }

    /// Whether the envelope reports an unsuccessful outcome.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.envelope.status.error
    }

    /// The carried page, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&T> {
        self.envelope.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_implies_no_result() {
        let not_found: Envelope<u64> = Envelope::not_found("User not found");
        assert!(not_found.is_error());
        assert_eq!(not_found.code(), ResultCode::NotFound);
        assert!(not_found.result.is_none());

        let failed: Envelope<u64> = Envelope::database_error("User read failed");
        assert!(failed.is_error());
        assert!(failed.result.is_none());
    }

    #[test]
    fn test_success_codes_are_not_errors() {
        assert!(!Envelope::success("ok", 1).is_error());
        assert!(!Envelope::created("ok", 1).is_error());
        assert_eq!(Envelope::created("ok", 1).code().http_status(), 201);
    }

    #[test]
    fn test_serialized_shape() {
        let env = Envelope::success("User found", "abc");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "status": {"error": false, "code": "SUCCESS"},
                "message": "User found",
                "result": "abc"
            })
        );

        let missing: Envelope<String> = Envelope::not_found("User not found");
        assert_eq!(serde_json::to_value(&missing).unwrap()["result"], json!(null));
    }

    #[test]
    fn test_counted_envelope_flattens() {
        let env = CountedEnvelope::success("Users listed", vec![1, 2], 42);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["count"], json!(42));
        assert_eq!(value["status"]["code"], json!("SUCCESS"));
        assert_eq!(value["result"], json!([1, 2]));

        let failed: CountedEnvelope<Vec<i32>> = CountedEnvelope::database_error("boom");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["count"], json!(null));
        assert_eq!(value["status"]["error"], json!(true));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ResultCode::Success.http_status(), 200);
        assert_eq!(ResultCode::NotFound.http_status(), 404);
        assert_eq!(ResultCode::DatabaseError.http_status(), 500);
        assert_eq!(ResultCode::DatabaseError.to_string(), "DATABASE_ERROR");
    }
}
