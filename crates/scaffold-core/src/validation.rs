//! Validation utilities.

use crate::FieldError;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens `validator` errors into field errors, including nested
/// structs and list items (`items[0].email`).
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errs) => {
                for err in field_errs {
                    out.push(FieldError {
                        field: field.to_string(),
                        message: err
                            .message
                            .as_ref()
                            .map_or_else(|| format!("Validation failed for field '{}'", field), ToString::to_string),
                        code: err.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                for nested_err in field_errors(nested) {
                    out.push(FieldError {
                        field: format!("{}.{}", field, nested_err.field),
                        ..nested_err
                    });
                }
            }
            ValidationErrorsKind::List(items) => {
                for (index, item_errors) in items {
                    for nested_err in field_errors(item_errors) {
                        out.push(FieldError {
                            field: format!("{}[{}].{}", field, index, nested_err.field),
                            ..nested_err
                        });
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn test_single_field_error() {
        let req = Signup {
            name: "ab".to_string(),
            email: "valid@example.com".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "name");
        assert_eq!(fields[0].message, "Name must be at least 3 characters");
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let req = Signup {
            name: "ab".to_string(),
            email: "invalid".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let mut fields: Vec<_> = field_errors(&errors).into_iter().map(|e| e.field).collect();
        fields.sort();
        assert_eq!(fields, vec!["email", "name"]);
    }

    #[test]
    fn test_valid_request_has_no_errors() {
        let req = Signup {
            name: "Valid Name".to_string(),
            email: "valid@example.com".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
