//! Request bodies accepting a single item or a list.

use serde::Deserialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A JSON object or an array of objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T: Validate> Validate for OneOrMany<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::One(item) => item.validate(),
            Self::Many(items) => {
                let failed: BTreeMap<usize, Box<ValidationErrors>> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| item.validate().err().map(|e| (i, Box::new(e))))
                    .collect();
                if failed.is_empty() {
                    return Ok(());
                }
                let mut errors = ValidationErrors::new();
                errors.0.insert("items".into(), ValidationErrorsKind::List(failed));
                Err(errors)
            }
        }
    }
}
