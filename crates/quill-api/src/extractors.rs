//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies in handlers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::{AppError, FieldErrors};

/// Request types that check field rules beyond what serde enforces.
pub trait Validate {
    /// Returns every failing field with its message.
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// True when `value` is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), FieldErrors> {
            let mut errors = FieldErrors::new();
            if is_blank(&self.name) {
                errors.add("name", "name is required");
            }
            errors.into_result()
        }
    }

    #[test]
    fn valid_body_passes_through() {
        let body = Ok(Json(Named {
            name: "quill".into(),
        }));
        let value = extract_validated_json(body).unwrap();
        assert_eq!(value.name, "quill");
    }

    #[test]
    fn invalid_body_is_validation_error() {
        let body = Ok(Json(Named { name: "  ".into() }));
        match extract_validated_json(body).err() {
            Some(AppError::Validation(fields)) => {
                assert_eq!(fields.get("name"), Some("name is required"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }
}
