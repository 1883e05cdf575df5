//! Schema Validator Port - Flow payload validation interface.
//!
//! Request bodies are checked against their input schema before any
//! network call; model replies are checked against the output schema
//! before they are deserialized. The application layer depends on this
//! trait, while adapters (like `JsonSchemaValidator`) provide the checks.

use serde_json::Value;
use thiserror::Error;

use crate::domain::flows::FlowSchema;

/// Port for validating flow payloads against their schemas.
///
/// # Contract
///
/// Implementations must:
/// - Know every [`FlowSchema`]
/// - Reject payloads missing a required field or carrying a wrong type
/// - Expose the raw schema document (used in prompts and by clients)
///
/// # Usage
///
/// ```rust,ignore
/// let validator: &dyn FlowSchemaValidator = get_validator();
///
/// validator.validate(FlowSchema::ChatInput, &body)?;
/// let schema = validator.schema_for(FlowSchema::ChatReply);
/// ```
pub trait FlowSchemaValidator: Send + Sync {
    /// Validate a payload against a schema.
    fn validate(&self, schema: FlowSchema, payload: &Value) -> Result<(), SchemaValidationError>;

    /// Get the JSON Schema document. Schemas are public and safe to expose.
    fn schema_for(&self, schema: FlowSchema) -> &Value;
}

/// Errors that can occur during schema validation.
///
/// # Security
///
/// These errors contain detailed information for debugging. When returning
/// errors to clients, use `to_client_message()` to get sanitized versions
/// that don't expose internal schema structure.
#[derive(Debug, Clone, Error)]
pub enum SchemaValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Array too short for field {field}: minimum {min}, got {actual}")]
    ArrayTooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("Value '{value}' not allowed for field {field}: expected one of {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid format for field {field}: expected {format}")]
    InvalidFormat { field: String, format: String },

    #[error("Schema validation failed: {message}")]
    Generic { message: String },

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<SchemaValidationError>),
}

impl SchemaValidationError {
    /// Convert to client-safe error message.
    ///
    /// Sanitizes error details to avoid exposing internal schema structure
    /// or implementation details that could aid in exploitation.
    pub fn to_client_message(&self) -> String {
        match self {
            SchemaValidationError::MissingRequired { field } => {
                format!("Missing required field: {}", field)
            }
            SchemaValidationError::InvalidType { field, expected, .. } => {
                format!("Invalid type for field '{}': expected {}", field, expected)
            }
            SchemaValidationError::ArrayTooShort { field, min, .. } => {
                format!("Field '{}' requires at least {} items", field, min)
            }
            SchemaValidationError::NotAllowed { field, allowed, .. } => {
                format!("Field '{}' must be one of: {}", field, allowed.join(", "))
            }
            SchemaValidationError::InvalidFormat { field, format } => {
                format!("Field '{}' must be a valid {}", field, format)
            }
            SchemaValidationError::Generic { message } => {
                // Truncate potentially long messages
                if message.chars().count() > 100 {
                    let head: String = message.chars().take(97).collect();
                    format!("Validation failed: {}...", head)
                } else {
                    format!("Validation failed: {}", message)
                }
            }
            SchemaValidationError::Multiple(errors) => {
                // Return first error only to avoid information leakage
                errors
                    .first()
                    .map(|e| e.to_client_message())
                    .unwrap_or_else(|| "Validation failed".to_string())
            }
        }
    }

    /// Returns true if this error contains multiple validation failures.
    pub fn is_multiple(&self) -> bool {
        matches!(self, SchemaValidationError::Multiple(_))
    }

    /// Get the count of validation errors.
    pub fn error_count(&self) -> usize {
        match self {
            SchemaValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }
}

impl PartialEq for SchemaValidationError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by error message for testing purposes
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_displays_field_name() {
        let err = SchemaValidationError::MissingRequired {
            field: "query".to_string(),
        };
        assert_eq!(err.to_string(), "Missing required field: query");
        assert_eq!(err.to_client_message(), "Missing required field: query");
    }

    #[test]
    fn invalid_type_displays_expected_and_actual() {
        let err = SchemaValidationError::InvalidType {
            field: "is_plant".to_string(),
            expected: "boolean".to_string(),
            actual: "string".to_string(),
        };
        assert!(err.to_string().contains("expected boolean"));
        assert!(err.to_string().contains("got string"));
    }

    #[test]
    fn client_message_for_invalid_type_hides_actual() {
        let err = SchemaValidationError::InvalidType {
            field: "is_plant".to_string(),
            expected: "boolean".to_string(),
            actual: "string".to_string(),
        };
        let msg = err.to_client_message();
        assert!(msg.contains("expected boolean"));
        assert!(!msg.contains("got")); // Don't expose actual type
    }

    #[test]
    fn array_too_short_shows_minimum() {
        let err = SchemaValidationError::ArrayTooShort {
            field: "recommendations".to_string(),
            min: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_client_message(),
            "Field 'recommendations' requires at least 2 items"
        );
    }

    #[test]
    fn not_allowed_lists_allowed_values() {
        let err = SchemaValidationError::NotAllowed {
            field: "farm_type".to_string(),
            value: "desert".to_string(),
            allowed: vec!["irrigated".to_string(), "rainfed".to_string()],
        };
        assert_eq!(
            err.to_client_message(),
            "Field 'farm_type' must be one of: irrigated, rainfed"
        );
    }

    #[test]
    fn invalid_format_shows_expected_format() {
        let err = SchemaValidationError::InvalidFormat {
            field: "photo_data_uri".to_string(),
            format: "image data URI".to_string(),
        };
        assert_eq!(
            err.to_client_message(),
            "Field 'photo_data_uri' must be a valid image data URI"
        );
    }

    #[test]
    fn multiple_errors_returns_first_in_client_message() {
        let errors = vec![
            SchemaValidationError::MissingRequired {
                field: "first".to_string(),
            },
            SchemaValidationError::MissingRequired {
                field: "second".to_string(),
            },
        ];
        let err = SchemaValidationError::Multiple(errors);
        assert_eq!(err.to_client_message(), "Missing required field: first");
    }

    #[test]
    fn error_count_returns_correct_values() {
        let single = SchemaValidationError::MissingRequired {
            field: "test".to_string(),
        };
        assert_eq!(single.error_count(), 1);

        let multiple = SchemaValidationError::Multiple(vec![
            SchemaValidationError::MissingRequired {
                field: "a".to_string(),
            },
            SchemaValidationError::MissingRequired {
                field: "b".to_string(),
            },
            SchemaValidationError::MissingRequired {
                field: "c".to_string(),
            },
        ]);
        assert_eq!(multiple.error_count(), 3);
    }

    #[test]
    fn generic_error_truncates_long_messages() {
        let long_message = "x".repeat(200);
        let err = SchemaValidationError::Generic {
            message: long_message,
        };
        let client_msg = err.to_client_message();
        assert!(client_msg.len() < 150);
        assert!(client_msg.ends_with("..."));
    }

    #[test]
    fn generic_error_truncates_on_char_boundary() {
        let err = SchemaValidationError::Generic {
            message: "फसल".repeat(50),
        };
        assert!(err.to_client_message().ends_with("..."));
    }
}
