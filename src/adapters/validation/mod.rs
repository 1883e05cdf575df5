//! Validation Adapters - Schema validation implementations.
//!
//! Checks flow request bodies and model replies against the embedded
//! JSON Schema documents.

mod json_schema_validator;

pub use json_schema_validator::JsonSchemaValidator;
