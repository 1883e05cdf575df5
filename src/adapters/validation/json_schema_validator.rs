//! JSON Schema Validator - Implementation of FlowSchemaValidator.
//!
//! Validates flow payloads by hand against the embedded JSON Schema
//! documents, without an external schema engine. The documents themselves
//! are served by `schema_for` and embedded in model prompts.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::flows::{FlowSchema, Intent, PhotoDataUri};
use crate::ports::{FlowSchemaValidator, SchemaValidationError};

type Object = Map<String, Value>;

/// JSON Schema-based validator implementation.
///
/// Schemas are embedded in the binary via `include_str!`. The struct is
/// stateless and `Send + Sync`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Load raw schema JSON for a flow schema.
    fn load_raw_schema(schema: FlowSchema) -> Value {
        let raw = match schema {
            FlowSchema::MarketAnalysisInput => {
                include_str!("../../domain/flows/schemas/market_analysis_input.json")
            }
            FlowSchema::MarketQuery => include_str!("../../domain/flows/schemas/market_query.json"),
            FlowSchema::MarketAnalysis => {
                include_str!("../../domain/flows/schemas/market_analysis.json")
            }
            FlowSchema::CropDiagnosisInput => {
                include_str!("../../domain/flows/schemas/crop_diagnosis_input.json")
            }
            FlowSchema::DiagnosisDraft => {
                include_str!("../../domain/flows/schemas/diagnosis_draft.json")
            }
            FlowSchema::CropRecommendationInput => {
                include_str!("../../domain/flows/schemas/crop_recommendation_input.json")
            }
            FlowSchema::CropRecommendations => {
                include_str!("../../domain/flows/schemas/crop_recommendations.json")
            }
            FlowSchema::SchemeQueryInput => {
                include_str!("../../domain/flows/schemas/scheme_query_input.json")
            }
            FlowSchema::SchemeDetails => {
                include_str!("../../domain/flows/schemas/scheme_details.json")
            }
            FlowSchema::WeatherInput => include_str!("../../domain/flows/schemas/weather_input.json"),
            FlowSchema::VideoSearchInput => {
                include_str!("../../domain/flows/schemas/video_search_input.json")
            }
            FlowSchema::VideoSearchResults => {
                include_str!("../../domain/flows/schemas/video_search_results.json")
            }
            FlowSchema::ArticleSummaryInput => {
                include_str!("../../domain/flows/schemas/article_summary_input.json")
            }
            FlowSchema::ArticleSummary => {
                include_str!("../../domain/flows/schemas/article_summary.json")
            }
            FlowSchema::ChatInput => include_str!("../../domain/flows/schemas/chat_input.json"),
            FlowSchema::ChatReply => include_str!("../../domain/flows/schemas/chat_reply.json"),
            FlowSchema::SpeechInput => include_str!("../../domain/flows/schemas/speech_input.json"),
        };

        serde_json::from_str(raw)
            .unwrap_or_else(|e| panic!("Failed to parse schema for {}: {}", schema, e))
    }

    fn validate_payload(&self, schema: FlowSchema, payload: &Value) -> Result<(), SchemaValidationError> {
        match schema {
            FlowSchema::MarketAnalysisInput
            | FlowSchema::SchemeQueryInput
            | FlowSchema::ChatInput => self.validate_query_with_language(payload),
            FlowSchema::VideoSearchInput | FlowSchema::ArticleSummaryInput => {
                let obj = self.require_object(payload, "root")?;
                self.require_non_empty_string(obj, "query", "root")
            }
            FlowSchema::WeatherInput => {
                let obj = self.require_object(payload, "root")?;
                self.require_non_empty_string(obj, "city", "root")
            }
            FlowSchema::SpeechInput => {
                let obj = self.require_object(payload, "root")?;
                self.require_non_empty_string(obj, "text", "root")
            }
            FlowSchema::MarketQuery => {
                let obj = self.require_object(payload, "root")?;
                self.require_fields(obj, &["crop", "city"], "root")?;
                self.require_non_empty_string(obj, "crop", "root")?;
                self.require_non_empty_string(obj, "city", "root")
            }
            FlowSchema::MarketAnalysis => {
                let obj = self.require_object(payload, "root")?;
                self.require_fields(obj, &["recommendation", "analysis"], "root")?;
                self.require_non_empty_string(obj, "recommendation", "root")?;
                self.require_non_empty_string(obj, "analysis", "root")
            }
            FlowSchema::CropDiagnosisInput => self.validate_diagnosis_input(payload),
            FlowSchema::DiagnosisDraft => self.validate_diagnosis_draft(payload),
            FlowSchema::CropRecommendationInput => self.validate_recommendation_input(payload),
            FlowSchema::CropRecommendations => self.validate_recommendations(payload),
            FlowSchema::SchemeDetails => self.validate_scheme_details(payload),
            FlowSchema::VideoSearchResults => self.validate_video_results(payload),
            FlowSchema::ArticleSummary => self.validate_article_summary(payload),
            FlowSchema::ChatReply => self.validate_chat_reply(payload),
        }
    }

    // =========================================================================
    // Request bodies
    // =========================================================================

    fn validate_query_with_language(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(obj, &["query", "language"], "root")?;
        self.require_non_empty_string(obj, "query", "root")?;
        self.require_string_field(obj, "language", "root")
    }

    fn validate_diagnosis_input(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_string_field(obj, "language", "root")?;
        self.optional_string(obj, "photo_data_uri", "root")?;
        self.optional_string(obj, "description", "root")?;

        let photo = non_blank(obj, "photo_data_uri");
        let description = non_blank(obj, "description");

        if photo.is_none() && description.is_none() {
            return Err(SchemaValidationError::MissingRequired {
                field: "photo_data_uri or description".to_string(),
            });
        }
        if let Some(uri) = photo {
            PhotoDataUri::parse(uri).map_err(|_| SchemaValidationError::InvalidFormat {
                field: "photo_data_uri".to_string(),
                format: "image data URI".to_string(),
            })?;
        }
        Ok(())
    }

    fn validate_recommendation_input(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(obj, &["location", "farm_type", "land_size", "language"], "root")?;
        self.require_non_empty_string(obj, "location", "root")?;
        self.require_non_empty_string(obj, "land_size", "root")?;
        self.require_string_field(obj, "language", "root")?;
        if let Some(farm_type) = obj.get("farm_type") {
            self.validate_enum(farm_type, &["irrigated", "rainfed"], "farm_type")?;
        }
        for field in [
            "soil_type",
            "water_source",
            "season",
            "previous_crop",
            "budget",
            "crop_preference",
        ] {
            self.optional_string(obj, field, "root")?;
        }
        Ok(())
    }

    // =========================================================================
    // Model replies
    // =========================================================================

    fn validate_diagnosis_draft(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(obj, &["is_plant", "diagnosis", "solutions"], "root")?;
        if let Some(is_plant) = obj.get("is_plant") {
            if !is_plant.is_boolean() {
                return Err(SchemaValidationError::InvalidType {
                    field: "is_plant".to_string(),
                    expected: "boolean".to_string(),
                    actual: Self::type_name(is_plant),
                });
            }
        }
        self.require_non_empty_string(obj, "diagnosis", "root")?;
        self.require_string_field(obj, "solutions", "root")?;
        self.optional_string(obj, "documentation_search_query", "root")?;
        self.optional_string(obj, "youtube_search_query", "root")
    }

    fn validate_recommendations(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        let items = self.require_array(obj, "recommendations", 2)?;
        for (i, item) in items.iter().enumerate() {
            let path = format!("recommendations[{}]", i);
            let rec = self.require_object(item, &path)?;
            self.require_non_empty_string(rec, "crop_name", &path)?;
            self.require_non_empty_string(rec, "reasoning", &path)?;
            self.require_string_field(rec, "image_hint", &path)?;
        }
        Ok(())
    }

    fn validate_scheme_details(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(
            obj,
            &["scheme_name", "answer", "eligibility", "application_link"],
            "root",
        )?;
        self.require_non_empty_string(obj, "scheme_name", "root")?;
        self.require_non_empty_string(obj, "answer", "root")?;
        self.require_string_field(obj, "eligibility", "root")?;
        self.require_url(obj, "application_link", "root")
    }

    fn validate_video_results(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        let videos = self.require_array(obj, "videos", 3)?;
        for (i, item) in videos.iter().enumerate() {
            let path = format!("videos[{}]", i);
            let video = self.require_object(item, &path)?;
            self.require_non_empty_string(video, "video_id", &path)?;
            self.require_non_empty_string(video, "title", &path)?;
            self.require_string_field(video, "description", &path)?;
            self.require_duration(video, "duration", &path)?;
            self.require_url(video, "thumbnail_url", &path)?;
        }
        Ok(())
    }

    fn validate_article_summary(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(obj, &["title", "summary", "source_url", "relevance"], "root")?;
        self.require_non_empty_string(obj, "title", "root")?;
        self.require_non_empty_string(obj, "summary", "root")?;
        self.require_url(obj, "source_url", "root")?;
        if let Some(relevance) = obj.get("relevance") {
            self.validate_enum(relevance, &["related", "unrelated"], "relevance")?;
        }
        Ok(())
    }

    fn validate_chat_reply(&self, payload: &Value) -> Result<(), SchemaValidationError> {
        let obj = self.require_object(payload, "root")?;
        self.require_fields(obj, &["response", "intent"], "root")?;
        self.require_non_empty_string(obj, "response", "root")?;
        if let Some(intent) = obj.get("intent") {
            let allowed: Vec<&str> = Intent::all().iter().map(Intent::as_str).collect();
            self.validate_enum(intent, &allowed, "intent")?;
        }
        match obj.get("entities") {
            None | Some(Value::Null) => Ok(()),
            Some(entities) => {
                let entities = self.require_object(entities, "entities")?;
                for field in ["crop", "city", "topic"] {
                    self.optional_string(entities, field, "entities")?;
                }
                Ok(())
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_object<'a>(&self, value: &'a Value, path: &str) -> Result<&'a Object, SchemaValidationError> {
        value.as_object().ok_or_else(|| SchemaValidationError::InvalidType {
            field: path.to_string(),
            expected: "object".to_string(),
            actual: Self::type_name(value),
        })
    }

    /// Reports every missing field at once.
    fn require_fields(&self, obj: &Object, fields: &[&str], parent: &str) -> Result<(), SchemaValidationError> {
        let errors: Vec<_> = fields
            .iter()
            .filter(|field| obj.get(**field).map_or(true, Value::is_null))
            .map(|field| SchemaValidationError::MissingRequired {
                field: field_path(parent, field),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::collect_errors(errors))
        }
    }

    fn require_string_field(&self, obj: &Object, field: &str, parent: &str) -> Result<(), SchemaValidationError> {
        match obj.get(field) {
            None | Some(Value::Null) => Err(SchemaValidationError::MissingRequired {
                field: field_path(parent, field),
            }),
            Some(Value::String(_)) => Ok(()),
            Some(other) => Err(SchemaValidationError::InvalidType {
                field: field_path(parent, field),
                expected: "string".to_string(),
                actual: Self::type_name(other),
            }),
        }
    }

    fn require_non_empty_string(&self, obj: &Object, field: &str, parent: &str) -> Result<(), SchemaValidationError> {
        self.require_string_field(obj, field, parent)?;
        if let Some(val) = obj.get(field).and_then(Value::as_str) {
            if val.trim().is_empty() {
                return Err(SchemaValidationError::Generic {
                    message: format!("{} must not be empty", field_path(parent, field)),
                });
            }
        }
        Ok(())
    }

    /// Absent and null are accepted; anything else must be a string.
    fn optional_string(&self, obj: &Object, field: &str, parent: &str) -> Result<(), SchemaValidationError> {
        match obj.get(field) {
            None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
            Some(other) => Err(SchemaValidationError::InvalidType {
                field: field_path(parent, field),
                expected: "string".to_string(),
                actual: Self::type_name(other),
            }),
        }
    }

    fn require_array<'a>(
        &self,
        obj: &'a Object,
        field: &str,
        min: usize,
    ) -> Result<&'a Vec<Value>, SchemaValidationError> {
        let value = obj.get(field).ok_or_else(|| SchemaValidationError::MissingRequired {
            field: field.to_string(),
        })?;
        let items = value.as_array().ok_or_else(|| SchemaValidationError::InvalidType {
            field: field.to_string(),
            expected: "array".to_string(),
            actual: Self::type_name(value),
        })?;
        if items.len() < min {
            return Err(SchemaValidationError::ArrayTooShort {
                field: field.to_string(),
                min,
                actual: items.len(),
            });
        }
        Ok(items)
    }

    fn require_url(&self, obj: &Object, field: &str, parent: &str) -> Result<(), SchemaValidationError> {
        self.require_string_field(obj, field, parent)?;
        let url = obj.get(field).and_then(Value::as_str).unwrap_or_default();
        if url.starts_with("https://") || url.starts_with("http://") {
            Ok(())
        } else {
            Err(SchemaValidationError::InvalidFormat {
                field: field_path(parent, field),
                format: "URL".to_string(),
            })
        }
    }

    /// `MM:SS`, minutes may run past 59 for long videos.
    fn require_duration(&self, obj: &Object, field: &str, parent: &str) -> Result<(), SchemaValidationError> {
        self.require_string_field(obj, field, parent)?;
        let duration = obj.get(field).and_then(Value::as_str).unwrap_or_default();
        let valid = duration.split_once(':').is_some_and(|(minutes, seconds)| {
            (1..=3).contains(&minutes.len())
                && minutes.bytes().all(|b| b.is_ascii_digit())
                && seconds.len() == 2
                && seconds.bytes().all(|b| b.is_ascii_digit())
                && seconds.as_bytes()[0] <= b'5'
        });
        if valid {
            Ok(())
        } else {
            Err(SchemaValidationError::InvalidFormat {
                field: field_path(parent, field),
                format: "MM:SS duration".to_string(),
            })
        }
    }

    fn validate_enum(&self, value: &Value, valid_values: &[&str], path: &str) -> Result<(), SchemaValidationError> {
        match value.as_str() {
            Some(s) if valid_values.contains(&s) => Ok(()),
            Some(s) => Err(SchemaValidationError::NotAllowed {
                field: path.to_string(),
                value: s.to_string(),
                allowed: valid_values.iter().map(|v| v.to_string()).collect(),
            }),
            None => Err(SchemaValidationError::InvalidType {
                field: path.to_string(),
                expected: "string".to_string(),
                actual: Self::type_name(value),
            }),
        }
    }

    fn type_name(value: &Value) -> String {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
        .to_string()
    }

    fn collect_errors(mut errors: Vec<SchemaValidationError>) -> SchemaValidationError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            SchemaValidationError::Multiple(errors)
        }
    }
}

fn field_path(parent: &str, field: &str) -> String {
    if parent == "root" {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn non_blank<'a>(obj: &'a Object, field: &str) -> Option<&'a str> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Static storage for raw schemas (for `schema_for`).
static RAW_SCHEMAS: Lazy<HashMap<FlowSchema, Value>> = Lazy::new(|| {
    FlowSchema::all()
        .iter()
        .map(|schema| (*schema, JsonSchemaValidator::load_raw_schema(*schema)))
        .collect()
});

static EMPTY_SCHEMA: Value = Value::Null;

impl FlowSchemaValidator for JsonSchemaValidator {
    fn validate(&self, schema: FlowSchema, payload: &Value) -> Result<(), SchemaValidationError> {
        self.validate_payload(schema, payload)
    }

    fn schema_for(&self, schema: FlowSchema) -> &Value {
        RAW_SCHEMAS.get(&schema).unwrap_or(&EMPTY_SCHEMA)
    }
}
