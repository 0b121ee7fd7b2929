//! Structured extraction: coercing model output into schema-conformant records.
//!
//! The extractor asks a [`TextGenerator`] for output guided by a [`Schema`],
//! then recovers a JSON object from whatever came back (schema-aware models
//! return clean JSON; free-text models get the repair cascade in [`repair`]).
//! The recovered object is validated against the schema before it is handed
//! to the caller: either a fully conformant record comes out, or nothing.
//!
//! Extraction failure is not an error for pipeline stages: every stage pairs
//! the extractor with a static fallback value (see `pipeline::stages`).

pub mod repair;
pub mod schema;

pub use schema::{Field, FieldKind, Schema};

use crate::ai::{Message, TextGenerator};
use crate::errors::{AiError, AppResult};
use serde_json::Value;
use tracing::{debug, warn};

/// Attempts to extract a schema-conformant record, surfacing the cause of
/// failure.
///
/// Stages call this so the per-stage progress notice can name what went
/// wrong before the fallback is substituted.
///
/// # Errors
///
/// Returns an error if the model call fails, no JSON object can be recovered
/// from the output, or the recovered object does not conform to `schema`.
pub fn try_extract(
    generator: &dyn TextGenerator,
    messages: &[Message],
    schema: &Schema,
) -> AppResult<Value> {
    let raw = generator.complete_structured(messages, schema)?;
    debug!("extracting '{}' record from {} bytes of output", schema.name, raw.len());

    let value = repair::extract_json(&raw).ok_or_else(|| {
        AiError::InvalidResponse(format!("no JSON object in '{}' output", schema.name))
    })?;

    if !schema.conforms(&value) {
        return Err(AiError::InvalidResponse(format!(
            "output does not conform to '{}' schema",
            schema.name
        ))
        .into());
    }

    Ok(value)
}

/// Extracts a schema-conformant record, or `None` on any failure.
///
/// This is the extractor's contract at its boundary: a conformant record or
/// no value at all, never partial data, never an error.
pub fn extract(
    generator: &dyn TextGenerator,
    messages: &[Message],
    schema: &Schema,
) -> Option<Value> {
    match try_extract(generator, messages, schema) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("extraction of '{}' failed: {}", schema.name, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Message;
    use crate::errors::{AiError, AppError};

    /// Generator returning a fixed response, or an error when `response` is None.
    struct FixedGenerator {
        response: Option<&'static str>,
    }

    impl TextGenerator for FixedGenerator {
        fn complete(&self, _messages: &[Message]) -> AppResult<String> {
            match self.response {
                Some(text) => Ok(text.to_string()),
                None => Err(AppError::Ai(AiError::InvalidResponse(
                    "model unavailable".to_string(),
                ))),
            }
        }
    }

    const QUESTIONS_SCHEMA: Schema = Schema {
        name: "questions",
        fields: &[Field::required("questions", FieldKind::StringArray)],
    };

    #[test]
    fn test_extract_from_fenced_output() {
        let generator = FixedGenerator {
            response: Some("```json\n{\"questions\": [\"Q1\",\"Q2\"]}\n```"),
        };
        let value = extract(&generator, &[Message::user("go")], &QUESTIONS_SCHEMA).unwrap();
        assert_eq!(value["questions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_nonconforming_is_none() {
        let generator = FixedGenerator {
            response: Some(r#"{"questions": "not an array"}"#),
        };
        assert!(extract(&generator, &[Message::user("go")], &QUESTIONS_SCHEMA).is_none());
    }

    #[test]
    fn test_extract_no_json_is_none() {
        let generator = FixedGenerator {
            response: Some("I'd rather not."),
        };
        assert!(extract(&generator, &[Message::user("go")], &QUESTIONS_SCHEMA).is_none());
    }

    #[test]
    fn test_extract_model_error_is_none() {
        let generator = FixedGenerator { response: None };
        assert!(extract(&generator, &[Message::user("go")], &QUESTIONS_SCHEMA).is_none());
    }

    #[test]
    fn test_try_extract_names_the_schema() {
        let generator = FixedGenerator {
            response: Some("nothing useful"),
        };
        let err = try_extract(&generator, &[Message::user("go")], &QUESTIONS_SCHEMA).unwrap_err();
        assert!(format!("{}", err).contains("questions"));
    }
}
