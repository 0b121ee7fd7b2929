//! Model access for the analysis pipeline and dataset builder.
//!
//! # Module Structure
//!
//! - `client`: blocking HTTP client for the configured provider
//! - `prompts`: message builders for each pipeline stage and the dataset
//!   generator
//!
//! The [`TextGenerator`] trait is the seam between the pipeline and the model
//! transport; tests substitute deterministic implementations for it.

pub mod client;
pub mod prompts;

pub use client::{Message, ModelClient};

use crate::errors::AppResult;
use crate::extract::Schema;

/// A text-generation capability.
///
/// `complete` returns raw text for a conversation. `complete_structured` is
/// the schema-guided path: providers that support constrained decoding
/// forward the schema with the request, and the default implementation simply
/// ignores the schema and returns free text, which the extraction cascade
/// then has to dig the JSON out of.
pub trait TextGenerator: Send + Sync {
    /// Completes a conversation, returning the model's raw text output.
    fn complete(&self, messages: &[Message]) -> AppResult<String>;

    /// Completes a conversation with schema-guided decoding where supported.
    fn complete_structured(&self, messages: &[Message], schema: &Schema) -> AppResult<String> {
        let _ = schema;
        self.complete(messages)
    }
}
