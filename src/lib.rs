/*!
# Ruminate

Ruminate is a journaling assistant that runs a fixed pipeline of
language-model calls over a free-text journal entry to produce structured
mood and topic analysis, reflection questions, and a rendered markdown
report. A sibling dataset builder generates synthetic journal/question pairs
for model fine-tuning.

## Core Features

- Five-stage analysis pipeline with per-stage fallbacks: the caller always
  receives a complete result, even when every model call fails
- Structured extraction that repairs and validates malformed model output
  against static schemas
- Bounded-concurrency dataset builder with streaming JSONL persistence
- Pluggable model providers (Ollama, OpenAI-compatible)

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `ai`: Model client and prompt builders
- `extract`: Schema-validated JSON extraction and repair
- `pipeline`: The append-only state, stage trait, and runner
- `render`: Markdown rendering of a completed analysis
- `dataset`: Batch coordinator for dataset generation
- `ops`: High-level operations dispatched from the CLI

## Usage Example

```rust,no_run
use ruminate::config::Config;
use ruminate::ai::ModelClient;
use ruminate::pipeline::{self, keys};

fn main() -> ruminate::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let client = ModelClient::new(&config)?;
    let state = pipeline::run(&client, "Today I joined a new company.");
    println!("{}", state.str_value(keys::FORMATTED_OUTPUT).unwrap_or_default());
    Ok(())
}
```
*/

/// Model client and prompt builders
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Centralized constants
pub mod constants;
/// Dataset builder and batch coordination
pub mod dataset;
/// Error types and utilities for error handling
pub mod errors;
/// Schema-validated JSON extraction and repair
pub mod extract;
/// High-level operations dispatched from the CLI
pub mod ops;
/// The fixed journal analysis pipeline
pub mod pipeline;
/// Markdown rendering of a completed analysis
pub mod render;

// Re-export important types for convenience
pub use ai::{Message, ModelClient, TextGenerator};
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use extract::Schema;
pub use pipeline::State;
