//! Analyze a journal entry file and write the rendered report.

use crate::ai::ModelClient;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::pipeline::{self, keys};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Expands `~` and environment references in a user-supplied path.
fn expand_path(path: &Path) -> AppResult<std::path::PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(std::path::PathBuf::from(expanded.into_owned()))
}

/// Runs the analysis pipeline over a journal file and writes the report.
///
/// # Flow
///
/// 1. Read the journal text from `journal_path`
/// 2. Run the five-stage pipeline (stages fall back individually; this
///    step cannot fail)
/// 3. Write the rendered markdown to `output_path`
/// 4. Print a short summary to stdout
///
/// # Errors
///
/// Returns an error if the journal file is missing or empty, the model
/// client cannot be constructed, or the report cannot be written. Stage
/// failures inside the pipeline are not errors: they degrade to fallbacks.
pub fn analyze_journal(config: &Config, journal_path: &Path, output_path: &Path) -> AppResult<()> {
    let journal_path = expand_path(journal_path)?;
    let output_path = expand_path(output_path)?;

    let journal_text = fs::read_to_string(&journal_path).map_err(|e| {
        AppError::Journal(format!(
            "Cannot read journal file {}: {}",
            journal_path.display(),
            e
        ))
    })?;

    if journal_text.trim().is_empty() {
        return Err(AppError::Journal(format!(
            "Journal file {} is empty",
            journal_path.display()
        )));
    }

    info!("Analyzing journal entry from {}", journal_path.display());
    let client = ModelClient::new(config)?;
    let state = pipeline::run(&client, &journal_text);

    let formatted = state
        .str_value(keys::FORMATTED_OUTPUT)
        .unwrap_or_default();
    fs::write(&output_path, formatted)?;
    debug!("Report written to {}", output_path.display());

    // Operator-facing summary, mirroring what the report leads with.
    let mood = state
        .str_field(keys::MOOD_ANALYSIS, "primary_mood")
        .unwrap_or("unknown");
    let topics = state
        .string_list(keys::TOPIC_ANALYSIS, "main_topics")
        .join(", ");
    let questions = state.string_list(keys::REFLECTION_QUESTIONS, "questions");

    println!("Analysis complete. Results saved to: {}", output_path.display());
    println!("Mood detected: {}", mood);
    println!("Main topics: {}", topics);
    println!("Generated {} reflection questions", questions.len());
    if let Some(first) = questions.first() {
        println!("Sample question: {}", first);
    }

    Ok(())
}
