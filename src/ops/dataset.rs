//! Build a fine-tuning dataset from a life-events file.

use crate::ai::ModelClient;
use crate::config::Config;
use crate::dataset::{self, JsonlSink};
use crate::errors::{AppError, AppResult};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::path::Path;
use tracing::info;

fn expand_path(path: &Path) -> AppResult<std::path::PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(std::path::PathBuf::from(expanded.into_owned()))
}

/// Builds a dataset of journal-entry/question pairs from life events.
///
/// Fatal conditions (unreadable or empty events file, unwritable sink,
/// invalid credentials) abort here, before any item is scheduled. Per-item
/// failures during the build degrade to fallback records and never abort.
///
/// Returns the number of records persisted.
///
/// # Errors
///
/// Returns an error only for the fatal startup conditions above.
pub fn build_dataset(
    config: &Config,
    events_path: &Path,
    out_path: &Path,
    samples: Option<usize>,
    workers: usize,
) -> AppResult<usize> {
    let events_path = expand_path(events_path)?;
    let out_path = expand_path(out_path)?;

    let mut events = dataset::load_events(&events_path)?;

    // Shuffle so repeated capped runs draw different events.
    events.shuffle(&mut thread_rng());
    if let Some(cap) = samples {
        events.truncate(cap);
    }

    let sink = JsonlSink::create(&out_path)?;
    let client = ModelClient::new(config)?;

    info!("Starting dataset generation with {} events", events.len());
    let count = dataset::run_batch(&client, &events, &sink, workers);

    println!(
        "Generated {} records -> {}",
        count,
        out_path.display()
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DatasetError;

    #[test]
    fn test_missing_events_file_aborts_before_sink_creation() {
        let config = Config::default();
        let out = std::env::temp_dir().join("ruminate-should-not-exist.jsonl");
        let _ = std::fs::remove_file(&out);

        let result = build_dataset(
            &config,
            Path::new("/nonexistent/events.json"),
            &out,
            None,
            2,
        );

        match result {
            Err(AppError::Dataset(DatasetError::EventsFile { .. })) => {}
            _ => panic!("Expected EventsFile error"),
        }
        // The sink must not have been touched.
        assert!(!out.exists());
    }
}
