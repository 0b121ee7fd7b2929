//! Synthetic dataset builder for model fine-tuning.
//!
//! Turns a list of life events into journal-entry/follow-up-question pairs:
//! for each event the model writes a short first-person entry, then the
//! structured extractor pulls exactly five follow-up questions for it. Items
//! are independent; a bounded pool of workers processes them and streams
//! each completed record to the JSONL sink the moment it finishes, so
//! partial progress survives a crash.
//!
//! Failure handling is layered: entry generation and question extraction
//! each have their own fallback, and a panic anywhere in an item's
//! processing is caught at the batch level and replaced with a full fallback
//! record. Nothing an individual item does can abort the batch.

use crate::ai::{prompts, TextGenerator};
use crate::constants::QUESTION_COUNT;
use crate::errors::{AppResult, DatasetError};
use crate::extract::{self, Field, FieldKind, Schema};
use chrono::Utc;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use tracing::{debug, info, warn};

/// Follow-up questions substituted when question extraction fails.
pub const FALLBACK_DATASET_QUESTIONS: [&str; QUESTION_COUNT] = [
    "How did this experience make you feel?",
    "What thoughts came up for you during this moment?",
    "How does this connect to your broader life patterns?",
    "What might this experience be teaching you?",
    "How might you approach similar situations in the future?",
];

const DATASET_QUESTIONS_SCHEMA: Schema = Schema {
    name: "followup_questions",
    fields: &[Field::required("questions", FieldKind::StringArray)],
};

/// Content-hash identifier for a generated entry.
pub fn entry_id(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Loads life events from a JSON array file.
///
/// # Errors
///
/// Returns `DatasetError::EventsFile` if the file cannot be read or parsed,
/// and `DatasetError::NoEvents` if it parses to an empty list. Both are
/// fatal: the build aborts before any item is scheduled.
pub fn load_events(path: &Path) -> AppResult<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| DatasetError::EventsFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let events: Vec<String> =
        serde_json::from_str(&raw).map_err(|e| DatasetError::EventsFile {
            path: path.to_path_buf(),
            message: format!("expected a JSON array of strings: {}", e),
        })?;

    if events.is_empty() {
        return Err(DatasetError::NoEvents {
            path: path.to_path_buf(),
        }
        .into());
    }

    info!("Loaded {} life events from {}", events.len(), path.display());
    Ok(events)
}

/// Append-only JSONL sink, serialized through a single writer.
///
/// Multiple workers complete and persist at arbitrary times; the mutex
/// keeps lines whole, and each append flushes so a crash loses at most the
/// record being written.
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Creates (or truncates) the sink file.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::SinkUnwritable` if the file cannot be created,
    /// a fatal startup condition.
    pub fn create(path: &Path) -> AppResult<Self> {
        let file = File::create(path).map_err(|source| DatasetError::SinkUnwritable {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Appends one record as a single line and flushes it.
    pub fn append(&self, record: &Value) -> AppResult<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    /// Path of the sink file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trims a generated entry and normalizes its trailing period.
fn normalize_entry(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{}.", trimmed))
}

fn fallback_entry(event: &str) -> String {
    format!(
        "Today I experienced {}. It was a significant moment in my life that made me reflect on my journey.",
        event
    )
}

fn numbered(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_record(entry: String, questions: &[String]) -> Value {
    json!({
        "id": entry_id(&entry),
        "input": entry,
        "output": numbered(questions),
        "created_at": Utc::now().to_rfc3339(),
    })
}

/// The static record substituted when an item fails past its own recovery.
fn fallback_record(event: &str) -> Value {
    let questions: Vec<String> = FALLBACK_DATASET_QUESTIONS
        .iter()
        .map(|q| q.to_string())
        .collect();
    build_record(fallback_entry(event), &questions)
}

/// Processes one life event into a dataset record. Never fails: both the
/// entry and the questions degrade to their fallbacks independently.
fn process_event(generator: &dyn TextGenerator, event: &str) -> Value {
    let entry = match generator.complete(&prompts::journal_entry_from_event(event)) {
        Ok(raw) => normalize_entry(&raw).unwrap_or_else(|| {
            warn!("empty entry generated for event, using fallback");
            fallback_entry(event)
        }),
        Err(err) => {
            warn!("entry generation failed for event: {}", err);
            fallback_entry(event)
        }
    };

    let questions = extract::extract(
        generator,
        &prompts::followup_questions(&entry),
        &DATASET_QUESTIONS_SCHEMA,
    )
    .map(|record| {
        record["questions"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    })
    // A record always carries exactly five questions; a wrong count is an
    // extraction failure like any other.
    .filter(|questions| questions.len() == QUESTION_COUNT)
    .unwrap_or_else(|| {
        warn!("extraction did not yield exactly {} questions, using fallback", QUESTION_COUNT);
        FALLBACK_DATASET_QUESTIONS
            .iter()
            .map(|q| q.to_string())
            .collect()
    });

    build_record(entry, &questions)
}

/// Runs the single-item pipeline over all events with a bounded worker pool.
///
/// Results complete in any order; each one is appended to the sink
/// immediately. An item that panics past its internal recovery is replaced
/// by a static fallback record and still counted. Returns the number of
/// records persisted.
pub fn run_batch(
    generator: &dyn TextGenerator,
    events: &[String],
    sink: &JsonlSink,
    workers: usize,
) -> usize {
    let next = AtomicUsize::new(0);
    let persisted = AtomicUsize::new(0);
    let pool_size = workers.max(1).min(events.len().max(1));

    info!(
        "Building dataset: {} events with {} workers -> {}",
        events.len(),
        pool_size,
        sink.path().display()
    );

    thread::scope(|scope| {
        for _ in 0..pool_size {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::SeqCst);
                if index >= events.len() {
                    break;
                }
                let event = &events[index];

                let record =
                    match panic::catch_unwind(AssertUnwindSafe(|| process_event(generator, event)))
                    {
                        Ok(record) => record,
                        Err(_) => {
                            warn!("item processing panicked, using fallback record");
                            fallback_record(event)
                        }
                    };

                match sink.append(&record) {
                    Ok(()) => {
                        persisted.fetch_add(1, Ordering::SeqCst);
                        let preview: String = event.chars().take(30).collect();
                        debug!("Completed event: {}...", preview);
                    }
                    Err(err) => warn!("failed to persist record: {}", err),
                }
            });
        }
    });

    let count = persisted.load(Ordering::SeqCst);
    info!("Dataset build complete: {} records persisted", count);
    count
}
