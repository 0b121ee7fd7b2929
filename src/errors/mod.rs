//! Error handling utilities for the ruminate application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Note that stage and extraction failures inside the analysis pipeline are
//! deliberately *not* represented here as caller-visible errors: they are
//! absorbed by per-stage fallbacks (see `pipeline`). The variants below cover
//! the failures that are allowed to surface: configuration problems, I/O,
//! model transport errors, and fatal dataset-build conditions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when calling the model API.
///
/// This enum provides detailed, contextual error information for different
/// failure modes when interacting with the configured model provider.
///
/// # Examples
///
/// ```
/// use ruminate::errors::AiError;
///
/// let error = AiError::ModelNotFound("llama3.2:3b".to_string());
/// assert!(format!("{}", error).contains("llama3.2:3b"));
/// ```
#[derive(Debug, Error)]
pub enum AiError {
    /// The model API is not reachable.
    #[error("Model API error: {0}. Is the model server running?")]
    Offline(#[source] reqwest::Error),

    /// Requested model not found at the provider.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the model API.
    #[error("Invalid response from model API: {0}")]
    InvalidResponse(String),
}

/// Represents fatal error cases that can occur while setting up a dataset build.
///
/// All of these abort the run before any item is scheduled. Per-item failures
/// during the build are handled with fallback records and never reach this type.
///
/// # Examples
///
/// ```
/// use ruminate::errors::DatasetError;
/// use std::path::PathBuf;
///
/// let error = DatasetError::NoEvents {
///     path: PathBuf::from("/tmp/events.json"),
/// };
/// assert!(format!("{}", error).contains("No life events"));
/// ```
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The life-events file could not be read or parsed.
    #[error("Failed to load life events from {path}: {message}")]
    EventsFile {
        /// The path to the events file
        path: PathBuf,
        /// Description of what went wrong
        message: String,
    },

    /// The events file was read successfully but contained no events.
    #[error("No life events found in {path}")]
    NoEvents {
        /// The path to the events file
        path: PathBuf,
    },

    /// The output sink could not be created or written.
    #[error("Cannot write dataset output to {path}: {source}")]
    SinkUnwritable {
        /// The path to the output sink
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the ruminate application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal handling (e.g., unreadable or empty journal files).
    #[error("Journal error: {0}")]
    Journal(String),

    /// Errors when calling the model API.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Fatal errors while setting up a dataset build.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use ruminate::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Journal("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
