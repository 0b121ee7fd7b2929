//! High-level operations dispatched from the CLI.
//!
//! Each operation wires configuration, the model client, and one of the
//! core engines (analysis pipeline or dataset builder) together.

pub mod analyze;
pub mod dataset;

pub use analyze::analyze_journal;
pub use dataset::build_dataset;
