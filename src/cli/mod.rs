use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_ANALYSIS_OUT, DEFAULT_DATASET_OUT, DEFAULT_WORKERS,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Analyze journal entries and build fine-tuning datasets
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a journal entry and write a markdown report
    Analyze {
        /// Path to a text file containing the journal entry
        journal_path: PathBuf,

        /// Path to save the analysis output
        #[clap(short, long, default_value = DEFAULT_ANALYSIS_OUT)]
        output: PathBuf,
    },

    /// Generate a synthetic journal/question dataset from life events
    Dataset {
        /// Path to a JSON array of life event descriptions
        #[clap(long)]
        events: PathBuf,

        /// Path to the output JSONL file
        #[clap(long, default_value = DEFAULT_DATASET_OUT)]
        out: PathBuf,

        /// Maximum number of samples to generate (defaults to all events)
        #[clap(long)]
        samples: Option<usize>,

        /// Number of concurrent workers
        #[clap(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_defaults() {
        let args = CliArgs::parse_from(vec!["ruminate", "analyze", "entry.txt"]);
        match args.command {
            Command::Analyze { journal_path, output } => {
                assert_eq!(journal_path, PathBuf::from("entry.txt"));
                assert_eq!(output, PathBuf::from(DEFAULT_ANALYSIS_OUT));
            }
            _ => panic!("Expected Analyze command"),
        }
        assert!(!args.verbose);
    }

    #[test]
    fn test_analyze_custom_output() {
        let args =
            CliArgs::parse_from(vec!["ruminate", "analyze", "entry.txt", "-o", "report.md"]);
        match args.command {
            Command::Analyze { output, .. } => {
                assert_eq!(output, PathBuf::from("report.md"));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_dataset_defaults() {
        let args = CliArgs::parse_from(vec!["ruminate", "dataset", "--events", "events.json"]);
        match args.command {
            Command::Dataset { events, out, samples, workers } => {
                assert_eq!(events, PathBuf::from("events.json"));
                assert_eq!(out, PathBuf::from(DEFAULT_DATASET_OUT));
                assert!(samples.is_none());
                assert_eq!(workers, DEFAULT_WORKERS);
            }
            _ => panic!("Expected Dataset command"),
        }
    }

    #[test]
    fn test_dataset_flags() {
        let args = CliArgs::parse_from(vec![
            "ruminate", "dataset", "--events", "ev.json", "--out", "d.jsonl", "--samples", "40",
            "--workers", "3",
        ]);
        match args.command {
            Command::Dataset { out, samples, workers, .. } => {
                assert_eq!(out, PathBuf::from("d.jsonl"));
                assert_eq!(samples, Some(40));
                assert_eq!(workers, 3);
            }
            _ => panic!("Expected Dataset command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let args = CliArgs::parse_from(vec!["ruminate", "-v", "analyze", "entry.txt"]);
        assert!(args.verbose);
    }
}
