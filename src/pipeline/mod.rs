//! The fixed five-stage journal analysis pipeline.
//!
//! A pipeline is an ordered list of stages executed strictly in sequence,
//! each one reading the accumulated [`State`] and contributing a partial
//! update under its own keys. Stages never propagate errors: any failure
//! (model call, extraction, missing context) is converted into the stage's
//! static fallback update, so the runner's control flow is an unconditional
//! linear loop and the caller always receives a complete state.
//!
//! The stage order is fixed at configuration time because each stage's
//! declared inputs are satisfiable only by its linear predecessors; there is
//! no dependency-graph machinery to traverse.

pub mod stages;
pub mod state;

pub use state::{State, Update};

use crate::ai::TextGenerator;
use crate::errors::AppResult;
use tracing::{info, warn};

/// Well-known state keys written by the journal pipeline.
pub mod keys {
    /// The initial input: raw journal text.
    pub const JOURNAL_TEXT: &str = "journal_text";
    /// Structured fields parsed from the entry.
    pub const JOURNAL_STRUCTURED: &str = "journal_structured";
    /// Mood analysis record.
    pub const MOOD_ANALYSIS: &str = "mood_analysis";
    /// Topic analysis record.
    pub const TOPIC_ANALYSIS: &str = "topic_analysis";
    /// Generated reflection questions.
    pub const REFLECTION_QUESTIONS: &str = "reflection_questions";
    /// Synthesized response record.
    pub const JOURNAL_RESPONSE: &str = "journal_response";
    /// Rendered markdown presentation of the full analysis.
    pub const FORMATTED_OUTPUT: &str = "formatted_output";
}

/// How a stage's update came to be.
///
/// The always-fallback contract is visible here at the type level: `execute`
/// returns an update either way, and the variant only records whether the
/// model path succeeded.
#[derive(Debug)]
pub enum StageOutcome {
    /// The stage's model call and extraction succeeded.
    Completed(Update),
    /// The stage failed internally and substituted its static fallback.
    FellBack(Update),
}

impl StageOutcome {
    /// The partial update to merge, regardless of how it was produced.
    pub fn into_update(self) -> Update {
        match self {
            StageOutcome::Completed(update) | StageOutcome::FellBack(update) => update,
        }
    }

    /// True if the fallback path was taken.
    pub fn fell_back(&self) -> bool {
        matches!(self, StageOutcome::FellBack(_))
    }
}

/// One unit of the fixed pipeline.
///
/// Implementors provide a fallible `attempt` and an infallible `fallback`;
/// `execute` combines them so that no error ever escapes a stage.
pub trait Stage: Send + Sync {
    /// Stage name, used in progress notices.
    fn name(&self) -> &'static str;

    /// Tries the real work: model call, extraction, assembly of the update.
    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update>;

    /// The static fallback update substituted when `attempt` fails.
    fn fallback(&self, state: &State) -> Update;

    /// Runs the stage, absorbing any failure into the fallback.
    ///
    /// Emits the one-line progress notice either way. Advisory only: the
    /// notice never affects control flow.
    fn execute(&self, generator: &dyn TextGenerator, state: &State) -> StageOutcome {
        match self.attempt(generator, state) {
            Ok(update) => {
                info!("stage '{}' complete", self.name());
                StageOutcome::Completed(update)
            }
            Err(err) => {
                warn!("stage '{}' failed, using fallback: {}", self.name(), err);
                StageOutcome::FellBack(self.fallback(state))
            }
        }
    }
}

/// Executes stages strictly in order, threading the state through all of
/// them, and returns the terminal state.
///
/// The runner performs no error handling of its own: by contract no stage
/// propagates an error, so this is unconditional linear execution. No stage
/// is skipped, retried, or reordered.
pub fn run_stages(
    stages: &[Box<dyn Stage>],
    generator: &dyn TextGenerator,
    mut state: State,
) -> State {
    for stage in stages {
        let outcome = stage.execute(generator, &state);
        state.merge(outcome.into_update());
    }
    state
}

/// Runs the full journal analysis pipeline over raw journal text.
///
/// The returned state contains every stage key, including
/// [`keys::FORMATTED_OUTPUT`], even when every model call fails.
pub fn run(generator: &dyn TextGenerator, journal_text: &str) -> State {
    run_stages(&stages::journal_stages(), generator, State::seeded(journal_text))
}
