//! The concrete stages of the journal analysis pipeline.
//!
//! Each stage pairs a prompt, an extraction schema, and a static fallback
//! payload. Stage order is fixed: parse, mood, topics, questions, response.

use super::keys;
use super::{Stage, State, Update};
use crate::ai::{prompts, TextGenerator};
use crate::constants::{
    DEFAULT_TOPIC, DEFAULT_TOPIC_IMPORTANCE, FALLBACK_MOOD_SCORE, QUESTION_COUNT,
};
use crate::errors::{AiError, AppError, AppResult};
use crate::extract::{self, Field, FieldKind, Schema};
use crate::render;
use serde_json::{json, Value};

/// Reflection questions substituted when question generation fails.
pub const FALLBACK_QUESTIONS: [&str; QUESTION_COUNT] = [
    "How did you feel about the events you described?",
    "What patterns do you notice in your reactions?",
    "What would you do differently next time?",
    "What are you grateful for in this situation?",
    "What have you learned from this experience?",
];

/// Rationales matching [`FALLBACK_QUESTIONS`], in order.
pub const FALLBACK_QUESTION_CONTEXT: [&str; QUESTION_COUNT] = [
    "Understanding your emotions helps with self-awareness.",
    "Identifying patterns helps recognize behavioral tendencies.",
    "Considering alternatives promotes growth and learning.",
    "Practicing gratitude improves wellbeing and perspective.",
    "Reflecting on lessons learned reinforces personal development.",
];

const FALLBACK_ENTRY_ANALYSIS: &str =
    "Thank you for sharing your thoughts in this journal entry.";
const FALLBACK_SUMMARY: &str =
    "I hope these reflections and questions help you gain new insights.";

const JOURNAL_ENTRY_SCHEMA: Schema = Schema {
    name: "journal_entry",
    fields: &[
        Field::optional("date", FieldKind::String),
        Field::required("mood_indicators", FieldKind::StringArray),
        Field::required("key_topics", FieldKind::StringArray),
        Field::optional("people_mentioned", FieldKind::StringArray),
        Field::optional("activities", FieldKind::StringArray),
        Field::optional("locations", FieldKind::StringArray),
    ],
};

const MOOD_SCHEMA: Schema = Schema {
    name: "mood_analysis",
    fields: &[
        Field::required("primary_mood", FieldKind::String),
        Field::required("mood_score", FieldKind::Number),
        Field::optional("mood_indicators", FieldKind::StringArray),
        Field::required("mood_analysis", FieldKind::String),
    ],
};

const TOPIC_SCHEMA: Schema = Schema {
    name: "topic_analysis",
    fields: &[
        Field::required("main_topics", FieldKind::StringArray),
        Field::required("topic_importance", FieldKind::NumberArray),
        Field::required("topic_analysis", FieldKind::String),
    ],
};

const QUESTIONS_SCHEMA: Schema = Schema {
    name: "reflection_questions",
    fields: &[
        Field::required("questions", FieldKind::StringArray),
        Field::optional("question_context", FieldKind::StringArray),
    ],
};

const RESPONSE_SCHEMA: Schema = Schema {
    name: "journal_response",
    fields: &[
        Field::required("entry_analysis", FieldKind::String),
        Field::required("summary", FieldKind::String),
    ],
};

/// The fixed stage list for journal analysis.
pub fn journal_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(ParseEntry),
        Box::new(AnalyzeMood),
        Box::new(AnalyzeTopics),
        Box::new(GenerateQuestions),
        Box::new(SynthesizeResponse),
    ]
}

fn single(key: &str, value: Value) -> Update {
    let mut update = Update::new();
    update.insert(key.to_string(), value);
    update
}

fn journal_text(state: &State) -> AppResult<&str> {
    state
        .str_value(keys::JOURNAL_TEXT)
        .ok_or_else(|| AppError::Journal("pipeline state is missing journal_text".to_string()))
}

/// The raw entry text as seen by downstream stages: the parsed record's
/// echo if present, else the pipeline input.
fn raw_text(state: &State) -> &str {
    state
        .str_field(keys::JOURNAL_STRUCTURED, "raw_text")
        .or_else(|| state.str_value(keys::JOURNAL_TEXT))
        .unwrap_or_default()
}

/// Upstream topics with the empty-list tie-break applied: an empty topic
/// list never blocks a downstream stage, it becomes the default category.
fn topics_or_default(topics: Vec<String>) -> Vec<String> {
    if topics.is_empty() {
        vec![DEFAULT_TOPIC.to_string()]
    } else {
        topics
    }
}

/// Clamps a JSON number into `[lo, hi]`, normalizing it to a float.
fn clamp_score(value: &Value, lo: f64, hi: f64) -> Value {
    let score = value.as_f64().unwrap_or(0.0).clamp(lo, hi);
    json!(score)
}

/// Parses the raw journal text into structured fields.
pub struct ParseEntry;

impl Stage for ParseEntry {
    fn name(&self) -> &'static str {
        "parse_entry"
    }

    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update> {
        let text = journal_text(state)?;
        let messages = prompts::parse_entry(text);
        let mut record = extract::try_extract(generator, &messages, &JOURNAL_ENTRY_SCHEMA)?;

        // The model never sees a raw_text field; the pipeline owns the echo.
        record["raw_text"] = json!(text);

        Ok(single(keys::JOURNAL_STRUCTURED, record))
    }

    fn fallback(&self, state: &State) -> Update {
        let text = state.str_value(keys::JOURNAL_TEXT).unwrap_or_default();
        single(
            keys::JOURNAL_STRUCTURED,
            json!({
                "raw_text": text,
                "date": null,
                "mood_indicators": [],
                "key_topics": [],
                "people_mentioned": [],
                "activities": [],
                "locations": [],
            }),
        )
    }
}

/// Analyzes the mood of the entry from the structured fields.
pub struct AnalyzeMood;

impl Stage for AnalyzeMood {
    fn name(&self) -> &'static str {
        "analyze_mood"
    }

    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update> {
        let indicators = state.string_list(keys::JOURNAL_STRUCTURED, "mood_indicators");
        let messages = prompts::analyze_mood(raw_text(state), &indicators);
        let mut record = extract::try_extract(generator, &messages, &MOOD_SCHEMA)?;

        record["mood_score"] = clamp_score(&record["mood_score"], -10.0, 10.0);

        Ok(single(keys::MOOD_ANALYSIS, record))
    }

    fn fallback(&self, state: &State) -> Update {
        let indicators = state.string_list(keys::JOURNAL_STRUCTURED, "mood_indicators");
        single(
            keys::MOOD_ANALYSIS,
            json!({
                "primary_mood": "neutral",
                "mood_score": FALLBACK_MOOD_SCORE,
                "mood_indicators": indicators,
                "mood_analysis": "Unable to analyze mood from the provided text.",
            }),
        )
    }
}

/// Analyzes the main topics of the entry.
pub struct AnalyzeTopics;

impl Stage for AnalyzeTopics {
    fn name(&self) -> &'static str {
        "analyze_topics"
    }

    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update> {
        let key_topics = state.string_list(keys::JOURNAL_STRUCTURED, "key_topics");
        let messages = prompts::analyze_topics(raw_text(state), &key_topics);
        let mut record = extract::try_extract(generator, &messages, &TOPIC_SCHEMA)?;

        let importance: Vec<Value> = record["topic_importance"]
            .as_array()
            .map(|scores| scores.iter().map(|s| clamp_score(s, 0.0, 10.0)).collect())
            .unwrap_or_default();
        record["topic_importance"] = Value::Array(importance);

        Ok(single(keys::TOPIC_ANALYSIS, record))
    }

    fn fallback(&self, state: &State) -> Update {
        let topics =
            topics_or_default(state.string_list(keys::JOURNAL_STRUCTURED, "key_topics"));
        let importance = vec![DEFAULT_TOPIC_IMPORTANCE; topics.len()];
        single(
            keys::TOPIC_ANALYSIS,
            json!({
                "main_topics": topics,
                "topic_importance": importance,
                "topic_analysis": "Unable to analyze topics from the provided text.",
            }),
        )
    }
}

/// Generates exactly five reflection questions with rationales.
pub struct GenerateQuestions;

impl Stage for GenerateQuestions {
    fn name(&self) -> &'static str {
        "generate_questions"
    }

    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update> {
        let mood = state
            .str_field(keys::MOOD_ANALYSIS, "primary_mood")
            .unwrap_or("neutral");
        let topics = topics_or_default(state.string_list(keys::TOPIC_ANALYSIS, "main_topics"));
        let people = state.string_list(keys::JOURNAL_STRUCTURED, "people_mentioned");
        let activities = state.string_list(keys::JOURNAL_STRUCTURED, "activities");

        let messages =
            prompts::generate_questions(raw_text(state), mood, &topics, &people, &activities);
        let mut record = extract::try_extract(generator, &messages, &QUESTIONS_SCHEMA)?;

        let question_count = record["questions"].as_array().map_or(0, Vec::len);
        if question_count != QUESTION_COUNT {
            return Err(AiError::InvalidResponse(format!(
                "expected {} questions, got {}",
                QUESTION_COUNT, question_count
            ))
            .into());
        }

        // Rationales are padded so the renderer can always pair them up.
        let mut context: Vec<Value> = record["question_context"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        context.truncate(QUESTION_COUNT);
        while context.len() < QUESTION_COUNT {
            context.push(json!(""));
        }
        record["question_context"] = Value::Array(context);

        Ok(single(keys::REFLECTION_QUESTIONS, record))
    }

    fn fallback(&self, _state: &State) -> Update {
        single(
            keys::REFLECTION_QUESTIONS,
            json!({
                "questions": FALLBACK_QUESTIONS,
                "question_context": FALLBACK_QUESTION_CONTEXT,
            }),
        )
    }
}

/// Synthesizes the final response and renders the presentation form.
pub struct SynthesizeResponse;

impl SynthesizeResponse {
    /// Builds the journal_response record by embedding the prior analyses
    /// around the synthesized overview and summary, then renders it.
    fn assemble(state: &State, entry_analysis: &str, summary: &str) -> Update {
        let mood = state
            .get(keys::MOOD_ANALYSIS)
            .cloned()
            .unwrap_or_else(|| json!({}));

        let mut topic = state
            .get(keys::TOPIC_ANALYSIS)
            .cloned()
            .unwrap_or_else(|| json!({}));
        // Empty topic lists are normalized here once so the rendered report
        // and the embedded payload agree.
        let topics = topics_or_default(state.string_list(keys::TOPIC_ANALYSIS, "main_topics"));
        if state.string_list(keys::TOPIC_ANALYSIS, "main_topics").is_empty() {
            topic["main_topics"] = json!(topics);
            topic["topic_importance"] = json!(vec![DEFAULT_TOPIC_IMPORTANCE; topics.len()]);
        }

        let questions = state
            .get(keys::REFLECTION_QUESTIONS)
            .cloned()
            .unwrap_or_else(|| json!({}));

        let response = json!({
            "entry_analysis": entry_analysis,
            "mood_analysis": mood,
            "topic_analysis": topic,
            "reflection_questions": questions,
            "summary": summary,
        });

        let formatted = render::render_report(&response);

        let mut update = Update::new();
        update.insert(keys::JOURNAL_RESPONSE.to_string(), response);
        update.insert(keys::FORMATTED_OUTPUT.to_string(), json!(formatted));
        update
    }
}

impl Stage for SynthesizeResponse {
    fn name(&self) -> &'static str {
        "synthesize_response"
    }

    fn attempt(&self, generator: &dyn TextGenerator, state: &State) -> AppResult<Update> {
        let mood = state
            .str_field(keys::MOOD_ANALYSIS, "primary_mood")
            .unwrap_or("neutral");
        let mood_score = state
            .f64_field(keys::MOOD_ANALYSIS, "mood_score")
            .unwrap_or(FALLBACK_MOOD_SCORE);
        let mood_indicators = state.string_list(keys::MOOD_ANALYSIS, "mood_indicators");
        let mood_assessment = state
            .str_field(keys::MOOD_ANALYSIS, "mood_analysis")
            .unwrap_or_default();
        let topics = topics_or_default(state.string_list(keys::TOPIC_ANALYSIS, "main_topics"));
        let topic_assessment = state
            .str_field(keys::TOPIC_ANALYSIS, "topic_analysis")
            .unwrap_or_default();
        let questions = state.string_list(keys::REFLECTION_QUESTIONS, "questions");

        let messages = prompts::synthesize_response(
            raw_text(state),
            mood,
            mood_score,
            &mood_indicators,
            mood_assessment,
            &topics,
            topic_assessment,
            &questions,
        );
        let record = extract::try_extract(generator, &messages, &RESPONSE_SCHEMA)?;

        let entry_analysis = record["entry_analysis"].as_str().unwrap_or_default();
        let summary = record["summary"].as_str().unwrap_or_default();
        Ok(Self::assemble(state, entry_analysis, summary))
    }

    fn fallback(&self, state: &State) -> Update {
        Self::assemble(state, FALLBACK_ENTRY_ANALYSIS, FALLBACK_SUMMARY)
    }
}
