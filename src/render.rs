//! Markdown rendering of a completed journal analysis.
//!
//! The section order is fixed: Overview, Mood Analysis, Topics Identified,
//! Reflection Questions, Summary. Rendering is a pure function of the
//! journal_response record, so a deterministic model yields a byte-identical
//! report across runs.

use serde_json::Value;
use std::fmt::Write;

fn text(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Formats a JSON number the way it appears on the wire (6.0 stays "6.0",
/// 7 stays "7"); non-numbers render as an empty placeholder.
fn number(value: &Value) -> String {
    if value.is_number() {
        value.to_string()
    } else {
        String::new()
    }
}

/// Renders the journal_response record as the final markdown report.
pub fn render_report(response: &Value) -> String {
    let mut out = String::from("# Journal Analysis\n\n");

    out.push_str("## Overview\n");
    out.push_str(&text(response, "entry_analysis"));
    out.push_str("\n\n");

    let mood = &response["mood_analysis"];
    out.push_str("## Mood Analysis\n");
    let _ = writeln!(out, "**Primary Mood**: {}", text(mood, "primary_mood"));
    let _ = writeln!(out, "**Mood Score**: {}", number(&mood["mood_score"]));
    let _ = writeln!(out, "**Analysis**: {}", text(mood, "mood_analysis"));
    out.push('\n');

    let topic = &response["topic_analysis"];
    out.push_str("## Topics Identified\n");
    let topics = topic["main_topics"].as_array().cloned().unwrap_or_default();
    let importance = topic["topic_importance"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    for (i, name) in topics.iter().enumerate() {
        let score = importance
            .get(i)
            .map(number)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "5.0".to_string());
        let _ = writeln!(
            out,
            "- **{}** (Importance: {}/10)",
            name.as_str().unwrap_or_default(),
            score
        );
    }
    let _ = writeln!(out, "\n**Analysis**: {}", text(topic, "topic_analysis"));
    out.push('\n');

    let reflection = &response["reflection_questions"];
    out.push_str("## Reflection Questions\n");
    let questions = reflection["questions"].as_array().cloned().unwrap_or_default();
    let context = reflection["question_context"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    for (i, question) in questions.iter().enumerate() {
        let _ = writeln!(out, "**{}. {}**", i + 1, question.as_str().unwrap_or_default());
        let rationale = context.get(i).and_then(Value::as_str).unwrap_or_default();
        if !rationale.is_empty() {
            let _ = writeln!(out, "   *Why this matters: {}*\n", rationale);
        }
    }

    out.push_str("## Summary\n");
    out.push_str(&text(response, "summary"));
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "entry_analysis": "A significant career milestone.",
            "mood_analysis": {
                "primary_mood": "excited",
                "mood_score": 6.0,
                "mood_indicators": ["joined", "first day"],
                "mood_analysis": "The entry conveys optimism about a new beginning.",
            },
            "topic_analysis": {
                "main_topics": ["career", "change"],
                "topic_importance": [8.0, 6.5],
                "topic_analysis": "Career transition dominates the entry.",
            },
            "reflection_questions": {
                "questions": ["What drew you to this company?", "What do you hope to learn?"],
                "question_context": ["Motivation reveals values.", ""],
            },
            "summary": "An exciting new chapter is beginning.",
        })
    }

    #[test]
    fn test_mood_section_formatting() {
        let report = render_report(&sample_response());
        assert!(report.contains("**Primary Mood**: excited"));
        assert!(report.contains("**Mood Score**: 6.0"));
        assert!(report.contains("## Mood Analysis"));
    }

    #[test]
    fn test_section_order_is_fixed() {
        let report = render_report(&sample_response());
        let overview = report.find("## Overview").unwrap();
        let mood = report.find("## Mood Analysis").unwrap();
        let topics = report.find("## Topics Identified").unwrap();
        let questions = report.find("## Reflection Questions").unwrap();
        let summary = report.find("## Summary").unwrap();
        assert!(overview < mood && mood < topics && topics < questions && questions < summary);
    }

    #[test]
    fn test_topics_render_with_importance() {
        let report = render_report(&sample_response());
        assert!(report.contains("- **career** (Importance: 8.0/10)"));
        assert!(report.contains("- **change** (Importance: 6.5/10)"));
    }

    #[test]
    fn test_questions_numbered_with_rationale() {
        let report = render_report(&sample_response());
        assert!(report.contains("**1. What drew you to this company?**"));
        assert!(report.contains("   *Why this matters: Motivation reveals values.*"));
        // Empty rationale renders no indented line.
        assert!(report.contains("**2. What do you hope to learn?**"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let response = sample_response();
        assert_eq!(render_report(&response), render_report(&response));
    }

    #[test]
    fn test_missing_sections_render_empty() {
        let report = render_report(&json!({}));
        assert!(report.starts_with("# Journal Analysis"));
        assert!(report.contains("## Summary"));
    }
}
