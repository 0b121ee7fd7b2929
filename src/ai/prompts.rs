//! Message builders for pipeline stages and the dataset generator.
//!
//! Each builder assembles the conversation for one model call. The wording
//! matters: the analysis stages describe exactly which fields they expect so
//! that free-text models still produce something the extraction cascade can
//! recover.

use super::client::Message;

/// Builds messages for parsing a journal entry into structured fields.
pub fn parse_entry(journal_text: &str) -> Vec<Message> {
    vec![Message::system(format!(
        r#"Extract structured information from this journal entry. Identify:
- Any dates mentioned
- Words or phrases indicating mood
- Main topics discussed
- People mentioned
- Activities described
- Locations or places mentioned

Respond with a JSON object containing the fields: date, mood_indicators,
key_topics, people_mentioned, activities, locations.

The journal entry is:
{}"#,
        journal_text
    ))]
}

/// Builds messages for analyzing the mood of a journal entry.
pub fn analyze_mood(journal_text: &str, mood_indicators: &[String]) -> Vec<Message> {
    let indicators = if mood_indicators.is_empty() {
        "None detected".to_string()
    } else {
        mood_indicators.join(", ")
    };

    vec![Message::system(format!(
        r#"Analyze the mood in this journal entry. Consider:
- The overall tone of the writing
- Specific mood indicators: {}
- Emotional language used
- Context of events described

Respond with a JSON object containing:
- primary_mood: the primary mood (e.g., happy, sad, anxious, excited)
- mood_score: a number from -10 (extremely negative) to 10 (extremely positive)
- mood_indicators: words/phrases that indicate mood
- mood_analysis: a brief analysis explaining your assessment

The journal entry is:
{}"#,
        indicators, journal_text
    ))]
}

/// Builds messages for analyzing the main topics of a journal entry.
pub fn analyze_topics(journal_text: &str, key_topics: &[String]) -> Vec<Message> {
    let topics = if key_topics.is_empty() {
        "None detected".to_string()
    } else {
        key_topics.join(", ")
    };

    vec![Message::system(format!(
        r#"Analyze the main topics in this journal entry. Consider:
- Key themes mentioned: {}
- Recurring subjects
- What seems most important to the writer
- Underlying concerns or interests

Respond with a JSON object containing:
- main_topics: a list of the main topics identified
- topic_importance: an importance score (0-10) for each topic, same order
- topic_analysis: a brief analysis explaining the significance of these topics

The journal entry is:
{}"#,
        topics, journal_text
    ))]
}

/// Builds messages for generating five reflection questions.
pub fn generate_questions(
    journal_text: &str,
    primary_mood: &str,
    main_topics: &[String],
    people_mentioned: &[String],
    activities: &[String],
) -> Vec<Message> {
    let people = if people_mentioned.is_empty() {
        "None".to_string()
    } else {
        people_mentioned.join(", ")
    };
    let activities = if activities.is_empty() {
        "None".to_string()
    } else {
        activities.join(", ")
    };

    vec![Message::system(format!(
        r#"Based on this journal entry, generate 5 thoughtful, open-ended reflection questions that will help the user gain deeper insights about themselves and their experiences. Consider:

- Primary mood: {}
- Main topics: {}
- People mentioned: {}
- Activities: {}

The questions should:
- Be thought-provoking and encourage deeper reflection
- Address underlying feelings, motivations, or patterns
- Help the user gain new perspectives
- Be specific to their situation, not generic
- Be phrased in a supportive, non-judgmental way

Respond with a JSON object containing:
- questions: a list of exactly 5 questions
- question_context: for each question, a short explanation of why you are asking it

The journal entry is:
{}"#,
        primary_mood,
        main_topics.join(", "),
        people,
        activities,
        journal_text
    ))]
}

/// Builds messages for synthesizing the final journal response.
#[allow(clippy::too_many_arguments)]
pub fn synthesize_response(
    journal_text: &str,
    primary_mood: &str,
    mood_score: f64,
    mood_indicators: &[String],
    mood_analysis: &str,
    main_topics: &[String],
    topic_analysis: &str,
    questions: &[String],
) -> Vec<Message> {
    let question_list = questions
        .iter()
        .map(|q| format!("- {}", q))
        .collect::<Vec<_>>()
        .join("\n");

    vec![Message::system(format!(
        r#"Create a thoughtful response to the user's journal entry. Your response should be empathetic, supportive, and personalized to their specific situation.

Respond with a JSON object containing:
- entry_analysis: a brief analysis of their entry
- summary: a summary with insights and gentle suggestions

Journal entry: {}

Mood analysis: {} (Score: {})
Mood indicators: {}
Mood assessment: {}

Topic analysis:
Topics: {}
Topic assessment: {}

Reflection questions:
{}"#,
        journal_text,
        primary_mood,
        mood_score,
        mood_indicators.join(", "),
        mood_analysis,
        main_topics.join(", "),
        topic_analysis,
        question_list
    ))]
}

/// Builds messages for generating a synthetic journal entry from a life event.
pub fn journal_entry_from_event(life_event: &str) -> Vec<Message> {
    vec![Message::user(format!(
        "Generate a unique, authentic, and personal journal entry (1-2 short sentences) about this life event: {}. \
         The entry should be in first person, as if someone is writing in their journal about experiencing this event. \
         Include specific details and emotions. Make it sound authentic and personal, as an average human would write \
         in their digital journal in a journaling mental health app. Avoid quotes or generic language.",
        life_event
    ))]
}

/// Builds messages for generating follow-up questions for a journal entry.
pub fn followup_questions(entry: &str) -> Vec<Message> {
    vec![Message::user(format!(
        r#"You are a compassionate journaling coach specialized in mental health and personal growth.

Given this journal entry:
"{}"

Generate exactly 5 probing, open-ended follow-up questions that prompt the user to be more expressive and get the most out of journaling:
1. Explore their emotions and feelings more deeply
2. Identify underlying patterns or triggers
3. Consider alternative perspectives
4. Connect with their values and goals
5. Develop actionable insights

Make questions empathetic, non-judgmental, and varied in focus.
Respond with a JSON object containing a "questions" list."#,
        entry
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_includes_journal_text() {
        let messages = parse_entry("Today I joined a new company.");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Today I joined a new company."));
        assert!(messages[0].content.contains("mood_indicators"));
    }

    #[test]
    fn test_analyze_mood_lists_indicators() {
        let indicators = vec!["excited".to_string(), "nervous".to_string()];
        let messages = analyze_mood("entry text", &indicators);
        assert!(messages[0].content.contains("excited, nervous"));
        assert!(messages[0].content.contains("mood_score"));
    }

    #[test]
    fn test_analyze_mood_without_indicators() {
        let messages = analyze_mood("entry text", &[]);
        assert!(messages[0].content.contains("None detected"));
    }

    #[test]
    fn test_generate_questions_mentions_mood_and_topics() {
        let messages = generate_questions(
            "entry",
            "excited",
            &["career".to_string()],
            &[],
            &["onboarding".to_string()],
        );
        assert!(messages[0].content.contains("Primary mood: excited"));
        assert!(messages[0].content.contains("career"));
        assert!(messages[0].content.contains("People mentioned: None"));
        assert!(messages[0].content.contains("exactly 5"));
    }

    #[test]
    fn test_synthesize_response_embeds_questions() {
        let messages = synthesize_response(
            "entry",
            "excited",
            6.0,
            &["joined".to_string()],
            "positive outlook",
            &["career".to_string()],
            "career dominates",
            &["What excites you most?".to_string()],
        );
        assert!(messages[0].content.contains("- What excites you most?"));
        assert!(messages[0].content.contains("Score: 6"));
    }

    #[test]
    fn test_followup_questions_quotes_entry() {
        let messages = followup_questions("My first day went well.");
        assert_eq!(messages[0].role, "user");
        assert!(messages[0].content.contains("My first day went well."));
        assert!(messages[0].content.contains("exactly 5"));
    }
}
