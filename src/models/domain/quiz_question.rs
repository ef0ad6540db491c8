use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single question belonging to one quiz. `options` and `correct_answer`
/// keep the JSON-encoded wire format for storage compatibility; grading
/// parses them into typed values before any comparison.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: String,        // JSON array of choice ids, in display order
    pub correct_answer: String, // JSON; shape depends on question_type
    pub points: f64,            // non-negative, <= 999.99
    pub required: bool,
    pub position: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    McqSingle,   // one correct choice id
    McqMultiple, // exact set of correct choice ids, no partial credit
    ShortAnswer, // normalized free-text answer
    // Types introduced by newer clients grade as incorrect rather than
    // failing the whole submission
    #[serde(other)]
    Unknown,
}
