use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub parent_type: QuizParent,
    pub parent_id: String,
    pub attempts_allowed: i16, // 1..=10
    pub time_limit_minutes: i32,
    pub passing_score: f64,
    pub randomize_questions: bool,
    pub show_results: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// The entity a quiz hangs off of; quizzes belong to exactly one parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizParent {
    Course,
    Bundle,
}

impl Quiz {
    pub fn new(
        title: &str,
        parent_type: QuizParent,
        parent_id: &str,
        attempts_allowed: i16,
        time_limit_minutes: i32,
        passing_score: f64,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            parent_type,
            parent_id: parent_id.to_string(),
            attempts_allowed,
            time_limit_minutes,
            passing_score,
            randomize_questions: false,
            show_results: true,
            active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}
