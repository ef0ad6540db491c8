use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One learner's pass at a quiz, numbered sequentially per (quiz, user).
/// `(quiz_id, user_id, attempt_number)` is unique; at most one attempt per
/// pair may be non-terminal at any time.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub attempt_number: i16,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// JSON-encoded `ScoreSummary`, written once on the terminal transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Completed,
    Abandoned,
    TimedOut,
}

impl AttemptStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AttemptStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "IN_PROGRESS",
            AttemptStatus::Completed => "COMPLETED",
            AttemptStatus::Abandoned => "ABANDONED",
            AttemptStatus::TimedOut => "TIMED_OUT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "IN_PROGRESS" => Some(AttemptStatus::InProgress),
            "COMPLETED" => Some(AttemptStatus::Completed),
            "ABANDONED" => Some(AttemptStatus::Abandoned),
            "TIMED_OUT" => Some(AttemptStatus::TimedOut),
            _ => None,
        }
    }
}

impl QuizAttempt {
    pub fn start(quiz_id: &str, user_id: &str, attempt_number: i16) -> Self {
        let now = Utc::now();
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            attempt_number,
            status: AttemptStatus::InProgress,
            started_at: now,
            finished_at: None,
            score_details: None,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    /// Parses the stored score summary; `None` for attempts without one
    /// (in progress or abandoned) or when the stored JSON is unreadable.
    pub fn score_summary(&self) -> Option<ScoreSummary> {
        self.score_details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Aggregate grading result for one submission, stored as the attempt's
/// opaque `score_details` blob and returned to callers in parsed form.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScoreSummary {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub total_score: f64,
    pub max_possible_score: f64,
    pub percentage_score: f64,
    pub submission_type: String,
}
