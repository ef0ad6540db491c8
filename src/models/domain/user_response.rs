use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One graded answer row, unique per `(quiz_id, user_id, attempt_number,
/// question_id)` and immutable after the submission that created it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub attempt_number: i16,
    pub question_id: String,
    /// Raw JSON-encoded submitted value; `None` when the question was
    /// omitted from the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub points_earned: f64,
    pub answered_at: DateTime<Utc>,
}

impl UserResponse {
    #[allow(clippy::too_many_arguments)]
    pub fn graded(
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
        question_id: &str,
        user_answer: Option<String>,
        is_correct: bool,
        points_earned: f64,
        answered_at: DateTime<Utc>,
    ) -> Self {
        UserResponse {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            attempt_number,
            question_id: question_id.to_string(),
            user_answer,
            is_correct,
            points_earned,
            answered_at,
        }
    }
}
