use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{QuizAttempt, ScoreSummary, UserResponse};

#[derive(Debug, Clone, Serialize)]
pub struct AttemptSummaryDto {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub attempt_number: i16,
    pub status: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_left: Option<i16>,
}

impl From<QuizAttempt> for AttemptSummaryDto {
    fn from(attempt: QuizAttempt) -> Self {
        let score = attempt.score_summary();
        AttemptSummaryDto {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            attempt_number: attempt.attempt_number,
            status: attempt.status.as_str().to_string(),
            started_at: attempt.started_at,
            finished_at: attempt.finished_at,
            score,
            attempts_left: None,
        }
    }
}

impl AttemptSummaryDto {
    pub fn with_attempts_left(mut self, attempts_left: i16) -> Self {
        self.attempts_left = Some(attempts_left);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GradedResponseDto {
    pub question_id: String,
    pub answered: bool,
    pub is_correct: bool,
    pub points_earned: f64,
}

impl From<&UserResponse> for GradedResponseDto {
    fn from(response: &UserResponse) -> Self {
        GradedResponseDto {
            question_id: response.question_id.clone(),
            answered: response.user_answer.is_some(),
            is_correct: response.is_correct,
            points_earned: response.points_earned,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResultDto {
    pub attempt: AttemptSummaryDto,
    pub summary: ScoreSummary,
    pub responses: Vec<GradedResponseDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedAttemptsDto {
    pub items: Vec<AttemptSummaryDto>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptsLeftDto {
    pub quiz_id: String,
    pub user_id: String,
    pub attempts_left: i16,
}
