use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AttemptStatus, QuizAttempt, ScoreSummary, UserResponse},
        dto::request::AnswerInput,
    },
    repositories::{AttemptRepository, QuestionRepository, ResponseRepository},
    services::{attempt_service::AttemptService, grading_service::GradingService},
};

pub const MANUAL_SUBMISSION: &str = "MANUAL";
pub const TIMEOUT_SUBMISSION: &str = "TIMEOUT";

/// Everything one submission produced: the terminal attempt, the aggregate
/// score, the graded rows, and any non-fatal grading warnings.
#[derive(Clone, Debug)]
pub struct SubmissionOutcome {
    pub attempt: QuizAttempt,
    pub summary: ScoreSummary,
    pub responses: Vec<UserResponse>,
    pub warnings: Vec<String>,
}

/// Orchestrates a full submission: grades the batch against the quiz's
/// questions, persists the graded rows, and drives the attempt to its
/// terminal state.
pub struct SubmissionService {
    questions: Arc<dyn QuestionRepository>,
    responses: Arc<dyn ResponseRepository>,
    attempts: Arc<dyn AttemptRepository>,
    lifecycle: Arc<AttemptService>,
}

impl SubmissionService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        responses: Arc<dyn ResponseRepository>,
        attempts: Arc<dyn AttemptRepository>,
        lifecycle: Arc<AttemptService>,
    ) -> Self {
        Self {
            questions,
            responses,
            attempts,
            lifecycle,
        }
    }

    pub async fn submit(
        &self,
        attempt_id: &str,
        responses: Option<Vec<AnswerInput>>,
        submission_type: Option<String>,
    ) -> AppResult<SubmissionOutcome> {
        let tag = submission_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| MANUAL_SUBMISSION.to_string());
        self.reconcile(attempt_id, responses, AttemptStatus::Completed, tag)
            .await
    }

    /// Timeout path: grades whatever partial responses were collected
    /// before expiry, then lands on TIMED_OUT.
    pub async fn submit_on_timeout(
        &self,
        attempt_id: &str,
        responses: Option<Vec<AnswerInput>>,
    ) -> AppResult<SubmissionOutcome> {
        self.reconcile(
            attempt_id,
            responses,
            AttemptStatus::TimedOut,
            TIMEOUT_SUBMISSION.to_string(),
        )
        .await
    }

    async fn reconcile(
        &self,
        attempt_id: &str,
        responses: Option<Vec<AnswerInput>>,
        terminal: AttemptStatus,
        submission_type: String,
    ) -> AppResult<SubmissionOutcome> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", attempt_id)))?;

        if attempt.status != AttemptStatus::InProgress {
            return Err(AppError::InvalidStateTransition(format!(
                "attempt '{}' is already {}",
                attempt_id,
                attempt.status.as_str()
            )));
        }

        let questions = self.questions.list_for_quiz(&attempt.quiz_id).await?;

        // A null batch grades identically to an empty one
        let submitted = responses.unwrap_or_default();
        let mut answers: HashMap<&str, &Value> = HashMap::new();
        for input in &submitted {
            // first answer per question wins
            answers.entry(input.question_id.as_str()).or_insert(&input.answer);
        }

        let answered_at = Utc::now();
        let mut rows = Vec::with_capacity(questions.len());
        let mut warnings = Vec::new();
        let mut correct_answers: u32 = 0;
        let mut total_score = 0.0;
        let mut max_possible_score = 0.0;

        for question in &questions {
            let submitted_value = answers.get(question.id.as_str()).copied();
            let graded = GradingService::grade(question, submitted_value);

            if let Some(warning) = graded.warning {
                log::warn!("submission on attempt '{}': {}", attempt_id, warning);
                warnings.push(warning);
            }
            if graded.is_correct {
                correct_answers += 1;
            }
            total_score += graded.points_earned;
            max_possible_score += question.points.max(0.0);

            rows.push(UserResponse::graded(
                &attempt.quiz_id,
                &attempt.user_id,
                attempt.attempt_number,
                &question.id,
                submitted_value.map(Value::to_string),
                graded.is_correct,
                graded.points_earned,
                answered_at,
            ));
        }

        let percentage_score = if max_possible_score > 0.0 {
            total_score / max_possible_score * 100.0
        } else {
            0.0
        };

        let summary = ScoreSummary {
            total_questions: questions.len() as u32,
            correct_answers,
            total_score,
            max_possible_score,
            percentage_score,
            submission_type,
        };

        // The terminal transition is the serialization point: of two
        // racing submissions, only the one that wins the compare-and-swap
        // proceeds to write response rows.
        let details = serde_json::to_string(&summary)?;
        let updated = self.lifecycle.finish(attempt_id, terminal, Some(details)).await?;

        if let Err(err) = self.responses.insert_batch(rows.clone()).await {
            log::error!(
                "persisting responses for attempt '{}' failed, rolling submission back: {}",
                attempt_id,
                err
            );
            let _ = self
                .responses
                .delete_for_attempt(&attempt.quiz_id, &attempt.user_id, attempt.attempt_number)
                .await;
            if let Err(reopen_err) = self.attempts.reopen(attempt_id).await {
                log::error!(
                    "could not reopen attempt '{}' after failed submission: {}",
                    attempt_id,
                    reopen_err
                );
            }
            return Err(err);
        }

        Ok(SubmissionOutcome {
            attempt: updated,
            summary,
            responses: rows,
            warnings,
        })
    }
}
