use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AttemptStatus, Quiz, QuizAttempt, ScoreSummary},
    repositories::{AttemptFilter, AttemptRepository, QuizRepository},
    services::quota_service::QuotaService,
};

/// How many times a create retries after losing the attempt-number race
/// before surfacing the conflict to the caller.
const CREATE_RETRIES: u32 = 3;

/// Owns the attempt state machine: IN_PROGRESS at creation, then exactly
/// one transition to COMPLETED, ABANDONED, or TIMED_OUT.
pub struct AttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
    quota: QuotaService,
}

impl AttemptService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn AttemptRepository>) -> Self {
        let quota = QuotaService::new(attempts.clone());
        Self {
            quizzes,
            attempts,
            quota,
        }
    }

    /// Starts a new attempt. The attempt number is max+1 for the pair,
    /// inserted under the unique `(quiz_id, user_id, attempt_number)`
    /// index; a duplicate-key loss re-reads and retries a bounded number
    /// of times. Returns the attempt and the slots left after it.
    pub async fn create_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<(QuizAttempt, i16)> {
        if quiz_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "quiz_id must not be empty".to_string(),
            ));
        }
        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "user_id must not be empty".to_string(),
            ));
        }

        let quiz = self.active_quiz(quiz_id).await?;

        let mut last_conflict = String::new();
        for _ in 0..CREATE_RETRIES {
            let left = self.quota.check_can_start(&quiz, user_id).await?;
            let next_number = self.attempts.max_attempt_number(quiz_id, user_id).await? + 1;

            match self
                .attempts
                .insert(QuizAttempt::start(quiz_id, user_id, next_number))
                .await
            {
                Ok(attempt) => {
                    log::info!(
                        "started attempt #{} on quiz '{}' for user '{}'",
                        attempt.attempt_number,
                        quiz_id,
                        user_id
                    );
                    return Ok((attempt, left - 1));
                }
                Err(AppError::Conflict(message)) => {
                    log::warn!(
                        "attempt number {} on quiz '{}' for user '{}' was taken concurrently, retrying",
                        next_number,
                        quiz_id,
                        user_id
                    );
                    last_conflict = message;
                }
                Err(other) => return Err(other),
            }
        }

        Err(AppError::Conflict(last_conflict))
    }

    pub async fn get_attempt(&self, id: &str) -> AppResult<QuizAttempt> {
        self.attempts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", id)))
    }

    pub async fn list_attempts(
        &self,
        filter: AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        self.attempts.list(filter, offset, limit).await
    }

    pub async fn complete(&self, id: &str, summary: &ScoreSummary) -> AppResult<QuizAttempt> {
        let details = serde_json::to_string(summary)?;
        self.finish(id, AttemptStatus::Completed, Some(details)).await
    }

    /// Abandonment records no score; the slot stays consumed.
    pub async fn abandon(&self, id: &str) -> AppResult<QuizAttempt> {
        self.finish(id, AttemptStatus::Abandoned, None).await
    }

    pub async fn time_out(&self, id: &str, summary: &ScoreSummary) -> AppResult<QuizAttempt> {
        let details = serde_json::to_string(summary)?;
        self.finish(id, AttemptStatus::TimedOut, Some(details)).await
    }

    /// Terminal transition via the repository's compare-and-swap on
    /// IN_PROGRESS. A miss is classified by re-reading: absent attempt is
    /// `NotFound`, anything else already left the live state.
    pub(crate) async fn finish(
        &self,
        id: &str,
        status: AttemptStatus,
        score_details: Option<String>,
    ) -> AppResult<QuizAttempt> {
        match self
            .attempts
            .finish(id, status, Utc::now(), score_details)
            .await?
        {
            Some(updated) => {
                log::info!("attempt '{}' moved to {}", id, status.as_str());
                Ok(updated)
            }
            None => match self.attempts.find_by_id(id).await? {
                None => Err(AppError::NotFound(format!("Attempt '{}' not found", id))),
                Some(existing) => Err(AppError::InvalidStateTransition(format!(
                    "attempt '{}' is already {}",
                    id,
                    existing.status.as_str()
                ))),
            },
        }
    }

    pub async fn attempts_left(&self, quiz_id: &str, user_id: &str) -> AppResult<i16> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", quiz_id)))?;
        self.quota.attempts_left(&quiz, user_id).await
    }

    async fn active_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .filter(|quiz| quiz.active)
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz '{}' not found or inactive", quiz_id))
            })?;
        Ok(quiz)
    }
}
