use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Quiz,
    repositories::AttemptRepository,
};

/// Enforces the per-(quiz, user) attempts quota. Attempts in any status
/// consume a slot; an open attempt must be finished before a new one may
/// start.
pub struct QuotaService {
    attempts: Arc<dyn AttemptRepository>,
}

impl QuotaService {
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    pub async fn attempts_left(&self, quiz: &Quiz, user_id: &str) -> AppResult<i16> {
        let used = self.attempts.count_for_user(&quiz.id, user_id).await?;
        let left = (quiz.attempts_allowed as i64 - used).max(0);
        Ok(left as i16)
    }

    /// Gate for starting a new attempt; returns the slots left before the
    /// new attempt is counted.
    pub async fn check_can_start(&self, quiz: &Quiz, user_id: &str) -> AppResult<i16> {
        if let Some(open) = self.attempts.find_in_progress(&quiz.id, user_id).await? {
            return Err(AppError::AttemptInProgress(format!(
                "attempt #{} on quiz '{}' is still open; resume or abandon it first",
                open.attempt_number, quiz.id
            )));
        }

        let left = self.attempts_left(quiz, user_id).await?;
        if left == 0 {
            return Err(AppError::QuotaExceeded(format!(
                "all {} attempts on quiz '{}' have been used",
                quiz.attempts_allowed, quiz.id
            )));
        }

        Ok(left)
    }
}
