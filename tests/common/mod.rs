#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quizflow_server::{
    errors::{AppError, AppResult},
    models::domain::{
        quiz::QuizParent, quiz_question::QuestionType, AttemptStatus, Quiz, QuizAttempt,
        QuizQuestion, UserResponse,
    },
    repositories::{
        AttemptFilter, AttemptRepository, QuestionRepository, QuizRepository, ResponseRepository,
    },
    services::{AttemptService, SubmissionService},
};

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn seed(&self, quiz: Quiz) {
        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(quiz.id.clone(), quiz);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }
}

pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<Vec<QuizQuestion>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn seed(&self, batch: Vec<QuizQuestion>) {
        let mut questions = self.questions.write().await;
        questions.extend(batch);
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions = self.questions.read().await;
        let mut items: Vec<_> = questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by_key(|q| q.position);
        Ok(items)
    }
}

/// In-memory stand-in for the Mongo attempt collection; the write lock
/// plays the role of the unique index and the find_one_and_update guard.
pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<HashMap<String, QuizAttempt>>>,
}

impl InMemoryAttemptRepository {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;

        if attempts.contains_key(&attempt.id) {
            return Err(AppError::Conflict(format!(
                "attempt id '{}' already exists",
                attempt.id
            )));
        }

        let sequence_taken = attempts.values().any(|a| {
            a.quiz_id == attempt.quiz_id
                && a.user_id == attempt.user_id
                && a.attempt_number == attempt.attempt_number
        });
        if sequence_taken {
            return Err(AppError::Conflict("Duplicate key".to_string()));
        }

        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn find_in_progress(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .find(|a| {
                a.quiz_id == quiz_id
                    && a.user_id == user_id
                    && a.status == AttemptStatus::InProgress
            })
            .cloned())
    }

    async fn count_for_user(&self, quiz_id: &str, user_id: &str) -> AppResult<i64> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| a.quiz_id == quiz_id && a.user_id == user_id)
            .count() as i64)
    }

    async fn max_attempt_number(&self, quiz_id: &str, user_id: &str) -> AppResult<i16> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| a.quiz_id == quiz_id && a.user_id == user_id)
            .map(|a| a.attempt_number)
            .max()
            .unwrap_or(0))
    }

    async fn finish(
        &self,
        id: &str,
        status: AttemptStatus,
        finished_at: DateTime<Utc>,
        score_details: Option<String>,
    ) -> AppResult<Option<QuizAttempt>> {
        let mut attempts = self.attempts.write().await;
        let Some(attempt) = attempts.get_mut(id) else {
            return Ok(None);
        };
        if attempt.status != AttemptStatus::InProgress {
            return Ok(None);
        }

        attempt.status = status;
        attempt.finished_at = Some(finished_at);
        if score_details.is_some() {
            attempt.score_details = score_details;
        }
        attempt.modified_at = Some(Utc::now());
        Ok(Some(attempt.clone()))
    }

    async fn reopen(&self, id: &str) -> AppResult<()> {
        let mut attempts = self.attempts.write().await;
        if let Some(attempt) = attempts.get_mut(id) {
            attempt.status = AttemptStatus::InProgress;
            attempt.finished_at = None;
            attempt.score_details = None;
            attempt.modified_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|a| {
                filter
                    .user_id
                    .as_ref()
                    .map(|user_id| &a.user_id == user_id)
                    .unwrap_or(true)
                    && filter
                        .quiz_id
                        .as_ref()
                        .map(|quiz_id| &a.quiz_id == quiz_id)
                        .unwrap_or(true)
                    && filter.status.map(|status| a.status == status).unwrap_or(true)
            })
            .cloned()
            .collect();

        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        let total = items.len() as i64;
        let start = offset.max(0) as usize;
        let end = (start + limit.max(0) as usize).min(items.len());

        let page = if start >= items.len() {
            vec![]
        } else {
            items[start..end].to_vec()
        };

        Ok((page, total))
    }
}

pub struct InMemoryResponseRepository {
    responses: Arc<RwLock<Vec<UserResponse>>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn insert_batch(&self, batch: Vec<UserResponse>) -> AppResult<()> {
        let mut responses = self.responses.write().await;

        for row in &batch {
            let duplicate = responses.iter().any(|existing| {
                existing.quiz_id == row.quiz_id
                    && existing.user_id == row.user_id
                    && existing.attempt_number == row.attempt_number
                    && existing.question_id == row.question_id
            });
            if duplicate {
                return Err(AppError::Conflict("Duplicate key".to_string()));
            }
        }

        responses.extend(batch);
        Ok(())
    }

    async fn delete_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<()> {
        let mut responses = self.responses.write().await;
        responses.retain(|r| {
            !(r.quiz_id == quiz_id && r.user_id == user_id && r.attempt_number == attempt_number)
        });
        Ok(())
    }

    async fn list_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<Vec<UserResponse>> {
        let responses = self.responses.read().await;
        Ok(responses
            .iter()
            .filter(|r| {
                r.quiz_id == quiz_id && r.user_id == user_id && r.attempt_number == attempt_number
            })
            .cloned()
            .collect())
    }
}

pub fn make_quiz(id: &str, attempts_allowed: i16) -> Quiz {
    let mut quiz = Quiz::new(
        "Rust Fundamentals",
        QuizParent::Course,
        "course-1",
        attempts_allowed,
        30,
        70.0,
    );
    quiz.id = id.to_string();
    quiz
}

pub fn make_question(
    id: &str,
    quiz_id: &str,
    question_type: QuestionType,
    correct_answer: &str,
    points: f64,
    position: i32,
) -> QuizQuestion {
    QuizQuestion {
        id: id.to_string(),
        quiz_id: quiz_id.to_string(),
        prompt: format!("Question {}", id),
        question_type,
        options: "[\"a\",\"b\",\"c\",\"d\"]".to_string(),
        correct_answer: correct_answer.to_string(),
        points,
        required: true,
        position,
        created_at: None,
        modified_at: None,
    }
}

/// A fully wired engine over in-memory storage.
pub struct TestEngine {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub attempts: Arc<InMemoryAttemptRepository>,
    pub responses: Arc<InMemoryResponseRepository>,
    pub attempt_service: Arc<AttemptService>,
    pub submission_service: Arc<SubmissionService>,
}

impl TestEngine {
    pub fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let questions = Arc::new(InMemoryQuestionRepository::new());
        let attempts = Arc::new(InMemoryAttemptRepository::new());
        let responses = Arc::new(InMemoryResponseRepository::new());

        let attempt_service = Arc::new(AttemptService::new(quizzes.clone(), attempts.clone()));
        let submission_service = Arc::new(SubmissionService::new(
            questions.clone(),
            responses.clone(),
            attempts.clone(),
            attempt_service.clone(),
        ));

        Self {
            quizzes,
            questions,
            attempts,
            responses,
            attempt_service,
            submission_service,
        }
    }
}
