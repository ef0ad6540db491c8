use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use crate::{
    errors::AppResult,
    models::domain::{AttemptStatus, Quiz, QuizAttempt, QuizQuestion},
    repositories::{AttemptFilter, AttemptRepository, QuestionRepository, QuizRepository},
};

mock! {
    pub AttemptRepo {}

    #[async_trait]
    impl AttemptRepository for AttemptRepo {
        async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
        async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
        async fn find_in_progress(
            &self,
            quiz_id: &str,
            user_id: &str,
        ) -> AppResult<Option<QuizAttempt>>;
        async fn count_for_user(&self, quiz_id: &str, user_id: &str) -> AppResult<i64>;
        async fn max_attempt_number(&self, quiz_id: &str, user_id: &str) -> AppResult<i16>;
        async fn finish(
            &self,
            id: &str,
            status: AttemptStatus,
            finished_at: DateTime<Utc>,
            score_details: Option<String>,
        ) -> AppResult<Option<QuizAttempt>>;
        async fn reopen(&self, id: &str) -> AppResult<()>;
        async fn list(
            &self,
            filter: AttemptFilter,
            offset: i64,
            limit: i64,
        ) -> AppResult<(Vec<QuizAttempt>, i64)>;
    }
}

mock! {
    pub QuizRepo {}

    #[async_trait]
    impl QuizRepository for QuizRepo {
        async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    }
}

mock! {
    pub QuestionRepo {}

    #[async_trait]
    impl QuestionRepository for QuestionRepo {
        async fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>>;
    }
}

pub mod fixtures {
    use crate::models::domain::quiz::QuizParent;
    use crate::models::domain::quiz_question::QuestionType;

    use super::*;

    pub fn test_quiz(attempts_allowed: i16) -> Quiz {
        let mut quiz = Quiz::new(
            "Test Quiz",
            QuizParent::Course,
            "course-1",
            attempts_allowed,
            30,
            70.0,
        );
        quiz.id = "quiz-1".to_string();
        quiz
    }

    pub fn test_question(
        id: &str,
        question_type: QuestionType,
        correct_answer: &str,
        points: f64,
        position: i32,
    ) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            quiz_id: "quiz-1".to_string(),
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
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::quiz_question::QuestionType;

    #[test]
    fn test_fixture_quiz_is_active() {
        let quiz = test_quiz(3);
        assert!(quiz.active);
        assert_eq!(quiz.id, "quiz-1");
        assert_eq!(quiz.attempts_allowed, 3);
    }

    #[test]
    fn test_fixture_question_belongs_to_fixture_quiz() {
        let question = test_question("q-1", QuestionType::McqSingle, "\"a\"", 10.0, 1);
        assert_eq!(question.quiz_id, "quiz-1");
        assert_eq!(question.position, 1);
    }
}
