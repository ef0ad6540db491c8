pub mod attempt_repository;
pub mod question_repository;
pub mod quiz_repository;
pub mod response_repository;

pub use attempt_repository::{AttemptFilter, AttemptRepository, MongoAttemptRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use response_repository::{MongoResponseRepository, ResponseRepository};
