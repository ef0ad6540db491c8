pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod user_response;
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptStatus, QuizAttempt, ScoreSummary};
pub use quiz_question::QuizQuestion;
pub use user_response::UserResponse;
