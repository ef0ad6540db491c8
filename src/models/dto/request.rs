use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttemptRequest {
    #[validate(length(min = 1, message = "quiz_id must not be empty"))]
    pub quiz_id: String,

    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
}

/// One submitted answer. `answer` stays a raw JSON value until grading
/// parses it against the question type.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: String,
    pub answer: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAttemptRequest {
    pub submission_type: Option<String>,
    pub responses: Option<Vec<AnswerInput>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeOutAttemptRequest {
    pub responses: Option<Vec<AnswerInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListAttemptsQuery {
    pub user_id: Option<String>,
    pub quiz_id: Option<String>,
    pub status: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl ListAttemptsQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttemptsLeftQuery {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
}
