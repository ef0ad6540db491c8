use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::domain::{quiz_question::QuestionType, QuizQuestion};

/// Outcome of grading one question. A `warning` marks a grading anomaly
/// (unknown type, malformed stored or submitted answer) that degraded the
/// question to incorrect without failing the submission.
#[derive(Clone, Debug, PartialEq)]
pub struct GradedAnswer {
    pub is_correct: bool,
    pub points_earned: f64,
    pub warning: Option<String>,
}

impl GradedAnswer {
    fn correct(points: f64) -> Self {
        GradedAnswer {
            is_correct: true,
            points_earned: points.max(0.0),
            warning: None,
        }
    }

    fn incorrect() -> Self {
        GradedAnswer {
            is_correct: false,
            points_earned: 0.0,
            warning: None,
        }
    }

    fn degraded(warning: String) -> Self {
        GradedAnswer {
            is_correct: false,
            points_earned: 0.0,
            warning: Some(warning),
        }
    }
}

/// Pure scoring of one submitted answer against one question definition.
/// No state, no I/O; identical inputs always grade identically.
pub struct GradingService;

impl GradingService {
    /// `submitted` is `None` when the question was omitted from the batch;
    /// that grades as incorrect with zero points but no warning.
    pub fn grade(question: &QuizQuestion, submitted: Option<&Value>) -> GradedAnswer {
        let Some(value) = submitted else {
            return GradedAnswer::incorrect();
        };

        match question.question_type {
            QuestionType::McqSingle => Self::grade_single(question, value),
            QuestionType::McqMultiple => Self::grade_multiple(question, value),
            QuestionType::ShortAnswer => Self::grade_short_answer(question, value),
            QuestionType::Unknown => GradedAnswer::degraded(format!(
                "question '{}' has an unsupported type; graded as incorrect",
                question.id
            )),
        }
    }

    fn grade_single(question: &QuizQuestion, value: &Value) -> GradedAnswer {
        let Some(expected) = Self::stored_value(question).as_ref().and_then(choice_id) else {
            return GradedAnswer::degraded(format!(
                "stored correct answer for question '{}' is malformed",
                question.id
            ));
        };

        match choice_id(value) {
            Some(submitted) if submitted == expected => GradedAnswer::correct(question.points),
            Some(_) => GradedAnswer::incorrect(),
            None => GradedAnswer::degraded(format!(
                "submitted answer for question '{}' is not a choice id",
                question.id
            )),
        }
    }

    fn grade_multiple(question: &QuizQuestion, value: &Value) -> GradedAnswer {
        let Some(expected) = Self::stored_value(question).as_ref().and_then(choice_set) else {
            return GradedAnswer::degraded(format!(
                "stored correct answer for question '{}' is malformed",
                question.id
            ));
        };

        // Exact set equality, order-independent and duplicate-insensitive;
        // partial matches earn nothing
        match choice_set(value) {
            Some(submitted) if submitted == expected => GradedAnswer::correct(question.points),
            Some(_) => GradedAnswer::incorrect(),
            None => GradedAnswer::degraded(format!(
                "submitted answer for question '{}' is not a set of choice ids",
                question.id
            )),
        }
    }

    fn grade_short_answer(question: &QuizQuestion, value: &Value) -> GradedAnswer {
        let Some(expected) = Self::stored_value(question).as_ref().and_then(choice_id) else {
            return GradedAnswer::degraded(format!(
                "stored correct answer for question '{}' is malformed",
                question.id
            ));
        };

        match choice_id(value) {
            Some(submitted) if normalize(&submitted) == normalize(&expected) => {
                GradedAnswer::correct(question.points)
            }
            Some(_) => GradedAnswer::incorrect(),
            None => GradedAnswer::degraded(format!(
                "submitted answer for question '{}' is not text",
                question.id
            )),
        }
    }

    fn stored_value(question: &QuizQuestion) -> Option<Value> {
        serde_json::from_str(&question.correct_answer).ok()
    }
}

fn choice_id(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn choice_set(value: &Value) -> Option<BTreeSet<String>> {
    value
        .as_array()?
        .iter()
        .map(choice_id)
        .collect::<Option<BTreeSet<String>>>()
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}
