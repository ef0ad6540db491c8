pub mod attempt_service;
pub mod grading_service;
pub mod quota_service;
pub mod submission_service;

pub use attempt_service::AttemptService;
pub use grading_service::{GradedAnswer, GradingService};
pub use quota_service::QuotaService;
pub use submission_service::{SubmissionOutcome, SubmissionService};
