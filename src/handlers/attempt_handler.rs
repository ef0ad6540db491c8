use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::AttemptStatus,
        dto::{
            request::{
                AttemptsLeftQuery, CreateAttemptRequest, ListAttemptsQuery, SubmitAttemptRequest,
                TimeOutAttemptRequest,
            },
            response::{
                AttemptSummaryDto, AttemptsLeftDto, GradedResponseDto, PagedAttemptsDto,
                SubmissionResultDto,
            },
        },
    },
    repositories::AttemptFilter,
    services::SubmissionOutcome,
};

fn submission_result(outcome: SubmissionOutcome) -> SubmissionResultDto {
    SubmissionResultDto {
        attempt: AttemptSummaryDto::from(outcome.attempt),
        summary: outcome.summary,
        responses: outcome.responses.iter().map(GradedResponseDto::from).collect(),
        warnings: outcome.warnings,
    }
}

#[post("/api/attempts")]
async fn create_attempt(
    state: web::Data<AppState>,
    request: web::Json<CreateAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let (attempt, remaining_attempts) = state
        .attempt_service
        .create_attempt(&request.quiz_id, &request.user_id)
        .await?;

    let summary = AttemptSummaryDto::from(attempt).with_attempts_left(remaining_attempts);
    Ok(HttpResponse::Created().json(summary))
}

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempt = state.attempt_service.get_attempt(&id).await?;
    Ok(HttpResponse::Ok().json(AttemptSummaryDto::from(attempt)))
}

#[get("/api/attempts")]
async fn list_attempts(
    state: web::Data<AppState>,
    query: web::Query<ListAttemptsQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let status = match &query.status {
        Some(raw) => Some(AttemptStatus::parse(raw).ok_or_else(|| {
            AppError::ValidationError(format!("'{}' is not a valid attempt status", raw))
        })?),
        None => None,
    };

    let filter = AttemptFilter {
        user_id: query.user_id.clone(),
        quiz_id: query.quiz_id.clone(),
        status,
    };

    let (attempts, total) = state
        .attempt_service
        .list_attempts(filter, query.offset(), query.limit())
        .await?;

    Ok(HttpResponse::Ok().json(PagedAttemptsDto {
        items: attempts.into_iter().map(AttemptSummaryDto::from).collect(),
        total,
        offset: query.offset(),
        limit: query.limit(),
    }))
}

#[post("/api/attempts/{id}/complete")]
async fn complete_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let outcome = state
        .submission_service
        .submit(&id, request.responses, request.submission_type)
        .await?;
    Ok(HttpResponse::Ok().json(submission_result(outcome)))
}

#[post("/api/attempts/{id}/abandon")]
async fn abandon_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempt = state.attempt_service.abandon(&id).await?;
    Ok(HttpResponse::Ok().json(AttemptSummaryDto::from(attempt)))
}

#[post("/api/attempts/{id}/timeout")]
async fn time_out_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<TimeOutAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = state
        .submission_service
        .submit_on_timeout(&id, request.into_inner().responses)
        .await?;
    Ok(HttpResponse::Ok().json(submission_result(outcome)))
}

#[get("/api/quizzes/{quiz_id}/attempts-left")]
async fn attempts_left(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<AttemptsLeftQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let left = state
        .attempt_service
        .attempts_left(&quiz_id, &query.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(AttemptsLeftDto {
        quiz_id: quiz_id.into_inner(),
        user_id: query.into_inner().user_id,
        attempts_left: left,
    }))
}

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.health_check().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
