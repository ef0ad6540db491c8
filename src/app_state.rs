use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoAttemptRepository, MongoQuestionRepository, MongoQuizRepository,
        MongoResponseRepository,
    },
    services::{AttemptService, SubmissionService},
};

#[derive(Clone)]
pub struct AppState {
    pub attempt_service: Arc<AttemptService>,
    pub submission_service: Arc<SubmissionService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let response_repository = Arc::new(MongoResponseRepository::new(&db));
        response_repository.ensure_indexes().await?;

        let attempt_service = Arc::new(AttemptService::new(
            quiz_repository,
            attempt_repository.clone(),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            question_repository,
            response_repository,
            attempt_repository,
            attempt_service.clone(),
        ));

        Ok(Self {
            attempt_service,
            submission_service,
            db,
            config: Arc::new(config),
        })
    }
}
