use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::UserResponse};

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Persists one submission's graded rows. An empty batch is a no-op.
    async fn insert_batch(&self, responses: Vec<UserResponse>) -> AppResult<()>;

    /// Removes the rows of one attempt; used only to roll back a
    /// submission whose batch insert failed partway.
    async fn delete_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<()>;

    async fn list_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<Vec<UserResponse>>;
}

pub struct MongoResponseRepository {
    collection: Collection<UserResponse>,
}

impl MongoResponseRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("user_responses");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for user_responses collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One row per question per attempt
        let attempt_question_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "user_id": 1, "attempt_number": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_question_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_question_index).await?;

        log::info!("Successfully created indexes for user_responses collection");
        Ok(())
    }
}

#[async_trait]
impl ResponseRepository for MongoResponseRepository {
    async fn insert_batch(&self, responses: Vec<UserResponse>) -> AppResult<()> {
        if responses.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(&responses).await?;
        Ok(())
    }

    async fn delete_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<()> {
        self.collection
            .delete_many(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
                "attempt_number": attempt_number as i32,
            })
            .await?;
        Ok(())
    }

    async fn list_for_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        attempt_number: i16,
    ) -> AppResult<Vec<UserResponse>> {
        let responses = self
            .collection
            .find(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
                "attempt_number": attempt_number as i32,
            })
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }
}
