use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{AttemptStatus, QuizAttempt},
};

#[derive(Debug, Clone, Default)]
pub struct AttemptFilter {
    pub user_id: Option<String>,
    pub quiz_id: Option<String>,
    pub status: Option<AttemptStatus>,
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Inserts a new attempt row. The `(quiz_id, user_id, attempt_number)`
    /// unique index turns a racing duplicate into `AppError::Conflict`.
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;

    async fn find_in_progress(&self, quiz_id: &str, user_id: &str)
        -> AppResult<Option<QuizAttempt>>;

    /// Attempts in any status; a consumed attempt is consumed regardless
    /// of how it ended.
    async fn count_for_user(&self, quiz_id: &str, user_id: &str) -> AppResult<i64>;

    async fn max_attempt_number(&self, quiz_id: &str, user_id: &str) -> AppResult<i16>;

    /// Atomically moves an IN_PROGRESS attempt to a terminal status,
    /// returning the updated row. `None` means the guard did not match:
    /// the attempt is missing or already terminal, and the caller decides
    /// which. Racing finishers lose here deterministically.
    async fn finish(
        &self,
        id: &str,
        status: AttemptStatus,
        finished_at: DateTime<Utc>,
        score_details: Option<String>,
    ) -> AppResult<Option<QuizAttempt>>;

    /// Compensating revert for a failed submission: back to IN_PROGRESS
    /// with the terminal fields cleared.
    async fn reopen(&self, id: &str) -> AppResult<()>;

    async fn list(
        &self,
        filter: AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)>;
}

pub struct MongoAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // Guards the max+1 attempt numbering under concurrent creates
        let sequence_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "user_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_user_attempt_unique".to_string())
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "user_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_user_status".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(sequence_index).await?;
        self.collection.create_index(status_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }

    fn filter_document(filter: &AttemptFilter) -> Document {
        let mut document = doc! {};
        if let Some(user_id) = &filter.user_id {
            document.insert("user_id", user_id);
        }
        if let Some(quiz_id) = &filter.quiz_id {
            document.insert("quiz_id", quiz_id);
        }
        if let Some(status) = filter.status {
            document.insert("status", status.as_str());
        }
        document
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_in_progress(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
                "status": AttemptStatus::InProgress.as_str(),
            })
            .await?;
        Ok(attempt)
    }

    async fn count_for_user(&self, quiz_id: &str, user_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
            })
            .await?;
        Ok(count as i64)
    }

    async fn max_attempt_number(&self, quiz_id: &str, user_id: &str) -> AppResult<i16> {
        let latest = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "user_id": user_id,
            })
            .sort(doc! { "attempt_number": -1 })
            .await?;
        Ok(latest.map(|attempt| attempt.attempt_number).unwrap_or(0))
    }

    async fn finish(
        &self,
        id: &str,
        status: AttemptStatus,
        finished_at: DateTime<Utc>,
        score_details: Option<String>,
    ) -> AppResult<Option<QuizAttempt>> {
        let mut set = doc! {
            "status": status.as_str(),
            "finished_at": finished_at.to_rfc3339(),
            "modified_at": Utc::now().to_rfc3339(),
        };
        if let Some(details) = score_details {
            set.insert("score_details", details);
        }

        let updated = self
            .collection
            .find_one_and_update(
                doc! { "id": id, "status": AttemptStatus::InProgress.as_str() },
                doc! { "$set": set },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn reopen(&self, id: &str) -> AppResult<()> {
        self.collection
            .update_one(
                doc! { "id": id },
                doc! {
                    "$set": {
                        "status": AttemptStatus::InProgress.as_str(),
                        "modified_at": Utc::now().to_rfc3339(),
                    },
                    "$unset": { "finished_at": "", "score_details": "" },
                },
            )
            .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: AttemptFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let document = Self::filter_document(&filter);

        let total = self.collection.count_documents(document.clone()).await?;

        let attempts = self
            .collection
            .find(document)
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }
}
