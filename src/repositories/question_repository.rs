use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::QuizQuestion};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Questions for one quiz, ordered by `position`.
    async fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>>;
}

pub struct MongoQuestionRepository {
    collection: Collection<QuizQuestion>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_position_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "position": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_position".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_position_index).await?;

        log::info!("Successfully created indexes for quiz_questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "position": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }
}
