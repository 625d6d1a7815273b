use crate::modules::agents::model::Agent;
use bson::doc;
use mongodb::{Collection, Database};

const COLLECTION_NAME: &str = "agents";

pub struct AgentCrud {
    collection: Collection<Agent>,
}

impl AgentCrud {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    pub async fn create(&self, agent: Agent) -> Result<String, mongodb::error::Error> {
        self.collection.insert_one(&agent).await?;
        Ok(agent.id)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Agent>, mongodb::error::Error> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    /// Batch lookup used by transcript enrichment.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Agent>, mongodb::error::Error> {
        use futures::TryStreamExt;

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?;

        cursor.try_collect().await
    }

    pub async fn find_all(&self, limit: i64) -> Result<Vec<Agent>, mongodb::error::Error> {
        use futures::TryStreamExt;

        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;

        cursor.try_collect().await
    }

    pub async fn count(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.count_documents(doc! {}).await
    }

    pub async fn update(
        &self,
        id: &str,
        name: Option<String>,
        instructions: Option<String>,
    ) -> Result<bool, mongodb::error::Error> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = name {
            set.insert("name", name);
        }
        if let Some(instructions) = instructions {
            set.insert("instructions", instructions);
        }

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
