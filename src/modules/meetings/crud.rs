use crate::modules::meetings::model::{Meeting, MeetingStatus};
use bson::{doc, Document};
use mongodb::{Collection, Database};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

const COLLECTION_NAME: &str = "meetings";
const CACHE_TTL: u64 = 3600; // 1 hour

pub struct MeetingCrud {
    collection: Collection<Meeting>,
    redis: ConnectionManager,
}

impl MeetingCrud {
    pub fn new(db: &Database, redis: ConnectionManager) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
            redis,
        }
    }

    fn cache_key(id: &str) -> String {
        format!("meeting:{}", id)
    }

    async fn invalidate(&self, id: &str) {
        let cache_key = Self::cache_key(id);
        let mut redis = self.redis.clone();
        let _: Result<(), _> = redis.del(&cache_key).await;
    }

    pub async fn create(&self, meeting: Meeting) -> Result<String, mongodb::error::Error> {
        self.collection.insert_one(&meeting).await?;
        Ok(meeting.id)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Meeting>, mongodb::error::Error> {
        // Try cache first
        let cache_key = Self::cache_key(id);
        let mut redis = self.redis.clone();

        if let Ok(cached) = redis.get::<_, String>(&cache_key).await {
            if let Ok(meeting) = serde_json::from_str::<Meeting>(&cached) {
                return Ok(Some(meeting));
            }
        }

        // Fallback to database
        let meeting = self.collection.find_one(doc! { "_id": id }).await?;

        // Cache the result
        if let Some(ref m) = meeting {
            if let Ok(json) = serde_json::to_string(m) {
                let _: Result<(), _> = redis.set_ex(&cache_key, json, CACHE_TTL).await;
            }
        }

        Ok(meeting)
    }

    fn list_filter(status: Option<MeetingStatus>, agent_id: Option<&str>) -> Document {
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }
        if let Some(agent_id) = agent_id {
            filter.insert("agent_id", agent_id);
        }
        filter
    }

    pub async fn find_all(
        &self,
        status: Option<MeetingStatus>,
        agent_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Meeting>, mongodb::error::Error> {
        use futures::TryStreamExt;

        let cursor = self
            .collection
            .find(Self::list_filter(status, agent_id))
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;

        cursor.try_collect().await
    }

    pub async fn count(
        &self,
        status: Option<MeetingStatus>,
        agent_id: Option<&str>,
    ) -> Result<u64, mongodb::error::Error> {
        self.collection
            .count_documents(Self::list_filter(status, agent_id))
            .await
    }

    pub async fn count_by_agent(&self, agent_id: &str) -> Result<u64, mongodb::error::Error> {
        self.collection
            .count_documents(doc! { "agent_id": agent_id })
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        name: Option<String>,
        agent_id: Option<String>,
        status: Option<MeetingStatus>,
    ) -> Result<bool, mongodb::error::Error> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = name {
            set.insert("name", name);
        }
        if let Some(agent_id) = agent_id {
            set.insert("agent_id", agent_id);
        }
        if let Some(status) = status {
            set.insert("status", status.as_str());
        }

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;

        self.invalidate(id).await;

        Ok(result.matched_count > 0)
    }

    /// Record the transcript location and move the meeting into processing,
    /// just before a pipeline run is dispatched for it.
    pub async fn mark_processing(
        &self,
        id: &str,
        transcript_url: &str,
    ) -> Result<bool, mongodb::error::Error> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "transcript_url": transcript_url,
                        "status": MeetingStatus::Processing.as_str(),
                        "updated_at": bson::DateTime::now()
                    }
                },
            )
            .await?;

        self.invalidate(id).await;

        Ok(result.matched_count > 0)
    }

    /// Terminal write of the summarization pipeline: set the summary and
    /// complete the meeting in one update.
    pub async fn complete_with_summary(
        &self,
        id: &str,
        summary: &str,
    ) -> Result<bool, mongodb::error::Error> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "summary": summary,
                        "status": MeetingStatus::Completed.as_str(),
                        "updated_at": bson::DateTime::now()
                    }
                },
            )
            .await?;

        self.invalidate(id).await;

        Ok(result.matched_count > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, mongodb::error::Error> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        self.invalidate(id).await;

        Ok(result.deleted_count > 0)
    }
}
