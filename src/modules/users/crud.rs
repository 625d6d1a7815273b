use crate::modules::users::model::User;
use bson::doc;
use mongodb::{Collection, Database};

const COLLECTION_NAME: &str = "users";

pub struct UserCrud {
    collection: Collection<User>,
}

impl UserCrud {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    /// Batch lookup used by transcript enrichment.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, mongodb::error::Error> {
        use futures::TryStreamExt;

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await?;

        cursor.try_collect().await
    }
}
