use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An AI persona that can join meetings: a display name plus the
/// instruction prompt the realtime layer hands to the model.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Agent {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub user_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(name: String, instructions: String, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            instructions,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
