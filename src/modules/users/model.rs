use serde::{Deserialize, Serialize};

/// A human participant. Rows are owned by the external auth layer; this
/// service only ever reads them to resolve speaker names.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}
