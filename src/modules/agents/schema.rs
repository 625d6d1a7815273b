use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Instructions cannot be empty"))]
    pub instructions: String,
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAgentRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Instructions cannot be empty"))]
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AgentDetailResponse {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub user_id: String,
    pub meeting_count: u64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AgentListResponse {
    pub data: Vec<AgentResponse>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
