use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeetingRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "User id cannot be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Agent id cannot be empty"))]
    pub agent_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeetingRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub agent_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListMeetingsQuery {
    pub status: Option<String>,
    pub agent_id: Option<String>,
}

/// Trigger payload posted by the call provider when a recording's
/// transcript becomes available.
#[derive(Debug, Deserialize, Validate)]
pub struct ProcessingEventRequest {
    #[validate(length(min = 1, message = "Meeting id cannot be empty"))]
    pub meeting_id: String,
    #[validate(url(message = "Transcript URL must be a valid URL"))]
    pub transcript_url: String,
}

#[derive(Debug, Serialize)]
pub struct MeetingResponse {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub agent_id: String,
    pub status: String,
    pub transcript_url: Option<String>,
    pub summary: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct MeetingListResponse {
    pub data: Vec<MeetingResponse>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
