use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::modules::agents::crud::AgentCrud;
use crate::modules::meetings::{
    crud::MeetingCrud,
    model::{Meeting, MeetingStatus},
    schema::{
        CreateMeetingRequest, ListMeetingsQuery, MeetingListResponse, MeetingResponse,
        MessageResponse, ProcessingEventRequest, UpdateMeetingRequest,
    },
};
use crate::AppState;

fn to_response(m: &Meeting) -> MeetingResponse {
    MeetingResponse {
        id: m.id.clone(),
        name: m.name.clone(),
        user_id: m.user_id.clone(),
        agent_id: m.agent_id.clone(),
        status: m.status.as_str().to_string(),
        transcript_url: m.transcript_url.clone(),
        summary: m.summary.clone(),
        created_at: m.created_at.to_rfc3339(),
    }
}

fn parse_status(value: &str) -> Result<MeetingStatus, (StatusCode, Json<MessageResponse>)> {
    MeetingStatus::parse(value).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: format!("Invalid status: {}", value) }),
        )
    })
}

pub async fn create_meeting(
    State(state): State<AppState>,
    Json(payload): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<MeetingResponse>), (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: e.to_string() }),
        ));
    }

    // The paired agent must exist before a meeting can be scheduled.
    let agents = AgentCrud::new(&state.db);
    match agents.find_by_id(&payload.agent_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(MessageResponse { message: "Agent not found".to_string() }),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse { message: e.to_string() }),
            ))
        }
    }

    let crud = MeetingCrud::new(&state.db, state.redis.clone());
    let meeting = Meeting::new(payload.name, payload.user_id, payload.agent_id);

    match crud.create(meeting.clone()).await {
        Ok(_) => Ok((StatusCode::CREATED, Json(to_response(&meeting)))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MeetingResponse>, (StatusCode, Json<MessageResponse>)> {
    let crud = MeetingCrud::new(&state.db, state.redis.clone());

    match crud.find_by_id(&id).await {
        Ok(Some(m)) => Ok(Json(to_response(&m))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse { message: "Meeting not found".to_string() }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

pub async fn list_meetings(
    State(state): State<AppState>,
    Query(query): Query<ListMeetingsQuery>,
) -> Result<Json<MeetingListResponse>, (StatusCode, Json<MessageResponse>)> {
    let status = match query.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let crud = MeetingCrud::new(&state.db, state.redis.clone());

    let meetings = crud
        .find_all(status, query.agent_id.as_deref(), 100)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse { message: e.to_string() }),
            )
        })?;

    let total = crud
        .count(status, query.agent_id.as_deref())
        .await
        .unwrap_or(0);

    Ok(Json(MeetingListResponse {
        data: meetings.iter().map(to_response).collect(),
        total,
    }))
}

pub async fn update_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMeetingRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: e.to_string() }),
        ));
    }

    let status = match payload.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let crud = MeetingCrud::new(&state.db, state.redis.clone());

    match crud.update(&id, payload.name, payload.agent_id, status).await {
        Ok(true) => Ok(Json(MessageResponse { message: "Updated successfully".to_string() })),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse { message: "Meeting not found".to_string() }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<MessageResponse>)> {
    let crud = MeetingCrud::new(&state.db, state.redis.clone());

    match crud.delete(&id).await {
        Ok(true) => Ok(Json(MessageResponse { message: "Deleted successfully".to_string() })),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse { message: "Meeting not found".to_string() }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

/// Transcript-ready webhook: records the transcript URL, moves the meeting
/// to processing, and dispatches one summarization run in the background.
/// Runs for different meetings may overlap freely; duplicate events for the
/// same meeting are last-write-wins.
pub async fn process_meeting(
    State(state): State<AppState>,
    Json(payload): Json<ProcessingEventRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: e.to_string() }),
        ));
    }

    let crud = MeetingCrud::new(&state.db, state.redis.clone());

    match crud.mark_processing(&payload.meeting_id, &payload.transcript_url).await {
        Ok(true) => {}
        Ok(false) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(MessageResponse { message: "Meeting not found".to_string() }),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse { message: e.to_string() }),
            ))
        }
    }

    let summarizer = state.summarizer.clone();
    let meeting_id = payload.meeting_id;
    let transcript_url = payload.transcript_url;

    tokio::spawn(async move {
        if let Err(err) = summarizer.run(&meeting_id, &transcript_url).await {
            tracing::error!(%meeting_id, error = %err, "transcript processing failed");
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse { message: "Processing started".to_string() }),
    ))
}
