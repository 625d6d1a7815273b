use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::modules::agents::{
    crud::AgentCrud,
    model::Agent,
    schema::{
        AgentDetailResponse, AgentListResponse, AgentResponse, CreateAgentRequest,
        MessageResponse, UpdateAgentRequest,
    },
};
use crate::modules::meetings::crud::MeetingCrud;
use crate::AppState;

fn to_response(agent: &Agent) -> AgentResponse {
    AgentResponse {
        id: agent.id.clone(),
        name: agent.name.clone(),
        instructions: agent.instructions.clone(),
        user_id: agent.user_id.clone(),
        created_at: agent.created_at.to_rfc3339(),
    }
}

pub async fn create_agent(
    State(state): State<AppState>,
    Json(payload): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentResponse>), (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: e.to_string() }),
        ));
    }

    let crud = AgentCrud::new(&state.db);
    let agent = Agent::new(payload.name, payload.instructions, payload.user_id);

    match crud.create(agent.clone()).await {
        Ok(_) => Ok((StatusCode::CREATED, Json(to_response(&agent)))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentDetailResponse>, (StatusCode, Json<MessageResponse>)> {
    let crud = AgentCrud::new(&state.db);

    let agent = match crud.find_by_id(&id).await {
        Ok(Some(agent)) => agent,
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
    };

    let meetings = MeetingCrud::new(&state.db, state.redis.clone());
    let meeting_count = meetings.count_by_agent(&id).await.unwrap_or(0);

    Ok(Json(AgentDetailResponse {
        id: agent.id,
        name: agent.name,
        instructions: agent.instructions,
        user_id: agent.user_id,
        meeting_count,
        created_at: agent.created_at.to_rfc3339(),
    }))
}

pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<AgentListResponse>, (StatusCode, Json<MessageResponse>)> {
    let crud = AgentCrud::new(&state.db);

    let agents = crud.find_all(100).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )
    })?;

    let total = crud.count().await.unwrap_or(0);

    Ok(Json(AgentListResponse {
        data: agents.iter().map(to_response).collect(),
        total,
    }))
}

pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAgentRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<MessageResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(MessageResponse { message: e.to_string() }),
        ));
    }

    let crud = AgentCrud::new(&state.db);

    match crud.update(&id, payload.name, payload.instructions).await {
        Ok(true) => Ok(Json(MessageResponse { message: "Updated successfully".to_string() })),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse { message: "Agent not found".to_string() }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}

pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<MessageResponse>)> {
    let crud = AgentCrud::new(&state.db);

    match crud.delete(&id).await {
        Ok(true) => Ok(Json(MessageResponse { message: "Deleted successfully".to_string() })),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(MessageResponse { message: "Agent not found".to_string() }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse { message: e.to_string() }),
        )),
    }
}
