use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::modules::agents::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/agents", post(controller::create_agent))
        .route("/api/agents", get(controller::list_agents))
        .route("/api/agents/{id}", get(controller::get_agent))
        .route("/api/agents/{id}", put(controller::update_agent))
        .route("/api/agents/{id}", delete(controller::delete_agent))
}
