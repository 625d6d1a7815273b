use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::modules::meetings::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/meetings", post(controller::create_meeting))
        .route("/api/meetings", get(controller::list_meetings))
        .route("/api/meetings/{id}", get(controller::get_meeting))
        .route("/api/meetings/{id}", put(controller::update_meeting))
        .route("/api/meetings/{id}", delete(controller::delete_meeting))
        .route("/api/webhooks/processing", post(controller::process_meeting))
}
