use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::AppState;
use crate::api::models::StandingResponse;
use crate::services::progression;

/// League table, recomputed from the source of truth on every request
pub async fn get_standings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let standings = match progression::current_standings(&mut conn) {
        Ok(standings) => standings,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let response: Vec<StandingResponse> = standings
        .into_iter()
        .map(StandingResponse::from_standing)
        .collect();

    Json(response).into_response()
}
