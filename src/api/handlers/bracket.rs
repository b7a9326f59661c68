use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;

use super::AppState;
use crate::api::models::BracketUpdatesResponse;
use crate::services::progression;

/// Seeds round 1 (ranks 3-10 into slots 1-4) from current league standings
pub async fn generate_round_one(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let min_players = state.config.bracket.min_players_for_round_one;
    match progression::seed_first_round(&mut conn) {
        Ok(Some(updates)) => {
            info!(
                "Round 1 seeded: {} inserted, {} retracted",
                updates.inserts.len(),
                updates.deletes.len()
            );
            Json(BracketUpdatesResponse::from_updates(&updates)).into_response()
        }
        Ok(None) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("At least {min_players} ranked players are required to seed the bracket"),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Bracket Error: {}", e))
            .into_response(),
    }
}

/// Re-runs knockout progression on demand and applies the diff
pub async fn progress_bracket(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match progression::run_progression(&mut conn) {
        Ok(updates) => Json(BracketUpdatesResponse::from_updates(&updates)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Bracket Error: {}", e))
            .into_response(),
    }
}
