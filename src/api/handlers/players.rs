use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::AppState;
use crate::api::models::{PlayerPayload, PlayerResponse};
use crate::database;

fn validate_payload(payload: &PlayerPayload) -> Option<String> {
    if payload.name.trim().is_empty() {
        return Some("Player name must not be empty".to_string());
    }
    if !(1..=4).contains(&payload.tier) {
        return Some("Tier must be between 1 and 4".to_string());
    }
    None
}

pub async fn get_players(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let rows = match database::players::list_all(&mut conn) {
        Ok(rows) => rows,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let players: Vec<PlayerResponse> = rows
        .into_iter()
        .map(|row| PlayerResponse::from_player(row.into_player()))
        .collect();

    Json(players).into_response()
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlayerPayload>,
) -> impl IntoResponse {
    if let Some(message) = validate_payload(&payload) {
        return (StatusCode::UNPROCESSABLE_ENTITY, message).into_response();
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::insert_player(
        &mut conn,
        payload.name.trim(),
        payload.department.as_deref(),
        payload.tier,
    ) {
        Ok(row) => (
            StatusCode::CREATED,
            Json(PlayerResponse::from_player(row.into_player())),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e))
            .into_response(),
    }
}

pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<PlayerPayload>,
) -> impl IntoResponse {
    if let Some(message) = validate_payload(&payload) {
        return (StatusCode::UNPROCESSABLE_ENTITY, message).into_response();
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::update_player(
        &mut conn,
        id,
        payload.name.trim(),
        payload.department.as_deref(),
        payload.tier,
    ) {
        Ok(Some(row)) => Json(PlayerResponse::from_player(row.into_player())).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
            .into_response(),
    }
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::delete_player(&mut conn, id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Delete Error: {}", e))
            .into_response(),
    }
}
