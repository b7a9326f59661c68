use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::{AppState, MatchParams};
use crate::api::models::{MatchResponse, ResultPayload, ScheduleMatchPayload};
use crate::database::{self, MatchFilter};
use crate::domain::{winning_side, MatchSide, MatchStatus, NewMatch, Phase, SetScore};
use crate::services::progression;

pub async fn get_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchParams>,
) -> impl IntoResponse {
    let mut filter = MatchFilter::default();
    if let Some(phase) = &params.phase {
        match Phase::parse(phase) {
            Some(parsed) => filter.phase = Some(parsed),
            None => {
                return (StatusCode::UNPROCESSABLE_ENTITY, format!("Unknown phase: {phase}"))
                    .into_response()
            }
        }
    }
    if let Some(status) = &params.status {
        match MatchStatus::parse(status) {
            Some(parsed) => filter.status = Some(parsed),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown status: {status}"),
                )
                    .into_response()
            }
        }
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::matches::list_filtered(&mut conn, &filter) {
        Ok(rows) => {
            let matches: Vec<MatchResponse> = rows
                .into_iter()
                .map(|row| MatchResponse::from_match(row.into_match()))
                .collect();
            Json(matches).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
            .into_response(),
    }
}

pub async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleMatchPayload>,
) -> impl IntoResponse {
    let Some(phase) = Phase::parse(&payload.phase) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown phase: {}", payload.phase),
        )
            .into_response();
    };
    if payload.player1_id == payload.player2_id {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "A match needs two distinct players",
        )
            .into_response();
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    for player_id in [payload.player1_id, payload.player2_id] {
        match database::players::find_by_id(&mut conn, player_id) {
            Ok(Some(_)) => {}
            Ok(None) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("Unknown player: {player_id}"),
                )
                    .into_response()
            }
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response()
            }
        }
    }

    let new_match = NewMatch {
        player1_id: payload.player1_id,
        player2_id: payload.player2_id,
        phase,
        knockout_position: payload.knockout_position,
    };
    match database::matches::insert_scheduled(&mut conn, &new_match) {
        Ok(row) => (
            StatusCode::CREATED,
            Json(MatchResponse::from_match(row.into_match())),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e))
            .into_response(),
    }
}

/// Records a best-of-three result. The submitted sets must show a net set
/// majority greater than one for one side; the winner is derived from the
/// sets, never supplied by the client. Knockout results immediately trigger
/// bracket reconciliation so later rounds stay consistent with edits.
pub async fn post_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<ResultPayload>,
) -> impl IntoResponse {
    let max_sets = state.config.scoring.max_sets;
    if payload.sets.is_empty() || payload.sets.len() > max_sets {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("A result must contain between 1 and {max_sets} sets"),
        )
            .into_response();
    }

    let sets: Vec<SetScore> = payload
        .sets
        .iter()
        .map(|s| s.into_set_score())
        .collect();
    if sets.iter().any(|s| s.player1 < 0 || s.player2 < 0) {
        return (StatusCode::UNPROCESSABLE_ENTITY, "Set scores must not be negative")
            .into_response();
    }

    let Some(side) = winning_side(&sets) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            "The result must show a clear two-set majority for one player",
        )
            .into_response();
    };

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let existing = match database::matches::find_by_id(&mut conn, id) {
        Ok(Some(row)) => row.into_match(),
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response()
        }
    };

    let winner_id = match side {
        MatchSide::Player1 => existing.player1_id,
        MatchSide::Player2 => existing.player2_id,
    };

    let updated = match database::matches::record_result(&mut conn, id, &sets, winner_id) {
        Ok(Some(row)) => row.into_match(),
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e))
                .into_response()
        }
    };

    if updated.phase.is_knockout() {
        if let Err(e) = progression::run_progression(&mut conn) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Bracket Update Error: {}", e),
            )
                .into_response();
        }
    }

    Json(MatchResponse::from_match(updated)).into_response()
}
