use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::api::handlers::{
    bracket::{generate_round_one, progress_bracket},
    export::export_matches_csv,
    matches::{create_match, get_matches, post_result},
    players::{create_player, delete_player, get_players, update_player},
    standings::get_standings,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(get_players).post(create_player))
        .route("/api/player/:id", put(update_player).delete(delete_player))
        .route("/api/standings", get(get_standings))
        .route("/api/matches", get(get_matches).post(create_match))
        .route("/api/match/:id/result", post(post_result))
        .route("/api/bracket/generate", post(generate_round_one))
        .route("/api/bracket/progress", post(progress_bracket))
        .route("/api/export/matches.csv", get(export_matches_csv))
        .with_state(state)
}
