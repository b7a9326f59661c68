use serde::Deserialize;

use crate::config::AppConfig;
use crate::database::DbPool;

pub mod bracket;
pub mod export;
pub mod matches;
pub mod players;
pub mod standings;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub phase: Option<String>,
    pub status: Option<String>,
}
