use serde::{Deserialize, Serialize};

use crate::domain::{BracketUpdates, Match, Player, PlayerStanding, SetScore};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub name: String,
    pub department: Option<String>,
    pub tier: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub tier: i32,
}

impl PlayerResponse {
    pub fn from_player(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            department: player.department,
            tier: player.tier,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingResponse {
    pub rank: usize,
    pub player: PlayerResponse,
    pub matches_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub points: i32,
    pub sets_won: i32,
    pub sets_lost: i32,
    pub set_diff: i32,
    pub points_scored: i32,
    pub points_conceded: i32,
    pub point_diff: i32,
}

impl StandingResponse {
    pub fn from_standing(standing: PlayerStanding) -> Self {
        Self {
            rank: standing.rank,
            player: PlayerResponse::from_player(standing.player),
            matches_played: standing.matches_played,
            wins: standing.wins,
            losses: standing.losses,
            points: standing.points,
            sets_won: standing.sets_won,
            sets_lost: standing.sets_lost,
            set_diff: standing.set_diff,
            points_scored: standing.points_scored,
            points_conceded: standing.points_conceded,
            point_diff: standing.point_diff,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct SetScorePayload {
    pub player1: i32,
    pub player2: i32,
}

impl SetScorePayload {
    pub fn into_set_score(self) -> SetScore {
        SetScore {
            player1: self.player1,
            player2: self.player2,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub phase: String,
    pub status: String,
    pub sets: Vec<SetScorePayload>,
    pub winner_id: Option<i64>,
    pub knockout_position: Option<i32>,
}

impl MatchResponse {
    pub fn from_match(m: Match) -> Self {
        Self {
            id: m.id,
            player1_id: m.player1_id,
            player2_id: m.player2_id,
            phase: m.phase.as_str().to_string(),
            status: m.status.as_str().to_string(),
            sets: m
                .sets
                .iter()
                .map(|s| SetScorePayload {
                    player1: s.player1,
                    player2: s.player2,
                })
                .collect(),
            winner_id: m.winner_id,
            knockout_position: m.knockout_position,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMatchPayload {
    pub player1_id: i64,
    pub player2_id: i64,
    pub phase: String,
    pub knockout_position: Option<i32>,
}

#[derive(Deserialize)]
pub struct ResultPayload {
    pub sets: Vec<SetScorePayload>,
}

/// Counts of applied bracket mutations
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketUpdatesResponse {
    pub inserted: usize,
    pub deleted: usize,
}

impl BracketUpdatesResponse {
    pub fn from_updates(updates: &BracketUpdates) -> Self {
        Self {
            inserted: updates.inserts.len(),
            deleted: updates.deletes.len(),
        }
    }
}
