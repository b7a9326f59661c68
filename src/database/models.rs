use chrono::NaiveDateTime;

use crate::domain::{Match, MatchStatus, Phase, Player, SetScore};

#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub tier: i32,
    pub created_at: Option<NaiveDateTime>,
}

impl PlayerRow {
    pub fn into_player(self) -> Player {
        Player {
            id: self.id,
            name: self.name,
            department: self.department,
            tier: self.tier,
        }
    }
}

/// Flat match row; set scores live in three nullable column pairs
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub phase: String,
    pub status: String,
    pub set_scores: [Option<i32>; 6],
    pub winner_id: Option<i64>,
    pub knockout_position: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}

impl MatchRow {
    /// Unknown phase/status strings map to league/scheduled rather than
    /// failing; the schema only ever writes known tags.
    pub fn into_match(self) -> Match {
        let mut sets = Vec::new();
        for pair in self.set_scores.chunks(2) {
            if let (Some(player1), Some(player2)) = (pair[0], pair[1]) {
                sets.push(SetScore { player1, player2 });
            }
        }

        Match {
            id: self.id,
            player1_id: self.player1_id,
            player2_id: self.player2_id,
            phase: Phase::parse(&self.phase).unwrap_or(Phase::League),
            status: MatchStatus::parse(&self.status).unwrap_or(MatchStatus::Scheduled),
            sets,
            winner_id: self.winner_id,
            knockout_position: self.knockout_position,
        }
    }
}

/// Optional phase/status narrowing for match listings
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub phase: Option<Phase>,
    pub status: Option<MatchStatus>,
}
