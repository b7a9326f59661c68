use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type MatchId = i64;

/// Tournament stage a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    League,
    KnockoutR1,
    KnockoutR2,
    Semifinal,
    Final,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::League => "league",
            Phase::KnockoutR1 => "knockout_r1",
            Phase::KnockoutR2 => "knockout_r2",
            Phase::Semifinal => "semifinal",
            Phase::Final => "final",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "league" => Some(Phase::League),
            "knockout_r1" => Some(Phase::KnockoutR1),
            "knockout_r2" => Some(Phase::KnockoutR2),
            "semifinal" => Some(Phase::Semifinal),
            "final" => Some(Phase::Final),
            _ => None,
        }
    }

    pub fn is_knockout(&self) -> bool {
        !matches!(self, Phase::League)
    }

    /// Phase the winners of this round advance to
    pub fn next_phase(&self) -> Option<Phase> {
        match self {
            Phase::League => None,
            Phase::KnockoutR1 => Some(Phase::KnockoutR2),
            Phase::KnockoutR2 => Some(Phase::Semifinal),
            Phase::Semifinal => Some(Phase::Final),
            Phase::Final => None,
        }
    }

    /// Number of matches that make up a full round of this phase
    pub fn expected_match_count(&self) -> usize {
        match self {
            Phase::League => 0,
            Phase::KnockoutR1 => 4,
            Phase::KnockoutR2 => 2,
            Phase::Semifinal => 2,
            Phase::Final => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(MatchStatus::Scheduled),
            "completed" => Some(MatchStatus::Completed),
            _ => None,
        }
    }
}

/// Player data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub department: Option<String>,
    pub tier: i32,
}

impl Player {
    /// Tournament points an opponent earns for defeating this player.
    /// Beating a stronger tier pays more: tier 1 → 4 pts down to tier 4 → 1 pt.
    pub fn points_for_defeating(&self) -> i32 {
        match self.tier {
            1 => 4,
            2 => 3,
            3 => 2,
            _ => 1,
        }
    }
}

/// One set of a best-of-three match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub player1: i32,
    pub player2: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub phase: Phase,
    pub status: MatchStatus,
    pub sets: Vec<SetScore>,
    pub winner_id: Option<PlayerId>,
    pub knockout_position: Option<i32>,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Unordered participant comparison
    pub fn has_players(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player1_id == a && self.player2_id == b)
            || (self.player1_id == b && self.player2_id == a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Player1,
    Player2,
}

/// Which side a submitted best-of-three result awards the match to.
/// A result is only acceptable when one side holds a net set majority
/// greater than one; anything else (1-1, 2-1, no sets) returns None and
/// the submission is rejected.
pub fn winning_side(sets: &[SetScore]) -> Option<MatchSide> {
    let p1_sets = sets.iter().filter(|s| s.player1 > s.player2).count() as i32;
    let p2_sets = sets.iter().filter(|s| s.player2 > s.player1).count() as i32;

    match p1_sets - p2_sets {
        net if net > 1 => Some(MatchSide::Player1),
        net if net < -1 => Some(MatchSide::Player2),
        _ => None,
    }
}

/// Derived league table entry, recomputed from the match set on every request
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStanding {
    pub player: Player,
    pub rank: usize,
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

impl PlayerStanding {
    pub fn zeroed(player: Player) -> Self {
        Self {
            player,
            rank: 0,
            matches_played: 0,
            wins: 0,
            losses: 0,
            points: 0,
            sets_won: 0,
            sets_lost: 0,
            set_diff: 0,
            points_scored: 0,
            points_conceded: 0,
            point_diff: 0,
        }
    }
}

/// Match the bracket engine wants created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub phase: Phase,
    pub knockout_position: Option<i32>,
}

impl NewMatch {
    pub fn has_players(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player1_id == a && self.player2_id == b)
            || (self.player1_id == b && self.player2_id == a)
    }
}

/// Diff produced by the bracket engine; callers apply it to storage
#[derive(Debug, Clone, Default)]
pub struct BracketUpdates {
    pub inserts: Vec<NewMatch>,
    pub deletes: Vec<MatchId>,
}

impl BracketUpdates {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }
}
