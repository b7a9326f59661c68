#[derive(Debug, Clone)]
pub struct ScoringSettings {
    /// Maximum number of sets in a best-of-three result
    pub max_sets: usize,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self { max_sets: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct BracketSettings {
    /// Ranked players needed before round 1 can be seeded (ranks 3-10 play,
    /// ranks 1-2 take semifinal byes)
    pub min_players_for_round_one: usize,
}

impl Default for BracketSettings {
    fn default() -> Self {
        Self {
            min_players_for_round_one: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub bracket: BracketSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "club_tournament.db".to_string())
}
