use anyhow::Result;
use log::info;

use crate::bracket;
use crate::database::{self, DbConn};
use crate::domain::{BracketUpdates, Match, Player, PlayerStanding};
use crate::standings::calculate_standings;

/// Full tournament state as the pure core consumes it
pub fn load_state(conn: &mut DbConn) -> Result<(Vec<Player>, Vec<Match>)> {
    let players = database::players::list_all(conn)?
        .into_iter()
        .map(|row| row.into_player())
        .collect();
    let matches = database::matches::list_all(conn)?
        .into_iter()
        .map(|row| row.into_match())
        .collect();
    Ok((players, matches))
}

/// Standings are recomputed from the full match table on every call;
/// nothing derived is ever persisted.
pub fn current_standings(conn: &mut DbConn) -> Result<Vec<PlayerStanding>> {
    let (players, matches) = load_state(conn)?;
    Ok(calculate_standings(&players, &matches))
}

/// Runs the bracket engine against the stored knockout matches and applies
/// the resulting diff. Safe to call after every result entry or edit.
pub fn run_progression(conn: &mut DbConn) -> Result<BracketUpdates> {
    let (players, matches) = load_state(conn)?;
    let standings = calculate_standings(&players, &matches);
    let knockout: Vec<Match> = matches
        .into_iter()
        .filter(|m| m.phase.is_knockout())
        .collect();

    let updates = bracket::knockout_round_updates(&knockout, &standings);
    apply_updates(conn, &updates)?;
    Ok(updates)
}

/// Seeds or re-seeds round 1 from current standings. Returns None when the
/// league has too few ranked players to fill the draw.
pub fn seed_first_round(conn: &mut DbConn) -> Result<Option<BracketUpdates>> {
    let (players, matches) = load_state(conn)?;
    let standings = calculate_standings(&players, &matches);
    let knockout: Vec<Match> = matches
        .into_iter()
        .filter(|m| m.phase.is_knockout())
        .collect();

    match bracket::first_round_updates(&knockout, &standings) {
        Some(updates) => {
            apply_updates(conn, &updates)?;
            Ok(Some(updates))
        }
        None => Ok(None),
    }
}

/// The side-effecting half of the reconciliation: deletes retracted
/// scheduled matches, then inserts the new pairings.
pub fn apply_updates(conn: &mut DbConn, updates: &BracketUpdates) -> Result<()> {
    if updates.is_empty() {
        return Ok(());
    }

    for id in &updates.deletes {
        database::matches::delete_scheduled(conn, *id)?;
    }
    for new_match in &updates.inserts {
        database::matches::insert_scheduled(conn, new_match)?;
    }

    info!(
        "Applied bracket updates: {} inserted, {} retracted",
        updates.inserts.len(),
        updates.deletes.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{connection, matches, players, setup};
    use crate::domain::{NewMatch, Phase, SetScore};

    fn test_conn() -> DbConn {
        let pool = connection::create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        setup::reset_database(&mut conn).unwrap();
        conn
    }

    fn seed_players(conn: &mut DbConn, count: usize) -> Vec<i64> {
        (0..count)
            .map(|i| {
                players::insert_player(conn, &format!("player {i}"), None, 2)
                    .unwrap()
                    .id
            })
            .collect()
    }

    fn straight_sets() -> Vec<SetScore> {
        vec![
            SetScore {
                player1: 11,
                player2: 5,
            },
            SetScore {
                player1: 11,
                player2: 7,
            },
        ]
    }

    fn complete_round_one(conn: &mut DbConn, ids: &[i64]) {
        // Slots 1-4 with ids[0..4] as player1 and ids[4..8] as player2;
        // player1 wins each slot.
        for slot in 0..4 {
            let row = matches::insert_scheduled(
                conn,
                &NewMatch {
                    player1_id: ids[slot],
                    player2_id: ids[slot + 4],
                    phase: Phase::KnockoutR1,
                    knockout_position: Some(slot as i32 + 1),
                },
            )
            .unwrap();
            matches::record_result(conn, row.id, &straight_sets(), ids[slot]).unwrap();
        }
    }

    #[test]
    fn test_run_progression_creates_round_two() {
        let mut conn = test_conn();
        let ids = seed_players(&mut conn, 10);
        complete_round_one(&mut conn, &ids);

        let updates = run_progression(&mut conn).unwrap();
        assert_eq!(updates.inserts.len(), 2);
        assert!(updates.deletes.is_empty());

        let stored = matches::list_filtered(
            &mut conn,
            &crate::database::MatchFilter {
                phase: Some(Phase::KnockoutR2),
                status: None,
            },
        )
        .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|m| m.status == "scheduled"));
    }

    #[test]
    fn test_run_progression_is_idempotent() {
        let mut conn = test_conn();
        let ids = seed_players(&mut conn, 10);
        complete_round_one(&mut conn, &ids);

        let first = run_progression(&mut conn).unwrap();
        assert!(!first.is_empty());

        let second = run_progression(&mut conn).unwrap();
        assert!(second.is_empty());
        assert_eq!(matches::list_knockout(&mut conn).unwrap().len(), 6);
    }

    #[test]
    fn test_edited_winner_retracts_and_replaces_round_two() {
        let mut conn = test_conn();
        let ids = seed_players(&mut conn, 10);
        complete_round_one(&mut conn, &ids);
        run_progression(&mut conn).unwrap();

        // Correct slot 1: player2 of that match actually won
        let slot1 = matches::list_filtered(
            &mut conn,
            &crate::database::MatchFilter {
                phase: Some(Phase::KnockoutR1),
                status: None,
            },
        )
        .unwrap()
        .into_iter()
        .find(|m| m.knockout_position == Some(1))
        .unwrap();
        matches::record_result(&mut conn, slot1.id, &straight_sets(), ids[4]).unwrap();

        let updates = run_progression(&mut conn).unwrap();
        assert_eq!(updates.deletes.len(), 1);
        assert_eq!(updates.inserts.len(), 1);

        let round_two = matches::list_filtered(
            &mut conn,
            &crate::database::MatchFilter {
                phase: Some(Phase::KnockoutR2),
                status: None,
            },
        )
        .unwrap();
        assert_eq!(round_two.len(), 2);
        assert!(round_two
            .iter()
            .any(|m| m.player1_id == ids[4] || m.player2_id == ids[4]));
    }

    #[test]
    fn test_seed_first_round_requires_ten_players() {
        let mut conn = test_conn();
        seed_players(&mut conn, 9);
        assert!(seed_first_round(&mut conn).unwrap().is_none());
    }

    #[test]
    fn test_seed_first_round_inserts_four_matches() {
        let mut conn = test_conn();
        seed_players(&mut conn, 10);

        let updates = seed_first_round(&mut conn).unwrap().unwrap();
        assert_eq!(updates.inserts.len(), 4);

        let round_one = matches::list_filtered(
            &mut conn,
            &crate::database::MatchFilter {
                phase: Some(Phase::KnockoutR1),
                status: None,
            },
        )
        .unwrap();
        assert_eq!(round_one.len(), 4);

        // Seeding again changes nothing
        let again = seed_first_round(&mut conn).unwrap().unwrap();
        assert!(again.is_empty());
    }
}
