use crate::domain::{BracketUpdates, Match, MatchStatus, NewMatch, Phase, PlayerId, PlayerStanding};

/// League ranks (1-based) seeded into round 1, per slot: 3v10, 4v9, 5v8, 6v7.
/// Ranks 1 and 2 skip straight to the semifinals as byes.
const ROUND_ONE_SEEDS: [(usize, usize); 4] = [(3, 10), (4, 9), (5, 8), (6, 7)];

const MIN_PLAYERS_FOR_ROUND_ONE: usize = 10;

/// Desired changes to the round-1 draw for the current standings, reconciled
/// against whatever round-1 matches already exist. Returns None when the
/// league is too small to seed a bracket. Round-1 creation is the caller's
/// decision; [`knockout_round_updates`] only progresses later rounds.
pub fn first_round_updates(
    knockout_matches: &[Match],
    standings: &[PlayerStanding],
) -> Option<BracketUpdates> {
    if standings.len() < MIN_PLAYERS_FOR_ROUND_ONE {
        return None;
    }

    let expected: Vec<NewMatch> = ROUND_ONE_SEEDS
        .iter()
        .enumerate()
        .map(|(idx, &(high, low))| NewMatch {
            player1_id: standings[high - 1].player.id,
            player2_id: standings[low - 1].player.id,
            phase: Phase::KnockoutR1,
            knockout_position: Some(idx as i32 + 1),
        })
        .collect();

    let mut updates = BracketUpdates::default();
    reconcile_phase(Phase::KnockoutR1, &expected, knockout_matches, &mut updates);
    Some(updates)
}

/// Determines which next-round matchups should exist given the knockout
/// matches recorded so far, and which stale scheduled matchups must go.
/// Pure; the caller applies the returned diff. Safe to invoke repeatedly:
/// once a diff is applied, the next call returns an empty one.
pub fn knockout_round_updates(
    knockout_matches: &[Match],
    standings: &[PlayerStanding],
) -> BracketUpdates {
    let mut updates = BracketUpdates::default();

    for phase in [Phase::KnockoutR1, Phase::KnockoutR2, Phase::Semifinal] {
        let Some(next_phase) = phase.next_phase() else {
            continue;
        };
        // A transition with missing winners or too few ranked players for the
        // byes is skipped silently; other phases are still evaluated.
        let Some(expected) = expected_next_round(phase, knockout_matches, standings) else {
            continue;
        };
        reconcile_phase(next_phase, &expected, knockout_matches, &mut updates);
    }

    updates
}

/// Matchups the next round should consist of, or None while the current
/// round is not exactly complete.
fn expected_next_round(
    phase: Phase,
    knockout_matches: &[Match],
    standings: &[PlayerStanding],
) -> Option<Vec<NewMatch>> {
    let round: Vec<&Match> = knockout_matches
        .iter()
        .filter(|m| m.phase == phase)
        .collect();

    if round.len() != phase.expected_match_count() {
        return None;
    }
    if !round.iter().all(|m| m.is_completed() && m.winner_id.is_some()) {
        return None;
    }

    let winner_of = |slot: i32| -> Option<PlayerId> {
        round
            .iter()
            .find(|m| m.knockout_position == Some(slot))
            .and_then(|m| m.winner_id)
    };

    match phase {
        // Fixed bracket paths: top half and bottom half never cross, and the
        // pairings are not reseeded by league rank.
        Phase::KnockoutR1 => Some(vec![
            NewMatch {
                player1_id: winner_of(1)?,
                player2_id: winner_of(2)?,
                phase: Phase::KnockoutR2,
                knockout_position: Some(1),
            },
            NewMatch {
                player1_id: winner_of(3)?,
                player2_id: winner_of(4)?,
                phase: Phase::KnockoutR2,
                knockout_position: Some(2),
            },
        ]),
        Phase::KnockoutR2 => {
            if standings.len() < 2 {
                return None;
            }
            Some(vec![
                NewMatch {
                    player1_id: standings[0].player.id,
                    player2_id: winner_of(1)?,
                    phase: Phase::Semifinal,
                    knockout_position: Some(1),
                },
                NewMatch {
                    player1_id: standings[1].player.id,
                    player2_id: winner_of(2)?,
                    phase: Phase::Semifinal,
                    knockout_position: Some(2),
                },
            ])
        }
        Phase::Semifinal => Some(vec![NewMatch {
            player1_id: winner_of(1)?,
            player2_id: winner_of(2)?,
            phase: Phase::Final,
            knockout_position: None,
        }]),
        _ => None,
    }
}

/// Diffs the expected matchups against the recorded next-phase matches.
/// Existing matchups (scheduled or completed) are left alone, missing ones
/// become inserts, and scheduled matches no longer expected become deletes.
/// Completed matches are never deleted.
fn reconcile_phase(
    next_phase: Phase,
    expected: &[NewMatch],
    knockout_matches: &[Match],
    updates: &mut BracketUpdates,
) {
    let existing: Vec<&Match> = knockout_matches
        .iter()
        .filter(|m| m.phase == next_phase)
        .collect();

    for wanted in expected {
        let already_present = existing
            .iter()
            .any(|m| m.has_players(wanted.player1_id, wanted.player2_id));
        if !already_present {
            updates.inserts.push(wanted.clone());
        }
    }

    for m in existing {
        if m.status != MatchStatus::Scheduled {
            continue;
        }
        let still_wanted = expected
            .iter()
            .any(|wanted| wanted.has_players(m.player1_id, m.player2_id));
        if !still_wanted {
            updates.deletes.push(m.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Player;

    fn standings_for(ids: &[PlayerId]) -> Vec<PlayerStanding> {
        ids.iter()
            .enumerate()
            .map(|(idx, &id)| {
                let mut s = PlayerStanding::zeroed(Player {
                    id,
                    name: format!("player {id}"),
                    department: None,
                    tier: 2,
                });
                s.rank = idx + 1;
                s
            })
            .collect()
    }

    fn completed(
        id: i64,
        phase: Phase,
        slot: Option<i32>,
        player1_id: PlayerId,
        player2_id: PlayerId,
        winner_id: PlayerId,
    ) -> Match {
        Match {
            id,
            player1_id,
            player2_id,
            phase,
            status: MatchStatus::Completed,
            sets: vec![],
            winner_id: Some(winner_id),
            knockout_position: slot,
        }
    }

    fn scheduled(
        id: i64,
        phase: Phase,
        slot: Option<i32>,
        player1_id: PlayerId,
        player2_id: PlayerId,
    ) -> Match {
        Match {
            id,
            player1_id,
            player2_id,
            phase,
            status: MatchStatus::Scheduled,
            sets: vec![],
            winner_id: None,
            knockout_position: slot,
        }
    }

    /// Completed round 1 where the higher seed won every slot:
    /// 3v10, 4v9, 5v8, 6v7 with winners 3, 4, 5, 6.
    fn completed_round_one() -> Vec<Match> {
        vec![
            completed(1, Phase::KnockoutR1, Some(1), 3, 10, 3),
            completed(2, Phase::KnockoutR1, Some(2), 4, 9, 4),
            completed(3, Phase::KnockoutR1, Some(3), 5, 8, 5),
            completed(4, Phase::KnockoutR1, Some(4), 6, 7, 6),
        ]
    }

    fn ten_standings() -> Vec<PlayerStanding> {
        standings_for(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10])
    }

    #[test]
    fn test_first_round_seeding() {
        let updates = first_round_updates(&[], &ten_standings()).unwrap();

        assert!(updates.deletes.is_empty());
        assert_eq!(updates.inserts.len(), 4);
        let pairs: Vec<(PlayerId, PlayerId, Option<i32>)> = updates
            .inserts
            .iter()
            .map(|m| (m.player1_id, m.player2_id, m.knockout_position))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (3, 10, Some(1)),
                (4, 9, Some(2)),
                (5, 8, Some(3)),
                (6, 7, Some(4)),
            ]
        );
        assert!(updates.inserts.iter().all(|m| m.phase == Phase::KnockoutR1));
    }

    #[test]
    fn test_first_round_requires_ten_players() {
        assert!(first_round_updates(&[], &standings_for(&[1, 2, 3, 4, 5, 6, 7, 8, 9])).is_none());
    }

    #[test]
    fn test_first_round_is_idempotent_once_created() {
        let matches: Vec<Match> = vec![
            scheduled(1, Phase::KnockoutR1, Some(1), 3, 10),
            scheduled(2, Phase::KnockoutR1, Some(2), 4, 9),
            scheduled(3, Phase::KnockoutR1, Some(3), 5, 8),
            scheduled(4, Phase::KnockoutR1, Some(4), 6, 7),
        ];
        let updates = first_round_updates(&matches, &ten_standings()).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn test_round_two_from_completed_round_one() {
        let updates = knockout_round_updates(&completed_round_one(), &ten_standings());

        assert!(updates.deletes.is_empty());
        assert_eq!(updates.inserts.len(), 2);

        let top = &updates.inserts[0];
        assert_eq!(top.phase, Phase::KnockoutR2);
        assert_eq!(top.knockout_position, Some(1));
        assert!(top.has_players(3, 4));

        let bottom = &updates.inserts[1];
        assert_eq!(bottom.knockout_position, Some(2));
        assert!(bottom.has_players(5, 6));
    }

    #[test]
    fn test_incomplete_round_emits_nothing() {
        let mut matches = completed_round_one();
        matches[3].status = MatchStatus::Scheduled;
        matches[3].winner_id = None;

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert!(updates.is_empty());
    }

    #[test]
    fn test_wrong_match_count_emits_nothing() {
        let mut matches = completed_round_one();
        matches.pop();

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert!(updates.is_empty());
    }

    #[test]
    fn test_missing_winner_skips_transition() {
        let mut matches = completed_round_one();
        matches[0].winner_id = None;

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert!(updates.is_empty());
    }

    #[test]
    fn test_idempotent_after_applying_diff() {
        let mut matches = completed_round_one();
        let first = knockout_round_updates(&matches, &ten_standings());
        assert_eq!(first.inserts.len(), 2);

        // Apply the diff
        for (idx, insert) in first.inserts.iter().enumerate() {
            matches.push(scheduled(
                100 + idx as i64,
                insert.phase,
                insert.knockout_position,
                insert.player1_id,
                insert.player2_id,
            ));
        }

        let second = knockout_round_updates(&matches, &ten_standings());
        assert!(second.is_empty());
    }

    #[test]
    fn test_edited_result_retracts_stale_scheduled_match() {
        let mut matches = completed_round_one();
        matches.push(scheduled(100, Phase::KnockoutR2, Some(1), 3, 4));
        matches.push(scheduled(101, Phase::KnockoutR2, Some(2), 5, 6));

        // Admin corrects slot 1: player 10 actually won
        matches[0].winner_id = Some(10);

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert_eq!(updates.deletes, vec![100]);
        assert_eq!(updates.inserts.len(), 1);
        assert!(updates.inserts[0].has_players(10, 4));
        assert_eq!(updates.inserts[0].knockout_position, Some(1));
    }

    #[test]
    fn test_completed_next_round_match_is_never_deleted() {
        let mut matches = completed_round_one();
        matches.push(completed(100, Phase::KnockoutR2, Some(1), 3, 4, 3));
        matches.push(scheduled(101, Phase::KnockoutR2, Some(2), 5, 6));

        // Correct a slot-1 result after round 2 already started
        matches[0].winner_id = Some(10);

        let updates = knockout_round_updates(&matches, &ten_standings());
        // The stale matchup is completed, so it stays; the corrected pairing
        // is still inserted alongside it.
        assert!(updates.deletes.is_empty());
        assert_eq!(updates.inserts.len(), 1);
        assert!(updates.inserts[0].has_players(10, 4));
    }

    #[test]
    fn test_semifinal_byes_from_round_two() {
        let mut matches = completed_round_one();
        matches.push(completed(100, Phase::KnockoutR2, Some(1), 3, 4, 3));
        matches.push(completed(101, Phase::KnockoutR2, Some(2), 5, 6, 6));

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert_eq!(updates.inserts.len(), 2);

        let sf1 = &updates.inserts[0];
        assert_eq!(sf1.phase, Phase::Semifinal);
        assert!(sf1.has_players(1, 3));
        assert_eq!(sf1.knockout_position, Some(1));

        let sf2 = &updates.inserts[1];
        assert!(sf2.has_players(2, 6));
        assert_eq!(sf2.knockout_position, Some(2));
    }

    #[test]
    fn test_short_standings_skip_semifinal_byes() {
        let matches = vec![
            completed(100, Phase::KnockoutR2, Some(1), 3, 4, 3),
            completed(101, Phase::KnockoutR2, Some(2), 5, 6, 6),
        ];

        let updates = knockout_round_updates(&matches, &standings_for(&[1]));
        assert!(updates.is_empty());
    }

    #[test]
    fn test_final_from_completed_semifinals() {
        let matches = vec![
            completed(200, Phase::Semifinal, Some(1), 1, 3, 3),
            completed(201, Phase::Semifinal, Some(2), 2, 6, 2),
        ];

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert_eq!(updates.inserts.len(), 1);

        let final_match = &updates.inserts[0];
        assert_eq!(final_match.phase, Phase::Final);
        assert!(final_match.has_players(3, 2));
        assert_eq!(final_match.knockout_position, None);
    }

    #[test]
    fn test_phases_progress_independently() {
        // Semifinals are done but round 1 is mid-flight; only the final
        // should be produced.
        let mut matches = completed_round_one();
        matches[2].status = MatchStatus::Scheduled;
        matches[2].winner_id = None;
        matches.push(completed(200, Phase::Semifinal, Some(1), 1, 3, 1));
        matches.push(completed(201, Phase::Semifinal, Some(2), 2, 6, 6));

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert_eq!(updates.inserts.len(), 1);
        assert_eq!(updates.inserts[0].phase, Phase::Final);
        assert!(updates.inserts[0].has_players(1, 6));
    }

    #[test]
    fn test_missing_slot_skips_transition() {
        let mut matches = completed_round_one();
        matches[1].knockout_position = None;

        let updates = knockout_round_updates(&matches, &ten_standings());
        assert!(updates.is_empty());
    }
}
