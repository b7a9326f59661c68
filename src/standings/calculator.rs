use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;

use crate::domain::{Match, MatchStatus, Phase, Player, PlayerId, PlayerStanding};

/// Net head-to-head wins keyed by (winner, loser) pair
type HeadToHead = HashMap<(PlayerId, PlayerId), i32>;

/// Aggregates completed league matches into a ranked league table.
/// Pure and deterministic; the whole table is recomputed from the match set
/// on every call, there is no incremental state.
pub fn calculate_standings(players: &[Player], matches: &[Match]) -> Vec<PlayerStanding> {
    let mut standings: Vec<PlayerStanding> = players
        .iter()
        .map(|p| PlayerStanding::zeroed(p.clone()))
        .collect();

    let index: HashMap<PlayerId, usize> = players
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id, idx))
        .collect();

    let mut head_to_head = HeadToHead::new();

    let league_matches: Vec<&Match> = matches
        .iter()
        .filter(|m| m.phase == Phase::League && m.status == MatchStatus::Completed)
        .collect();
    debug!(
        "Calculating standings: {} players, {} completed league matches",
        players.len(),
        league_matches.len()
    );

    for m in league_matches {
        accumulate_match(m, &index, &mut standings, &mut head_to_head);
    }

    for s in &mut standings {
        s.set_diff = s.sets_won - s.sets_lost;
        s.point_diff = s.points_scored - s.points_conceded;
    }

    // Stable sort: players that compare equal keep their input order
    standings.sort_by(|a, b| compare_standings(a, b, &head_to_head));

    for (idx, s) in standings.iter_mut().enumerate() {
        s.rank = idx + 1;
    }

    standings
}

fn accumulate_match(
    m: &Match,
    index: &HashMap<PlayerId, usize>,
    standings: &mut [PlayerStanding],
    head_to_head: &mut HeadToHead,
) {
    // Matches referencing unknown players are ignored rather than failing
    let (Some(&p1_idx), Some(&p2_idx)) = (index.get(&m.player1_id), index.get(&m.player2_id))
    else {
        return;
    };

    for set in &m.sets {
        let p1 = &mut standings[p1_idx];
        p1.points_scored += set.player1;
        p1.points_conceded += set.player2;
        if set.player1 > set.player2 {
            p1.sets_won += 1;
        } else if set.player2 > set.player1 {
            p1.sets_lost += 1;
        }

        let p2 = &mut standings[p2_idx];
        p2.points_scored += set.player2;
        p2.points_conceded += set.player1;
        if set.player2 > set.player1 {
            p2.sets_won += 1;
        } else if set.player1 > set.player2 {
            p2.sets_lost += 1;
        }
    }

    standings[p1_idx].matches_played += 1;
    standings[p2_idx].matches_played += 1;

    let Some(winner_id) = m.winner_id else {
        return;
    };
    let (winner_idx, loser_idx) = if winner_id == m.player1_id {
        (p1_idx, p2_idx)
    } else {
        (p2_idx, p1_idx)
    };

    let award = standings[loser_idx].player.points_for_defeating();
    let loser_id = standings[loser_idx].player.id;

    let winner = &mut standings[winner_idx];
    winner.wins += 1;
    winner.points += award;
    standings[loser_idx].losses += 1;

    *head_to_head.entry((winner_id, loser_id)).or_insert(0) += 1;
}

/// Four-level tiebreak: points, pairwise head-to-head, set difference,
/// raw in-set points scored. Descending on every level.
fn compare_standings(a: &PlayerStanding, b: &PlayerStanding, head_to_head: &HeadToHead) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| head_to_head_ordering(a.player.id, b.player.id, head_to_head))
        .then_with(|| b.set_diff.cmp(&a.set_diff))
        .then_with(|| b.points_scored.cmp(&a.points_scored))
}

/// Only the record between the two compared players counts; a level record
/// (1-1 or no meetings) resolves nothing and falls through to the next level.
fn head_to_head_ordering(a: PlayerId, b: PlayerId, head_to_head: &HeadToHead) -> Ordering {
    let a_wins = head_to_head.get(&(a, b)).copied().unwrap_or(0);
    let b_wins = head_to_head.get(&(b, a)).copied().unwrap_or(0);
    b_wins.cmp(&a_wins)
}
