use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{MatchFilter, MatchRow};
use crate::domain::{NewMatch, SetScore};

const MATCH_COLUMNS: &str = "id, player1_id, player2_id, phase, status, \
    set1_player1, set1_player2, set2_player1, set2_player2, set3_player1, set3_player2, \
    winner_id, knockout_position, created_at";

/// Inserts a match in scheduled state, as produced by the bracket engine
/// or the scheduling endpoint.
pub fn insert_scheduled(conn: &mut DbConn, new_match: &NewMatch) -> Result<MatchRow> {
    let sql = format!(
        "INSERT INTO matches (player1_id, player2_id, phase, status, knockout_position) \
         VALUES (?1, ?2, ?3, 'scheduled', ?4) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            new_match.player1_id,
            new_match.player2_id,
            new_match.phase.as_str(),
            new_match.knockout_position,
        ],
        parse_match_row,
    )
    .context("Failed to insert scheduled match")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<MatchRow>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<MatchRow>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_filtered(conn: &mut DbConn, filter: &MatchFilter) -> Result<Vec<MatchRow>> {
    let mut sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE 1=1");
    let mut args: Vec<String> = Vec::new();

    if let Some(phase) = filter.phase {
        args.push(phase.as_str().to_string());
        sql.push_str(&format!(" AND phase = ?{}", args.len()));
    }
    if let Some(status) = filter.status {
        args.push(status.as_str().to_string());
        sql.push_str(&format!(" AND status = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args), parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All matches belonging to the four knockout phases
pub fn list_knockout(conn: &mut DbConn) -> Result<Vec<MatchRow>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches \
         WHERE phase IN ('knockout_r1', 'knockout_r2', 'semifinal', 'final') ORDER BY id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Stores a validated result: set scores plus winner, flipping the match to
/// completed. Re-submitting against a completed match overwrites the result
/// (admin corrections).
pub fn record_result(
    conn: &mut DbConn,
    id: i64,
    sets: &[SetScore],
    winner_id: i64,
) -> Result<Option<MatchRow>> {
    let score = |idx: usize| -> (Option<i32>, Option<i32>) {
        match sets.get(idx) {
            Some(s) => (Some(s.player1), Some(s.player2)),
            None => (None, None),
        }
    };
    let (s1p1, s1p2) = score(0);
    let (s2p1, s2p2) = score(1);
    let (s3p1, s3p2) = score(2);

    let sql = format!(
        "UPDATE matches SET status = 'completed', winner_id = ?1, \
         set1_player1 = ?2, set1_player2 = ?3, set2_player1 = ?4, set2_player2 = ?5, \
         set3_player1 = ?6, set3_player2 = ?7 WHERE id = ?8 RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![winner_id, s1p1, s1p2, s2p1, s2p2, s3p1, s3p2, id],
        parse_match_row,
    )
    .optional()
    .context("Failed to record match result")
}

/// Deletes a match only while it is still scheduled; completed results are
/// never discarded this way.
pub fn delete_scheduled(conn: &mut DbConn, id: i64) -> Result<bool> {
    let affected = conn
        .execute(
            "DELETE FROM matches WHERE id = ?1 AND status = 'scheduled'",
            params![id],
        )
        .context("Failed to delete scheduled match")?;

    Ok(affected > 0)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    Ok(MatchRow {
        id: row.get(0)?,
        player1_id: row.get(1)?,
        player2_id: row.get(2)?,
        phase: row.get(3)?,
        status: row.get(4)?,
        set_scores: [
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
            row.get(8)?,
            row.get(9)?,
            row.get(10)?,
        ],
        winner_id: row.get(11)?,
        knockout_position: row.get(12)?,
        created_at: row.get(13)?,
    })
}
