use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::PlayerRow;

const PLAYER_COLUMNS: &str = "id, name, department, tier, created_at";

pub fn insert_player(
    conn: &mut DbConn,
    name: &str,
    department: Option<&str>,
    tier: i32,
) -> Result<PlayerRow> {
    let sql = format!(
        "INSERT INTO players (name, department, tier) VALUES (?1, ?2, ?3) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, department, tier], parse_player_row)
        .context("Failed to insert new player")
}

pub fn update_player(
    conn: &mut DbConn,
    id: i64,
    name: &str,
    department: Option<&str>,
    tier: i32,
) -> Result<Option<PlayerRow>> {
    let sql = format!(
        "UPDATE players SET name = ?1, department = ?2, tier = ?3 WHERE id = ?4 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, department, tier, id], parse_player_row)
        .optional()
        .context("Failed to update player")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<PlayerRow>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<PlayerRow>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_player(conn: &mut DbConn, id: i64) -> Result<bool> {
    let affected = conn
        .execute("DELETE FROM players WHERE id = ?1", params![id])
        .context("Failed to delete player")?;

    Ok(affected > 0)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerRow> {
    Ok(PlayerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        tier: row.get(3)?,
        created_at: row.get(4)?,
    })
}
