use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::database::{self, DbConn, MatchFilter};
use crate::domain::{MatchStatus, PlayerId};

/// Writes all completed matches as CSV: one row per match with the set
/// scores flattened into dash-separated columns.
pub fn write_completed_matches<W: std::io::Write>(conn: &mut DbConn, writer: W) -> Result<()> {
    let names: HashMap<PlayerId, String> = database::players::list_all(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let filter = MatchFilter {
        phase: None,
        status: Some(MatchStatus::Completed),
    };
    let rows = database::matches::list_filtered(conn, &filter)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record([
            "match_id", "phase", "player1", "player2", "set1", "set2", "set3", "winner",
        ])
        .context("Failed to write CSV header")?;

    let name_of = |id: PlayerId| {
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("player #{id}"))
    };

    let match_count = rows.len();
    for row in rows {
        let m = row.into_match();

        let mut set_columns = [String::new(), String::new(), String::new()];
        for (idx, set) in m.sets.iter().take(3).enumerate() {
            set_columns[idx] = format!("{}-{}", set.player1, set.player2);
        }

        csv_writer
            .write_record([
                m.id.to_string(),
                m.phase.as_str().to_string(),
                name_of(m.player1_id),
                name_of(m.player2_id),
                set_columns[0].clone(),
                set_columns[1].clone(),
                set_columns[2].clone(),
                m.winner_id.map(name_of).unwrap_or_default(),
            ])
            .context("Failed to write CSV record")?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    info!("Exported {} completed matches", match_count);
    Ok(())
}

pub fn export_to_string(conn: &mut DbConn) -> Result<String> {
    let mut buffer = Vec::new();
    write_completed_matches(conn, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}

pub fn export_to_file(conn: &mut DbConn, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_completed_matches(conn, file)
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

    #[test]
    fn test_export_contains_only_completed_matches() {
        let mut conn = test_conn();
        let a = players::insert_player(&mut conn, "Anna", None, 1).unwrap().id;
        let b = players::insert_player(&mut conn, "Bo", None, 2).unwrap().id;

        let league = NewMatch {
            player1_id: a,
            player2_id: b,
            phase: Phase::League,
            knockout_position: None,
        };
        let played = matches::insert_scheduled(&mut conn, &league).unwrap();
        matches::insert_scheduled(&mut conn, &league).unwrap();
        matches::record_result(
            &mut conn,
            played.id,
            &[
                SetScore {
                    player1: 11,
                    player2: 5,
                },
                SetScore {
                    player1: 11,
                    player2: 3,
                },
            ],
            a,
        )
        .unwrap();

        let csv = export_to_string(&mut conn).unwrap();
        let lines: Vec<&str> = csv.trim_end().lines().collect();

        assert_eq!(lines.len(), 2); // header + one completed match
        assert!(lines[0].starts_with("match_id,phase,player1"));
        assert!(lines[1].contains("league"));
        assert!(lines[1].contains("Anna"));
        assert!(lines[1].contains("11-5"));
        assert!(lines[1].contains("11-3"));
    }

    #[test]
    fn test_export_empty_database_has_header_only() {
        let mut conn = test_conn();
        let csv = export_to_string(&mut conn).unwrap();
        assert_eq!(csv.trim_end().lines().count(), 1);
    }
}
