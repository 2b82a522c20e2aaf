use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::feed::HistoricalMatch;

const CACHE_DIR: &str = "betagent_terminal";
const DB_FILE: &str = "history.sqlite";

/// Where the training dataset lives between sessions. `BETAGENT_DB_PATH`
/// overrides; otherwise XDG cache, falling back to `~/.cache`.
pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("BETAGENT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS history (
            rowid_ord INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_goals INTEGER NOT NULL,
            away_goals INTEGER NOT NULL,
            home_xg REAL NOT NULL,
            away_xg REAL NOT NULL,
            possession_home INTEGER NOT NULL,
            injuries_home INTEGER NOT NULL,
            injuries_away INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_history_date ON history(date);
        "#,
    )
    .context("init history schema")?;
    Ok(())
}

/// Replaces the stored dataset wholesale, preserving insertion order.
pub fn replace_all(conn: &mut Connection, matches: &[HistoricalMatch]) -> Result<usize> {
    let tx = conn.transaction().context("begin history tx")?;
    tx.execute("DELETE FROM history", [])?;
    {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO history (
                date, home_team, away_team, home_goals, away_goals,
                home_xg, away_xg, possession_home, injuries_home, injuries_away
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )?;
        for m in matches {
            stmt.execute(params![
                m.date,
                m.home,
                m.away,
                m.home_goals,
                m.away_goals,
                m.home_xg,
                m.away_xg,
                m.possession_home,
                m.injuries_home,
                m.injuries_away,
            ])?;
        }
    }
    tx.commit().context("commit history tx")?;
    Ok(matches.len())
}

/// Loads the dataset in insertion order (newest first, as the feed writes it).
pub fn load_all(conn: &Connection) -> Result<Vec<HistoricalMatch>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT date, home_team, away_team, home_goals, away_goals,
               home_xg, away_xg, possession_home, injuries_home, injuries_away
        FROM history
        ORDER BY rowid_ord
        "#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(HistoricalMatch {
            date: row.get(0)?,
            home: row.get(1)?,
            away: row.get(2)?,
            home_goals: row.get(3)?,
            away_goals: row.get(4)?,
            home_xg: row.get(5)?,
            away_xg: row.get(6)?,
            possession_home: row.get(7)?,
            injuries_home: row.get(8)?,
            injuries_away: row.get(9)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("read history row")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Vec<HistoricalMatch> {
        (0..n)
            .map(|i| HistoricalMatch {
                date: format!("2024-03-{:02}", (i % 28) + 1),
                home: "Besiktas".to_string(),
                away: "Trabzonspor".to_string(),
                home_goals: (i % 4) as u8,
                away_goals: ((i + 1) % 3) as u8,
                home_xg: 1.2,
                away_xg: 0.9,
                possession_home: 55,
                injuries_home: 1,
                injuries_away: 0,
            })
            .collect()
    }

    #[test]
    fn round_trips_the_dataset_in_order() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        init_schema(&conn).expect("schema");

        let data = sample(12);
        replace_all(&mut conn, &data).expect("replace");
        assert_eq!(load_all(&conn).expect("load"), data);
    }

    #[test]
    fn replace_is_wholesale() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        init_schema(&conn).expect("schema");

        replace_all(&mut conn, &sample(12)).expect("first replace");
        let second = sample(3);
        replace_all(&mut conn, &second).expect("second replace");
        assert_eq!(load_all(&conn).expect("load"), second);
    }
}
