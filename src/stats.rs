use crate::app_dirs::AppDirs;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};
use time_humanize::{Accuracy, HumanTime, Tense};

/// One finished session, as stored in the history database.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub played_at: DateTime<Local>,
    pub difficulty: String,
    pub score: u32,
    pub rounds_won: u32,
    pub won: bool,
}

/// Database manager for session history
#[derive(Debug)]
pub struct GameDb {
    conn: Connection,
}

impl GameDb {
    /// Initialize the database connection and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("lingo_history.db"));
        Self::open_at(db_path)
    }

    /// Open (or create) a history database at an explicit path.
    pub fn open_at<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS game_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                played_at TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                score INTEGER NOT NULL,
                rounds_won INTEGER NOT NULL,
                won BOOLEAN NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_results_played_at ON game_results(played_at)",
            [],
        )?;

        Ok(GameDb { conn })
    }

    /// Record a finished session
    pub fn record(&self, record: &GameRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO game_results (played_at, difficulty, score, rounds_won, won)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.played_at.to_rfc3339(),
                record.difficulty,
                record.score,
                record.rounds_won,
                record.won,
            ],
        )?;

        Ok(())
    }

    /// Most recent sessions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT played_at, difficulty, score, rounds_won, won
            FROM game_results
            ORDER BY played_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            let played_at: String = row.get(0)?;
            Ok(GameRecord {
                played_at: DateTime::parse_from_rfc3339(&played_at)
                    .map(|dt| dt.with_timezone(&Local))
                    .unwrap_or_else(|_| Local::now()),
                difficulty: row.get(1)?,
                score: row.get(2)?,
                rounds_won: row.get(3)?,
                won: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    /// Every recorded session, newest first
    pub fn all(&self) -> Result<Vec<GameRecord>> {
        self.recent(i64::MAX as usize)
    }

    /// Highest score recorded for a difficulty, if any
    pub fn best_score(&self, difficulty: &str) -> Result<Option<u32>> {
        self.conn.query_row(
            "SELECT MAX(score) FROM game_results WHERE difficulty = ?1",
            params![difficulty],
            |row| row.get(0),
        )
    }

    /// Total sessions played and sessions won
    pub fn totals(&self) -> Result<(i64, i64)> {
        self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(won), 0) FROM game_results",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }

    /// Write the whole history as CSV.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, Box<dyn std::error::Error>> {
        let records = self.all()?;
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["played_at", "difficulty", "score", "rounds_won", "won"])?;
        for r in &records {
            writer.write_record([
                r.played_at.to_rfc3339(),
                r.difficulty.clone(),
                r.score.to_string(),
                r.rounds_won.to_string(),
                r.won.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(records.len())
    }
}

/// Render history rows for terminal output: one line per session plus a
/// per-difficulty summary.
pub fn format_history(records: &[GameRecord], now: DateTime<Local>) -> Vec<String> {
    let mut lines: Vec<String> = records
        .iter()
        .map(|r| {
            let elapsed = (now - r.played_at)
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            let ago = HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past);
            format!(
                "{:>5} pts  {:<9} {}/5 rounds  {}  ({ago})",
                r.score,
                r.difficulty,
                r.rounds_won,
                if r.won { "won " } else { "lost" },
            )
        })
        .collect();

    if !records.is_empty() {
        lines.push(String::new());
        let summaries = records
            .iter()
            .map(|r| (r.difficulty.clone(), r.score))
            .into_group_map()
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .map(|(difficulty, scores)| {
                let best = scores.iter().max().copied().unwrap_or(0);
                format!("{difficulty}: {} played, best {best}", scores.len())
            });
        lines.extend(summaries);
    }

    lines
}
