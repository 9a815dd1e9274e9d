//! SQLite-backed simulation store.
//!
//! One row per simulation; the per-persona results map is stored as JSON,
//! while the summary columns (result count, average receptivity) are
//! computed at save time so listing does not deserialize result payloads.
//! rusqlite is synchronous, so every operation opens a connection inside
//! `spawn_blocking`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{SimulationStore, SimulationSummary};
use crate::simulation::{
    ContextType, OverallStatus, PersonaResult, Simulation, SimulationRequest,
};

/// Characters of message text retained in a summary row.
const SUMMARY_MESSAGE_LEN: usize = 120;

/// SQLite store for simulation records.
pub struct SqliteSimulationStore {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl SqliteSimulationStore {
    /// Open (and initialize, if needed) a store at the given path.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self { db_path };
        store.initialize_db()?;
        Ok(store)
    }

    fn initialize_db(&self) -> Result<(), anyhow::Error> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS simulations (
                id TEXT PRIMARY KEY,
                message TEXT NOT NULL,
                context_type TEXT NOT NULL,
                persona_ids TEXT NOT NULL,
                created_at TEXT NOT NULL,
                overall_status TEXT NOT NULL,
                results TEXT NOT NULL,
                result_count INTEGER NOT NULL,
                avg_receptivity REAL
            )",
            [],
        )?;
        Ok(())
    }
}

#[async_trait]
impl SimulationStore for SqliteSimulationStore {
    async fn save(&self, simulation: &Simulation) -> Result<Uuid, anyhow::Error> {
        let db_path = self.db_path.clone();
        let id = simulation.id;
        let message = simulation.request.message.clone();
        let context_type = simulation.request.context_type.as_str();
        let persona_ids = serde_json::to_string(&simulation.request.persona_ids)?;
        let created_at = simulation.created_at.to_rfc3339();
        let overall_status = simulation.overall_status.as_str();
        let results_json = serde_json::to_string(&simulation.results)?;
        let result_count = simulation.results.len() as i64;
        let avg_receptivity = simulation.avg_receptivity();

        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            conn.execute(
                "INSERT OR REPLACE INTO simulations
                 (id, message, context_type, persona_ids, created_at,
                  overall_status, results, result_count, avg_receptivity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id.to_string(),
                    message,
                    context_type,
                    persona_ids,
                    created_at,
                    overall_status,
                    results_json,
                    result_count,
                    avg_receptivity,
                ],
            )?;
            Ok(id)
        })
        .await?
    }

    async fn load(&self, id: Uuid) -> Result<Option<Simulation>, anyhow::Error> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            let row = conn
                .query_row(
                    "SELECT message, context_type, persona_ids, created_at,
                            overall_status, results
                     FROM simulations WHERE id = ?1",
                    params![id.to_string()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, String>(5)?,
                        ))
                    },
                )
                .optional()?;

            let Some((message, context, persona_ids, created_at, status, results)) = row else {
                return Ok(None);
            };

            let context_type = ContextType::parse(&context)
                .ok_or_else(|| anyhow::anyhow!("corrupt context_type column: {}", context))?;
            let overall_status = OverallStatus::parse(&status)
                .ok_or_else(|| anyhow::anyhow!("corrupt overall_status column: {}", status))?;
            let persona_ids: Vec<String> = serde_json::from_str(&persona_ids)?;
            let results: BTreeMap<String, PersonaResult> = serde_json::from_str(&results)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc);

            Ok(Some(Simulation {
                id,
                request: SimulationRequest {
                    message,
                    context_type,
                    persona_ids,
                },
                created_at,
                results,
                overall_status,
            }))
        })
        .await?
    }

    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            let deleted = conn.execute(
                "DELETE FROM simulations WHERE id = ?1",
                params![id.to_string()],
            )?;
            Ok(deleted > 0)
        })
        .await?
    }

    async fn list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SimulationSummary>, anyhow::Error> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            let mut stmt = conn.prepare(
                "SELECT id, message, context_type, created_at,
                        overall_status, result_count, avg_receptivity
                 FROM simulations
                 ORDER BY created_at DESC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let rows = stmt.query_map(params![limit as i64, offset as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, Option<f64>>(6)?,
                ))
            })?;

            let mut summaries = Vec::new();
            for row in rows {
                let (id, message, context, created_at, status, count, avg) = row?;
                summaries.push(SimulationSummary {
                    id: id.parse()?,
                    message: truncate_message(&message),
                    context_type: ContextType::parse(&context)
                        .ok_or_else(|| anyhow::anyhow!("corrupt context_type column: {}", context))?,
                    created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
                    overall_status: OverallStatus::parse(&status)
                        .ok_or_else(|| anyhow::anyhow!("corrupt overall_status column: {}", status))?,
                    result_count: count as usize,
                    avg_receptivity: avg,
                });
            }
            Ok(summaries)
        })
        .await?
    }
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= SUMMARY_MESSAGE_LEN {
        message.to_string()
    } else {
        message.chars().take(SUMMARY_MESSAGE_LEN).collect()
    }
}
