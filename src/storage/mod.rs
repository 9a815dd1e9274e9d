//! Persistence collaborator contract.
//!
//! The orchestrator depends only on `save`; the rest of the surface exists
//! for callers that browse past runs. Persistence failures are surfaced
//! as-is — the core does not retry them.

pub mod sqlite;

pub use sqlite::SqliteSimulationStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::simulation::{ContextType, OverallStatus, Simulation};

/// Display-oriented digest of a stored simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub id: Uuid,
    /// Message text, truncated for display.
    pub message: String,
    pub context_type: ContextType,
    pub created_at: DateTime<Utc>,
    pub overall_status: OverallStatus,
    /// Total per-persona results, `Ok` and `Failed` alike.
    pub result_count: usize,
    /// Mean receptivity over `Ok` results; `None` when none exist.
    pub avg_receptivity: Option<f64>,
}

/// Durable store for completed simulations.
#[async_trait]
pub trait SimulationStore: Send + Sync {
    /// Persist a simulation, returning its id.
    async fn save(&self, simulation: &Simulation) -> Result<Uuid, anyhow::Error>;

    /// Load a simulation; `None` when the id is unknown.
    async fn load(&self, id: Uuid) -> Result<Option<Simulation>, anyhow::Error>;

    /// Delete a simulation; `false` when the id was unknown.
    async fn delete(&self, id: Uuid) -> Result<bool, anyhow::Error>;

    /// Summaries of stored simulations, newest first.
    async fn list(&self, limit: usize, offset: usize)
        -> Result<Vec<SimulationSummary>, anyhow::Error>;
}
