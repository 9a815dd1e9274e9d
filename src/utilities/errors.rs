//! Error types surfaced to callers of the simulation engine.
//!
//! Per-persona failures are not represented here: a backend or validation
//! failure for one persona is downgraded to a `Failed` result inside the
//! batch and never aborts the run. Only request-level problems reject a
//! simulation outright.

use thiserror::Error;

/// Errors that reject a simulation request before any backend work happens.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A requested persona id is not present in the registry.
    ///
    /// Raised during upfront resolution, so a bad id never wastes backend
    /// calls for the valid ids in the same request.
    #[error("unknown persona id: {persona_id}")]
    PersonaNotFound { persona_id: String },

    /// The request message was empty or whitespace-only.
    #[error("message must not be empty")]
    EmptyMessage,

    /// The request named no personas at all.
    #[error("at least one persona id must be requested")]
    EmptyPersonaSet,
}
