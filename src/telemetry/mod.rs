//! Call telemetry for the backend adapter.
//!
//! The adapter emits one [`CallObservation`] per provider invocation:
//! latency, outcome class, and how many attempts the retry loop consumed.
//! Observations land in a bounded in-process buffer that an external
//! telemetry collaborator drains via [`Telemetry::snapshot`]. No message
//! content, prompts, or persona output is ever recorded.

use std::collections::VecDeque;
use std::env;
use std::sync::{Mutex, OnceLock};

use serde::Serialize;

/// Maximum retained observations; older entries are dropped first.
const BUFFER_CAP: usize = 1024;

static INSTANCE: OnceLock<Telemetry> = OnceLock::new();

/// Get the global `Telemetry` singleton.
pub fn telemetry() -> &'static Telemetry {
    INSTANCE.get_or_init(Telemetry::new)
}

/// Outcome class of one backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Success,
    /// Transient failure that exhausted the retry budget.
    RetryableFailure,
    /// Failure that was never eligible for retry.
    NonRetryableFailure,
}

/// One latency/outcome observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallObservation {
    pub provider: String,
    pub outcome: CallOutcome,
    pub latency_ms: u64,
    pub attempts: u32,
}

/// Bounded, process-wide observation buffer.
#[derive(Debug)]
pub struct Telemetry {
    enabled: bool,
    observations: Mutex<VecDeque<CallObservation>>,
}

impl Telemetry {
    fn new() -> Self {
        Self {
            enabled: !is_telemetry_disabled(),
            observations: Mutex::new(VecDeque::with_capacity(64)),
        }
    }

    /// Record an observation. No-op when telemetry is disabled.
    pub fn record(&self, observation: CallObservation) {
        if !self.enabled {
            return;
        }
        let mut buffer = self.observations.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.len() == BUFFER_CAP {
            buffer.pop_front();
        }
        buffer.push_back(observation);
    }

    /// Copy out the current buffer, oldest first.
    pub fn snapshot(&self) -> Vec<CallObservation> {
        let buffer = self.observations.lock().unwrap_or_else(|e| e.into_inner());
        buffer.iter().cloned().collect()
    }
}

/// Check whether telemetry is disabled via environment variables.
///
/// Checks `GROUPSIM_TELEMETRY_OPT_OUT` and `OTEL_SDK_DISABLED`.
fn is_telemetry_disabled() -> bool {
    let opt_out = env::var("GROUPSIM_TELEMETRY_OPT_OUT")
        .unwrap_or_default()
        .to_lowercase();
    let otel_disabled = env::var("OTEL_SDK_DISABLED")
        .unwrap_or_default()
        .to_lowercase();

    opt_out == "true" || opt_out == "1" || otel_disabled == "true" || otel_disabled == "1"
}
