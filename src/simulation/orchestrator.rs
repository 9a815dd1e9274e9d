//! Simulation orchestrator.
//!
//! Drives one run across the requested personas: resolve every persona up
//! front (a bad id rejects the request before any backend work), then run
//! the per-persona build → invoke → validate pipelines concurrently, bounded
//! by a configurable in-flight cap. Pipelines are independent: each has its
//! own timeout, and a backend or validation failure for one persona becomes
//! a `Failed` result, never a whole-request failure. Results are assembled
//! only after all pipelines settle — join-then-aggregate, no concurrent
//! writers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::backend::GenerativeBackend;
use crate::personas::{Persona, PersonaRegistry};
use crate::prompt;
use crate::simulation::{
    ContextType, OverallStatus, PersonaResult, Simulation, SimulationRequest,
};
use crate::utilities::errors::SimulationError;
use crate::validation;

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum concurrently in-flight backend calls.
    pub max_in_flight: usize,
    /// Budget for one persona's whole pipeline (including adapter retries).
    pub persona_timeout: Duration,
    /// Ceiling for the whole run; still-running pipelines are cancelled and
    /// marked `Failed`, already-completed results are preserved.
    pub run_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            persona_timeout: Duration::from_secs(90),
            run_timeout: Duration::from_secs(180),
        }
    }
}

/// Runs simulations against a registry and a generative backend.
///
/// The orchestrator is the only component that decides `overall_status`.
pub struct SimulationOrchestrator {
    registry: Arc<PersonaRegistry>,
    backend: Arc<dyn GenerativeBackend>,
    config: OrchestratorConfig,
}

impl SimulationOrchestrator {
    pub fn new(registry: Arc<PersonaRegistry>, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self::with_config(registry, backend, OrchestratorConfig::default())
    }

    pub fn with_config(
        registry: Arc<PersonaRegistry>,
        backend: Arc<dyn GenerativeBackend>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            backend,
            config,
        }
    }

    /// Run one simulation.
    ///
    /// Fails only on request-level problems (empty message, empty or unknown
    /// persona set). Every per-persona problem lands in the results map.
    pub async fn run(&self, request: SimulationRequest) -> Result<Simulation, SimulationError> {
        request.validate()?;
        let persona_ids = request.unique_persona_ids();

        // Resolve everything before the first backend call.
        let mut personas: Vec<Persona> = Vec::with_capacity(persona_ids.len());
        for id in &persona_ids {
            personas.push(self.registry.get(id)?.clone());
        }

        log::debug!(
            "starting simulation: {} personas, context {}",
            personas.len(),
            request.context_type
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut tasks: JoinSet<(String, PersonaResult)> = JoinSet::new();
        for persona in personas {
            let backend = Arc::clone(&self.backend);
            let semaphore = Arc::clone(&semaphore);
            let message = request.message.clone();
            let context_type = request.context_type;
            let persona_timeout = self.config.persona_timeout;
            tasks.spawn(async move {
                let persona_id = persona.id.clone();
                let result = run_pipeline(
                    backend,
                    semaphore,
                    &message,
                    context_type,
                    &persona,
                    persona_timeout,
                )
                .await;
                (persona_id, result)
            });
        }

        // Join-then-aggregate under the whole-run ceiling.
        let mut results: BTreeMap<String, PersonaResult> = BTreeMap::new();
        let ceiling = tokio::time::sleep(self.config.run_timeout);
        tokio::pin!(ceiling);
        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    match joined {
                        None => break,
                        Some(Ok((persona_id, result))) => {
                            results.insert(persona_id, result);
                        }
                        Some(Err(e)) => {
                            // Panicked or aborted task; its slot is filled
                            // from the missing set below.
                            log::error!("persona pipeline task failed to join: {}", e);
                        }
                    }
                }
                _ = &mut ceiling => {
                    log::warn!(
                        "simulation ceiling of {:?} reached with {} pipelines outstanding",
                        self.config.run_timeout,
                        tasks.len()
                    );
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    break;
                }
            }
        }

        for id in &persona_ids {
            if !results.contains_key(id) {
                results.insert(
                    id.clone(),
                    PersonaResult::failed(
                        id.clone(),
                        format!(
                            "cancelled: simulation ceiling of {:?} exceeded",
                            self.config.run_timeout
                        ),
                    ),
                );
            }
        }

        let overall_status = derive_overall_status(results.values());
        log::info!(
            "simulation finished: {:?}, {}/{} personas ok",
            overall_status,
            results.values().filter(|r| r.is_ok()).count(),
            results.len()
        );

        Ok(Simulation {
            id: Uuid::new_v4(),
            request,
            created_at: Utc::now(),
            results,
            overall_status,
        })
    }
}

/// One persona's build → invoke → validate pipeline.
async fn run_pipeline(
    backend: Arc<dyn GenerativeBackend>,
    semaphore: Arc<Semaphore>,
    message: &str,
    context_type: ContextType,
    persona: &Persona,
    persona_timeout: Duration,
) -> PersonaResult {
    let permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return PersonaResult::failed(&persona.id, "orchestrator shut down"),
    };

    let request = prompt::build(message, context_type, persona);
    let outcome = tokio::time::timeout(persona_timeout, backend.invoke(&request)).await;
    drop(permit);

    match outcome {
        Ok(Ok(raw)) => validation::parse(&persona.id, &raw),
        Ok(Err(e)) => PersonaResult::failed(&persona.id, format!("backend failure: {}", e)),
        Err(_) => PersonaResult::failed(
            &persona.id,
            format!("persona pipeline timed out after {:?}", persona_timeout),
        ),
    }
}

fn derive_overall_status<'a>(
    results: impl Iterator<Item = &'a PersonaResult>,
) -> OverallStatus {
    let mut ok = 0usize;
    let mut failed = 0usize;
    for result in results {
        if result.is_ok() {
            ok += 1;
        } else {
            failed += 1;
        }
    }
    match (ok, failed) {
        (_, 0) => OverallStatus::Complete,
        (0, _) => OverallStatus::Failed,
        _ => OverallStatus::Partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::backend::{BackendError, RawResponse};
    use crate::prompt::StructuredRequest;
    use crate::simulation::ResultStatus;

    /// Scripted reply for one persona.
    enum MockReply {
        /// Respond with this payload.
        Payload(String),
        /// Respond with this payload after a delay.
        Slow(Duration, String),
        /// Fail as if the retry budget was exhausted.
        Exhausted,
    }

    struct MockBackend {
        replies: HashMap<String, MockReply>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight_seen: AtomicUsize,
    }

    impl MockBackend {
        fn new(replies: HashMap<String, MockReply>) -> Arc<Self> {
            Arc::new(Self {
                replies,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight_seen: AtomicUsize::new(0),
            })
        }

        /// Which persona this request was built for, recovered from the
        /// persona-parameters block of the system prompt.
        fn persona_of(&self, request: &StructuredRequest) -> Option<&str> {
            self.replies
                .keys()
                .find(|id| request.system.contains(&format!("- id: {}\n", id)))
                .map(|s| s.as_str())
        }
    }

    #[async_trait]
    impl GenerativeBackend for MockBackend {
        async fn invoke(&self, request: &StructuredRequest) -> Result<RawResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight_seen.fetch_max(now, Ordering::SeqCst);

            let persona_id = self.persona_of(request).expect("unscripted persona");
            let result = match &self.replies[persona_id] {
                MockReply::Payload(text) => Ok(RawResponse { text: text.clone() }),
                MockReply::Slow(delay, text) => {
                    tokio::time::sleep(*delay).await;
                    Ok(RawResponse { text: text.clone() })
                }
                MockReply::Exhausted => Err(BackendError::RetriesExhausted {
                    attempts: 3,
                    last: "provider overloaded".to_string(),
                }),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        fn provider(&self) -> &str {
            "mock"
        }
    }

    fn ok_payload(receptivity: u8) -> String {
        format!(
            r#"{{
                "receptivity_score": {},
                "initial_reaction": "noted",
                "moral_foundations_breakdown": {{
                    "care": 50, "fairness": 50, "loyalty": 50,
                    "authority": 50, "sanctity": 50, "liberty": 50
                }},
                "concerns": [], "resonance_points": [],
                "barriers": [], "suggested_reframings": []
            }}"#,
            receptivity
        )
    }

    fn request(ids: &[&str]) -> SimulationRequest {
        SimulationRequest::new(
            "A carbon fee with a citizen dividend.",
            ContextType::PolicyBrief,
            ids.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn orchestrator(
        backend: Arc<MockBackend>,
        config: OrchestratorConfig,
    ) -> SimulationOrchestrator {
        SimulationOrchestrator::with_config(
            Arc::new(PersonaRegistry::builtin()),
            backend,
            config,
        )
    }

    #[tokio::test]
    async fn test_all_ok_is_complete() {
        let backend = MockBackend::new(HashMap::from([
            ("liberal".to_string(), MockReply::Payload(ok_payload(70))),
            ("moderate".to_string(), MockReply::Payload(ok_payload(55))),
        ]));
        let orch = orchestrator(Arc::clone(&backend), OrchestratorConfig::default());

        let sim = orch.run(request(&["liberal", "moderate"])).await.unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Complete);
        assert_eq!(sim.results.len(), 2);
        assert_eq!(
            sim.results["liberal"].receptivity_score,
            Some(70)
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_yields_partial() {
        let backend = MockBackend::new(HashMap::from([
            ("conservative".to_string(), MockReply::Payload(ok_payload(30))),
            ("moderate".to_string(), MockReply::Exhausted),
            ("liberal".to_string(), MockReply::Payload(ok_payload(80))),
        ]));
        let orch = orchestrator(backend, OrchestratorConfig::default());

        let sim = orch
            .run(request(&["conservative", "moderate", "liberal"]))
            .await
            .unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Partial);
        assert_eq!(sim.results["conservative"].status, ResultStatus::Ok);
        assert_eq!(sim.results["liberal"].status, ResultStatus::Ok);

        let failed = &sim.results["moderate"];
        assert_eq!(failed.status, ResultStatus::Failed);
        let detail = failed.error_detail.as_deref().unwrap();
        assert!(detail.contains("retry budget exhausted"), "{}", detail);
    }

    #[tokio::test]
    async fn test_unknown_persona_rejects_before_any_backend_call() {
        let backend = MockBackend::new(HashMap::from([(
            "moderate".to_string(),
            MockReply::Payload(ok_payload(50)),
        )]));
        let orch = orchestrator(Arc::clone(&backend), OrchestratorConfig::default());

        let err = orch
            .run(request(&["moderate", "mystery"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::PersonaNotFound { ref persona_id } if persona_id == "mystery"
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_collapse_to_one_call() {
        let backend = MockBackend::new(HashMap::from([(
            "moderate".to_string(),
            MockReply::Payload(ok_payload(50)),
        )]));
        let orch = orchestrator(Arc::clone(&backend), OrchestratorConfig::default());

        let sim = orch
            .run(request(&["moderate", "moderate"]))
            .await
            .unwrap();
        assert_eq!(sim.results.len(), 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persona_timeout_does_not_cancel_siblings() {
        let backend = MockBackend::new(HashMap::from([
            (
                "progressive".to_string(),
                MockReply::Slow(Duration::from_secs(300), ok_payload(90)),
            ),
            ("moderate".to_string(), MockReply::Payload(ok_payload(50))),
        ]));
        let orch = orchestrator(
            backend,
            OrchestratorConfig {
                max_in_flight: 3,
                persona_timeout: Duration::from_secs(5),
                run_timeout: Duration::from_secs(3600),
            },
        );

        let sim = orch
            .run(request(&["progressive", "moderate"]))
            .await
            .unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Partial);
        assert_eq!(sim.results["moderate"].status, ResultStatus::Ok);
        let detail = sim.results["progressive"].error_detail.as_deref().unwrap();
        assert!(detail.contains("timed out"), "{}", detail);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ceiling_preserves_completed_results() {
        let backend = MockBackend::new(HashMap::from([
            (
                "progressive".to_string(),
                MockReply::Slow(Duration::from_secs(600), ok_payload(90)),
            ),
            ("moderate".to_string(), MockReply::Payload(ok_payload(50))),
        ]));
        let orch = orchestrator(
            backend,
            OrchestratorConfig {
                max_in_flight: 3,
                persona_timeout: Duration::from_secs(3600),
                run_timeout: Duration::from_secs(10),
            },
        );

        let sim = orch
            .run(request(&["progressive", "moderate"]))
            .await
            .unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Partial);
        assert_eq!(sim.results["moderate"].status, ResultStatus::Ok);
        let detail = sim.results["progressive"].error_detail.as_deref().unwrap();
        assert!(detail.contains("ceiling"), "{}", detail);
    }

    #[tokio::test]
    async fn test_all_failed_is_failed() {
        let backend = MockBackend::new(HashMap::from([
            ("moderate".to_string(), MockReply::Exhausted),
            (
                "liberal".to_string(),
                MockReply::Payload("not json at all".to_string()),
            ),
        ]));
        let orch = orchestrator(backend, OrchestratorConfig::default());

        let sim = orch.run(request(&["moderate", "liberal"])).await.unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Failed);
        assert!(sim.results.values().all(|r| !r.is_ok()));
        assert!(sim
            .results
            .values()
            .all(|r| r.error_detail.as_deref().is_some_and(|d| !d.is_empty())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_calls_are_bounded() {
        let ids = ["conservative", "libertarian", "moderate", "liberal", "progressive"];
        let replies = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    MockReply::Slow(Duration::from_millis(50), ok_payload(50)),
                )
            })
            .collect();
        let backend = MockBackend::new(replies);
        let orch = orchestrator(
            Arc::clone(&backend),
            OrchestratorConfig {
                max_in_flight: 2,
                ..OrchestratorConfig::default()
            },
        );

        let sim = orch.run(request(&ids)).await.unwrap();
        assert_eq!(sim.overall_status, OverallStatus::Complete);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
        assert!(backend.max_in_flight_seen.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_derive_overall_status() {
        let ok = PersonaResult::ok(
            "a",
            50,
            crate::simulation::MoralFoundationScores {
                care: 0,
                fairness: 0,
                loyalty: 0,
                authority: 0,
                sanctity: 0,
                liberty: 0,
            },
            String::new(),
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let failed = PersonaResult::failed("b", "x");

        assert_eq!(
            derive_overall_status([&ok, &ok].into_iter()),
            OverallStatus::Complete
        );
        assert_eq!(
            derive_overall_status([&ok, &failed].into_iter()),
            OverallStatus::Partial
        );
        assert_eq!(
            derive_overall_status([&failed].into_iter()),
            OverallStatus::Failed
        );
    }
}
