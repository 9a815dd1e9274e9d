//! groupsim CLI runner.
//!
//! Runs one simulation against the Anthropic backend and prints the
//! resulting record as JSON (plus the cross-persona comparison when at
//! least two personas succeeded).
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY` — provider API key (required)
//! - `GROUPSIM_MODEL`    — model override (default: claude-sonnet-4-20250514)
//! - `GROUPSIM_CONTEXT`  — context type (default: social-media-post)
//! - `GROUPSIM_PERSONAS` — comma-separated persona ids (default: all five)
//! - `GROUPSIM_DB`       — SQLite path; when set, the simulation is saved
//! - `RUST_LOG`          — tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin simulate -- "We should plant more trees in cities."
//! # or read the message from stdin:
//! cat speech.txt | cargo run --bin simulate
//! ```

use std::io::Read;
use std::sync::Arc;

use groupsim::backend::anthropic::DEFAULT_MODEL;
use groupsim::backend::AnthropicBackend;
use groupsim::storage::{SimulationStore, SqliteSimulationStore};
use groupsim::{
    comparison, ContextType, PersonaRegistry, SimulationOrchestrator, SimulationRequest,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,groupsim=debug".into()),
        )
        .init();

    let message = read_message();
    let context_type = context_from_env();
    let persona_ids = personas_from_env();

    let registry = Arc::new(PersonaRegistry::builtin());
    let model = std::env::var("GROUPSIM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let backend = Arc::new(AnthropicBackend::new(model, None, None));
    let orchestrator = SimulationOrchestrator::new(registry, backend);

    let request = SimulationRequest::new(message, context_type, persona_ids);
    let simulation = match orchestrator.run(request).await {
        Ok(simulation) => simulation,
        Err(e) => {
            tracing::error!("simulation rejected: {}", e);
            std::process::exit(2);
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&simulation).expect("simulation serializes")
    );

    match comparison::build(&simulation) {
        Ok(cmp) => println!(
            "{}",
            serde_json::to_string_pretty(&cmp).expect("comparison serializes")
        ),
        Err(e) => tracing::warn!("no comparison: {}", e),
    }

    if let Ok(db_path) = std::env::var("GROUPSIM_DB") {
        match SqliteSimulationStore::new(&db_path) {
            Ok(store) => match store.save(&simulation).await {
                Ok(id) => tracing::info!("saved simulation {} to {}", id, db_path),
                Err(e) => tracing::error!("failed to save simulation: {}", e),
            },
            Err(e) => tracing::error!("failed to open store at {}: {}", db_path, e),
        }
    }
}

/// Message text from argv, falling back to stdin.
fn read_message() -> String {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return args.join(" ");
    }
    let mut buffer = String::new();
    if std::io::stdin().read_to_string(&mut buffer).is_err() || buffer.trim().is_empty() {
        eprintln!("usage: simulate <message>   (or pipe the message on stdin)");
        std::process::exit(2);
    }
    buffer
}

fn context_from_env() -> ContextType {
    let raw = std::env::var("GROUPSIM_CONTEXT").unwrap_or_else(|_| "social-media-post".into());
    match ContextType::parse(&raw) {
        Some(context) => context,
        None => {
            eprintln!(
                "unknown GROUPSIM_CONTEXT '{}'; expected one of: social-media-post, \
                 policy-brief, speech, news-article, campaign-ad",
                raw
            );
            std::process::exit(2);
        }
    }
}

fn personas_from_env() -> Vec<String> {
    match std::env::var("GROUPSIM_PERSONAS") {
        Ok(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => PersonaRegistry::shared()
            .list_all()
            .iter()
            .map(|p| p.id.clone())
            .collect(),
    }
}
