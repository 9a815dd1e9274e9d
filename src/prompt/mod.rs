//! Deterministic prompt construction.
//!
//! [`build`] is a pure function from (message, context type, persona) to a
//! [`StructuredRequest`]: no timestamps, no randomness, no environment reads.
//! Identical inputs always produce byte-identical output, which makes
//! golden-output tests possible.
//!
//! The system block conditions the backend on the persona's actual
//! characteristics — numeric moral-foundation weights, cultural-cognition
//! coordinates, triggers, and bridges — not just an opaque id. The user block
//! carries the message and the response-format contract the validator
//! enforces.

use std::fmt::Write as _;

use serde::Serialize;

use crate::personas::Persona;
use crate::simulation::ContextType;
use crate::validation::MAX_LIST_ITEMS;

/// The provider-agnostic request payload handed to the backend adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredRequest {
    /// Persona-conditioning system block.
    pub system: String,
    /// Message plus response-format instruction.
    pub user: String,
}

/// Build the backend request for one persona. Pure and deterministic.
pub fn build(message: &str, context_type: ContextType, persona: &Persona) -> StructuredRequest {
    StructuredRequest {
        system: build_system_block(persona),
        user: build_user_block(message, context_type),
    }
}

fn build_system_block(persona: &Persona) -> String {
    let mut out = String::new();
    out.push_str(&persona.system_prompt);

    out.push_str("\n\n## Persona Parameters\n");
    let _ = writeln!(out, "- id: {}", persona.id);
    let _ = writeln!(out, "- profile: {}", persona.description);
    let _ = writeln!(
        out,
        "- cultural cognition: {}",
        persona.cultural_cognition.describe()
    );
    out.push_str("- moral foundation salience (0 = irrelevant, 1 = central):\n");
    for (foundation, weight) in persona.moral_foundation_weights.iter() {
        let _ = writeln!(out, "    - {}: {:.2}", foundation.label(), weight);
    }

    out.push_str("\nMessage features that provoke your rejection:\n");
    for trigger in &persona.key_triggers {
        let _ = writeln!(out, "- {}", trigger);
    }
    out.push_str("\nFramings that open your receptivity:\n");
    for bridge in &persona.key_bridges {
        let _ = writeln!(out, "- {}", bridge);
    }
    out
}

fn build_user_block(message: &str, context_type: ContextType) -> String {
    format!(
        "Analyze the following {} and provide your authentic reaction from \
         your political perspective.\n\n\
         MESSAGE TO ANALYZE:\n\"\"\"\n{}\n\"\"\"\n\n{}",
        context_type.describe(),
        message,
        format_instruction()
    )
}

/// The response-format contract. Field names, ranges, and list caps here
/// mirror exactly what the validator enforces.
fn format_instruction() -> String {
    format!(
        "IMPORTANT: Respond ONLY with valid JSON. No markdown, no code \
         blocks, no explanations before or after. Your entire response must \
         be parseable JSON matching this exact structure:\n\
         {{\n\
         \x20 \"receptivity_score\": <integer 0-100>,\n\
         \x20 \"initial_reaction\": \"<1-2 sentence gut-level impression>\",\n\
         \x20 \"moral_foundations_breakdown\": {{\n\
         \x20   \"care\": <integer 0-100>,\n\
         \x20   \"fairness\": <integer 0-100>,\n\
         \x20   \"loyalty\": <integer 0-100>,\n\
         \x20   \"authority\": <integer 0-100>,\n\
         \x20   \"sanctity\": <integer 0-100>,\n\
         \x20   \"liberty\": <integer 0-100>\n\
         \x20 }},\n\
         \x20 \"concerns\": [\"<string>\", ...],\n\
         \x20 \"resonance_points\": [\"<string>\", ...],\n\
         \x20 \"barriers\": [\"<string>\", ...],\n\
         \x20 \"suggested_reframings\": [\"<string>\", ...]\n\
         }}\n\
         Each breakdown score reflects how strongly the message engages that \
         moral foundation for you. Each array holds at most {} items.",
        MAX_LIST_ITEMS
    )
}
