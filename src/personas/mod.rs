//! Persona catalog — ideological profiles and their scoring dimensions.
//!
//! Each persona is defined by six moral-foundation salience weights
//! (Haidt's Moral Foundations Theory) and a two-axis cultural-cognition
//! position (Kahan's framework), plus narrative metadata used to condition
//! the generative backend: a worldview preamble, the message features that
//! provoke rejection, and the framings that open receptivity.
//!
//! Exactly five personas exist. They are constructed once at startup and are
//! read-only thereafter; see [`PersonaRegistry`].

mod conservative;
mod liberal;
mod libertarian;
mod moderate;
mod progressive;
mod registry;

pub use registry::PersonaRegistry;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Moral foundations
// ---------------------------------------------------------------------------

/// The six moral-foundation dimensions used to score message engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoralFoundation {
    Care,
    Fairness,
    Loyalty,
    Authority,
    Sanctity,
    Liberty,
}

impl MoralFoundation {
    /// All six foundations in canonical order.
    pub const ALL: [MoralFoundation; 6] = [
        MoralFoundation::Care,
        MoralFoundation::Fairness,
        MoralFoundation::Loyalty,
        MoralFoundation::Authority,
        MoralFoundation::Sanctity,
        MoralFoundation::Liberty,
    ];

    /// Stable snake_case key, used as the JSON field name in prompts and
    /// backend responses.
    pub fn key(&self) -> &'static str {
        match self {
            MoralFoundation::Care => "care",
            MoralFoundation::Fairness => "fairness",
            MoralFoundation::Loyalty => "loyalty",
            MoralFoundation::Authority => "authority",
            MoralFoundation::Sanctity => "sanctity",
            MoralFoundation::Liberty => "liberty",
        }
    }

    /// Human-readable axis label (foundation/violation pair).
    pub fn label(&self) -> &'static str {
        match self {
            MoralFoundation::Care => "Care/Harm",
            MoralFoundation::Fairness => "Fairness/Cheating",
            MoralFoundation::Loyalty => "Loyalty/Betrayal",
            MoralFoundation::Authority => "Authority/Subversion",
            MoralFoundation::Sanctity => "Sanctity/Degradation",
            MoralFoundation::Liberty => "Liberty/Oppression",
        }
    }
}

impl std::fmt::Display for MoralFoundation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-foundation salience weights in `[0, 1]`.
///
/// Weights are independent salience scores, not a distribution — they need
/// not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoralFoundationWeights {
    pub care: f64,
    pub fairness: f64,
    pub loyalty: f64,
    pub authority: f64,
    pub sanctity: f64,
    pub liberty: f64,
}

impl MoralFoundationWeights {
    /// Weight for a single foundation.
    pub fn get(&self, foundation: MoralFoundation) -> f64 {
        match foundation {
            MoralFoundation::Care => self.care,
            MoralFoundation::Fairness => self.fairness,
            MoralFoundation::Loyalty => self.loyalty,
            MoralFoundation::Authority => self.authority,
            MoralFoundation::Sanctity => self.sanctity,
            MoralFoundation::Liberty => self.liberty,
        }
    }

    /// Iterate `(foundation, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MoralFoundation, f64)> + '_ {
        MoralFoundation::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

// ---------------------------------------------------------------------------
// Cultural cognition
// ---------------------------------------------------------------------------

/// Two-axis cultural-cognition position.
///
/// Sign convention: `individualism` runs from −1 (communitarian) to +1
/// (individualist); `hierarchy` runs from −1 (egalitarian) to +1
/// (hierarchical).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CulturalCognition {
    pub individualism: f64,
    pub hierarchy: f64,
}

impl CulturalCognition {
    /// Short quadrant description for prompt conditioning.
    pub fn describe(&self) -> String {
        let ind = if self.individualism >= 0.0 {
            "individualist"
        } else {
            "communitarian"
        };
        let hier = if self.hierarchy >= 0.0 {
            "hierarchical"
        } else {
            "egalitarian"
        };
        format!(
            "{}-{} (individualism {:+.2}, hierarchy {:+.2})",
            hier, ind, self.individualism, self.hierarchy
        )
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// A fixed ideological profile. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable lowercase identifier (e.g. `"conservative"`).
    pub id: String,
    /// Display name (e.g. `"Conservative"`).
    pub display_name: String,
    /// One-line characterization of the worldview.
    pub description: String,
    /// Six moral-foundation salience weights, each in `[0, 1]`.
    pub moral_foundation_weights: MoralFoundationWeights,
    /// Two-axis cultural-cognition position, each coordinate in `[-1, 1]`.
    pub cultural_cognition: CulturalCognition,
    /// Message features that provoke rejection for this persona.
    pub key_triggers: Vec<String>,
    /// Framings that open receptivity for this persona.
    pub key_bridges: Vec<String>,
    /// Worldview preamble used as the base of the backend system prompt.
    pub system_prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foundation_canonical_order() {
        let keys: Vec<&str> = MoralFoundation::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec!["care", "fairness", "loyalty", "authority", "sanctity", "liberty"]
        );
    }

    #[test]
    fn test_weights_get_matches_fields() {
        let w = MoralFoundationWeights {
            care: 0.1,
            fairness: 0.2,
            loyalty: 0.3,
            authority: 0.4,
            sanctity: 0.5,
            liberty: 0.6,
        };
        assert_eq!(w.get(MoralFoundation::Care), 0.1);
        assert_eq!(w.get(MoralFoundation::Liberty), 0.6);
        let collected: Vec<f64> = w.iter().map(|(_, v)| v).collect();
        assert_eq!(collected, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_cultural_cognition_describe_quadrants() {
        let hi = CulturalCognition {
            individualism: 0.6,
            hierarchy: 0.7,
        };
        assert!(hi.describe().starts_with("hierarchical-individualist"));

        let ec = CulturalCognition {
            individualism: -0.6,
            hierarchy: -0.7,
        };
        assert!(ec.describe().starts_with("egalitarian-communitarian"));
    }

    #[test]
    fn test_foundation_serde_snake_case() {
        let json = serde_json::to_string(&MoralFoundation::Sanctity).unwrap();
        assert_eq!(json, "\"sanctity\"");
        let back: MoralFoundation = serde_json::from_str("\"liberty\"").unwrap();
        assert_eq!(back, MoralFoundation::Liberty);
    }
}
