//! Simulation data model.
//!
//! A [`SimulationRequest`] names a message, a context type, and the personas
//! to simulate. Running it produces one [`PersonaResult`] per persona — each
//! either `Ok` with scores and narrative lists, or `Failed` with a
//! human-readable reason — aggregated into a [`Simulation`] record whose
//! [`OverallStatus`] reflects the mix. Partial success is a first-class,
//! returnable outcome.

pub mod orchestrator;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::personas::MoralFoundation;
use crate::utilities::errors::SimulationError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// The kind of artifact the message is, used to condition the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextType {
    SocialMediaPost,
    PolicyBrief,
    Speech,
    NewsArticle,
    CampaignAd,
}

impl ContextType {
    /// Stable kebab-case identifier (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::SocialMediaPost => "social-media-post",
            ContextType::PolicyBrief => "policy-brief",
            ContextType::Speech => "speech",
            ContextType::NewsArticle => "news-article",
            ContextType::CampaignAd => "campaign-ad",
        }
    }

    /// Parse from the kebab-case identifier.
    pub fn parse(s: &str) -> Option<ContextType> {
        match s {
            "social-media-post" => Some(ContextType::SocialMediaPost),
            "policy-brief" => Some(ContextType::PolicyBrief),
            "speech" => Some(ContextType::Speech),
            "news-article" => Some(ContextType::NewsArticle),
            "campaign-ad" => Some(ContextType::CampaignAd),
            _ => None,
        }
    }

    /// Indefinite noun phrase used in the analysis prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            ContextType::SocialMediaPost => "a social media post",
            ContextType::PolicyBrief => "a policy brief or white paper excerpt",
            ContextType::Speech => "a speech or public address",
            ContextType::NewsArticle => "a news article or headline",
            ContextType::CampaignAd => "a campaign advertisement or political ad",
        }
    }
}

impl std::fmt::Display for ContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single simulation invocation. Not persisted itself — only the resulting
/// [`Simulation`] is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// The message text to analyze. Must be non-empty.
    pub message: String,
    /// What kind of artifact the message is.
    pub context_type: ContextType,
    /// Persona ids to simulate, in request order. Duplicates collapse.
    pub persona_ids: Vec<String>,
}

impl SimulationRequest {
    pub fn new(
        message: impl Into<String>,
        context_type: ContextType,
        persona_ids: Vec<String>,
    ) -> Self {
        Self {
            message: message.into(),
            context_type,
            persona_ids,
        }
    }

    /// Reject structurally invalid requests before any backend work.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.message.trim().is_empty() {
            return Err(SimulationError::EmptyMessage);
        }
        if self.persona_ids.is_empty() {
            return Err(SimulationError::EmptyPersonaSet);
        }
        Ok(())
    }

    /// Requested ids with duplicates removed, first occurrence wins.
    pub fn unique_persona_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.persona_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Per-persona result
// ---------------------------------------------------------------------------

/// Outcome of one persona pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Failed,
}

/// Per-foundation engagement scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoralFoundationScores {
    pub care: u8,
    pub fairness: u8,
    pub loyalty: u8,
    pub authority: u8,
    pub sanctity: u8,
    pub liberty: u8,
}

impl MoralFoundationScores {
    /// Score for a single foundation.
    pub fn get(&self, foundation: MoralFoundation) -> u8 {
        match foundation {
            MoralFoundation::Care => self.care,
            MoralFoundation::Fairness => self.fairness,
            MoralFoundation::Loyalty => self.loyalty,
            MoralFoundation::Authority => self.authority,
            MoralFoundation::Sanctity => self.sanctity,
            MoralFoundation::Liberty => self.liberty,
        }
    }

    /// Iterate `(foundation, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MoralFoundation, u8)> + '_ {
        MoralFoundation::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

/// The validated psychological profile produced for one persona.
///
/// Invariant: when `status` is `Failed`, every score field is `None`, every
/// list is empty, and `error_detail` is present. When `Ok`,
/// `receptivity_score` and `moral_foundations_breakdown` are both present and
/// in range, and `error_detail` is absent. Use [`PersonaResult::ok`] /
/// [`PersonaResult::failed`] to uphold this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaResult {
    pub persona_id: String,
    pub status: ResultStatus,
    /// 0–100 measure of how favorably the persona receives the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receptivity_score: Option<u8>,
    /// How strongly the message engages each foundation for this persona.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moral_foundations_breakdown: Option<MoralFoundationScores>,
    /// Gut-level first impression, one or two sentences.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub initial_reaction: String,
    /// Specific objections, capped at the list maximum.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concerns: Vec<String>,
    /// What works about the message for this persona.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resonance_points: Vec<String>,
    /// Why persuasion fails for this persona.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub barriers: Vec<String>,
    /// How the message could be reframed to reach this persona.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_reframings: Vec<String>,
    /// Present iff `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl PersonaResult {
    /// Construct a successful result.
    #[allow(clippy::too_many_arguments)]
    pub fn ok(
        persona_id: impl Into<String>,
        receptivity_score: u8,
        moral_foundations_breakdown: MoralFoundationScores,
        initial_reaction: String,
        concerns: Vec<String>,
        resonance_points: Vec<String>,
        barriers: Vec<String>,
        suggested_reframings: Vec<String>,
    ) -> Self {
        Self {
            persona_id: persona_id.into(),
            status: ResultStatus::Ok,
            receptivity_score: Some(receptivity_score),
            moral_foundations_breakdown: Some(moral_foundations_breakdown),
            initial_reaction,
            concerns,
            resonance_points,
            barriers,
            suggested_reframings,
            error_detail: None,
        }
    }

    /// Construct a failed result. All score and list fields stay empty.
    pub fn failed(persona_id: impl Into<String>, error_detail: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            status: ResultStatus::Failed,
            receptivity_score: None,
            moral_foundations_breakdown: None,
            initial_reaction: String::new(),
            concerns: Vec::new(),
            resonance_points: Vec::new(),
            barriers: Vec::new(),
            suggested_reframings: Vec::new(),
            error_detail: Some(error_detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}

// ---------------------------------------------------------------------------
// Aggregate record
// ---------------------------------------------------------------------------

/// Aggregate outcome of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// Every persona produced an `Ok` result.
    Complete,
    /// At least one `Ok` and at least one `Failed` result.
    Partial,
    /// No persona produced an `Ok` result.
    Failed,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Complete => "complete",
            OverallStatus::Partial => "partial",
            OverallStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<OverallStatus> {
        match s {
            "complete" => Some(OverallStatus::Complete),
            "partial" => Some(OverallStatus::Partial),
            "failed" => Some(OverallStatus::Failed),
            _ => None,
        }
    }
}

/// One completed simulation run: the request snapshot plus every per-persona
/// result, keyed by persona id so output is independent of completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: Uuid,
    pub request: SimulationRequest,
    pub created_at: DateTime<Utc>,
    pub results: BTreeMap<String, PersonaResult>,
    pub overall_status: OverallStatus,
}

impl Simulation {
    /// Iterate only the `Ok` results.
    pub fn ok_results(&self) -> impl Iterator<Item = &PersonaResult> {
        self.results.values().filter(|r| r.is_ok())
    }

    /// Mean receptivity over `Ok` results, `None` when there are none.
    pub fn avg_receptivity(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .ok_results()
            .filter_map(|r| r.receptivity_score)
            .map(f64::from)
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}
