//! Cross-persona comparison.
//!
//! Pure derivation over a simulation's `Ok` results: which moral foundation
//! divides the personas most, the receptivity range, and a deterministic
//! ranking. Failed results are excluded; fewer than two `Ok` results cannot
//! be compared.

use serde::Serialize;
use thiserror::Error;

use crate::personas::MoralFoundation;
use crate::simulation::Simulation;

/// A comparison needs at least two `Ok` results.
#[derive(Debug, Error)]
#[error("comparison requires at least two successful persona results, have {have}")]
pub struct InsufficientDataError {
    pub have: usize,
}

/// Min/max/spread of receptivity over `Ok` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceptivityRange {
    pub min: u8,
    pub max: u8,
    pub spread: u8,
}

/// One entry of the receptivity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaRanking {
    pub persona_id: String,
    pub receptivity_score: u8,
}

/// Derived, non-persisted cross-persona view of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Foundation with the largest spread (max − min) across `Ok` results.
    /// Ties resolve to the earliest foundation in canonical order.
    pub most_divisive_foundation: MoralFoundation,
    pub receptivity_range: ReceptivityRange,
    /// Personas by receptivity descending; ties broken by persona_id
    /// ascending for reproducibility.
    pub persona_rankings: Vec<PersonaRanking>,
}

/// Build the comparison for a simulation.
pub fn build(simulation: &Simulation) -> Result<Comparison, InsufficientDataError> {
    let ok_results: Vec<_> = simulation.ok_results().collect();
    if ok_results.len() < 2 {
        return Err(InsufficientDataError {
            have: ok_results.len(),
        });
    }

    let mut most_divisive = MoralFoundation::Care;
    let mut widest_spread = -1i32;
    for foundation in MoralFoundation::ALL {
        let scores = ok_results.iter().filter_map(|r| {
            r.moral_foundations_breakdown
                .as_ref()
                .map(|b| i32::from(b.get(foundation)))
        });
        let (min, max) = min_max(scores);
        let spread = max - min;
        if spread > widest_spread {
            widest_spread = spread;
            most_divisive = foundation;
        }
    }

    let (min, max) = min_max(
        ok_results
            .iter()
            .filter_map(|r| r.receptivity_score.map(i32::from)),
    );
    let receptivity_range = ReceptivityRange {
        min: min as u8,
        max: max as u8,
        spread: (max - min) as u8,
    };

    let mut persona_rankings: Vec<PersonaRanking> = ok_results
        .iter()
        .filter_map(|r| {
            r.receptivity_score.map(|score| PersonaRanking {
                persona_id: r.persona_id.clone(),
                receptivity_score: score,
            })
        })
        .collect();
    persona_rankings.sort_by(|a, b| {
        b.receptivity_score
            .cmp(&a.receptivity_score)
            .then_with(|| a.persona_id.cmp(&b.persona_id))
    });

    Ok(Comparison {
        most_divisive_foundation: most_divisive,
        receptivity_range,
        persona_rankings,
    })
}

fn min_max(values: impl Iterator<Item = i32>) -> (i32, i32) {
    values.fold((i32::MAX, i32::MIN), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::simulation::{
        ContextType, MoralFoundationScores, OverallStatus, PersonaResult, SimulationRequest,
    };

    fn ok_result(persona_id: &str, receptivity: u8, scores: MoralFoundationScores) -> PersonaResult {
        PersonaResult::ok(
            persona_id,
            receptivity,
            scores,
            String::new(),
            vec![],
            vec![],
            vec![],
            vec![],
        )
    }

    fn simulation(results: Vec<PersonaResult>) -> Simulation {
        let persona_ids = results.iter().map(|r| r.persona_id.clone()).collect();
        let results: BTreeMap<String, PersonaResult> = results
            .into_iter()
            .map(|r| (r.persona_id.clone(), r))
            .collect();
        let any_failed = results.values().any(|r| !r.is_ok());
        Simulation {
            id: Uuid::new_v4(),
            request: SimulationRequest::new("msg", ContextType::Speech, persona_ids),
            created_at: Utc::now(),
            overall_status: if any_failed {
                OverallStatus::Partial
            } else {
                OverallStatus::Complete
            },
            results,
        }
    }

    fn flat(v: u8) -> MoralFoundationScores {
        MoralFoundationScores {
            care: v,
            fairness: v,
            loyalty: v,
            authority: v,
            sanctity: v,
            liberty: v,
        }
    }

    #[test]
    fn test_receptivity_range() {
        let sim = simulation(vec![
            ok_result("liberal", 80, flat(50)),
            ok_result("conservative", 20, flat(50)),
        ]);
        let cmp = build(&sim).unwrap();
        assert_eq!(
            cmp.receptivity_range,
            ReceptivityRange {
                min: 20,
                max: 80,
                spread: 60
            }
        );
    }

    #[test]
    fn test_most_divisive_foundation() {
        let a = MoralFoundationScores {
            care: 90,
            fairness: 50,
            loyalty: 10,
            authority: 40,
            sanctity: 50,
            liberty: 60,
        };
        let b = MoralFoundationScores {
            care: 70,
            fairness: 55,
            loyalty: 85, // loyalty spread 75, the widest
            authority: 45,
            sanctity: 50,
            liberty: 65,
        };
        let sim = simulation(vec![
            ok_result("liberal", 60, a),
            ok_result("conservative", 40, b),
        ]);
        let cmp = build(&sim).unwrap();
        assert_eq!(cmp.most_divisive_foundation, MoralFoundation::Loyalty);
    }

    #[test]
    fn test_divisive_tie_resolves_in_canonical_order() {
        // All foundations have identical spread; Care is first canonically.
        let sim = simulation(vec![
            ok_result("liberal", 60, flat(80)),
            ok_result("conservative", 40, flat(20)),
        ]);
        let cmp = build(&sim).unwrap();
        assert_eq!(cmp.most_divisive_foundation, MoralFoundation::Care);
    }

    #[test]
    fn test_ranking_descending_with_id_tiebreak() {
        let sim = simulation(vec![
            ok_result("moderate", 55, flat(50)),
            ok_result("liberal", 70, flat(50)),
            ok_result("conservative", 55, flat(50)),
        ]);
        let cmp = build(&sim).unwrap();
        let order: Vec<&str> = cmp
            .persona_rankings
            .iter()
            .map(|r| r.persona_id.as_str())
            .collect();
        assert_eq!(order, vec!["liberal", "conservative", "moderate"]);
    }

    #[test]
    fn test_failed_results_are_excluded() {
        let sim = simulation(vec![
            ok_result("liberal", 80, flat(50)),
            ok_result("moderate", 20, flat(50)),
            PersonaResult::failed("conservative", "backend down"),
        ]);
        let cmp = build(&sim).unwrap();
        assert_eq!(cmp.persona_rankings.len(), 2);
        assert_eq!(cmp.receptivity_range.spread, 60);
    }

    #[test]
    fn test_insufficient_data() {
        let none = simulation(vec![PersonaResult::failed("liberal", "x")]);
        let err = build(&none).unwrap_err();
        assert_eq!(err.have, 0);

        let one = simulation(vec![
            ok_result("liberal", 80, flat(50)),
            PersonaResult::failed("moderate", "x"),
        ]);
        let err = build(&one).unwrap_err();
        assert_eq!(err.have, 1);
    }
}
