//! Response validation and normalization.
//!
//! [`parse`] turns one raw backend payload into a typed [`PersonaResult`].
//! The boundary is strict: the payload must decode as JSON of the expected
//! shape (SchemaError), every score must be an in-range integer (RangeError,
//! never silently clamped), and over-long lists are truncated to
//! [`MAX_LIST_ITEMS`] — truncation is normalization, not an error.
//!
//! Validation failures are data, not exceptions: any failure yields a
//! `Failed` result carrying a human-readable reason plus an excerpt of the
//! offending payload, so one persona's malformed output never aborts the
//! batch.

use serde_json::Value;
use thiserror::Error;

use crate::backend::RawResponse;
use crate::personas::MoralFoundation;
use crate::simulation::{MoralFoundationScores, PersonaResult};

/// Maximum items retained in each list field.
pub const MAX_LIST_ITEMS: usize = 5;

/// Characters of raw payload attached to an `error_detail` for diagnosis.
const EXCERPT_LEN: usize = 200;

/// Why a payload failed validation.
#[derive(Debug, Error)]
enum ValidationError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("range error: {0}")]
    Range(String),
}

/// Validate one raw backend response into a [`PersonaResult`].
///
/// Never fails: malformed payloads become `Failed` results.
pub fn parse(persona_id: &str, raw: &RawResponse) -> PersonaResult {
    match try_parse(persona_id, &raw.text) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("validation failed for persona {}: {}", persona_id, e);
            PersonaResult::failed(
                persona_id,
                format!("{}; raw payload: {}", e, excerpt(&raw.text)),
            )
        }
    }
}

fn try_parse(persona_id: &str, text: &str) -> Result<PersonaResult, ValidationError> {
    let json = extract_json(text)
        .ok_or_else(|| ValidationError::Schema("no JSON object found in payload".to_string()))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ValidationError::Schema(format!("JSON parse error: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::Schema("payload is not a JSON object".to_string()))?;

    let receptivity_score = score_field(&value, "receptivity_score")?;

    let breakdown = object
        .get("moral_foundations_breakdown")
        .ok_or_else(|| ValidationError::Schema("missing moral_foundations_breakdown".to_string()))?;
    if !breakdown.is_object() {
        return Err(ValidationError::Schema(
            "moral_foundations_breakdown is not an object".to_string(),
        ));
    }
    let mut scores = [0u8; 6];
    for (i, foundation) in MoralFoundation::ALL.iter().enumerate() {
        scores[i] = score_field(breakdown, foundation.key())?;
    }
    let moral_foundations_breakdown = MoralFoundationScores {
        care: scores[0],
        fairness: scores[1],
        loyalty: scores[2],
        authority: scores[3],
        sanctity: scores[4],
        liberty: scores[5],
    };

    let initial_reaction = object
        .get("initial_reaction")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(PersonaResult::ok(
        persona_id,
        receptivity_score,
        moral_foundations_breakdown,
        initial_reaction,
        list_field(&value, "concerns")?,
        list_field(&value, "resonance_points")?,
        list_field(&value, "barriers")?,
        list_field(&value, "suggested_reframings")?,
    ))
}

/// Read an integer score in `[0, 100]`.
///
/// A float with no fractional part is accepted; anything else out of range
/// or non-integral is a RangeError, never clamped.
fn score_field(parent: &Value, key: &str) -> Result<u8, ValidationError> {
    let value = parent
        .get(key)
        .ok_or_else(|| ValidationError::Schema(format!("missing field {}", key)))?;

    let number = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                if f.fract() != 0.0 {
                    return Err(ValidationError::Range(format!(
                        "{} must be an integer, got {}",
                        key, f
                    )));
                }
                f as i64
            } else {
                return Err(ValidationError::Range(format!(
                    "{} is not a representable integer",
                    key
                )));
            }
        }
        other => {
            return Err(ValidationError::Schema(format!(
                "{} must be a number, got {}",
                key,
                type_name(other)
            )))
        }
    };

    if !(0..=100).contains(&number) {
        return Err(ValidationError::Range(format!(
            "{} must be in [0, 100], got {}",
            key, number
        )));
    }
    Ok(number as u8)
}

/// Read a string list, truncating to [`MAX_LIST_ITEMS`]. Missing or null
/// fields normalize to an empty list.
fn list_field(parent: &Value, key: &str) -> Result<Vec<String>, ValidationError> {
    let value = match parent.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => v,
    };
    let items = value.as_array().ok_or_else(|| {
        ValidationError::Schema(format!("{} must be an array, got {}", key, type_name(value)))
    })?;

    let mut out = Vec::with_capacity(items.len().min(MAX_LIST_ITEMS));
    for item in items.iter().take(MAX_LIST_ITEMS) {
        let text = item.as_str().ok_or_else(|| {
            ValidationError::Schema(format!("{} items must be strings", key))
        })?;
        out.push(text.to_string());
    }
    Ok(out)
}

/// Locate the outermost JSON object in the payload, tolerating markdown
/// code fences and prose around it.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_LEN {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(EXCERPT_LEN).collect();
        format!("{}...", head)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ResultStatus;

    fn payload(receptivity: i64) -> String {
        format!(
            r#"{{
                "receptivity_score": {},
                "initial_reaction": "Hm, interesting.",
                "moral_foundations_breakdown": {{
                    "care": 40, "fairness": 55, "loyalty": 30,
                    "authority": 25, "sanctity": 10, "liberty": 70
                }},
                "concerns": ["cost"],
                "resonance_points": ["local control"],
                "barriers": ["messenger distrust"],
                "suggested_reframings": ["lead with jobs"]
            }}"#,
            receptivity
        )
    }

    fn raw(text: impl Into<String>) -> RawResponse {
        RawResponse { text: text.into() }
    }

    #[test]
    fn test_valid_payload_parses() {
        let result = parse("moderate", &raw(payload(62)));
        assert_eq!(result.status, ResultStatus::Ok);
        assert_eq!(result.receptivity_score, Some(62));
        let breakdown = result.moral_foundations_breakdown.unwrap();
        assert_eq!(breakdown.care, 40);
        assert_eq!(breakdown.liberty, 70);
        assert_eq!(result.initial_reaction, "Hm, interesting.");
        assert_eq!(result.concerns, vec!["cost"]);
        assert!(result.error_detail.is_none());
    }

    #[test]
    fn test_out_of_range_receptivity_fails() {
        let result = parse("moderate", &raw(payload(150)));
        assert_eq!(result.status, ResultStatus::Failed);
        assert!(result.receptivity_score.is_none());
        assert!(result.moral_foundations_breakdown.is_none());
        let detail = result.error_detail.unwrap();
        assert!(detail.contains("range error"), "{}", detail);
        assert!(detail.contains("150"), "{}", detail);
    }

    #[test]
    fn test_fractional_receptivity_fails_integral_float_accepted() {
        let fractional = payload(0).replace("\"receptivity_score\": 0", "\"receptivity_score\": 50.5");
        let result = parse("moderate", &raw(fractional));
        assert_eq!(result.status, ResultStatus::Failed);

        let integral = payload(0).replace("\"receptivity_score\": 0", "\"receptivity_score\": 50.0");
        let result = parse("moderate", &raw(integral));
        assert_eq!(result.status, ResultStatus::Ok);
        assert_eq!(result.receptivity_score, Some(50));
    }

    #[test]
    fn test_over_long_list_truncated_in_order() {
        let text = payload(50).replace(
            r#""resonance_points": ["local control"]"#,
            r#""resonance_points": ["a", "b", "c", "d", "e", "f", "g"]"#,
        );
        let result = parse("moderate", &raw(text));
        assert_eq!(result.status, ResultStatus::Ok);
        assert_eq!(result.resonance_points, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_fenced_payload_parses_like_bare() {
        let bare = parse("moderate", &raw(payload(62)));
        let fenced = parse(
            "moderate",
            &raw(format!("```json\n{}\n```", payload(62))),
        );
        assert_eq!(bare, fenced);
    }

    #[test]
    fn test_missing_breakdown_key_fails() {
        let text = payload(50).replace("\"sanctity\": 10,", "");
        let result = parse("moderate", &raw(text));
        assert_eq!(result.status, ResultStatus::Failed);
        assert!(result
            .error_detail
            .unwrap()
            .contains("missing field sanctity"));
    }

    #[test]
    fn test_out_of_range_breakdown_fails() {
        let text = payload(50).replace("\"liberty\": 70", "\"liberty\": 101");
        let result = parse("moderate", &raw(text));
        assert_eq!(result.status, ResultStatus::Failed);
    }

    #[test]
    fn test_non_json_payload_fails_with_excerpt() {
        let result = parse("moderate", &raw("I'd rather not answer in JSON today."));
        assert_eq!(result.status, ResultStatus::Failed);
        let detail = result.error_detail.unwrap();
        assert!(detail.contains("no JSON object found"));
        assert!(detail.contains("I'd rather not"), "{}", detail);
    }

    #[test]
    fn test_missing_lists_normalize_to_empty() {
        let text = r#"{
            "receptivity_score": 10,
            "moral_foundations_breakdown": {
                "care": 1, "fairness": 2, "loyalty": 3,
                "authority": 4, "sanctity": 5, "liberty": 6
            }
        }"#;
        let result = parse("moderate", &raw(text));
        assert_eq!(result.status, ResultStatus::Ok);
        assert!(result.concerns.is_empty());
        assert!(result.initial_reaction.is_empty());
    }

    #[test]
    fn test_string_score_is_schema_error() {
        let text = payload(50).replace("\"care\": 40", "\"care\": \"forty\"");
        let result = parse("moderate", &raw(text));
        assert_eq!(result.status, ResultStatus::Failed);
        assert!(result.error_detail.unwrap().contains("schema error"));
    }
}
