//! Defensive parsing of generative-service output
//!
//! The model is instructed to return a single JSON object but is not trusted
//! to do so: the raw text is scanned for the first syntactically complete
//! object, which is then deserialized and validated. Every failure mode has
//! a name and every failure leads to the same conservative fallback.

use crate::model::{AssessmentVerdict, ExtractedVerdict, ExtractedVerdictKind, Verdict};

/// Fixed confidence for the fallback verdict
pub const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Confidence assumed when the model omits the field
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Why a model response could not be turned into a verdict
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFailure {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("JSON object does not match the verdict schema: {0}")]
    SchemaMismatch(String),

    #[error("mandatory field missing: {0}")]
    MissingField(&'static str),
}

/// Parse and validate a raw model response into a verdict
pub fn parse_verdict(raw: &str) -> Result<AssessmentVerdict, ParseFailure> {
    let block = extract_first_json_object(raw).ok_or(ParseFailure::NoJsonObject)?;

    let extracted: ExtractedVerdict =
        serde_json::from_str(block).map_err(|e| ParseFailure::SchemaMismatch(e.to_string()))?;

    validate(extracted)
}

/// Validate the extracted verdict: `verdict` and `summary` are mandatory,
/// confidence is clamped into [0, 1]
fn validate(extracted: ExtractedVerdict) -> Result<AssessmentVerdict, ParseFailure> {
    let summary = extracted
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ParseFailure::MissingField("summary"))?;

    let verdict = match extracted.verdict {
        ExtractedVerdictKind::Likely => Verdict::Likely,
        ExtractedVerdictKind::NeedsMoreInfo => Verdict::NeedsMoreInfo,
        ExtractedVerdictKind::Unlikely => Verdict::Unlikely,
    };

    let confidence = extracted
        .confidence
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    Ok(AssessmentVerdict {
        verdict,
        confidence,
        summary,
        risk_factors: extracted.risk_factors,
        recommended_steps: extracted.recommended_steps,
        recommended_documents: extracted.recommended_documents,
    })
}

/// The fixed, conservative verdict substituted whenever the generative
/// service's output cannot be validated
pub fn fallback_verdict() -> AssessmentVerdict {
    AssessmentVerdict {
        verdict: Verdict::NeedsMoreInfo,
        confidence: FALLBACK_CONFIDENCE,
        summary: "We could not complete an automated assessment of this profile. \
                  A consultant will review your details manually; the generic \
                  guidance below applies to most routes in the meantime."
            .to_string(),
        risk_factors: vec![
            "Automated assessment unavailable for this profile".to_string(),
            "Key evidence may be missing or incomplete".to_string(),
        ],
        recommended_steps: vec![
            "Book a consultation for a manual eligibility review".to_string(),
            "Gather financial statements covering the last six months".to_string(),
            "Collect documents evidencing ties to your home country".to_string(),
        ],
        recommended_documents: vec![
            "Valid passport".to_string(),
            "Bank statements".to_string(),
            "Proof of employment or study".to_string(),
        ],
    }
}

/// Find the first syntactically complete JSON object in free text
///
/// Brace-balanced scan that is aware of strings and escape sequences, so
/// braces inside string values do not terminate the object early.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|&b| b == b'{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_from_surrounding_prose() {
        let raw = r#"Sure! Here is my assessment:
{"verdict": "likely", "confidence": 0.8, "summary": "Strong profile."}
Let me know if you need anything else."#;

        let parsed = parse_verdict(raw).unwrap();
        assert_eq!(parsed.verdict, Verdict::Likely);
        assert_eq!(parsed.confidence, 0.8);
        assert_eq!(parsed.summary, "Strong profile.");
    }

    #[test]
    fn test_braces_inside_strings_do_not_truncate() {
        let raw = r#"{"verdict": "unlikely", "summary": "Funds {well} below threshold", "confidence": 0.7}"#;
        let parsed = parse_verdict(raw).unwrap();
        assert_eq!(parsed.summary, "Funds {well} below threshold");
    }

    #[test]
    fn test_prose_only_response_is_no_json_object() {
        let raw = "I think this applicant looks reasonably strong overall.";
        assert_eq!(parse_verdict(raw).unwrap_err(), ParseFailure::NoJsonObject);
    }

    #[test]
    fn test_missing_summary_is_rejected() {
        let raw = r#"{"verdict": "likely", "confidence": 0.9}"#;
        assert_eq!(
            parse_verdict(raw).unwrap_err(),
            ParseFailure::MissingField("summary")
        );
    }

    #[test]
    fn test_unknown_verdict_value_is_schema_mismatch() {
        let raw = r#"{"verdict": "maybe", "summary": "Hmm."}"#;
        assert!(matches!(
            parse_verdict(raw).unwrap_err(),
            ParseFailure::SchemaMismatch(_)
        ));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let raw = r#"{"verdict": "likely", "summary": "ok", "confidence": 1.7}"#;
        assert_eq!(parse_verdict(raw).unwrap().confidence, 1.0);

        let raw = r#"{"verdict": "unlikely", "summary": "ok", "confidence": -0.2}"#;
        assert_eq!(parse_verdict(raw).unwrap().confidence, 0.0);
    }

    #[test]
    fn test_missing_confidence_defaults() {
        let raw = r#"{"verdict": "needs_more_info", "summary": "Borderline."}"#;
        assert_eq!(parse_verdict(raw).unwrap().confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_first_of_multiple_objects_wins() {
        let raw = r#"{"verdict": "likely", "summary": "first"} {"verdict": "unlikely", "summary": "second"}"#;
        assert_eq!(parse_verdict(raw).unwrap().summary, "first");
    }

    #[test]
    fn test_unterminated_object_is_no_json_object() {
        let raw = r#"{"verdict": "likely", "summary": "never closed"#;
        assert_eq!(parse_verdict(raw).unwrap_err(), ParseFailure::NoJsonObject);
    }

    #[test]
    fn test_fallback_verdict_is_fixed() {
        let fallback = fallback_verdict();
        assert_eq!(fallback.verdict, Verdict::NeedsMoreInfo);
        assert_eq!(fallback.confidence, FALLBACK_CONFIDENCE);
        assert!(!fallback.risk_factors.is_empty());
        assert!(!fallback.recommended_steps.is_empty());
        assert!(!fallback.recommended_documents.is_empty());
    }
}
