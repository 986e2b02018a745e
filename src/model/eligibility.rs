//! Domain model for eligibility assessments
//!
//! The applicant profile is the inbound payload; the check record is the
//! append-only fact written once per assessment and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Free-form applicant profile submitted for assessment
///
/// `country` and `visa_type` are required; everything else is optional and
/// rendered as "not provided" in the model prompt when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub visa_type: String,
    pub age_range: Option<String>,
    pub relationship_status: Option<String>,
    pub education_level: Option<String>,
    pub work_experience: Option<String>,
    pub language_test: Option<String>,
    pub proof_of_funds: Option<String>,
    pub home_ties: Option<String>,
    pub previous_refusals: Option<String>,
    pub travel_history: Option<String>,
    pub sponsor_income: Option<String>,
    pub notes: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub tracking: Option<TrackingMetadata>,
}

/// Attribution block captured for outbound-contact workflows
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackingMetadata {
    pub campaign: Option<String>,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub session_id: Option<String>,
    pub referrer: Option<String>,
    pub landing_page: Option<String>,
}

/// Three-way outcome of an eligibility assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Likely,
    NeedsMoreInfo,
    Unlikely,
}

impl Verdict {
    /// Drives outbound-contact workflows: everything except a clear
    /// `unlikely` is worth a follow-up.
    pub fn should_follow_up(&self) -> bool {
        !matches!(self, Verdict::Unlikely)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Likely => "likely",
            Verdict::NeedsMoreInfo => "needs_more_info",
            Verdict::Unlikely => "unlikely",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated assessment content, either parsed from the model output or
/// substituted by the conservative fallback
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentVerdict {
    pub verdict: Verdict,
    /// Always clamped to [0, 1]
    pub confidence: f64,
    pub summary: String,
    pub risk_factors: Vec<String>,
    pub recommended_steps: Vec<String>,
    pub recommended_documents: Vec<String>,
}

/// Result returned to the caller of the assessment pipeline
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub verdict: Verdict,
    pub confidence: f64,
    pub summary: String,
    pub risk_factors: Vec<String>,
    pub recommended_steps: Vec<String>,
    pub recommended_documents: Vec<String>,
    pub country_label: String,
    pub visa_type_label: String,
    pub should_follow_up: bool,
}

/// One append-only row in the eligibility log
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityCheckRecord {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub country_label: String,
    pub visa_type_label: String,
    /// Full input snapshot for later audit and debugging
    pub input_snapshot: serde_json::Value,
    pub verdict: Verdict,
    pub confidence: f64,
    pub summary: String,
    pub risk_factors: Vec<String>,
    pub recommended_steps: Vec<String>,
    pub recommended_documents: Vec<String>,
    pub should_follow_up: bool,
    pub tracking: TrackingMetadata,
    pub client_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_derivation() {
        assert!(Verdict::Likely.should_follow_up());
        assert!(Verdict::NeedsMoreInfo.should_follow_up());
        assert!(!Verdict::Unlikely.should_follow_up());
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::NeedsMoreInfo).unwrap(),
            "\"needs_more_info\""
        );
    }
}
