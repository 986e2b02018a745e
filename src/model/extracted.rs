//! Output contract for the generative service
//!
//! The model is asked to return exactly one JSON object matching this type.
//! The same type drives the schema rendered into the prompt and the
//! parse-then-validate step, so prompt wording and parser can never drift.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw eligibility verdict as extracted from the model response
///
/// `verdict` and `summary` are mandatory; a response missing either is
/// rejected and replaced by the conservative fallback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedVerdict {
    #[schemars(description = "One of: likely, needs_more_info, unlikely")]
    pub verdict: ExtractedVerdictKind,

    #[schemars(description = "Confidence in the verdict, between 0.0 and 1.0")]
    pub confidence: Option<f64>,

    #[schemars(description = "Two or three sentences explaining the verdict in plain language")]
    pub summary: Option<String>,

    #[serde(default)]
    #[schemars(description = "Specific risk factors found in the profile, strongest first")]
    pub risk_factors: Vec<String>,

    #[serde(default)]
    #[schemars(description = "Concrete next steps the applicant should take, ordered")]
    pub recommended_steps: Vec<String>,

    #[serde(default)]
    #[schemars(description = "Documents the applicant should gather for this route")]
    pub recommended_documents: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedVerdictKind {
    Likely,
    NeedsMoreInfo,
    Unlikely,
}
