//! Domain model for visa-requirement routes
//!
//! A route is one (origin, destination, visa type) combination together with
//! its curated requirement set, pitfalls and provenance metadata.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// A versioned bundle of requirements for a single migration route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisaRequirementRoute {
    /// Deterministic composite key, e.g. `ZA-GB-skilled_worker`
    pub route_key: String,
    /// ISO country code of the applicant's origin
    pub origin_country: String,
    /// ISO country code of the destination
    pub destination_country: String,
    /// Visa type code, lowercase snake_case
    pub visa_type: String,
    pub display_name: String,
    pub summary: String,
    pub processing_time: ProcessingTimeEstimate,
    pub financial_threshold: Option<FinancialThreshold>,
    pub known_pitfalls: Vec<String>,
    /// Ordered steps on the critical path to a decision
    pub critical_path_steps: Vec<String>,
    pub official_sources: Vec<OfficialSource>,
    /// Ordered requirement items, mandatory first by convention
    pub requirements: Vec<RequirementItem>,
    /// Bumped on every upsert; prior state lands in the revisions table
    pub version: i32,
    pub last_verified_at: DateTime<Utc>,
    pub last_verified_by: String,
}

impl VisaRequirementRoute {
    /// Build the canonical route key from its components
    pub fn key_for(origin: &str, destination: &str, visa_type: &str) -> String {
        format!(
            "{}-{}-{}",
            origin.trim().to_uppercase(),
            destination.trim().to_uppercase(),
            visa_type.trim().to_lowercase()
        )
    }
}

/// Estimated processing time for a route, in calendar days
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProcessingTimeEstimate {
    pub min_days: u32,
    pub max_days: u32,
    pub typical_days: u32,
    pub source_url: Option<Url>,
}

/// Minimum funds the applicant must evidence, as published by the authority
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinancialThreshold {
    pub amount: f64,
    pub currency: String,
    pub as_of: NaiveDate,
}

/// Provenance record for a curated route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficialSource {
    pub name: String,
    pub url: Url,
    pub last_checked: NaiveDate,
    /// SHA-256 over the source URL at curation time
    pub content_hash: String,
}

/// A single document or condition within a route's checklist
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequirementItem {
    /// Stable slug, unique within the owning route
    pub id: String,
    pub category: String,
    pub name: String,
    pub description: String,
    /// Optional items never count toward required completion
    pub is_mandatory: bool,
    /// Only AI-generatable items are eligible for drafting tools
    pub is_ai_generatable: bool,
    pub source_url: Option<Url>,
    pub lead_time_days: Option<u32>,
    pub notes: Option<String>,
    pub urgency: UrgencyLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical,
    High,
    Normal,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_key_is_deterministic() {
        assert_eq!(
            VisaRequirementRoute::key_for("za", "gb", "Skilled_Worker"),
            "ZA-GB-skilled_worker"
        );
        assert_eq!(
            VisaRequirementRoute::key_for(" ZA ", "GB", "skilled_worker"),
            "ZA-GB-skilled_worker"
        );
    }
}
