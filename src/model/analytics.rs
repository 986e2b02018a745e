//! Read-side rollup types for operational dashboards

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::eligibility::Verdict;

/// Aggregate view over the eligibility log
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_checks: i64,
    pub checks_last_24h: i64,
    /// 0.0 when the log is empty
    pub average_confidence: f64,
    pub verdict_breakdown: Vec<VerdictCount>,
    /// Share of checks flagged for follow-up; 0.0 when the log is empty
    pub follow_up_rate: f64,
    pub top_countries: Vec<VolumeCount>,
    pub top_visa_types: Vec<VolumeCount>,
}

/// Check volume for one label within the rolling window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VolumeCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerdictCount {
    pub verdict: Verdict,
    pub count: i64,
}

/// Slim record projection for the live activity feed
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentCheck {
    pub id: Uuid,
    pub country_label: String,
    pub visa_type_label: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}
