//! Database row types and row/domain conversion

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::model::{
    FinancialThreshold, OfficialSource, ProcessingTimeEstimate, RecentCheck, RequirementItem,
    Verdict, VisaRequirementRoute,
};

/// Database representation of a visa-requirement route
#[derive(Debug, Clone, FromRow)]
pub struct RouteRow {
    pub route_key: String,
    pub origin_country: String,
    pub destination_country: String,
    pub visa_type: String,
    pub display_name: String,
    pub summary: String,
    pub processing_time: serde_json::Value,
    pub financial_threshold: Option<serde_json::Value>,
    pub known_pitfalls: serde_json::Value,
    pub critical_path_steps: serde_json::Value,
    pub official_sources: serde_json::Value,
    pub requirements: serde_json::Value,
    pub version: i32,
    pub last_verified_at: DateTime<Utc>,
    pub last_verified_by: String,
}

impl RouteRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<VisaRequirementRoute, String> {
        let processing_time: ProcessingTimeEstimate = serde_json::from_value(self.processing_time)
            .map_err(|e| format!("Invalid processing_time: {}", e))?;

        let financial_threshold: Option<FinancialThreshold> = match self.financial_threshold {
            Some(v) => serde_json::from_value(v)
                .map(Some)
                .map_err(|e| format!("Invalid financial_threshold: {}", e))?,
            None => None,
        };

        let known_pitfalls: Vec<String> = serde_json::from_value(self.known_pitfalls)
            .map_err(|e| format!("Invalid known_pitfalls: {}", e))?;

        let critical_path_steps: Vec<String> = serde_json::from_value(self.critical_path_steps)
            .map_err(|e| format!("Invalid critical_path_steps: {}", e))?;

        let official_sources: Vec<OfficialSource> = serde_json::from_value(self.official_sources)
            .map_err(|e| format!("Invalid official_sources: {}", e))?;

        let requirements: Vec<RequirementItem> = serde_json::from_value(self.requirements)
            .map_err(|e| format!("Invalid requirements: {}", e))?;

        Ok(VisaRequirementRoute {
            route_key: self.route_key,
            origin_country: self.origin_country,
            destination_country: self.destination_country,
            visa_type: self.visa_type,
            display_name: self.display_name,
            summary: self.summary,
            processing_time,
            financial_threshold,
            known_pitfalls,
            critical_path_steps,
            official_sources,
            requirements,
            version: self.version,
            last_verified_at: self.last_verified_at,
            last_verified_by: self.last_verified_by,
        })
    }
}

/// Slim projection used by the analytics live feed
#[derive(Debug, Clone, FromRow)]
pub struct RecentCheckRow {
    pub id: Uuid,
    pub country_label: String,
    pub visa_type_label: String,
    pub verdict: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl RecentCheckRow {
    pub fn into_domain(self) -> RecentCheck {
        RecentCheck {
            id: self.id,
            country_label: self.country_label,
            visa_type_label: self.visa_type_label,
            verdict: verdict_from_string(&self.verdict),
            confidence: self.confidence,
            created_at: self.created_at,
        }
    }
}

/// Helper to convert Verdict to string for database storage
pub fn verdict_to_string(verdict: &Verdict) -> &'static str {
    verdict.as_str()
}

/// Unknown strings resolve to the conservative default
pub fn verdict_from_string(s: &str) -> Verdict {
    match s {
        "likely" => Verdict::Likely,
        "unlikely" => Verdict::Unlikely,
        _ => Verdict::NeedsMoreInfo,
    }
}

/// Pagination query for route listings
#[derive(Debug, Clone, Default)]
pub struct ListRoutesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Paginated route listing
#[derive(Debug, Clone)]
pub struct PaginatedRoutes {
    pub routes: Vec<VisaRequirementRoute>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_round_trip() {
        for v in [Verdict::Likely, Verdict::NeedsMoreInfo, Verdict::Unlikely] {
            assert_eq!(verdict_from_string(verdict_to_string(&v)), v);
        }
    }

    #[test]
    fn test_unknown_verdict_string_is_conservative() {
        assert_eq!(verdict_from_string("garbage"), Verdict::NeedsMoreInfo);
    }
}
