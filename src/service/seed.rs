//! Curated seed data for the requirements knowledge store
//!
//! The seed file is parsed entry by entry: one malformed route is reported
//! with its key and cause and skipped, never aborting the rest of the batch.

use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::model::VisaRequirementRoute;

/// Embedded curated route data
const SEED_ROUTES_JSON: &str = include_str!("../../data/seed_routes.json");

/// One per-item seeding failure, with enough context to retry it later
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeedFailure {
    pub route_key: String,
    pub reason: String,
}

/// Outcome of one seed batch; pure accumulation, no shared counters
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SeedOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<SeedFailure>,
}

/// Parse the embedded seed file into routes, collecting per-item failures
pub fn curated_routes() -> (Vec<VisaRequirementRoute>, Vec<SeedFailure>) {
    parse_routes(SEED_ROUTES_JSON)
}

/// Parse a seed document entry by entry
///
/// The outer array must parse; individual entries that do not match the
/// route shape become `SeedFailure`s instead of aborting the batch.
pub fn parse_routes(raw: &str) -> (Vec<VisaRequirementRoute>, Vec<SeedFailure>) {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = %e, "Seed document is not a JSON array");
            return (
                Vec::new(),
                vec![SeedFailure {
                    route_key: "<document>".to_string(),
                    reason: e.to_string(),
                }],
            );
        }
    };

    let mut routes = Vec::new();
    let mut failures = Vec::new();

    for entry in entries {
        let route_key = entry
            .get("route_key")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing route_key>")
            .to_string();

        match serde_json::from_value::<VisaRequirementRoute>(entry) {
            Ok(mut route) => {
                fill_source_hashes(&mut route);
                routes.push(route);
            }
            Err(e) => {
                tracing::warn!(route_key = %route_key, error = %e, "Skipping malformed seed route");
                failures.push(SeedFailure {
                    route_key,
                    reason: e.to_string(),
                });
            }
        }
    }

    (routes, failures)
}

/// Compute missing content hashes for a route's official sources
///
/// Curation-time hashes are kept as-is; empty hashes are filled from the
/// source URL so every stored source carries provenance.
pub fn fill_source_hashes(route: &mut VisaRequirementRoute) {
    for source in &mut route.official_sources {
        if source.content_hash.is_empty() {
            source.content_hash = content_hash(source.url.as_str());
        }
    }
}

/// SHA-256 hex digest of a source URL
fn content_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_seed_parses_cleanly() {
        let (routes, failures) = curated_routes();
        assert!(failures.is_empty(), "failures: {:?}", failures);
        assert!(routes.len() >= 4);
        assert!(routes.iter().any(|r| r.route_key == "ZA-GB-skilled_worker"));
    }

    #[test]
    fn test_seed_hashes_are_filled() {
        let (routes, _) = curated_routes();
        for route in &routes {
            for source in &route.official_sources {
                assert_eq!(source.content_hash.len(), 64, "{}", route.route_key);
            }
        }
    }

    #[test]
    fn test_one_malformed_entry_does_not_block_the_rest() {
        let raw = r#"[
            {"route_key": "XX-YY-bad_route", "origin_country": "XX"},
            {
                "route_key": "ZA-IE-work_permit",
                "origin_country": "ZA",
                "destination_country": "IE",
                "visa_type": "work_permit",
                "display_name": "Ireland General Employment Permit",
                "summary": "Employer-backed work route.",
                "processing_time": {"min_days": 14, "max_days": 56, "typical_days": 28, "source_url": null},
                "financial_threshold": null,
                "known_pitfalls": [],
                "critical_path_steps": [],
                "official_sources": [],
                "requirements": [],
                "version": 1,
                "last_verified_at": "2026-07-14T00:00:00Z",
                "last_verified_by": "seed"
            }
        ]"#;

        let (routes, failures) = parse_routes(raw);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route_key, "ZA-IE-work_permit");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].route_key, "XX-YY-bad_route");
        assert!(!failures[0].reason.is_empty());
    }

    #[test]
    fn test_broken_document_reports_single_failure() {
        let (routes, failures) = parse_routes("not json at all");
        assert!(routes.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].route_key, "<document>");
    }
}
