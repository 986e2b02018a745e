//! Requirements knowledge store service
//!
//! Curated routes enter the store only through this service: every route is
//! validated before the idempotent upsert, and bulk seeding reports per-item
//! failures without aborting the batch.

use crate::db::models::{ListRoutesQuery, PaginatedRoutes};
use crate::db::{DbError, RouteRepository};
use crate::model::VisaRequirementRoute;
use crate::service::seed::{self, SeedFailure, SeedOutcome};

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Invalid route {route_key}: {reason}")]
    InvalidRoute { route_key: String, reason: String },

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Service fronting the versioned route store
#[derive(Clone)]
pub struct KnowledgeStoreService {
    routes: RouteRepository,
}

impl KnowledgeStoreService {
    pub fn new(routes: RouteRepository) -> Self {
        Self { routes }
    }

    /// Validate and upsert a single route; idempotent on `route_key`
    pub async fn upsert_route(
        &self,
        mut route: VisaRequirementRoute,
    ) -> Result<String, KnowledgeError> {
        if let Err(reason) = validate_route(&route) {
            return Err(KnowledgeError::InvalidRoute {
                route_key: route.route_key,
                reason,
            });
        }

        seed::fill_source_hashes(&mut route);
        Ok(self.routes.upsert(&route).await?)
    }

    /// Fetch one route; an unseeded store yields `Ok(None)`
    pub async fn get_route(
        &self,
        route_key: &str,
    ) -> Result<Option<VisaRequirementRoute>, KnowledgeError> {
        Ok(self.routes.get(route_key).await?)
    }

    /// Paginated route listing
    pub async fn list_routes(&self, query: ListRoutesQuery) -> Result<PaginatedRoutes, KnowledgeError> {
        Ok(self.routes.list(query).await?)
    }

    /// All routes, for in-memory resolution by the checklist service
    pub async fn all_routes(&self) -> Result<Vec<VisaRequirementRoute>, KnowledgeError> {
        Ok(self.routes.list_all().await?)
    }

    /// Run the curated seed batch
    ///
    /// Processes routes sequentially; each parse, validation or upsert
    /// failure is recorded individually and the batch continues. Safe to
    /// re-run: every successful item is an idempotent upsert.
    pub async fn seed_all(&self) -> SeedOutcome {
        let (routes, parse_failures) = seed::curated_routes();

        let mut outcome = SeedOutcome {
            succeeded: Vec::new(),
            failed: parse_failures,
        };

        for route in routes {
            let route_key = route.route_key.clone();

            if let Err(reason) = validate_route(&route) {
                tracing::warn!(route_key = %route_key, reason = %reason, "Skipping invalid seed route");
                outcome.failed.push(SeedFailure { route_key, reason });
                continue;
            }

            match self.routes.upsert(&route).await {
                Ok(_) => outcome.succeeded.push(route_key),
                Err(e) => {
                    tracing::warn!(route_key = %route_key, error = %e, "Failed to upsert seed route");
                    outcome.failed.push(SeedFailure {
                        route_key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Knowledge store seed batch finished"
        );

        outcome
    }
}

/// Structural validation for a route, pure so bulk seeding can reject one
/// bad entry without side effects
pub fn validate_route(route: &VisaRequirementRoute) -> Result<(), String> {
    let expected_key = VisaRequirementRoute::key_for(
        &route.origin_country,
        &route.destination_country,
        &route.visa_type,
    );
    if route.route_key != expected_key {
        return Err(format!(
            "route_key '{}' does not match its components (expected '{}')",
            route.route_key, expected_key
        ));
    }

    if route.origin_country.trim().is_empty() || route.destination_country.trim().is_empty() {
        return Err("origin and destination countries are required".to_string());
    }

    if route.display_name.trim().is_empty() {
        return Err("display_name is required".to_string());
    }

    let pt = &route.processing_time;
    if !(pt.min_days <= pt.typical_days && pt.typical_days <= pt.max_days) {
        return Err(format!(
            "processing time out of order: min {} / typical {} / max {}",
            pt.min_days, pt.typical_days, pt.max_days
        ));
    }

    let mut seen_ids = std::collections::HashSet::new();
    for item in &route.requirements {
        if item.id.trim().is_empty() {
            return Err(format!("requirement '{}' has an empty id", item.name));
        }
        if !seen_ids.insert(item.id.as_str()) {
            return Err(format!("duplicate requirement id '{}'", item.id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProcessingTimeEstimate;
    use chrono::Utc;

    fn base_route() -> VisaRequirementRoute {
        VisaRequirementRoute {
            route_key: "ZA-GB-skilled_worker".to_string(),
            origin_country: "ZA".to_string(),
            destination_country: "GB".to_string(),
            visa_type: "skilled_worker".to_string(),
            display_name: "UK Skilled Worker Visa".to_string(),
            summary: "Employer-sponsored work route.".to_string(),
            processing_time: ProcessingTimeEstimate {
                min_days: 15,
                max_days: 60,
                typical_days: 21,
                source_url: None,
            },
            financial_threshold: None,
            known_pitfalls: vec![],
            critical_path_steps: vec![],
            official_sources: vec![],
            requirements: vec![],
            version: 1,
            last_verified_at: Utc::now(),
            last_verified_by: "test".to_string(),
        }
    }

    #[test]
    fn test_valid_route_passes() {
        assert!(validate_route(&base_route()).is_ok());
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let mut route = base_route();
        route.route_key = "ZA-GB-student".to_string();
        let err = validate_route(&route).unwrap_err();
        assert!(err.contains("does not match"));
    }

    #[test]
    fn test_processing_time_order_is_enforced() {
        let mut route = base_route();
        route.processing_time.typical_days = 90;
        assert!(validate_route(&route).is_err());
    }

    #[test]
    fn test_duplicate_requirement_ids_are_rejected() {
        let mut route = base_route();
        let item = crate::model::RequirementItem {
            id: "passport".to_string(),
            category: "identity".to_string(),
            name: "Valid passport".to_string(),
            description: "Passport".to_string(),
            is_mandatory: true,
            is_ai_generatable: false,
            source_url: None,
            lead_time_days: None,
            notes: None,
            urgency: crate::model::UrgencyLevel::Critical,
        };
        route.requirements = vec![item.clone(), item];
        let err = validate_route(&route).unwrap_err();
        assert!(err.contains("duplicate requirement id"));
    }

    #[test]
    fn test_all_seed_routes_validate() {
        let (routes, failures) = crate::service::seed::curated_routes();
        assert!(failures.is_empty());
        for route in &routes {
            assert!(
                validate_route(route).is_ok(),
                "seed route {} failed validation",
                route.route_key
            );
        }
    }
}
