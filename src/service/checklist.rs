//! Checklist resolution
//!
//! Resolution precedence: exact visa-type match, then a case-insensitive
//! whitespace-normalized destination match, then the default rule set.
//! There is always a checklist, even if generic. Results are cached per
//! normalized (country, visa_type) pair; `force_refresh` discards the
//! cached copy before recomputing.

use crate::db::ChecklistCacheRepository;
use crate::model::{
    ChecklistEntry, ChecklistResult, ProcessingTimeEstimate, UrgencyLevel, VisaRequirementRoute,
};
use crate::service::eligibility::labels;
use crate::service::knowledge::KnowledgeStoreService;
use crate::service::tracking;

/// Service resolving document checklists
#[derive(Clone)]
pub struct ChecklistService {
    knowledge: KnowledgeStoreService,
    cache: ChecklistCacheRepository,
}

impl ChecklistService {
    pub fn new(knowledge: KnowledgeStoreService, cache: ChecklistCacheRepository) -> Self {
        Self { knowledge, cache }
    }

    /// Resolve the checklist for a (country, visa type) pair
    ///
    /// `force_refresh` invalidates the cached entry first, guaranteeing
    /// freshly computed content. Cache and store failures degrade to
    /// recomputation and the default rule set; this path never errors.
    pub async fn resolve(
        &self,
        country: &str,
        visa_type: &str,
        force_refresh: bool,
    ) -> ChecklistResult {
        let cache_country = normalize(country);
        let cache_visa_type = normalize(visa_type);

        if force_refresh {
            tracking::best_effort(
                "checklist_cache_invalidate",
                self.cache.invalidate(&cache_country, &cache_visa_type),
            )
            .await;
        } else {
            match self.cache.get(&cache_country, &cache_visa_type).await {
                Ok(Some(cached)) => {
                    tracing::debug!(country = %cache_country, visa_type = %cache_visa_type, "Checklist cache hit");
                    return cached;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Checklist cache read failed, recomputing");
                }
            }
        }

        let routes = match self.knowledge.all_routes().await {
            Ok(routes) => routes,
            Err(e) => {
                tracing::warn!(error = %e, "Route store unavailable, using default checklist");
                Vec::new()
            }
        };

        let checklist = resolve_from_routes(&routes, visa_type, country)
            .unwrap_or_else(|| default_checklist(visa_type, country));

        tracking::best_effort(
            "checklist_cache_put",
            self.cache
                .put(&cache_country, &cache_visa_type, &checklist),
        )
        .await;

        checklist
    }
}

/// Match a checklist against known routes; `None` means "use the default"
pub fn resolve_from_routes(
    routes: &[VisaRequirementRoute],
    visa_type: &str,
    destination: &str,
) -> Option<ChecklistResult> {
    let wanted_visa = normalize(visa_type);

    // Exact visa-type match takes precedence
    if let Some(route) = routes.iter().find(|r| normalize(&r.visa_type) == wanted_visa) {
        return Some(checklist_from_route(route));
    }

    // Fall back to a destination match; compare resolved display labels so
    // codes ("uk", "GB") and names ("United Kingdom") all agree
    let wanted_destination = normalize(&labels::country_label(destination));
    routes
        .iter()
        .find(|r| normalize(&labels::country_label(&r.destination_country)) == wanted_destination)
        .map(checklist_from_route)
}

/// Derive a checklist from a curated route
///
/// Mandatory-first ordering is preserved from the route; AI-generatable
/// items form the system-generated list, everything else is a client upload.
pub fn checklist_from_route(route: &VisaRequirementRoute) -> ChecklistResult {
    let mut client_uploads = Vec::new();
    let mut system_generated = Vec::new();

    for item in &route.requirements {
        let entry = ChecklistEntry {
            name: item.name.clone(),
            description: item.description.clone(),
            is_mandatory: item.is_mandatory,
            urgency: item.urgency,
        };
        if item.is_ai_generatable {
            system_generated.push(entry);
        } else {
            client_uploads.push(entry);
        }
    }

    let key_requirements = route
        .requirements
        .iter()
        .filter(|item| item.is_mandatory)
        .map(|item| item.name.clone())
        .collect();

    ChecklistResult {
        visa_type: labels::visa_type_label(&route.visa_type),
        destination: labels::country_label(&route.destination_country),
        client_uploads,
        system_generated,
        processing_time: processing_time_text(&route.processing_time),
        key_requirements,
    }
}

/// Generic default checklist used when no route matches
pub fn default_checklist(visa_type: &str, destination: &str) -> ChecklistResult {
    let upload = |name: &str, description: &str, mandatory: bool, urgency: UrgencyLevel| {
        ChecklistEntry {
            name: name.to_string(),
            description: description.to_string(),
            is_mandatory: mandatory,
            urgency,
        }
    };

    let client_uploads = vec![
        upload(
            "Valid passport",
            "Passport valid for the full duration of the intended stay.",
            true,
            UrgencyLevel::Critical,
        ),
        upload(
            "Bank statements",
            "Statements covering the last six months, showing stable funds.",
            true,
            UrgencyLevel::High,
        ),
        upload(
            "Passport photos",
            "Recent photos meeting the destination's specifications.",
            true,
            UrgencyLevel::Normal,
        ),
        upload(
            "Proof of employment or study",
            "Letter from your employer or institution confirming your status.",
            false,
            UrgencyLevel::Normal,
        ),
    ];

    let system_generated = vec![
        upload(
            "Application cover letter",
            "Letter summarising your application and supporting evidence.",
            false,
            UrgencyLevel::Low,
        ),
        upload(
            "Travel itinerary",
            "Outline of the planned trip and return date.",
            false,
            UrgencyLevel::Low,
        ),
    ];

    let key_requirements = client_uploads
        .iter()
        .filter(|entry| entry.is_mandatory)
        .map(|entry| entry.name.clone())
        .collect();

    ChecklistResult {
        visa_type: labels::visa_type_label(visa_type),
        destination: labels::country_label(destination),
        client_uploads,
        system_generated,
        processing_time: "Varies by route; typically 2-12 weeks".to_string(),
        key_requirements,
    }
}

fn processing_time_text(pt: &ProcessingTimeEstimate) -> String {
    format!(
        "{}-{} days (typically {} days)",
        pt.min_days, pt.max_days, pt.typical_days
    )
}

/// Lowercase, trimmed, internal whitespace collapsed
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::seed;

    fn seed_routes() -> Vec<VisaRequirementRoute> {
        let (routes, failures) = seed::curated_routes();
        assert!(failures.is_empty());
        routes
    }

    #[test]
    fn test_exact_visa_type_match_wins() {
        let routes = seed_routes();
        let checklist = resolve_from_routes(&routes, "study_permit", "somewhere").unwrap();
        assert_eq!(checklist.destination, "Canada");
        assert!(checklist
            .key_requirements
            .iter()
            .any(|r| r.contains("acceptance")));
    }

    #[test]
    fn test_destination_match_is_case_and_whitespace_insensitive() {
        let routes = seed_routes();
        let checklist = resolve_from_routes(&routes, "unknown_type", "  UNITED   kingdom ").unwrap();
        assert_eq!(checklist.destination, "United Kingdom");
    }

    #[test]
    fn test_country_code_matches_destination() {
        let routes = seed_routes();
        let checklist = resolve_from_routes(&routes, "unknown_type", "uk").unwrap();
        assert_eq!(checklist.destination, "United Kingdom");
    }

    #[test]
    fn test_unknown_pair_falls_back_to_default() {
        let routes = seed_routes();
        assert!(resolve_from_routes(&routes, "unknown_type", "atlantis").is_none());

        let checklist = default_checklist("unknown_type", "atlantis");
        assert!(!checklist.client_uploads.is_empty());
        assert!(!checklist.system_generated.is_empty());
        assert!(!checklist.key_requirements.is_empty());
        assert_eq!(checklist.visa_type, "Unknown Type");
        assert_eq!(checklist.destination, "Atlantis");
    }

    #[test]
    fn test_empty_store_resolves_to_default() {
        assert!(resolve_from_routes(&[], "skilled_worker", "uk").is_none());
    }

    #[test]
    fn test_ai_generatable_items_are_system_generated() {
        let routes = seed_routes();
        let checklist = resolve_from_routes(&routes, "skilled_worker", "gb").unwrap();

        assert!(checklist
            .system_generated
            .iter()
            .any(|e| e.name.contains("cover letter")));
        assert!(checklist
            .client_uploads
            .iter()
            .any(|e| e.name.contains("passport")));
        // Optional items never appear among key requirements
        assert!(checklist
            .key_requirements
            .iter()
            .all(|name| !name.contains("cover letter")));
    }

    #[test]
    fn test_processing_time_text() {
        let routes = seed_routes();
        let checklist = resolve_from_routes(&routes, "skilled_worker", "gb").unwrap();
        assert_eq!(checklist.processing_time, "15-60 days (typically 21 days)");
    }
}
