pub mod analytics;
pub mod checklist;
pub mod eligibility;
pub mod error;
pub mod health;
pub mod openapi;
pub mod routes;

use utoipa::OpenApi;

pub use error::ApiError;

/// OpenAPI documentation for the engine's HTTP surface
#[derive(OpenApi)]
#[openapi(
    paths(
        eligibility::create_check,
        checklist::get_checklist,
        routes::list_routes,
        routes::get_route,
        routes::upsert_route,
        routes::seed_routes,
        analytics::summary,
        analytics::recent,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::model::ApplicantProfile,
        crate::model::TrackingMetadata,
        crate::model::EligibilityResult,
        crate::model::Verdict,
        crate::model::ChecklistResult,
        crate::model::ChecklistEntry,
        crate::model::VisaRequirementRoute,
        crate::model::RequirementItem,
        crate::model::UrgencyLevel,
        crate::model::ProcessingTimeEstimate,
        crate::model::FinancialThreshold,
        crate::model::OfficialSource,
        crate::model::AnalyticsSummary,
        crate::model::VolumeCount,
        crate::model::VerdictCount,
        crate::model::RecentCheck,
        crate::service::SeedOutcome,
        crate::service::SeedFailure,
        routes::RouteListResponse,
        routes::UpsertRouteResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    tags(
        (name = "eligibility", description = "Eligibility assessment pipeline"),
        (name = "checklists", description = "Document checklist resolution"),
        (name = "routes", description = "Visa-requirements knowledge store"),
        (name = "analytics", description = "Rollups over the eligibility log"),
        (name = "health", description = "Service health probes")
    )
)]
pub struct ApiDoc;
