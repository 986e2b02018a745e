//! REST API endpoints for the requirements knowledge store

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::error::ApiError;
use crate::db::models::ListRoutesQuery;
use crate::model::VisaRequirementRoute;
use crate::service::{KnowledgeStoreService, SeedOutcome};

/// Query parameters for listing routes
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRoutesParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
}

/// Paginated response for routes
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteListResponse {
    pub routes: Vec<VisaRequirementRoute>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Response for a successful upsert
#[derive(Debug, Serialize, ToSchema)]
pub struct UpsertRouteResponse {
    pub route_key: String,
}

/// List visa-requirement routes with pagination
#[utoipa::path(
    get,
    path = "/v1/routes",
    params(ListRoutesParams),
    responses(
        (status = 200, description = "Routes retrieved successfully", body = RouteListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "routes"
)]
#[get("/v1/routes")]
pub async fn list_routes(
    service: web::Data<KnowledgeStoreService>,
    query: web::Query<ListRoutesParams>,
) -> Result<HttpResponse, ApiError> {
    let paginated = service
        .list_routes(ListRoutesQuery {
            page: query.page,
            page_size: query.page_size,
        })
        .await?;

    Ok(HttpResponse::Ok().json(RouteListResponse {
        routes: paginated.routes,
        page: paginated.page,
        page_size: paginated.page_size,
        total_count: paginated.total_count,
        total_pages: paginated.total_pages,
    }))
}

/// Get a route by its key
#[utoipa::path(
    get,
    path = "/v1/routes/{route_key}",
    params(
        ("route_key" = String, Path, description = "Route key, e.g. ZA-GB-skilled_worker")
    ),
    responses(
        (status = 200, description = "Route retrieved successfully", body = VisaRequirementRoute),
        (status = 404, description = "Route not found")
    ),
    tag = "routes"
)]
#[get("/v1/routes/{route_key}")]
pub async fn get_route(
    service: web::Data<KnowledgeStoreService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let route_key = path.into_inner();

    match service.get_route(&route_key).await? {
        Some(route) => Ok(HttpResponse::Ok().json(route)),
        None => Err(ApiError::RouteNotFound(route_key)),
    }
}

/// Create or update a route (admin curation)
///
/// Idempotent on `route_key`: a repeated upsert bumps the version and
/// refreshes verification metadata instead of creating a duplicate.
#[utoipa::path(
    put,
    path = "/v1/routes",
    request_body = VisaRequirementRoute,
    responses(
        (status = 200, description = "Route upserted", body = UpsertRouteResponse),
        (status = 400, description = "Route failed validation"),
        (status = 500, description = "Internal server error")
    ),
    tag = "routes"
)]
#[put("/v1/routes")]
pub async fn upsert_route(
    service: web::Data<KnowledgeStoreService>,
    route: web::Json<VisaRequirementRoute>,
) -> Result<HttpResponse, ApiError> {
    let route_key = service.upsert_route(route.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UpsertRouteResponse { route_key }))
}

/// Run the curated seed batch
///
/// Per-item failures are reported in the outcome body; one bad entry never
/// blocks the rest of the batch.
#[utoipa::path(
    post,
    path = "/v1/routes/seed",
    responses(
        (status = 200, description = "Seed batch finished", body = SeedOutcome)
    ),
    tag = "routes"
)]
#[post("/v1/routes/seed")]
pub async fn seed_routes(
    service: web::Data<KnowledgeStoreService>,
) -> Result<HttpResponse, ApiError> {
    let outcome = service.seed_all().await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Configure knowledge-store routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_routes)
        .service(get_route)
        .service(upsert_route)
        .service(seed_routes);
}
