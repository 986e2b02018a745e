//! REST API endpoints for eligibility analytics

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::ApiError;
use crate::model::{AnalyticsSummary, RecentCheck};
use crate::service::AnalyticsService;

/// Query parameters for the recent-activity feed
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentParams {
    /// Maximum number of records (default: 20, max: 100)
    pub limit: Option<i64>,
}

/// Aggregate rollups over the eligibility log
///
/// Safe against an empty log: totals are zero and lists are empty.
#[utoipa::path(
    get,
    path = "/v1/analytics/summary",
    responses(
        (status = 200, description = "Summary computed", body = AnalyticsSummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
#[get("/v1/analytics/summary")]
pub async fn summary(service: web::Data<AnalyticsService>) -> Result<HttpResponse, ApiError> {
    let summary = service.summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Most recent eligibility checks for the live feed
#[utoipa::path(
    get,
    path = "/v1/analytics/recent",
    params(RecentParams),
    responses(
        (status = 200, description = "Recent checks retrieved", body = [RecentCheck]),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
#[get("/v1/analytics/recent")]
pub async fn recent(
    service: web::Data<AnalyticsService>,
    query: web::Query<RecentParams>,
) -> Result<HttpResponse, ApiError> {
    let checks = service.recent(query.limit).await?;
    Ok(HttpResponse::Ok().json(checks))
}

/// Configure analytics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(summary).service(recent);
}
