//! REST API endpoint for checklist resolution

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use super::error::ApiError;
use crate::model::ChecklistResult;
use crate::service::ChecklistService;

/// Query parameters for checklist lookup
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistParams {
    /// Destination country code or name
    pub country: String,
    /// Visa type code
    pub visa_type: String,
    /// Discard any cached checklist and recompute
    #[serde(default)]
    pub refresh: bool,
}

/// Resolve the document checklist for a (country, visa type) pair
///
/// Always returns a checklist: unknown pairs resolve to the generic default
/// rule set.
#[utoipa::path(
    get,
    path = "/v1/checklists",
    params(ChecklistParams),
    responses(
        (status = 200, description = "Checklist resolved", body = ChecklistResult)
    ),
    tag = "checklists"
)]
#[get("/v1/checklists")]
pub async fn get_checklist(
    service: web::Data<ChecklistService>,
    query: web::Query<ChecklistParams>,
) -> Result<HttpResponse, ApiError> {
    let checklist = service
        .resolve(&query.country, &query.visa_type, query.refresh)
        .await;

    Ok(HttpResponse::Ok().json(checklist))
}

/// Configure checklist routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_checklist);
}
