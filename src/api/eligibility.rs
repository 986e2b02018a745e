//! REST API endpoint for eligibility checks

use actix_web::{post, web, HttpRequest, HttpResponse};

use super::error::ApiError;
use crate::model::{ApplicantProfile, EligibilityResult};
use crate::service::EligibilityService;

/// Run an eligibility assessment for an applicant profile
///
/// Requires `country` and `visaType`; every other field is optional. A
/// degraded generative service still yields a valid conservative result,
/// never an error.
#[utoipa::path(
    post,
    path = "/v1/eligibility/checks",
    request_body = ApplicantProfile,
    responses(
        (status = 200, description = "Assessment completed", body = EligibilityResult),
        (status = 400, description = "Missing country or visa type"),
        (status = 500, description = "Internal server error")
    ),
    tag = "eligibility"
)]
#[post("/v1/eligibility/checks")]
pub async fn create_check(
    service: web::Data<EligibilityService>,
    profile: web::Json<ApplicantProfile>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let client_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);

    let result = service.assess(profile.into_inner(), client_ip).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Configure eligibility routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_check);
}
