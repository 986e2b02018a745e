//! Eligibility assessment pipeline
//!
//! Turns a free-form applicant profile into a structured, persisted verdict:
//! validate, normalize labels, build prompt, call the generative service,
//! parse defensively, append to the eligibility log. The only hard failures
//! are invalid input and a failed log write; everything upstream degrades to
//! the conservative fallback verdict.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::EligibilityLogRepository;
use crate::model::{
    ApplicantProfile, AssessmentVerdict, EligibilityCheckRecord, EligibilityResult, EngineConfig,
};
use crate::service::llm::{GenerationRequest, GenerativeClient};
use crate::service::tracking;

pub mod error;
pub mod labels;
pub mod parser;
pub mod prompts;

pub use error::EligibilityError;

/// Service orchestrating the assessment pipeline
#[derive(Clone)]
pub struct EligibilityService {
    client: Arc<dyn GenerativeClient>,
    log: EligibilityLogRepository,
    engine: EngineConfig,
}

impl EligibilityService {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        log: EligibilityLogRepository,
        engine: EngineConfig,
    ) -> Self {
        Self {
            client,
            log,
            engine,
        }
    }

    /// Assess an applicant profile and persist the outcome
    ///
    /// Fails with `EligibilityError::Validation` on a missing country or
    /// visa type, and with `EligibilityError::Persistence` when the log
    /// write fails. Never fails on generative-service problems.
    pub async fn assess(
        &self,
        profile: ApplicantProfile,
        client_ip: Option<String>,
    ) -> Result<EligibilityResult, EligibilityError> {
        let result = run_assessment(self.client.as_ref(), &self.engine, &profile).await?;

        let input_snapshot =
            serde_json::to_value(&profile).unwrap_or_else(|_| serde_json::json!({}));
        let tracking_block = profile.tracking.clone().unwrap_or_default();

        let record = EligibilityCheckRecord {
            id: Uuid::new_v4(),
            user_id: profile.user_id.clone(),
            email: profile.email.clone(),
            country_label: result.country_label.clone(),
            visa_type_label: result.visa_type_label.clone(),
            input_snapshot,
            verdict: result.verdict,
            confidence: result.confidence,
            summary: result.summary.clone(),
            risk_factors: result.risk_factors.clone(),
            recommended_steps: result.recommended_steps.clone(),
            recommended_documents: result.recommended_documents.clone(),
            should_follow_up: result.should_follow_up,
            tracking: tracking_block,
            client_ip,
            created_at: Utc::now(),
        };

        // The log is the analytic source of truth: a failed write is a
        // hard error, unlike the attribution touch below.
        self.log.insert(&record).await?;

        if let Some(ref tracking_meta) = profile.tracking {
            tracking::best_effort(
                "attribution_touch",
                self.log.insert_attribution_touch(tracking_meta),
            )
            .await;
        }

        tracing::info!(
            id = %record.id,
            country = %record.country_label,
            visa_type = %record.visa_type_label,
            verdict = %record.verdict,
            confidence = record.confidence,
            "Eligibility check persisted"
        );

        Ok(result)
    }
}

/// Validate the required profile fields; runs before any external call
pub fn validate_profile(profile: &ApplicantProfile) -> Result<(), EligibilityError> {
    if profile.country.trim().is_empty() {
        return Err(EligibilityError::Validation(
            "country is required".to_string(),
        ));
    }
    if profile.visa_type.trim().is_empty() {
        return Err(EligibilityError::Validation(
            "visaType is required".to_string(),
        ));
    }
    Ok(())
}

/// Run the assessment steps that do not touch the database
///
/// Split out from `EligibilityService::assess` so the pipeline can be
/// exercised with stub clients.
pub async fn run_assessment(
    client: &dyn GenerativeClient,
    engine: &EngineConfig,
    profile: &ApplicantProfile,
) -> Result<EligibilityResult, EligibilityError> {
    validate_profile(profile)?;

    let country_label = labels::country_label(&profile.country);
    let visa_type_label = labels::visa_type_label(&profile.visa_type);

    let prompt = prompts::build_assessment_prompt(&country_label, &visa_type_label, profile);

    let request = GenerationRequest {
        system: prompts::ELIGIBILITY_SYSTEM_PROMPT.to_string(),
        prompt,
        max_tokens: engine.max_tokens,
        temperature: engine.temperature,
    };

    let start = std::time::Instant::now();

    // Upstream failure and unparsable output share one degradation path:
    // the fixed conservative fallback. No retries.
    let verdict = match client.generate(request).await {
        Ok(outcome) => {
            tracing::debug!(
                model = %outcome.model,
                elapsed_ms = outcome.elapsed_ms,
                prompt_chars = outcome.prompt_chars,
                "Generative service responded"
            );
            match parser::parse_verdict(&outcome.text) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    tracing::warn!(
                        country = %country_label,
                        visa_type = %visa_type_label,
                        reason = %reason,
                        "Model response failed validation, using fallback verdict"
                    );
                    parser::fallback_verdict()
                }
            }
        }
        Err(e) => {
            let elapsed = start.elapsed();
            tracing::warn!(
                country = %country_label,
                visa_type = %visa_type_label,
                elapsed_ms = elapsed.as_millis(),
                error = %e,
                "Generative service call failed, using fallback verdict"
            );
            parser::fallback_verdict()
        }
    };

    Ok(build_result(verdict, country_label, visa_type_label))
}

fn build_result(
    verdict: AssessmentVerdict,
    country_label: String,
    visa_type_label: String,
) -> EligibilityResult {
    let should_follow_up = verdict.verdict.should_follow_up();
    EligibilityResult {
        verdict: verdict.verdict,
        confidence: verdict.confidence,
        summary: verdict.summary,
        risk_factors: verdict.risk_factors,
        recommended_steps: verdict.recommended_steps,
        recommended_documents: verdict.recommended_documents,
        country_label,
        visa_type_label,
        should_follow_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Verdict;
    use crate::service::llm::{GenerationError, GenerationOutcome};
    use async_trait::async_trait;

    /// Stub returning a fixed response body
    struct FixedClient {
        response: String,
    }

    #[async_trait]
    impl GenerativeClient for FixedClient {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationOutcome, GenerationError> {
            Ok(GenerationOutcome {
                text: self.response.clone(),
                model: "stub".to_string(),
                prompt_chars: request.prompt.len(),
                elapsed_ms: 0,
            })
        }
    }

    /// Stub that fails every call
    struct FailingClient;

    #[async_trait]
    impl GenerativeClient for FailingClient {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationOutcome, GenerationError> {
            Err(GenerationError::Upstream("connection reset".to_string()))
        }
    }

    /// Stub that panics if the pipeline reaches the external call
    struct UnreachableClient;

    #[async_trait]
    impl GenerativeClient for UnreachableClient {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationOutcome, GenerationError> {
            panic!("generative service must not be called for invalid profiles");
        }
    }

    fn skilled_worker_profile() -> ApplicantProfile {
        ApplicantProfile {
            country: "uk".to_string(),
            visa_type: "uk_skilled_worker".to_string(),
            proof_of_funds: Some("Slightly below minimum".to_string()),
            home_ties: Some("Full-time employment".to_string()),
            previous_refusals: Some("no".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_structured_response() {
        let client = FixedClient {
            response: r#"Here you go:
{"verdict": "needs_more_info", "confidence": 0.55, "summary": "Funds are borderline.",
 "risk_factors": ["Proof of funds below published minimum"],
 "recommended_steps": ["Top up savings and re-check"],
 "recommended_documents": ["Six months of bank statements"]}"#
                .to_string(),
        };

        let result = run_assessment(
            &client,
            &EngineConfig::default(),
            &skilled_worker_profile(),
        )
        .await
        .unwrap();

        assert_eq!(result.verdict, Verdict::NeedsMoreInfo);
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
        assert_eq!(result.country_label, "United Kingdom");
        assert_eq!(result.visa_type_label, "UK Skilled Worker Visa");
        assert!(result.should_follow_up);
        assert_eq!(
            result.risk_factors,
            vec!["Proof of funds below published minimum"]
        );
    }

    #[tokio::test]
    async fn test_prose_response_degrades_to_fallback() {
        let client = FixedClient {
            response: "The applicant seems fine to me, broadly speaking.".to_string(),
        };

        let result = run_assessment(
            &client,
            &EngineConfig::default(),
            &skilled_worker_profile(),
        )
        .await
        .unwrap();

        assert_eq!(result.verdict, Verdict::NeedsMoreInfo);
        assert_eq!(result.confidence, parser::FALLBACK_CONFIDENCE);
        assert_eq!(result.country_label, "United Kingdom");
        assert_eq!(result.visa_type_label, "UK Skilled Worker Visa");
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_fallback() {
        let result = run_assessment(
            &FailingClient,
            &EngineConfig::default(),
            &skilled_worker_profile(),
        )
        .await
        .unwrap();

        assert_eq!(result.verdict, Verdict::NeedsMoreInfo);
        assert_eq!(result.confidence, parser::FALLBACK_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_missing_visa_type_fails_before_external_call() {
        let profile = ApplicantProfile {
            country: "uk".to_string(),
            ..Default::default()
        };

        let err = run_assessment(&UnreachableClient, &EngineConfig::default(), &profile)
            .await
            .unwrap_err();

        assert!(matches!(err, EligibilityError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_country_fails_before_external_call() {
        let profile = ApplicantProfile {
            visa_type: "uk_skilled_worker".to_string(),
            ..Default::default()
        };

        let err = run_assessment(&UnreachableClient, &EngineConfig::default(), &profile)
            .await
            .unwrap_err();

        assert!(matches!(err, EligibilityError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_codes_round_trip_to_labels() {
        let client = FixedClient {
            response: r#"{"verdict": "likely", "summary": "ok", "confidence": 0.7}"#.to_string(),
        };
        let profile = ApplicantProfile {
            country: "freedonia".to_string(),
            visa_type: "some_new_route".to_string(),
            ..Default::default()
        };

        let result = run_assessment(&client, &EngineConfig::default(), &profile)
            .await
            .unwrap();

        assert_eq!(result.country_label, "Freedonia");
        assert_eq!(result.visa_type_label, "Some New Route");
    }
}
