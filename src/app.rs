//! Application state and service initialization
//!
//! Centralizes service wiring and dependency injection so the Actix handlers
//! only ever see fully-constructed services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{ChecklistCacheRepository, EligibilityLogRepository, RouteRepository};
use crate::model::Config;
use crate::service::{
    AnalyticsService, ChecklistService, EligibilityService, KnowledgeStoreService,
    OpenAiGenerativeClient,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: Arc<PgPool>,
    pub eligibility_service: EligibilityService,
    pub checklist_service: ChecklistService,
    pub knowledge_service: KnowledgeStoreService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Generative client initialization (requires OPENAI_API_KEY)
    /// 3. Service dependency graph construction
    /// 4. Knowledge-store seeding, when enabled
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let client = OpenAiGenerativeClient::new(&api_key, config.engine.model.as_deref())
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let route_repository = RouteRepository::new(db_pool.clone());
        let log_repository = EligibilityLogRepository::new(db_pool.clone());
        let cache_repository = ChecklistCacheRepository::new(db_pool.clone());

        let knowledge_service = KnowledgeStoreService::new(route_repository);
        let checklist_service =
            ChecklistService::new(knowledge_service.clone(), cache_repository);
        let analytics_service = AnalyticsService::new(log_repository.clone());
        let eligibility_service =
            EligibilityService::new(Arc::new(client), log_repository, config.engine.clone());

        if config.seed_on_startup {
            let outcome = knowledge_service.seed_all().await;
            if !outcome.failed.is_empty() {
                tracing::warn!(
                    failed = outcome.failed.len(),
                    "Some seed routes failed; retry via POST /v1/routes/seed"
                );
            }
        }

        Ok(Self {
            db_pool: Arc::new(db_pool),
            eligibility_service,
            checklist_service,
            knowledge_service,
            analytics_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
