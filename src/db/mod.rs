//! Database module for PostgreSQL persistence

pub mod checklists;
pub mod eligibility;
pub mod models;
pub mod routes;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

pub use checklists::ChecklistCacheRepository;
pub use eligibility::EligibilityLogRepository;
pub use routes::RouteRepository;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "VISAFLOW_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "VISAFLOW_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "VISAFLOW_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "VISAFLOW_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "VISAFLOW_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "visaflow";
const DEFAULT_POSTGRES_PASSWORD: &str = "visaflow";
const DEFAULT_POSTGRES_DB: &str = "visaflow";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    // Append-only eligibility log: one row per assessment, never updated
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS eligibility_checks (
            id UUID PRIMARY KEY,
            user_id TEXT,
            email TEXT,
            country_label TEXT NOT NULL,
            visa_type_label TEXT NOT NULL,
            input_snapshot JSONB NOT NULL DEFAULT '{}',
            verdict VARCHAR(20) NOT NULL,
            confidence DOUBLE PRECISION NOT NULL,
            summary TEXT NOT NULL,
            risk_factors JSONB NOT NULL DEFAULT '[]',
            recommended_steps JSONB NOT NULL DEFAULT '[]',
            recommended_documents JSONB NOT NULL DEFAULT '[]',
            should_follow_up BOOLEAN NOT NULL,
            campaign TEXT,
            source TEXT,
            medium TEXT,
            session_id TEXT,
            referrer TEXT,
            landing_page TEXT,
            client_ip TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS visa_requirement_routes (
            route_key VARCHAR(100) PRIMARY KEY,
            origin_country VARCHAR(10) NOT NULL,
            destination_country VARCHAR(10) NOT NULL,
            visa_type VARCHAR(100) NOT NULL,
            display_name TEXT NOT NULL,
            summary TEXT NOT NULL,
            processing_time JSONB NOT NULL,
            financial_threshold JSONB,
            known_pitfalls JSONB NOT NULL DEFAULT '[]',
            critical_path_steps JSONB NOT NULL DEFAULT '[]',
            official_sources JSONB NOT NULL DEFAULT '[]',
            requirements JSONB NOT NULL DEFAULT '[]',
            version INTEGER NOT NULL DEFAULT 1,
            last_verified_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_verified_by TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only audit of prior route states, one row per replaced version
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS visa_route_revisions (
            id BIGSERIAL PRIMARY KEY,
            route_key VARCHAR(100) NOT NULL,
            version INTEGER NOT NULL,
            snapshot JSONB NOT NULL,
            recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checklist_cache (
            country VARCHAR(100) NOT NULL,
            visa_type VARCHAR(100) NOT NULL,
            payload JSONB NOT NULL,
            generated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (country, visa_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Best-effort attribution touches; losing one of these is acceptable
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attribution_touches (
            id BIGSERIAL PRIMARY KEY,
            session_id TEXT,
            campaign TEXT,
            source TEXT,
            medium TEXT,
            referrer TEXT,
            landing_page TEXT,
            seen_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_eligibility_checks_created_at ON eligibility_checks(created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_eligibility_checks_country ON eligibility_checks(country_label)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_eligibility_checks_visa_type ON eligibility_checks(visa_type_label)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_visa_routes_destination ON visa_requirement_routes(destination_country, visa_type)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_visa_route_revisions_key ON visa_route_revisions(route_key)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
