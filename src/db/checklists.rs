//! Repository for the resolved-checklist cache
//!
//! Cached per normalized (country, visa_type) pair; `invalidate` is the one
//! explicit cache-invalidation contract in the subsystem.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::DbError;
use crate::model::ChecklistResult;

/// Repository for cached checklist payloads
#[derive(Clone)]
pub struct ChecklistCacheRepository {
    pool: PgPool,
}

impl ChecklistCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a cached checklist, if present
    pub async fn get(
        &self,
        country: &str,
        visa_type: &str,
    ) -> Result<Option<ChecklistResult>, DbError> {
        let row: Option<(serde_json::Value, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT payload, generated_at FROM checklist_cache
            WHERE country = $1 AND visa_type = $2
            "#,
        )
        .bind(country)
        .bind(visa_type)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((payload, _)) => serde_json::from_value(payload)
                .map(Some)
                .map_err(|e| DbError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Store or refresh a cached checklist
    pub async fn put(
        &self,
        country: &str,
        visa_type: &str,
        checklist: &ChecklistResult,
    ) -> Result<(), DbError> {
        let payload = serde_json::to_value(checklist)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO checklist_cache (country, visa_type, payload, generated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (country, visa_type) DO UPDATE SET
                payload = EXCLUDED.payload,
                generated_at = NOW()
            "#,
        )
        .bind(country)
        .bind(visa_type)
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop the cached entry for a key
    /// Returns true if an entry was removed
    pub async fn invalidate(&self, country: &str, visa_type: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM checklist_cache WHERE country = $1 AND visa_type = $2
            "#,
        )
        .bind(country)
        .bind(visa_type)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(country = %country, visa_type = %visa_type, "Invalidated cached checklist");
        }

        Ok(deleted)
    }
}
