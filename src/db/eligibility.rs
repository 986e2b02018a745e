//! Repository for the append-only eligibility log
//!
//! This table is the analytic source of truth: inserts are hard errors when
//! they fail, and no update or delete path exists.

use sqlx::PgPool;

use super::models::{verdict_to_string, RecentCheckRow};
use super::DbError;
use crate::model::{EligibilityCheckRecord, RecentCheck, TrackingMetadata, VerdictCount};

/// Repository for eligibility check records and their rollups
#[derive(Clone)]
pub struct EligibilityLogRepository {
    pool: PgPool,
}

/// Totals over the whole log
#[derive(Debug, Clone, Copy)]
pub struct LogTotals {
    pub total_checks: i64,
    pub checks_last_24h: i64,
    pub average_confidence: f64,
}

impl EligibilityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one check record; immutable once written
    pub async fn insert(&self, record: &EligibilityCheckRecord) -> Result<(), DbError> {
        let risk_factors = serde_json::to_value(&record.risk_factors)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let recommended_steps = serde_json::to_value(&record.recommended_steps)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let recommended_documents = serde_json::to_value(&record.recommended_documents)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO eligibility_checks (
                id, user_id, email, country_label, visa_type_label,
                input_snapshot, verdict, confidence, summary,
                risk_factors, recommended_steps, recommended_documents,
                should_follow_up, campaign, source, medium, session_id,
                referrer, landing_page, client_ip, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            "#,
        )
        .bind(record.id)
        .bind(&record.user_id)
        .bind(&record.email)
        .bind(&record.country_label)
        .bind(&record.visa_type_label)
        .bind(&record.input_snapshot)
        .bind(verdict_to_string(&record.verdict))
        .bind(record.confidence)
        .bind(&record.summary)
        .bind(&risk_factors)
        .bind(&recommended_steps)
        .bind(&recommended_documents)
        .bind(record.should_follow_up)
        .bind(&record.tracking.campaign)
        .bind(&record.tracking.source)
        .bind(&record.tracking.medium)
        .bind(&record.tracking.session_id)
        .bind(&record.tracking.referrer)
        .bind(&record.tracking.landing_page)
        .bind(&record.client_ip)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %record.id, verdict = %record.verdict, "Appended eligibility check record");
        Ok(())
    }

    /// Record an attribution touch; callers treat failures as best-effort
    pub async fn insert_attribution_touch(
        &self,
        tracking: &TrackingMetadata,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO attribution_touches (
                session_id, campaign, source, medium, referrer, landing_page
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&tracking.session_id)
        .bind(&tracking.campaign)
        .bind(&tracking.source)
        .bind(&tracking.medium)
        .bind(&tracking.referrer)
        .bind(&tracking.landing_page)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count/average totals, zero-safe on an empty log
    pub async fn totals(&self) -> Result<LogTotals, DbError> {
        let (total_checks, checks_last_24h, average_confidence): (i64, i64, f64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE created_at > NOW() - INTERVAL '24 hours'),
                    COALESCE(AVG(confidence), 0.0)
                FROM eligibility_checks
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(LogTotals {
            total_checks,
            checks_last_24h,
            average_confidence,
        })
    }

    /// Check counts per verdict
    pub async fn verdict_breakdown(&self) -> Result<Vec<VerdictCount>, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT verdict, COUNT(*) FROM eligibility_checks GROUP BY verdict
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(verdict, count)| VerdictCount {
                verdict: super::models::verdict_from_string(&verdict),
                count,
            })
            .collect())
    }

    /// Top destination countries by volume within a rolling window
    pub async fn top_countries(
        &self,
        limit: i64,
        window_days: i32,
    ) -> Result<Vec<(String, i64)>, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT country_label, COUNT(*) AS volume
            FROM eligibility_checks
            WHERE created_at > NOW() - make_interval(days => $1)
            GROUP BY country_label
            ORDER BY volume DESC
            LIMIT $2
            "#,
        )
        .bind(window_days)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Top visa types by volume within a rolling window
    pub async fn top_visa_types(
        &self,
        limit: i64,
        window_days: i32,
    ) -> Result<Vec<(String, i64)>, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT visa_type_label, COUNT(*) AS volume
            FROM eligibility_checks
            WHERE created_at > NOW() - make_interval(days => $1)
            GROUP BY visa_type_label
            ORDER BY volume DESC
            LIMIT $2
            "#,
        )
        .bind(window_days)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recent checks for the live feed
    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentCheck>, DbError> {
        let rows: Vec<RecentCheckRow> = sqlx::query_as(
            r#"
            SELECT id, country_label, visa_type_label, verdict, confidence, created_at
            FROM eligibility_checks
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecentCheckRow::into_domain).collect())
    }
}
