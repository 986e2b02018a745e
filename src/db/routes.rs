//! Repository for visa-requirement route operations
//!
//! Routes are never deleted: an upsert replaces the live row in place and
//! records the prior state in the append-only `visa_route_revisions` table.

use sqlx::PgPool;

use super::models::{ListRoutesQuery, PaginatedRoutes, RouteRow};
use super::DbError;
use crate::model::VisaRequirementRoute;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Repository for the versioned route knowledge store
#[derive(Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a route, idempotent on `route_key`
    ///
    /// A conflicting upsert bumps `version` and refreshes the verification
    /// fields; the replaced row is snapshotted into `visa_route_revisions`
    /// inside the same transaction.
    pub async fn upsert(&self, route: &VisaRequirementRoute) -> Result<String, DbError> {
        let processing_time = serde_json::to_value(&route.processing_time)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let financial_threshold = route
            .financial_threshold
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let known_pitfalls = serde_json::to_value(&route.known_pitfalls)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let critical_path_steps = serde_json::to_value(&route.critical_path_steps)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let official_sources = serde_json::to_value(&route.official_sources)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let requirements = serde_json::to_value(&route.requirements)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        let mut tx = self.pool.begin().await?;

        // Snapshot the live row, if any, before it is replaced
        sqlx::query(
            r#"
            INSERT INTO visa_route_revisions (route_key, version, snapshot)
            SELECT route_key, version, to_jsonb(r)
            FROM visa_requirement_routes r
            WHERE route_key = $1
            "#,
        )
        .bind(&route.route_key)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO visa_requirement_routes (
                route_key, origin_country, destination_country, visa_type,
                display_name, summary, processing_time, financial_threshold,
                known_pitfalls, critical_path_steps, official_sources,
                requirements, version, last_verified_at, last_verified_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 1, NOW(), $13)
            ON CONFLICT (route_key) DO UPDATE SET
                origin_country = EXCLUDED.origin_country,
                destination_country = EXCLUDED.destination_country,
                visa_type = EXCLUDED.visa_type,
                display_name = EXCLUDED.display_name,
                summary = EXCLUDED.summary,
                processing_time = EXCLUDED.processing_time,
                financial_threshold = EXCLUDED.financial_threshold,
                known_pitfalls = EXCLUDED.known_pitfalls,
                critical_path_steps = EXCLUDED.critical_path_steps,
                official_sources = EXCLUDED.official_sources,
                requirements = EXCLUDED.requirements,
                version = visa_requirement_routes.version + 1,
                last_verified_at = NOW(),
                last_verified_by = EXCLUDED.last_verified_by
            "#,
        )
        .bind(&route.route_key)
        .bind(&route.origin_country)
        .bind(&route.destination_country)
        .bind(&route.visa_type)
        .bind(&route.display_name)
        .bind(&route.summary)
        .bind(&processing_time)
        .bind(&financial_threshold)
        .bind(&known_pitfalls)
        .bind(&critical_path_steps)
        .bind(&official_sources)
        .bind(&requirements)
        .bind(&route.last_verified_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(route_key = %route.route_key, "Upserted visa requirement route");
        Ok(route.route_key.clone())
    }

    /// Get a route by key; an unseeded store yields `Ok(None)`
    pub async fn get(&self, route_key: &str) -> Result<Option<VisaRequirementRoute>, DbError> {
        let row: Option<RouteRow> = sqlx::query_as(
            r#"
            SELECT * FROM visa_requirement_routes WHERE route_key = $1
            "#,
        )
        .bind(route_key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_domain().map(Some).map_err(DbError::Serialization),
            None => Ok(None),
        }
    }

    /// List all routes; the curated store is small enough to scan
    pub async fn list_all(&self) -> Result<Vec<VisaRequirementRoute>, DbError> {
        let rows: Vec<RouteRow> = sqlx::query_as(
            r#"
            SELECT * FROM visa_requirement_routes ORDER BY route_key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // Skip rows that fail deserialization instead of failing the scan
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect())
    }

    /// List routes with pagination
    pub async fn list(&self, query: ListRoutesQuery) -> Result<PaginatedRoutes, DbError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(100);
        let offset = (page - 1) * page_size;

        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visa_requirement_routes")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<RouteRow> = sqlx::query_as(
            r#"
            SELECT * FROM visa_requirement_routes
            ORDER BY route_key
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;

        let routes: Vec<VisaRequirementRoute> = rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedRoutes {
            routes,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }
}
