// src/db/stats_repository.rs
// DOCUMENTATION: Aggregate queries across listing tables
// PURPOSE: City index and admin dashboard counters

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::CityCount;
use serde::Serialize;
use sqlx::PgPool;

/// Counters shown on the admin dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DirectoryStats {
    pub profiles_total: i64,
    pub profiles_pending: i64,
    pub profiles_missing_seo: i64,
    pub businesses_total: i64,
    pub businesses_pending: i64,
    pub businesses_missing_seo: i64,
    pub reviews_pending: i64,
    pub users_total: i64,
    pub redirects_active: i64,
    pub redirect_hits: i64,
}

pub struct StatsRepository;

impl StatsRepository {
    /// Cities with approved listings, busiest first
    pub async fn cities(pool: &PgPool) -> Result<Vec<CityCount>, DirectoryError> {
        sqlx::query_as::<_, CityCount>(
            r#"
            SELECT MIN(city) AS city,
                   SUM(p)::BIGINT AS profiles,
                   SUM(b)::BIGINT AS businesses
            FROM (
                SELECT TRIM(city) AS city, 1 AS p, 0 AS b FROM profiles WHERE is_approved = true
                UNION ALL
                SELECT TRIM(city) AS city, 0 AS p, 1 AS b FROM businesses WHERE is_approved = true
            ) listings
            GROUP BY LOWER(city)
            ORDER BY SUM(p) + SUM(b) DESC, MIN(city) ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list cities", e))
    }

    pub async fn dashboard(pool: &PgPool) -> Result<DirectoryStats, DirectoryError> {
        sqlx::query_as::<_, DirectoryStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM profiles) AS profiles_total,
                (SELECT COUNT(*) FROM profiles WHERE is_approved = false) AS profiles_pending,
                (SELECT COUNT(*) FROM profiles WHERE seo_generated_at IS NULL) AS profiles_missing_seo,
                (SELECT COUNT(*) FROM businesses) AS businesses_total,
                (SELECT COUNT(*) FROM businesses WHERE is_approved = false) AS businesses_pending,
                (SELECT COUNT(*) FROM businesses WHERE seo_generated_at IS NULL) AS businesses_missing_seo,
                (SELECT COUNT(*) FROM reviews WHERE is_approved = false) AS reviews_pending,
                (SELECT COUNT(*) FROM users) AS users_total,
                (SELECT COUNT(*) FROM redirects WHERE is_active = true) AS redirects_active,
                (SELECT COALESCE(SUM(hit_count), 0)::BIGINT FROM redirects) AS redirect_hits
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to load dashboard stats", e))
    }
}
