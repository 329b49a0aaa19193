// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export repositories and share error/filter helpers

pub mod business_repository;
pub mod content_repository;
pub mod photo_repository;
pub mod profile_repository;
pub mod redirect_repository;
pub mod review_repository;
pub mod seo_repository;
pub mod stats_repository;
pub mod user_repository;

pub use business_repository::*;
pub use content_repository::*;
pub use photo_repository::*;
pub use profile_repository::*;
pub use redirect_repository::*;
pub use review_repository::*;
pub use seo_repository::*;
pub use stats_repository::*;
pub use user_repository::*;

use crate::errors::DirectoryError;
use crate::models::ListingSearchQuery;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error to DirectoryError, logging it with context
/// DOCUMENTATION: Unique-constraint violations become AlreadyExists so
/// handlers can answer 409 instead of 500
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DirectoryError {
    let is_unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION);

    if is_unique_violation {
        log::warn!("{}: unique constraint violated: {}", context, e);
        return DirectoryError::AlreadyExists(context.to_string());
    }

    log::error!("{}: {}", context, e);
    DirectoryError::DatabaseError(e.to_string())
}

/// Moderation flag columns shared by profiles and businesses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFlag {
    Approved,
    Verified,
    Featured,
}

impl ListingFlag {
    pub fn column(&self) -> &'static str {
        match self {
            ListingFlag::Approved => "is_approved",
            ListingFlag::Verified => "is_verified",
            ListingFlag::Featured => "is_featured",
        }
    }
}

/// Listing row as needed by the sitemap
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SitemapEntry {
    pub slug: String,
    pub city: String,
    pub updated_at: DateTime<Utc>,
}

/// Escape LIKE wildcards in user input
pub(crate) fn like_pattern(input: &str) -> String {
    let escaped = input
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append the public search filters to a query that already has a WHERE clause
pub(crate) fn push_listing_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ListingSearchQuery) {
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = like_pattern(q);
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(city) = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND LOWER(city) = LOWER(").push_bind(city.to_string()).push(")");
    }

    if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND category = ").push_bind(category.to_lowercase());
    }

    if query.verified == Some(true) {
        qb.push(" AND is_verified = true");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" 100%_sure "), "%100\\%\\_sure%");
    }

    #[test]
    fn test_filters_are_bound_not_inlined() {
        let query = ListingSearchQuery {
            q: Some("x'; DROP TABLE profiles; --".to_string()),
            city: Some("Madrid".to_string()),
            category: Some("Massage".to_string()),
            verified: Some(true),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM profiles WHERE is_approved = true");
        push_listing_filters(&mut qb, &query);
        let sql = qb.sql();

        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("name ILIKE $1 OR description ILIKE $2"));
        assert!(sql.contains("LOWER(city) = LOWER($3)"));
        assert!(sql.contains("category = $4"));
        assert!(sql.ends_with("is_verified = true"));
    }

    #[test]
    fn test_flag_columns() {
        assert_eq!(ListingFlag::Approved.column(), "is_approved");
        assert_eq!(ListingFlag::Featured.column(), "is_featured");
    }
}
