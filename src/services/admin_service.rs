// src/services/admin_service.rs
// DOCUMENTATION: Moderation operations
// PURPOSE: Pending queue, listing flags, hard deletes, review approval and stats

use crate::db::{
    BusinessRepository, DirectoryStats, ListingFlag, ProfileRepository, ReviewRepository,
    StatsRepository,
};
use crate::errors::DirectoryError;
use crate::models::{BusinessResponse, ListingKind, ProfileResponse, Review};
use crate::services::cache::{CacheStats, RedirectCache};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Items per type returned in the moderation queue
pub const PENDING_LIMIT: i64 = 100;

/// Everything waiting for a moderator
#[derive(Debug, Serialize)]
pub struct PendingQueue {
    pub profiles: Vec<ProfileResponse>,
    pub businesses: Vec<BusinessResponse>,
    pub reviews: Vec<Review>,
}

/// Dashboard counters plus the redirect cache state
#[derive(Debug, Serialize)]
pub struct AdminStats {
    #[serde(flatten)]
    pub directory: DirectoryStats,
    pub redirect_cache: CacheStats,
}

/// Parse a flag route segment such as "approve" or "unfeature"
pub fn parse_flag_action(action: &str) -> Result<(ListingFlag, bool), DirectoryError> {
    match action {
        "approve" => Ok((ListingFlag::Approved, true)),
        "unapprove" => Ok((ListingFlag::Approved, false)),
        "verify" => Ok((ListingFlag::Verified, true)),
        "unverify" => Ok((ListingFlag::Verified, false)),
        "feature" => Ok((ListingFlag::Featured, true)),
        "unfeature" => Ok((ListingFlag::Featured, false)),
        other => Err(DirectoryError::NotFound(format!("admin action '{}'", other))),
    }
}

pub struct AdminService;

impl AdminService {
    pub async fn pending(pool: &PgPool) -> Result<PendingQueue, DirectoryError> {
        let profiles = ProfileRepository::list_pending(pool, PENDING_LIMIT).await?;
        let businesses = BusinessRepository::list_pending(pool, PENDING_LIMIT).await?;
        let reviews = ReviewRepository::list_pending(pool, PENDING_LIMIT).await?;

        Ok(PendingQueue {
            profiles: profiles.iter().map(|p| p.to_response()).collect(),
            businesses: businesses.iter().map(|b| b.to_response()).collect(),
            reviews,
        })
    }

    pub async fn set_profile_flag(
        pool: &PgPool,
        id: Uuid,
        action: &str,
    ) -> Result<ProfileResponse, DirectoryError> {
        let (flag, value) = parse_flag_action(action)?;
        let profile = ProfileRepository::set_flag(pool, id, flag, value).await?;
        Ok(profile.to_response())
    }

    pub async fn set_business_flag(
        pool: &PgPool,
        id: Uuid,
        action: &str,
    ) -> Result<BusinessResponse, DirectoryError> {
        let (flag, value) = parse_flag_action(action)?;
        let business = BusinessRepository::set_flag(pool, id, flag, value).await?;
        Ok(business.to_response())
    }

    pub async fn delete_listing(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
    ) -> Result<(), DirectoryError> {
        match kind {
            ListingKind::Profile => ProfileRepository::delete(pool, id).await,
            ListingKind::Business => BusinessRepository::delete(pool, id).await,
        }
    }

    pub async fn approve_review(pool: &PgPool, id: Uuid) -> Result<Review, DirectoryError> {
        ReviewRepository::approve(pool, id).await
    }

    pub async fn delete_review(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        ReviewRepository::delete(pool, id).await
    }

    pub async fn stats(pool: &PgPool, cache: &RedirectCache) -> Result<AdminStats, DirectoryError> {
        let directory = StatsRepository::dashboard(pool).await?;
        let redirect_cache = cache.stats().await;
        Ok(AdminStats {
            directory,
            redirect_cache,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_action() {
        assert_eq!(parse_flag_action("approve").unwrap(), (ListingFlag::Approved, true));
        assert_eq!(parse_flag_action("unverify").unwrap(), (ListingFlag::Verified, false));
        assert_eq!(parse_flag_action("feature").unwrap(), (ListingFlag::Featured, true));
        assert!(matches!(
            parse_flag_action("delete"),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_admin_stats_flatten_cache_state() {
        let stats = AdminStats {
            directory: DirectoryStats {
                profiles_total: 3,
                profiles_pending: 1,
                profiles_missing_seo: 0,
                businesses_total: 2,
                businesses_pending: 0,
                businesses_missing_seo: 1,
                reviews_pending: 4,
                users_total: 5,
                redirects_active: 2,
                redirect_hits: 17,
            },
            redirect_cache: CacheStats {
                total_entries: 2,
                expired_entries: 1,
                active_entries: 1,
            },
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["profiles_total"], 3);
        assert_eq!(json["redirect_hits"], 17);
        assert_eq!(json["redirect_cache"]["active_entries"], 1);
    }
}
