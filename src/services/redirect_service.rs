// src/services/redirect_service.rs
// DOCUMENTATION: Redirect rules and their cached lookup
// PURPOSE: Admin CRUD plus the path lookup used by the redirect middleware

use crate::db::RedirectRepository;
use crate::errors::DirectoryError;
use crate::models::{CreateRedirectRequest, Redirect, RedirectTarget, UpdateRedirectRequest};
use crate::services::cache::RedirectCache;
use crate::services::validation::{normalize_path, validate_redirect};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Location for a matched request: the request query string is carried
/// over only when the target has none of its own
pub fn location_for(target: &str, query: &str) -> String {
    if query.is_empty() || target.contains('?') {
        target.to_string()
    } else {
        format!("{}?{}", target, query)
    }
}

pub struct RedirectService;

impl RedirectService {
    /// Active redirect for a request path
    /// DOCUMENTATION: Results, including misses, are cached per normalised path
    pub async fn lookup(
        pool: &PgPool,
        cache: &RedirectCache,
        path: &str,
    ) -> Result<Option<RedirectTarget>, DirectoryError> {
        let key = normalize_path(path);
        if let Some(cached) = cache.get(&key).await {
            return Ok(cached);
        }

        let target = RedirectRepository::find_active(pool, &key)
            .await?
            .map(|redirect| redirect.to_target());
        cache.set(key, target.clone()).await;
        Ok(target)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Redirect>, DirectoryError> {
        RedirectRepository::list(pool).await
    }

    pub async fn create(
        pool: &PgPool,
        cache: &RedirectCache,
        mut req: CreateRedirectRequest,
    ) -> Result<Redirect, DirectoryError> {
        req.validate()?;
        req.from_path = normalize_path(&req.from_path);
        req.to_path = req.to_path.trim().to_string();
        validate_redirect(&req.from_path, &req.to_path, req.status_code)?;

        let redirect = RedirectRepository::create(pool, &req).await?;
        cache.clear().await;
        Ok(redirect)
    }

    /// Partial update; the merged rule is validated as a whole
    pub async fn update(
        pool: &PgPool,
        cache: &RedirectCache,
        id: Uuid,
        mut req: UpdateRedirectRequest,
    ) -> Result<Redirect, DirectoryError> {
        req.validate()?;
        req.from_path = req.from_path.map(|p| normalize_path(&p));
        req.to_path = req.to_path.map(|p| p.trim().to_string());

        let existing = RedirectRepository::get_by_id(pool, id).await?;
        validate_redirect(
            req.from_path.as_deref().unwrap_or(&existing.from_path),
            req.to_path.as_deref().unwrap_or(&existing.to_path),
            req.status_code.unwrap_or(existing.status_code),
        )?;

        let redirect = RedirectRepository::update(pool, id, &req).await?;
        cache.clear().await;
        Ok(redirect)
    }

    pub async fn delete(pool: &PgPool, cache: &RedirectCache, id: Uuid) -> Result<(), DirectoryError> {
        RedirectRepository::delete(pool, id).await?;
        cache.clear().await;
        Ok(())
    }

    /// Fire-and-forget hit counter
    pub fn spawn_hit(pool: PgPool, id: Uuid) {
        tokio::spawn(async move {
            if let Err(e) = RedirectRepository::increment_hits(&pool, id).await {
                log::warn!("Failed to count hit for redirect {}: {}", id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_keeps_query_when_target_has_none() {
        assert_eq!(location_for("/new", ""), "/new");
        assert_eq!(location_for("/new", "page=2"), "/new?page=2");
        assert_eq!(location_for("/new?ref=old", "page=2"), "/new?ref=old");
        assert_eq!(
            location_for("https://other.example/x", "a=1"),
            "https://other.example/x?a=1"
        );
    }
}
