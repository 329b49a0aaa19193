// src/db/redirect_repository.rs
// DOCUMENTATION: Redirect rule database operations

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::{CreateRedirectRequest, Redirect, UpdateRedirectRequest};
use sqlx::PgPool;
use uuid::Uuid;

pub struct RedirectRepository;

impl RedirectRepository {
    /// Active rule for an exact (normalised) path
    pub async fn find_active(pool: &PgPool, path: &str) -> Result<Option<Redirect>, DirectoryError> {
        sqlx::query_as::<_, Redirect>(
            "SELECT * FROM redirects WHERE from_path = $1 AND is_active = true",
        )
        .bind(path)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to look up redirect", e))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Redirect>, DirectoryError> {
        sqlx::query_as::<_, Redirect>("SELECT * FROM redirects ORDER BY from_path")
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("Failed to list redirects", e))
    }

    pub async fn create(
        pool: &PgPool,
        req: &CreateRedirectRequest,
    ) -> Result<Redirect, DirectoryError> {
        let redirect = sqlx::query_as::<_, Redirect>(
            r#"
            INSERT INTO redirects (from_path, to_path, status_code, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.from_path)
        .bind(&req.to_path)
        .bind(req.status_code)
        .bind(req.is_active)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create redirect", e))?;

        log::info!(
            "Created redirect {} -> {} ({})",
            redirect.from_path,
            redirect.to_path,
            redirect.status_code
        );
        Ok(redirect)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateRedirectRequest,
    ) -> Result<Redirect, DirectoryError> {
        sqlx::query_as::<_, Redirect>(
            r#"
            UPDATE redirects
            SET from_path = COALESCE($2, from_path),
                to_path = COALESCE($3, to_path),
                status_code = COALESCE($4, status_code),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.from_path)
        .bind(&req.to_path)
        .bind(req.status_code)
        .bind(req.is_active)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to update redirect", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("redirect {}", id)))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Redirect, DirectoryError> {
        sqlx::query_as::<_, Redirect>("SELECT * FROM redirects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to fetch redirect", e))?
            .ok_or_else(|| DirectoryError::NotFound(format!("redirect {}", id)))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let rows = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to delete redirect", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("redirect {}", id)));
        }
        Ok(())
    }

    pub async fn increment_hits(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        sqlx::query("UPDATE redirects SET hit_count = hit_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to count redirect hit", e))?;
        Ok(())
    }
}
