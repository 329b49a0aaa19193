// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Visitor reviews and their moderation queue

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::{CreateReviewRequest, ListingKind, Review};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Store a new review; it stays hidden until approved
    pub async fn create_review(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
        req: &CreateReviewRequest,
    ) -> Result<Review, DirectoryError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (listing_kind, listing_id, author, rating, text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(kind.as_str())
        .bind(listing_id)
        .bind(req.author.trim())
        .bind(req.rating)
        .bind(&req.text)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create review", e))?;

        log::info!("New review {} for {} {}", review.id, kind, listing_id);
        Ok(review)
    }

    /// Approved reviews for a listing, newest first
    pub async fn get_approved(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Vec<Review>, DirectoryError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE listing_kind = $1 AND listing_id = $2 AND is_approved = true
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind.as_str())
        .bind(listing_id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to fetch reviews", e))
    }

    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<Review>, DirectoryError> {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE is_approved = false ORDER BY created_at ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list pending reviews", e))
    }

    pub async fn approve(pool: &PgPool, id: Uuid) -> Result<Review, DirectoryError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET is_approved = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to approve review", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("review {}", id)))?;

        log::info!("Approved review: {}", id);
        Ok(review)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let rows = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to delete review", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("review {}", id)));
        }

        log::info!("Deleted review: {}", id);
        Ok(())
    }
}
