// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Photos attached to profiles and businesses by URL

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::{ListingKind, Photo};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Attach a photo URL to a listing
    /// DOCUMENTATION: Returns None when the URL is already attached
    pub async fn add_photo(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
        url: &str,
        is_primary: bool,
        display_order: i32,
    ) -> Result<Option<Photo>, DirectoryError> {
        sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (listing_kind, listing_id, url, is_primary, display_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (listing_kind, listing_id, url) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(kind.as_str())
        .bind(listing_id)
        .bind(url)
        .bind(is_primary)
        .bind(display_order)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to add photo", e))
    }

    /// Approved photos for a listing, primary first
    pub async fn get_photos(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<Vec<Photo>, DirectoryError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
            WHERE listing_kind = $1 AND listing_id = $2 AND is_approved = true
            ORDER BY is_primary DESC, display_order ASC, created_at ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(listing_id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to fetch photos", e))
    }

    /// (has a primary photo, next display_order) for a listing
    pub async fn photo_state(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
    ) -> Result<(bool, i32), DirectoryError> {
        let (has_primary, next_order): (bool, i32) = sqlx::query_as(
            r#"
            SELECT COALESCE(BOOL_OR(is_primary), false),
                   COALESCE(MAX(display_order) + 1, 0)
            FROM photos
            WHERE listing_kind = $1 AND listing_id = $2
            "#,
        )
        .bind(kind.as_str())
        .bind(listing_id)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to read photo state", e))?;

        Ok((has_primary, next_order))
    }
}
