// src/db/profile_repository.rs
// DOCUMENTATION: Profile database operations
// PURPOSE: CRUD, search and moderation queries for the profiles table

use super::{db_error, push_listing_filters, ListingFlag, SitemapEntry};
use crate::errors::DirectoryError;
use crate::models::{
    CreateProfileRequest, ImportProfileRecord, ListingSearchQuery, Profile, UpdateProfileRequest,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct ProfileRepository;

impl ProfileRepository {
    /// Insert a profile with an already-chosen slug
    /// DOCUMENTATION: Returns AlreadyExists when the slug (or source pair) is taken
    pub async fn create(
        pool: &PgPool,
        user_id: Option<Uuid>,
        slug: &str,
        req: &CreateProfileRequest,
    ) -> Result<Profile, DirectoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                user_id, slug, name, category, city, region, age, gender,
                description, phone, email, website, services
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.city)
        .bind(&req.region)
        .bind(req.age)
        .bind(&req.gender)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.services)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create profile", e))?;

        log::info!("Created profile {} ({})", profile.id, profile.slug);
        Ok(profile)
    }

    /// Insert an imported profile; always created unapproved
    pub async fn create_imported(
        pool: &PgPool,
        slug: &str,
        category: &str,
        rec: &ImportProfileRecord,
    ) -> Result<Profile, DirectoryError> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (
                slug, name, category, city, region, age, gender,
                description, phone, email, website, services, source, source_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(&rec.name)
        .bind(category)
        .bind(&rec.city)
        .bind(&rec.region)
        .bind(rec.age)
        .bind(&rec.gender)
        .bind(&rec.description)
        .bind(&rec.phone)
        .bind(&rec.email)
        .bind(&rec.website)
        .bind(&rec.services)
        .bind(&rec.source)
        .bind(&rec.source_id)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to import profile", e))
    }

    /// Fill empty columns of an existing imported profile
    /// DOCUMENTATION: Non-empty values already stored are never overwritten
    pub async fn fill_missing(
        pool: &PgPool,
        id: Uuid,
        rec: &ImportProfileRecord,
    ) -> Result<Profile, DirectoryError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET region = COALESCE(NULLIF(region, ''), $2),
                age = COALESCE(age, $3),
                gender = COALESCE(NULLIF(gender, ''), $4),
                description = COALESCE(NULLIF(description, ''), $5),
                phone = COALESCE(NULLIF(phone, ''), $6),
                email = COALESCE(NULLIF(email, ''), $7),
                website = COALESCE(NULLIF(website, ''), $8),
                services = CASE WHEN cardinality(services) = 0 THEN $9 ELSE services END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&rec.region)
        .bind(rec.age)
        .bind(&rec.gender)
        .bind(&rec.description)
        .bind(&rec.phone)
        .bind(&rec.email)
        .bind(&rec.website)
        .bind(&rec.services)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to merge imported profile", e))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Profile, DirectoryError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to fetch profile", e))?
            .ok_or_else(|| {
                log::warn!("Profile not found: {}", id);
                DirectoryError::NotFound(format!("profile {}", id))
            })
    }

    /// Public lookup by slug; unapproved profiles are reported as missing
    pub async fn get_approved_by_slug(pool: &PgPool, slug: &str) -> Result<Profile, DirectoryError> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE slug = $1 AND is_approved = true",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to fetch profile by slug", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("profile '{}'", slug)))
    }

    pub async fn get_by_source(
        pool: &PgPool,
        source: &str,
        source_id: &str,
    ) -> Result<Option<Profile>, DirectoryError> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE source = $1 AND source_id = $2",
        )
        .bind(source)
        .bind(source_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to fetch profile by source", e))
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, DirectoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM profiles WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await
                .map_err(|e| db_error("Failed to check profile slug", e))?;
        Ok(exists)
    }

    /// Search approved profiles
    /// DOCUMENTATION: Returns tuple: (results, total_count) for pagination
    /// Featured first, then verified, then newest
    pub async fn search(
        pool: &PgPool,
        query: &ListingSearchQuery,
    ) -> Result<(Vec<Profile>, i64), DirectoryError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM profiles WHERE is_approved = true");
        push_listing_filters(&mut count_qb, query);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("Profile count query failed", e))?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM profiles WHERE is_approved = true");
        push_listing_filters(&mut qb, query);
        qb.push(" ORDER BY is_featured DESC, is_verified DESC, created_at DESC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let profiles = qb
            .build_query_as::<Profile>()
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("Profile search query failed", e))?;

        log::debug!(
            "Profile search: {} results, {} total (page {})",
            profiles.len(),
            total,
            query.page()
        );

        Ok((profiles, total))
    }

    /// Partial update - only provided fields are modified
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<Profile, DirectoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                city = COALESCE($4, city),
                region = COALESCE($5, region),
                age = COALESCE($6, age),
                gender = COALESCE($7, gender),
                description = COALESCE($8, description),
                phone = COALESCE($9, phone),
                email = COALESCE($10, email),
                website = COALESCE($11, website),
                services = COALESCE($12, services),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.city)
        .bind(&req.region)
        .bind(req.age)
        .bind(&req.gender)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.services)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to update profile", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("profile {}", id)))?;

        log::info!("Updated profile: {}", id);
        Ok(profile)
    }

    pub async fn set_flag(
        pool: &PgPool,
        id: Uuid,
        flag: ListingFlag,
        value: bool,
    ) -> Result<Profile, DirectoryError> {
        let sql = format!(
            "UPDATE profiles SET {} = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            flag.column()
        );
        let profile = sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(value)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to update profile flag", e))?
            .ok_or_else(|| DirectoryError::NotFound(format!("profile {}", id)))?;

        log::info!("Profile {} {} = {}", id, flag.column(), value);
        Ok(profile)
    }

    /// Hard delete with the listing's photos and reviews
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        for sql in [
            "DELETE FROM photos WHERE listing_kind = 'profile' AND listing_id = $1",
            "DELETE FROM reviews WHERE listing_kind = 'profile' AND listing_id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to delete profile media", e))?;
        }

        let rows = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete profile", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("profile {}", id)));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit profile delete", e))?;

        log::info!("Deleted profile: {}", id);
        Ok(())
    }

    /// Moderation queue, oldest first
    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<Profile>, DirectoryError> {
        sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE is_approved = false ORDER BY created_at ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list pending profiles", e))
    }

    pub async fn list_for_sitemap(pool: &PgPool) -> Result<Vec<SitemapEntry>, DirectoryError> {
        sqlx::query_as::<_, SitemapEntry>(
            "SELECT slug, city, updated_at FROM profiles WHERE is_approved = true ORDER BY updated_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list profiles for sitemap", e))
    }
}
