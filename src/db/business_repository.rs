// src/db/business_repository.rs
// DOCUMENTATION: Business database operations
// PURPOSE: CRUD, search and moderation queries for the businesses table

use super::{db_error, push_listing_filters, ListingFlag, SitemapEntry};
use crate::errors::DirectoryError;
use crate::models::{
    Business, CreateBusinessRequest, ImportBusinessRecord, ListingSearchQuery,
    UpdateBusinessRequest,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct BusinessRepository;

impl BusinessRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: Option<Uuid>,
        slug: &str,
        req: &CreateBusinessRequest,
    ) -> Result<Business, DirectoryError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (
                user_id, slug, name, category, city, region, address,
                description, phone, email, website, opening_hours
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .bind(&req.name)
        .bind(&req.category)
        .bind(&req.city)
        .bind(&req.region)
        .bind(&req.address)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.opening_hours)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create business", e))?;

        log::info!("Created business {} ({})", business.id, business.slug);
        Ok(business)
    }

    pub async fn create_imported(
        pool: &PgPool,
        slug: &str,
        category: &str,
        rec: &ImportBusinessRecord,
    ) -> Result<Business, DirectoryError> {
        sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (
                slug, name, category, city, region, address, description,
                phone, email, website, opening_hours, source, source_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(&rec.name)
        .bind(category)
        .bind(&rec.city)
        .bind(&rec.region)
        .bind(&rec.address)
        .bind(&rec.description)
        .bind(&rec.phone)
        .bind(&rec.email)
        .bind(&rec.website)
        .bind(&rec.opening_hours)
        .bind(&rec.source)
        .bind(&rec.source_id)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to import business", e))
    }

    /// Fill empty columns of an existing imported business
    pub async fn fill_missing(
        pool: &PgPool,
        id: Uuid,
        rec: &ImportBusinessRecord,
    ) -> Result<Business, DirectoryError> {
        sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET region = COALESCE(NULLIF(region, ''), $2),
                address = COALESCE(NULLIF(address, ''), $3),
                description = COALESCE(NULLIF(description, ''), $4),
                phone = COALESCE(NULLIF(phone, ''), $5),
                email = COALESCE(NULLIF(email, ''), $6),
                website = COALESCE(NULLIF(website, ''), $7),
                opening_hours = COALESCE(opening_hours, $8),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&rec.region)
        .bind(&rec.address)
        .bind(&rec.description)
        .bind(&rec.phone)
        .bind(&rec.email)
        .bind(&rec.website)
        .bind(&rec.opening_hours)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to merge imported business", e))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Business, DirectoryError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to fetch business", e))?
            .ok_or_else(|| {
                log::warn!("Business not found: {}", id);
                DirectoryError::NotFound(format!("business {}", id))
            })
    }

    pub async fn get_approved_by_slug(pool: &PgPool, slug: &str) -> Result<Business, DirectoryError> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE slug = $1 AND is_approved = true",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to fetch business by slug", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("business '{}'", slug)))
    }

    pub async fn get_by_source(
        pool: &PgPool,
        source: &str,
        source_id: &str,
    ) -> Result<Option<Business>, DirectoryError> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE source = $1 AND source_id = $2",
        )
        .bind(source)
        .bind(source_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to fetch business by source", e))
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, DirectoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM businesses WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await
                .map_err(|e| db_error("Failed to check business slug", e))?;
        Ok(exists)
    }

    /// Search approved businesses, same ordering as profiles
    pub async fn search(
        pool: &PgPool,
        query: &ListingSearchQuery,
    ) -> Result<(Vec<Business>, i64), DirectoryError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM businesses WHERE is_approved = true");
        push_listing_filters(&mut count_qb, query);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("Business count query failed", e))?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM businesses WHERE is_approved = true");
        push_listing_filters(&mut qb, query);
        qb.push(" ORDER BY is_featured DESC, is_verified DESC, created_at DESC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let businesses = qb
            .build_query_as::<Business>()
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("Business search query failed", e))?;

        log::debug!(
            "Business search: {} results, {} total (page {})",
            businesses.len(),
            total,
            query.page()
        );

        Ok((businesses, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateBusinessRequest,
    ) -> Result<Business, DirectoryError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                city = COALESCE($4, city),
                region = COALESCE($5, region),
                address = COALESCE($6, address),
                description = COALESCE($7, description),
                phone = COALESCE($8, phone),
                email = COALESCE($9, email),
                website = COALESCE($10, website),
                opening_hours = COALESCE($11, opening_hours),
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
        .bind(&req.address)
        .bind(&req.description)
        .bind(&req.phone)
        .bind(&req.email)
        .bind(&req.website)
        .bind(&req.opening_hours)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to update business", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("business {}", id)))?;

        log::info!("Updated business: {}", id);
        Ok(business)
    }

    pub async fn set_flag(
        pool: &PgPool,
        id: Uuid,
        flag: ListingFlag,
        value: bool,
    ) -> Result<Business, DirectoryError> {
        let sql = format!(
            "UPDATE businesses SET {} = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            flag.column()
        );
        let business = sqlx::query_as::<_, Business>(&sql)
            .bind(id)
            .bind(value)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to update business flag", e))?
            .ok_or_else(|| DirectoryError::NotFound(format!("business {}", id)))?;

        log::info!("Business {} {} = {}", id, flag.column(), value);
        Ok(business)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        for sql in [
            "DELETE FROM photos WHERE listing_kind = 'business' AND listing_id = $1",
            "DELETE FROM reviews WHERE listing_kind = 'business' AND listing_id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to delete business media", e))?;
        }

        let rows = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete business", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("business {}", id)));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit business delete", e))?;

        log::info!("Deleted business: {}", id);
        Ok(())
    }

    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<Business>, DirectoryError> {
        sqlx::query_as::<_, Business>(
            "SELECT * FROM businesses WHERE is_approved = false ORDER BY created_at ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list pending businesses", e))
    }

    pub async fn list_for_sitemap(pool: &PgPool) -> Result<Vec<SitemapEntry>, DirectoryError> {
        sqlx::query_as::<_, SitemapEntry>(
            "SELECT slug, city, updated_at FROM businesses WHERE is_approved = true ORDER BY updated_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list businesses for sitemap", e))
    }
}
