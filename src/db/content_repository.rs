// src/db/content_repository.rs
// DOCUMENTATION: CMS database operations
// PURPOSE: Content blocks per page/section slot and static pages

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::{
    ContentBlock, CreateContentBlockRequest, CreateStaticPageRequest, StaticPage,
    UpdateContentBlockRequest, UpdateStaticPageRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ContentRepository;

impl ContentRepository {
    /// Active blocks of one slot in render order
    pub async fn active_blocks(
        pool: &PgPool,
        page: &str,
        section: &str,
    ) -> Result<Vec<ContentBlock>, DirectoryError> {
        sqlx::query_as::<_, ContentBlock>(
            r#"
            SELECT * FROM content_blocks
            WHERE page = $1 AND section = $2 AND is_active = true
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(page)
        .bind(section)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to fetch content blocks", e))
    }

    /// Every block, optionally limited to one page
    pub async fn list_blocks(
        pool: &PgPool,
        page: Option<&str>,
    ) -> Result<Vec<ContentBlock>, DirectoryError> {
        sqlx::query_as::<_, ContentBlock>(
            r#"
            SELECT * FROM content_blocks
            WHERE ($1::TEXT IS NULL OR page = $1)
            ORDER BY page, section, position, created_at
            "#,
        )
        .bind(page)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list content blocks", e))
    }

    pub async fn create_block(
        pool: &PgPool,
        req: &CreateContentBlockRequest,
    ) -> Result<ContentBlock, DirectoryError> {
        let block = sqlx::query_as::<_, ContentBlock>(
            r#"
            INSERT INTO content_blocks (page, section, position, title, html, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(req.page.trim())
        .bind(req.section.trim())
        .bind(req.position)
        .bind(&req.title)
        .bind(&req.html)
        .bind(req.is_active)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create content block", e))?;

        log::info!("Created content block {} in {}/{}", block.id, block.page, block.section);
        Ok(block)
    }

    pub async fn update_block(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateContentBlockRequest,
    ) -> Result<ContentBlock, DirectoryError> {
        sqlx::query_as::<_, ContentBlock>(
            r#"
            UPDATE content_blocks
            SET page = COALESCE($2, page),
                section = COALESCE($3, section),
                position = COALESCE($4, position),
                title = COALESCE($5, title),
                html = COALESCE($6, html),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.page)
        .bind(&req.section)
        .bind(req.position)
        .bind(&req.title)
        .bind(&req.html)
        .bind(req.is_active)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to update content block", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("content block {}", id)))
    }

    pub async fn delete_block(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let rows = sqlx::query("DELETE FROM content_blocks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to delete content block", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("content block {}", id)));
        }
        Ok(())
    }

    pub async fn get_published_page(pool: &PgPool, slug: &str) -> Result<StaticPage, DirectoryError> {
        sqlx::query_as::<_, StaticPage>(
            "SELECT * FROM static_pages WHERE slug = $1 AND is_published = true",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to fetch page", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("page '{}'", slug)))
    }

    pub async fn list_pages(
        pool: &PgPool,
        published_only: bool,
    ) -> Result<Vec<StaticPage>, DirectoryError> {
        sqlx::query_as::<_, StaticPage>(
            r#"
            SELECT * FROM static_pages
            WHERE ($1 = false OR is_published = true)
            ORDER BY slug
            "#,
        )
        .bind(published_only)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error("Failed to list pages", e))
    }

    pub async fn create_page(
        pool: &PgPool,
        req: &CreateStaticPageRequest,
    ) -> Result<StaticPage, DirectoryError> {
        let page = sqlx::query_as::<_, StaticPage>(
            r#"
            INSERT INTO static_pages (slug, title, body_html, seo_title, seo_description, is_published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.slug)
        .bind(&req.title)
        .bind(&req.body_html)
        .bind(&req.seo_title)
        .bind(&req.seo_description)
        .bind(req.is_published)
        .fetch_one(pool)
        .await
        .map_err(|e| db_error("Failed to create page", e))?;

        log::info!("Created page '{}'", page.slug);
        Ok(page)
    }

    pub async fn update_page(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateStaticPageRequest,
    ) -> Result<StaticPage, DirectoryError> {
        sqlx::query_as::<_, StaticPage>(
            r#"
            UPDATE static_pages
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                body_html = COALESCE($4, body_html),
                seo_title = COALESCE($5, seo_title),
                seo_description = COALESCE($6, seo_description),
                is_published = COALESCE($7, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.slug)
        .bind(&req.title)
        .bind(&req.body_html)
        .bind(&req.seo_title)
        .bind(&req.seo_description)
        .bind(req.is_published)
        .fetch_optional(pool)
        .await
        .map_err(|e| db_error("Failed to update page", e))?
        .ok_or_else(|| DirectoryError::NotFound(format!("page {}", id)))
    }

    pub async fn delete_page(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        let rows = sqlx::query("DELETE FROM static_pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| db_error("Failed to delete page", e))?
            .rows_affected();

        if rows == 0 {
            return Err(DirectoryError::NotFound(format!("page {}", id)));
        }
        Ok(())
    }
}
