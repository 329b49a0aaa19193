// src/services/content_service.rs
// DOCUMENTATION: CMS business logic
// PURPOSE: Slot rendering, static pages and content block administration

use crate::db::ContentRepository;
use crate::errors::DirectoryError;
use crate::models::{
    ContentBlock, CreateContentBlockRequest, CreateStaticPageRequest, RenderedSlot, StaticPage,
    StaticPageResponse, UpdateContentBlockRequest, UpdateStaticPageRequest,
};
use crate::services::branding::SiteBrand;
use crate::services::page_meta::static_page_meta;
use crate::services::text::escape_html;
use crate::services::validation::is_valid_slug;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Concatenate blocks into one HTML fragment
/// DOCUMENTATION: Block HTML is trusted admin input and is emitted as-is;
/// titles are escaped
pub fn render_blocks(blocks: &[ContentBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        html.push_str(&format!(
            "<section class=\"content-block\" data-block-id=\"{}\">",
            block.id
        ));
        if let Some(title) = block.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            html.push_str(&format!("<h2>{}</h2>", escape_html(title)));
        }
        html.push_str(&block.html);
        html.push_str("</section>\n");
    }
    html
}

fn check_page_slug(slug: &str) -> Result<(), DirectoryError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(DirectoryError::ValidationError(format!(
            "'{}' is not a valid slug (lowercase letters, digits and single dashes)",
            slug
        )))
    }
}

pub struct ContentService;

impl ContentService {
    pub async fn render_slot(
        pool: &PgPool,
        page: &str,
        section: &str,
    ) -> Result<RenderedSlot, DirectoryError> {
        let blocks = ContentRepository::active_blocks(pool, page, section).await?;
        Ok(RenderedSlot {
            page: page.to_string(),
            section: section.to_string(),
            blocks: blocks.len(),
            html: render_blocks(&blocks),
        })
    }

    pub async fn get_page(
        pool: &PgPool,
        brand: &SiteBrand,
        slug: &str,
    ) -> Result<StaticPageResponse, DirectoryError> {
        let page = ContentRepository::get_published_page(pool, slug).await?;
        let meta = static_page_meta(brand, &page);
        Ok(StaticPageResponse {
            slug: page.slug,
            title: page.title,
            body_html: page.body_html,
            updated_at: page.updated_at,
            meta,
        })
    }

    pub async fn list_blocks(
        pool: &PgPool,
        page: Option<&str>,
    ) -> Result<Vec<ContentBlock>, DirectoryError> {
        ContentRepository::list_blocks(pool, page).await
    }

    pub async fn create_block(
        pool: &PgPool,
        req: CreateContentBlockRequest,
    ) -> Result<ContentBlock, DirectoryError> {
        req.validate()?;
        ContentRepository::create_block(pool, &req).await
    }

    pub async fn update_block(
        pool: &PgPool,
        id: Uuid,
        req: UpdateContentBlockRequest,
    ) -> Result<ContentBlock, DirectoryError> {
        req.validate()?;
        ContentRepository::update_block(pool, id, &req).await
    }

    pub async fn delete_block(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        ContentRepository::delete_block(pool, id).await
    }

    pub async fn list_pages(pool: &PgPool) -> Result<Vec<StaticPage>, DirectoryError> {
        ContentRepository::list_pages(pool, false).await
    }

    pub async fn create_page(
        pool: &PgPool,
        req: CreateStaticPageRequest,
    ) -> Result<StaticPage, DirectoryError> {
        req.validate()?;
        check_page_slug(&req.slug)?;
        ContentRepository::create_page(pool, &req).await
    }

    pub async fn update_page(
        pool: &PgPool,
        id: Uuid,
        req: UpdateStaticPageRequest,
    ) -> Result<StaticPage, DirectoryError> {
        req.validate()?;
        if let Some(slug) = &req.slug {
            check_page_slug(slug)?;
        }
        ContentRepository::update_page(pool, id, &req).await
    }

    pub async fn delete_page(pool: &PgPool, id: Uuid) -> Result<(), DirectoryError> {
        ContentRepository::delete_page(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn block(title: Option<&str>, html: &str) -> ContentBlock {
        ContentBlock {
            id: Uuid::nil(),
            page: "home".to_string(),
            section: "hero".to_string(),
            position: 0,
            title: title.map(String::from),
            html: html.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_blocks_wraps_and_escapes_titles() {
        let html = render_blocks(&[
            block(Some("Tips & <tricks>"), "<p>One</p>"),
            block(Some("   "), "<p>Two</p>"),
        ]);

        assert_eq!(
            html,
            "<section class=\"content-block\" data-block-id=\"00000000-0000-0000-0000-000000000000\">\
<h2>Tips &amp; &lt;tricks&gt;</h2><p>One</p></section>\n\
<section class=\"content-block\" data-block-id=\"00000000-0000-0000-0000-000000000000\">\
<p>Two</p></section>\n"
        );
    }

    #[test]
    fn test_render_empty_slot() {
        assert_eq!(render_blocks(&[]), "");
    }

    #[test]
    fn test_page_slug_check() {
        assert!(check_page_slug("privacy-policy").is_ok());
        assert!(matches!(
            check_page_slug("Privacy Policy"),
            Err(DirectoryError::ValidationError(_))
        ));
    }
}
