// src/models/content.rs
// DOCUMENTATION: Admin-authored content
// PURPOSE: Content blocks rendered into page/section slots and static pages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PageMeta;

/// Positioned snippet of markup for a page/section slot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentBlock {
    pub id: Uuid,
    /// Page key, e.g. "home", "city", "profile"
    pub page: String,
    /// Slot within the page, e.g. "hero", "sidebar", "footer"
    pub section: String,
    pub position: i32,
    pub title: Option<String>,
    pub html: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContentBlockRequest {
    #[validate(length(min = 1, max = 64))]
    pub page: String,
    #[validate(length(min = 1, max = 64))]
    pub section: String,
    #[serde(default)]
    pub position: i32,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub title: Option<String>,
    pub html: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContentBlockRequest {
    #[validate(length(min = 1, max = 64))]
    pub page: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub section: Option<String>,
    pub position: Option<i32>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub html: Option<String>,
    pub is_active: Option<bool>,
}

/// Blocks of one slot rendered to a single HTML fragment
#[derive(Debug, Serialize)]
pub struct RenderedSlot {
    pub page: String,
    pub section: String,
    pub blocks: usize,
    pub html: String,
}

/// Landing page stored and rendered from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaticPage {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body_html: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStaticPageRequest {
    #[validate(length(min = 1, max = 120))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub body_html: String,
    #[validate(length(max = 70))]
    #[serde(default)]
    pub seo_title: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStaticPageRequest {
    #[validate(length(min = 1, max = 120))]
    pub slug: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub body_html: Option<String>,
    #[validate(length(max = 70))]
    pub seo_title: Option<String>,
    #[validate(length(max = 200))]
    pub seo_description: Option<String>,
    pub is_published: Option<bool>,
}

/// GET /pages/{slug}
#[derive(Debug, Serialize)]
pub struct StaticPageResponse {
    pub slug: String,
    pub title: String,
    pub body_html: String,
    pub updated_at: DateTime<Utc>,
    pub meta: PageMeta,
}

fn default_true() -> bool {
    true
}
