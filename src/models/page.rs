// src/models/page.rs
// DOCUMENTATION: Server-rendered head metadata
// PURPOSE: Everything a page template needs for <title>, meta tags and JSON-LD

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SEO head for a rendered page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_image: Option<String>,
    /// "index,follow" or "noindex,follow"
    pub robots: String,
    pub keywords: Vec<String>,
    /// JSON-LD documents to embed as <script type="application/ld+json">
    pub schema: Vec<Value>,
    pub site_name: String,
    pub theme_color: String,
}

/// Query string of GET /meta
#[derive(Debug, Deserialize)]
pub struct MetaQuery {
    pub path: String,
}
