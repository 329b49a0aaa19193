// src/services/sitemap.rs
// DOCUMENTATION: sitemap.xml and robots.txt rendering
// PURPOSE: Crawlable index of every public page for the requesting brand

use crate::db::{BusinessRepository, ContentRepository, ProfileRepository};
use crate::errors::DirectoryError;
use crate::services::branding::SiteBrand;
use crate::services::listing_service::ListingService;
use crate::services::schema_markup::city_path;
use crate::services::text::escape_xml;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::fmt::Write;

/// One <url> entry
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub path: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: &'static str,
    pub priority: f32,
}

impl SitemapUrl {
    fn new(path: String, lastmod: Option<DateTime<Utc>>, changefreq: &'static str, priority: f32) -> Self {
        Self {
            path,
            lastmod,
            changefreq,
            priority,
        }
    }
}

const STATIC_ROUTES: &[(&str, &str, f32)] = &[
    ("/", "daily", 1.0),
    ("/profiles", "daily", 0.9),
    ("/businesses", "daily", 0.9),
    ("/cities", "weekly", 0.8),
];

/// Render a urlset document
pub fn render_sitemap(brand: &SiteBrand, urls: &[SitemapUrl]) -> String {
    let mut xml = String::with_capacity(256 + urls.len() * 160);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for url in urls {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&brand.url(&url.path)));
        if let Some(lastmod) = url.lastmod {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"));
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", url.changefreq);
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", url.priority);
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// robots.txt pointing crawlers at the sitemap
pub fn render_robots(brand: &SiteBrand) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /auth\n\nSitemap: {}\n",
        brand.url("/sitemap.xml")
    )
}

pub struct SitemapService;

impl SitemapService {
    /// Collect every public URL
    /// DOCUMENTATION: Static routes, city pages, approved listings and
    /// published pages, in that order
    pub async fn collect_urls(pool: &PgPool) -> Result<Vec<SitemapUrl>, DirectoryError> {
        let profiles = ProfileRepository::list_for_sitemap(pool).await?;
        let businesses = BusinessRepository::list_for_sitemap(pool).await?;
        let cities = ListingService::cities(pool).await?;
        let pages = ContentRepository::list_pages(pool, true).await?;

        let newest = profiles
            .iter()
            .chain(businesses.iter())
            .map(|entry| entry.updated_at)
            .max();

        let mut urls: Vec<SitemapUrl> = STATIC_ROUTES
            .iter()
            .map(|&(path, freq, priority)| SitemapUrl::new(path.to_string(), newest, freq, priority))
            .collect();

        urls.extend(
            cities
                .iter()
                .map(|c| SitemapUrl::new(city_path(&c.city), newest, "weekly", 0.7)),
        );
        urls.extend(profiles.into_iter().map(|p| {
            SitemapUrl::new(format!("/profiles/{}", p.slug), Some(p.updated_at), "weekly", 0.6)
        }));
        urls.extend(businesses.into_iter().map(|b| {
            SitemapUrl::new(format!("/businesses/{}", b.slug), Some(b.updated_at), "weekly", 0.6)
        }));
        urls.extend(pages.into_iter().map(|page| {
            SitemapUrl::new(format!("/pages/{}", page.slug), Some(page.updated_at), "monthly", 0.4)
        }));

        log::debug!("Sitemap contains {} URLs", urls.len());
        Ok(urls)
    }
}
