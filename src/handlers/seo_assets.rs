// src/handlers/seo_assets.rs
// DOCUMENTATION: Crawler-facing documents
// PURPOSE: sitemap.xml, robots.txt and Open Graph cards for the requesting brand

use super::site_brand;
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::ListingKind;
use crate::services::sitemap::{render_robots, render_sitemap};
use crate::services::{OgImageService, SitemapService};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

const OG_CACHE_CONTROL: &str = "public, max-age=86400";

/// GET /sitemap.xml
pub async fn sitemap(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
) -> Result<impl Responder, DirectoryError> {
    let brand = site_brand(&http, &config);
    let urls = SitemapService::collect_urls(pool.get_ref()).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render_sitemap(&brand, &urls)))
}

/// GET /robots.txt
pub async fn robots(config: web::Data<Config>, http: HttpRequest) -> impl Responder {
    let brand = site_brand(&http, &config);
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(render_robots(&brand))
}

async fn og_card(
    pool: &PgPool,
    config: &Config,
    http: &HttpRequest,
    kind: ListingKind,
    slug: &str,
) -> Result<HttpResponse, DirectoryError> {
    let brand = site_brand(http, config);
    let svg = OgImageService::render_for_slug(pool, &brand, kind, slug).await?;
    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .insert_header((header::CACHE_CONTROL, OG_CACHE_CONTROL))
        .body(svg))
}

/// GET /og/profiles/{slug}.svg
pub async fn profile_og(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, DirectoryError> {
    og_card(pool.get_ref(), &config, &http, ListingKind::Profile, &path).await
}

/// GET /og/businesses/{slug}.svg
pub async fn business_og(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, DirectoryError> {
    og_card(pool.get_ref(), &config, &http, ListingKind::Business, &path).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/sitemap.xml", web::get().to(sitemap))
        .route("/robots.txt", web::get().to(robots))
        .route("/og/profiles/{slug}.svg", web::get().to(profile_og))
        .route("/og/businesses/{slug}.svg", web::get().to(business_og));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_robots_points_at_brand_sitemap() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/robots.txt")
            .insert_header(("Host", "madridlistings.es"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("Disallow: /admin"));
        assert!(text.contains("Sitemap: https://madridlistings.es/sitemap.xml"));
    }
}
