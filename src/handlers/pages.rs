// src/handlers/pages.rs
// DOCUMENTATION: Public page data
// PURPOSE: Static pages, content slots, page meta heads and the city index

use super::site_brand;
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::MetaQuery;
use crate::services::page_meta::meta_for_path;
use crate::services::{ContentService, ListingService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /pages/{slug}
/// Published static page with its meta head
pub async fn get_page(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, DirectoryError> {
    let brand = site_brand(&http, &config);
    let page = ContentService::get_page(pool.get_ref(), &brand, &path).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /content/{page}/{section}
pub async fn content_slot(
    pool: web::Data<PgPool>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, DirectoryError> {
    let (page, section) = path.into_inner();
    let slot = ContentService::render_slot(pool.get_ref(), &page, &section).await?;
    Ok(HttpResponse::Ok().json(slot))
}

/// GET /meta?path=/cities/madrid
/// Head metadata for pages that are not a single listing
pub async fn page_meta(
    config: web::Data<Config>,
    http: HttpRequest,
    query: web::Query<MetaQuery>,
) -> impl Responder {
    let brand = site_brand(&http, &config);
    HttpResponse::Ok().json(meta_for_path(&brand, &query.path))
}

/// GET /cities
pub async fn cities(pool: web::Data<PgPool>) -> Result<impl Responder, DirectoryError> {
    let cities = ListingService::cities(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(cities))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/pages/{slug}", web::get().to(get_page))
        .route("/content/{page}/{section}", web::get().to(content_slot))
        .route("/meta", web::get().to(page_meta))
        .route("/cities", web::get().to(cities));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_meta_uses_request_host() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/meta?path=/profiles")
            .insert_header(("Host", "www.berlinlistings.de"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["canonical"], "https://berlinlistings.de/profiles");
        assert_eq!(body["robots"], "index,follow");
    }

    #[actix_rt::test]
    async fn test_meta_requires_path() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/meta").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
