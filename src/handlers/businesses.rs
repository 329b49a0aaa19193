// src/handlers/businesses.rs
// DOCUMENTATION: HTTP handlers for business listings
// PURPOSE: Parse requests, call services, return responses

use super::site_brand;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::{
    AddPhotosRequest, CreateBusinessRequest, CreateReviewRequest, ListingSearchQuery,
    UpdateBusinessRequest,
};
use crate::services::{LlmClient, BusinessService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /businesses
/// Create a business owned by the signed-in user; it stays hidden until approved
pub async fn create_business(
    user: AuthUser,
    pool: web::Data<PgPool>,
    llm: web::Data<LlmClient>,
    req: web::Json<CreateBusinessRequest>,
) -> Result<impl Responder, DirectoryError> {
    let business =
        BusinessService::create_business(pool.get_ref(), llm.get_ref(), &user, req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(business))
}

/// GET /businesses
/// Search approved businesses
pub async fn search_businesses(
    pool: web::Data<PgPool>,
    query: web::Query<ListingSearchQuery>,
) -> Result<impl Responder, DirectoryError> {
    let page = BusinessService::search_businesses(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /businesses/{slug}
pub async fn get_business(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, DirectoryError> {
    let brand = site_brand(&http, &config);
    let detail = BusinessService::get_business_detail(pool.get_ref(), &brand, &path).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /businesses/{id}
pub async fn update_business(
    user: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateBusinessRequest>,
) -> Result<impl Responder, DirectoryError> {
    let business =
        BusinessService::update_business(pool.get_ref(), &user, path.into_inner(), req.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(business))
}

/// POST /businesses/{id}/photos
pub async fn add_photos(
    user: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<AddPhotosRequest>,
) -> Result<impl Responder, DirectoryError> {
    let photos =
        BusinessService::add_photos(pool.get_ref(), &user, path.into_inner(), &req.urls).await?;
    Ok(HttpResponse::Created().json(photos))
}

/// POST /businesses/{slug}/reviews
/// Reviews are stored unapproved
pub async fn add_review(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, DirectoryError> {
    let review = BusinessService::add_review(pool.get_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Configuration for business routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/businesses")
            .route("", web::post().to(create_business))
            .route("", web::get().to(search_businesses))
            .route("/{slug}", web::get().to(get_business))
            .route("/{id}", web::put().to(update_business))
            .route("/{id}/photos", web::post().to(add_photos))
            .route("/{slug}/reviews", web::post().to(add_review)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_create_requires_session() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/businesses")
            .set_json(json!({"name": "Blue Lotus", "category": "spa", "city": "Lisbon"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
