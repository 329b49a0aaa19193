// src/handlers/profiles.rs
// DOCUMENTATION: HTTP handlers for profile listings
// PURPOSE: Parse requests, call services, return responses

use super::site_brand;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::{
    AddPhotosRequest, CreateProfileRequest, CreateReviewRequest, ListingSearchQuery,
    UpdateProfileRequest,
};
use crate::services::{LlmClient, ProfileService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /profiles
/// Create a profile owned by the signed-in user; it stays hidden until approved
pub async fn create_profile(
    user: AuthUser,
    pool: web::Data<PgPool>,
    llm: web::Data<LlmClient>,
    req: web::Json<CreateProfileRequest>,
) -> Result<impl Responder, DirectoryError> {
    let profile =
        ProfileService::create_profile(pool.get_ref(), llm.get_ref(), &user, req.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// GET /profiles
/// Search approved profiles
pub async fn search_profiles(
    pool: web::Data<PgPool>,
    query: web::Query<ListingSearchQuery>,
) -> Result<impl Responder, DirectoryError> {
    let page = ProfileService::search_profiles(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /profiles/{slug}
pub async fn get_profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    http: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, DirectoryError> {
    let brand = site_brand(&http, &config);
    let detail = ProfileService::get_profile_detail(pool.get_ref(), &brand, &path).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// PUT /profiles/{id}
pub async fn update_profile(
    user: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, DirectoryError> {
    let profile =
        ProfileService::update_profile(pool.get_ref(), &user, path.into_inner(), req.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /profiles/{id}/photos
pub async fn add_photos(
    user: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<AddPhotosRequest>,
) -> Result<impl Responder, DirectoryError> {
    let photos =
        ProfileService::add_photos(pool.get_ref(), &user, path.into_inner(), &req.urls).await?;
    Ok(HttpResponse::Created().json(photos))
}

/// POST /profiles/{slug}/reviews
/// Reviews are stored unapproved
pub async fn add_review(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, DirectoryError> {
    let review = ProfileService::add_review(pool.get_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Configuration for profile routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .route("", web::post().to(create_profile))
            .route("", web::get().to(search_profiles))
            .route("/{slug}", web::get().to(get_profile))
            .route("/{id}", web::put().to(update_profile))
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
            .uri("/profiles")
            .set_json(json!({"name": "Anna", "category": "companion", "city": "Madrid"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
