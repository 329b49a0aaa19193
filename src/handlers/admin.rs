// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for moderation and site management
// PURPOSE: Expose moderation, content, redirect, SEO and import operations
//
// Every handler takes an AdminUser: the X-Admin-Token header or an
// admin-role session

use crate::auth::AdminUser;
use crate::db::SeoRepository;
use crate::errors::DirectoryError;
use crate::models::{
    CreateContentBlockRequest, CreateRedirectRequest, CreateStaticPageRequest,
    ImportBusinessRecord, ImportProfileRecord, ListingKind, SelectVariantRequest, SeoVariant,
    UpdateContentBlockRequest, UpdateRedirectRequest, UpdateStaticPageRequest,
};
use crate::services::{
    AdminService, ContentService, ImportService, LlmClient, RedirectCache, RedirectService,
    SeoService,
};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Import bodies can be much larger than regular requests
const IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Request body for POST /admin/seo/regenerate
#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    pub kind: ListingKind,
    /// Explicit listing ids; all listings of the kind when omitted
    #[serde(default)]
    pub ids: Option<Vec<Uuid>>,
    /// Skip listings that already have generated metadata
    #[serde(default)]
    pub only_missing: bool,
}

/// Query string of GET /admin/content-blocks
#[derive(Debug, Deserialize)]
pub struct BlockListQuery {
    pub page: Option<String>,
}

fn parse_kind(raw: &str) -> Result<ListingKind, DirectoryError> {
    raw.parse()
        .map_err(|_| DirectoryError::NotFound(format!("listing kind '{}'", raw)))
}

// ---- Moderation ----

/// GET /admin/pending
pub async fn pending(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, DirectoryError> {
    let queue = AdminService::pending(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(queue))
}

/// GET /admin/stats
pub async fn stats(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<RedirectCache>>,
) -> Result<impl Responder, DirectoryError> {
    let stats = AdminService::stats(pool.get_ref(), cache.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/profiles/{id}/{action}
/// action: approve, unapprove, verify, unverify, feature, unfeature
pub async fn profile_flag(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, String)>,
) -> Result<impl Responder, DirectoryError> {
    let (id, action) = path.into_inner();
    log::info!("Admin {:?}: {} profile {}", admin.user_id, action, id);
    let profile = AdminService::set_profile_flag(pool.get_ref(), id, &action).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /admin/businesses/{id}/{action}
pub async fn business_flag(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, String)>,
) -> Result<impl Responder, DirectoryError> {
    let (id, action) = path.into_inner();
    log::info!("Admin {:?}: {} business {}", admin.user_id, action, id);
    let business = AdminService::set_business_flag(pool.get_ref(), id, &action).await?;
    Ok(HttpResponse::Ok().json(business))
}

/// DELETE /admin/profiles/{id}
pub async fn delete_profile(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    AdminService::delete_listing(pool.get_ref(), ListingKind::Profile, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /admin/businesses/{id}
pub async fn delete_business(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    AdminService::delete_listing(pool.get_ref(), ListingKind::Business, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/reviews/{id}/approve
pub async fn approve_review(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    let review = AdminService::approve_review(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /admin/reviews/{id}
pub async fn delete_review(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    AdminService::delete_review(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- Content blocks ----

pub async fn list_blocks(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    query: web::Query<BlockListQuery>,
) -> Result<impl Responder, DirectoryError> {
    let blocks = ContentService::list_blocks(pool.get_ref(), query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(blocks))
}

pub async fn create_block(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    req: web::Json<CreateContentBlockRequest>,
) -> Result<impl Responder, DirectoryError> {
    let block = ContentService::create_block(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(block))
}

pub async fn update_block(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateContentBlockRequest>,
) -> Result<impl Responder, DirectoryError> {
    let block =
        ContentService::update_block(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(block))
}

pub async fn delete_block(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    ContentService::delete_block(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- Static pages ----

pub async fn list_pages(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, DirectoryError> {
    let pages = ContentService::list_pages(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(pages))
}

pub async fn create_page(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    req: web::Json<CreateStaticPageRequest>,
) -> Result<impl Responder, DirectoryError> {
    let page = ContentService::create_page(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(page))
}

pub async fn update_page(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStaticPageRequest>,
) -> Result<impl Responder, DirectoryError> {
    let page =
        ContentService::update_page(pool.get_ref(), path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn delete_page(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    ContentService::delete_page(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- Redirects ----

pub async fn list_redirects(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, DirectoryError> {
    let redirects = RedirectService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(redirects))
}

pub async fn create_redirect(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<RedirectCache>>,
    req: web::Json<CreateRedirectRequest>,
) -> Result<impl Responder, DirectoryError> {
    let redirect =
        RedirectService::create(pool.get_ref(), cache.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(redirect))
}

pub async fn update_redirect(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<RedirectCache>>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateRedirectRequest>,
) -> Result<impl Responder, DirectoryError> {
    let redirect = RedirectService::update(
        pool.get_ref(),
        cache.get_ref(),
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(redirect))
}

pub async fn delete_redirect(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<RedirectCache>>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, DirectoryError> {
    RedirectService::delete(pool.get_ref(), cache.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---- SEO ----

/// POST /admin/seo/{kind}/{id}/generate
/// Runs synchronously and returns the stored result
pub async fn generate_seo(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    llm: web::Data<LlmClient>,
    path: web::Path<(String, Uuid)>,
) -> Result<impl Responder, DirectoryError> {
    let (kind, id) = path.into_inner();
    let kind = parse_kind(&kind)?;
    let seo = SeoService::generate(pool.get_ref(), llm.get_ref(), kind, id).await?;
    Ok(HttpResponse::Ok().json(seo))
}

/// POST /admin/seo/regenerate
pub async fn regenerate_seo(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    llm: web::Data<LlmClient>,
    body: web::Json<RegenerateRequest>,
) -> Result<impl Responder, DirectoryError> {
    if !llm.is_configured() {
        return Err(DirectoryError::ExternalApiError(
            "LLM API key not configured".to_string(),
        ));
    }

    let RegenerateRequest {
        kind,
        ids,
        only_missing,
    } = body.into_inner();
    let stats =
        SeoService::regenerate_batch(pool.get_ref(), llm.get_ref(), kind, ids, only_missing)
            .await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/seo/{kind}/{id}/variant
pub async fn select_variant(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    body: web::Json<SelectVariantRequest>,
) -> Result<impl Responder, DirectoryError> {
    let (kind, id) = path.into_inner();
    let kind = parse_kind(&kind)?;
    let variant: SeoVariant = body.variant.parse().map_err(DirectoryError::ValidationError)?;

    SeoRepository::set_variant(pool.get_ref(), kind, id, variant).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "kind": kind,
        "id": id,
        "variant": variant,
    })))
}

// ---- Import ----

/// POST /admin/import/profiles
pub async fn import_profiles(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    body: web::Json<Vec<ImportProfileRecord>>,
) -> Result<impl Responder, DirectoryError> {
    let stats = ImportService::import_profiles(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/import/businesses
pub async fn import_businesses(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    body: web::Json<Vec<ImportBusinessRecord>>,
) -> Result<impl Responder, DirectoryError> {
    let stats = ImportService::import_businesses(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    let import_json = web::JsonConfig::default().limit(IMPORT_BODY_LIMIT);

    cfg.service(
        web::scope("/admin")
            .route("/pending", web::get().to(pending))
            .route("/stats", web::get().to(stats))
            .route("/profiles/{id}", web::delete().to(delete_profile))
            .route("/profiles/{id}/{action}", web::post().to(profile_flag))
            .route("/businesses/{id}", web::delete().to(delete_business))
            .route("/businesses/{id}/{action}", web::post().to(business_flag))
            .route("/reviews/{id}/approve", web::post().to(approve_review))
            .route("/reviews/{id}", web::delete().to(delete_review))
            .route("/content-blocks", web::get().to(list_blocks))
            .route("/content-blocks", web::post().to(create_block))
            .route("/content-blocks/{id}", web::put().to(update_block))
            .route("/content-blocks/{id}", web::delete().to(delete_block))
            .route("/pages", web::get().to(list_pages))
            .route("/pages", web::post().to(create_page))
            .route("/pages/{id}", web::put().to(update_page))
            .route("/pages/{id}", web::delete().to(delete_page))
            .route("/redirects", web::get().to(list_redirects))
            .route("/redirects", web::post().to(create_redirect))
            .route("/redirects/{id}", web::put().to(update_redirect))
            .route("/redirects/{id}", web::delete().to(delete_redirect))
            .route("/seo/regenerate", web::post().to(regenerate_seo))
            .route("/seo/{kind}/{id}/generate", web::post().to(generate_seo))
            .route("/seo/{kind}/{id}/variant", web::post().to(select_variant))
            .service(
                web::resource("/import/profiles")
                    .app_data(import_json.clone())
                    .route(web::post().to(import_profiles)),
            )
            .service(
                web::resource("/import/businesses")
                    .app_data(import_json)
                    .route(web::post().to(import_businesses)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ADMIN_TOKEN_HEADER;
    use crate::config::Config;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::App;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("profiles").unwrap(), ListingKind::Profile);
        assert_eq!(parse_kind("business").unwrap(), ListingKind::Business);
        assert!(matches!(parse_kind("places"), Err(DirectoryError::NotFound(_))));
    }

    #[test]
    fn test_regenerate_request_defaults() {
        let req: RegenerateRequest = serde_json::from_str(r#"{"kind": "business"}"#).unwrap();
        assert_eq!(req.kind, ListingKind::Business);
        assert!(req.ids.is_none());
        assert!(!req.only_missing);
    }

    #[actix_rt::test]
    async fn test_admin_routes_require_credentials() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/admin/stats").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::get()
            .uri("/admin/pending")
            .insert_header((ADMIN_TOKEN_HEADER, "wrong"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
