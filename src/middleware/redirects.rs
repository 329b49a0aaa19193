// src/middleware/redirects.rs
// DOCUMENTATION: Redirect rules applied before routing
// PURPOSE: Answer GET/HEAD requests for moved paths with their stored redirect

use crate::services::cache::RedirectCache;
use crate::services::redirect_service::{location_for, RedirectService};
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::{header, Method, StatusCode};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};
use sqlx::PgPool;
use std::sync::Arc;

/// Paths that are never redirected
const EXEMPT_PREFIXES: &[&str] = &["/admin", "/auth", "/health"];

fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{}/", prefix)))
}

pub async fn redirects(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) || is_exempt(req.path()) {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    }

    let state = (
        req.app_data::<web::Data<PgPool>>().cloned(),
        req.app_data::<web::Data<Arc<RedirectCache>>>().cloned(),
    );
    let (Some(pool), Some(cache)) = state else {
        log::error!("Redirect middleware is missing its app data");
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };

    match RedirectService::lookup(pool.get_ref(), cache.get_ref(), req.path()).await {
        Ok(Some(target)) => {
            let location = location_for(&target.to_path, req.query_string());
            let status =
                StatusCode::from_u16(target.status_code).unwrap_or(StatusCode::MOVED_PERMANENTLY);
            log::debug!("Redirecting {} -> {} ({})", req.path(), location, status.as_u16());

            RedirectService::spawn_hit(pool.get_ref().clone(), target.id);

            let response = HttpResponse::build(status)
                .insert_header((header::LOCATION, location))
                .finish();
            return Ok(req.into_response(response).map_into_right_body());
        }
        Ok(None) => {}
        // A broken lookup must not take the site down
        Err(e) => log::warn!("Redirect lookup failed for {}: {}", req.path(), e),
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RedirectTarget;
    use actix_web::middleware::from_fn;
    use actix_web::test as actix_test;
    use actix_web::App;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    // Never connects: every lookup below is answered from the cache
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_millis(50))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap()
    }

    async fn cache_with(path: &str, target: Option<RedirectTarget>) -> Arc<RedirectCache> {
        let cache = Arc::new(RedirectCache::new(60));
        cache.set(path.to_string(), target).await;
        cache
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt("/admin"));
        assert!(is_exempt("/admin/redirects"));
        assert!(!is_exempt("/administrators"));
        assert!(!is_exempt("/profiles/anna-madrid"));
    }

    #[actix_rt::test]
    async fn test_cached_redirect_is_answered() {
        let cache = cache_with(
            "/old-page",
            Some(RedirectTarget {
                id: Uuid::new_v4(),
                to_path: "/new-page".to_string(),
                status_code: 308,
            }),
        )
        .await;

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(cache))
                .wrap(from_fn(redirects))
                .route("/new-page", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/old-page/?page=2").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/new-page?page=2"
        );
    }

    #[actix_rt::test]
    async fn test_cached_miss_falls_through() {
        let cache = cache_with("/profiles", None).await;

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(cache))
                .wrap(from_fn(redirects))
                .route("/profiles", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/profiles").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_post_is_not_redirected() {
        let cache = cache_with(
            "/contact",
            Some(RedirectTarget {
                id: Uuid::new_v4(),
                to_path: "/pages/contact".to_string(),
                status_code: 301,
            }),
        )
        .await;

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(cache))
                .wrap(from_fn(redirects))
                .route("/contact", web::post().to(HttpResponse::Created)),
        )
        .await;

        let req = actix_test::TestRequest::post().uri("/contact").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}
