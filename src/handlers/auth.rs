// src/handlers/auth.rs
// DOCUMENTATION: Account and session endpoints
// PURPOSE: Register, log in and out, and report the signed-in user

use crate::auth::{clear_session_cookie, session_cookie, AuthUser};
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AuthService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<RegisterRequest>,
) -> Result<impl Responder, DirectoryError> {
    let session = AuthService::register(pool.get_ref(), &config, req.into_inner()).await?;
    Ok(HttpResponse::Created()
        .cookie(session_cookie(&config, session.token))
        .json(session.user))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, DirectoryError> {
    let session = AuthService::login(pool.get_ref(), &config, req.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&config, session.token))
        .json(session.user))
}

/// POST /auth/logout
pub async fn logout(config: web::Data<Config>) -> impl Responder {
    HttpResponse::NoContent()
        .cookie(clear_session_cookie(&config))
        .finish()
}

/// GET /auth/me
pub async fn me(
    user: AuthUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, DirectoryError> {
    let user = AuthService::current_user(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_logout_expires_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post().uri("/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[actix_rt::test]
    async fn test_me_requires_session() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
