// src/auth/extractors.rs
// DOCUMENTATION: Request guards for authenticated and admin routes
// PURPOSE: Resolve the caller from the session cookie, a Bearer token or the admin token

use super::jwt::decode_token;
use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::ROLE_ADMIN;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Signed-in user, resolved from the session token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Owner of the resource or an admin
    pub fn ensure_can_edit(&self, owner_id: Option<Uuid>) -> Result<(), DirectoryError> {
        if self.is_admin() || owner_id == Some(self.id) {
            Ok(())
        } else {
            log::warn!("User {} tried to edit a listing owned by {:?}", self.id, owner_id);
            Err(DirectoryError::Forbidden)
        }
    }
}

/// Caller allowed to use /admin routes
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser {
    /// None when authenticated by the shared admin token
    pub user_id: Option<Uuid>,
}

fn app_config(req: &HttpRequest) -> Result<&Config, DirectoryError> {
    req.app_data::<web::Data<Config>>()
        .map(|data| data.get_ref())
        .ok_or_else(|| {
            log::error!("Config is not registered as app data");
            DirectoryError::InternalError
        })
}

/// Session token from the cookie, falling back to an Authorization Bearer header
fn session_token(req: &HttpRequest, config: &Config) -> Option<String> {
    if let Some(cookie) = req.cookie(&config.session_cookie_name) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn authenticate(req: &HttpRequest) -> Result<AuthUser, DirectoryError> {
    let config = app_config(req)?;
    let token = session_token(req, config).ok_or(DirectoryError::Unauthorized)?;
    let claims = decode_token(&token, &config.jwt_secret)?;

    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
    })
}

/// Admin check: the X-Admin-Token header wins when present, otherwise an
/// admin-role session is required
pub fn authenticate_admin(req: &HttpRequest) -> Result<AdminUser, DirectoryError> {
    let config = app_config(req)?;

    if let Some(provided) = req.headers().get(ADMIN_TOKEN_HEADER) {
        let provided = provided.to_str().unwrap_or_default();
        let expected = config.admin_token.as_str();

        if !expected.is_empty() && constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
            return Ok(AdminUser { user_id: None });
        }

        log::warn!("Invalid admin token from {:?}", req.peer_addr());
        return Err(DirectoryError::Forbidden);
    }

    let user = authenticate(req)?;
    if user.is_admin() {
        Ok(AdminUser {
            user_id: Some(user.id),
        })
    } else {
        log::warn!("Non-admin user {} denied admin access", user.id);
        Err(DirectoryError::Forbidden)
    }
}

impl FromRequest for AuthUser {
    type Error = DirectoryError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = DirectoryError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_admin(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_token;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    fn config() -> Config {
        Config::for_tests()
    }

    fn token(role: &str) -> (Uuid, String) {
        let id = Uuid::new_v4();
        let config = config();
        (id, issue_token(id, role, &config.jwt_secret, 1).unwrap())
    }

    #[test]
    fn test_missing_credentials_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(config()))
            .to_http_request();

        assert!(matches!(authenticate(&req), Err(DirectoryError::Unauthorized)));
        assert!(matches!(authenticate_admin(&req), Err(DirectoryError::Unauthorized)));
    }

    #[test]
    fn test_cookie_session() {
        let (id, token) = token("user");
        let config = config();
        let req = TestRequest::default()
            .cookie(Cookie::new(config.session_cookie_name.clone(), token))
            .app_data(web::Data::new(config))
            .to_http_request();

        let user = authenticate(&req).unwrap();
        assert_eq!(user.id, id);
        assert!(!user.is_admin());
        assert!(matches!(authenticate_admin(&req), Err(DirectoryError::Forbidden)));
    }

    #[test]
    fn test_bearer_admin_session() {
        let (id, token) = token("admin");
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .app_data(web::Data::new(config()))
            .to_http_request();

        assert_eq!(authenticate_admin(&req).unwrap().user_id, Some(id));
    }

    #[test]
    fn test_admin_token_header() {
        let ok = TestRequest::default()
            .insert_header((ADMIN_TOKEN_HEADER, "test-admin-token"))
            .app_data(web::Data::new(config()))
            .to_http_request();
        assert_eq!(authenticate_admin(&ok).unwrap(), AdminUser { user_id: None });

        let wrong = TestRequest::default()
            .insert_header((ADMIN_TOKEN_HEADER, "nope"))
            .app_data(web::Data::new(config()))
            .to_http_request();
        assert!(matches!(authenticate_admin(&wrong), Err(DirectoryError::Forbidden)));
    }

    #[test]
    fn test_forged_token_is_unauthorized() {
        let id = Uuid::new_v4();
        let forged = issue_token(id, "admin", "attacker-secret", 1).unwrap();
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", forged)))
            .app_data(web::Data::new(config()))
            .to_http_request();

        assert!(matches!(authenticate_admin(&req), Err(DirectoryError::Unauthorized)));
    }

    #[test]
    fn test_ensure_can_edit() {
        let owner = Uuid::new_v4();
        let user = AuthUser { id: owner, role: "user".to_string() };
        let other = AuthUser { id: Uuid::new_v4(), role: "user".to_string() };
        let admin = AuthUser { id: Uuid::new_v4(), role: "admin".to_string() };

        assert!(user.ensure_can_edit(Some(owner)).is_ok());
        assert!(matches!(other.ensure_can_edit(Some(owner)), Err(DirectoryError::Forbidden)));
        assert!(matches!(other.ensure_can_edit(None), Err(DirectoryError::Forbidden)));
        assert!(admin.ensure_can_edit(None).is_ok());
    }
}
