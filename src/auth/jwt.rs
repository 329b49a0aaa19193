// src/auth/jwt.rs
// DOCUMENTATION: Session tokens
// PURPOSE: HS256 JWTs carried in the session cookie or a Bearer header

use crate::config::Config;
use crate::errors::DirectoryError;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// "user" or "admin"
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a session token for a user
pub fn issue_token(
    user_id: Uuid,
    role: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, DirectoryError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign session token: {}", e);
        DirectoryError::InternalError
    })
}

/// Verify signature and expiry of a session token
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, DirectoryError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => log::debug!("Session token expired"),
                _ => log::debug!("Rejected session token: {}", e),
            }
            DirectoryError::Unauthorized
        })
}

/// HTTP-only session cookie holding a token
pub fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(CookieDuration::hours(config.session_ttl_hours))
        .finish()
}

/// Expired cookie that clears the session in the browser
pub fn clear_session_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .max_age(CookieDuration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "admin", "secret", 1).unwrap();
        let claims = decode_token(&token, "secret").unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "user", "secret", 1).unwrap();
        assert!(matches!(
            decode_token(&token, "other-secret"),
            Err(DirectoryError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(Uuid::new_v4(), "user", "secret", -1).unwrap();
        assert!(matches!(
            decode_token(&token, "secret"),
            Err(DirectoryError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_token("not.a.jwt", "secret").is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = Config::for_tests();
        let cookie = session_cookie(&config, "tok".to_string());

        assert_eq!(cookie.name(), config.session_cookie_name);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));

        let cleared = clear_session_cookie(&config);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
    }
}
