// src/services/auth_service.rs
// DOCUMENTATION: Account registration and login
// PURPOSE: Hash and verify passwords and issue session tokens

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::config::Config;
use crate::db::UserRepository;
use crate::errors::DirectoryError;
use crate::models::{LoginRequest, RegisterRequest, User, UserResponse, ROLE_USER};
use sqlx::PgPool;
use validator::Validate;

/// Signed-in user plus the token to put in the session cookie
#[derive(Debug)]
pub struct Session {
    pub user: UserResponse,
    pub token: String,
}

fn open_session(user: &User, config: &Config) -> Result<Session, DirectoryError> {
    let token = issue_token(user.id, &user.role, &config.jwt_secret, config.session_ttl_hours)?;
    Ok(Session {
        user: user.to_response(),
        token,
    })
}

pub struct AuthService;

impl AuthService {
    pub async fn register(
        pool: &PgPool,
        config: &Config,
        req: RegisterRequest,
    ) -> Result<Session, DirectoryError> {
        req.validate()?;
        if req.display_name.trim().is_empty() {
            return Err(DirectoryError::ValidationError(
                "display_name must not be blank".to_string(),
            ));
        }

        let password_hash = hash_password(&req.password)?;
        let user =
            UserRepository::create(pool, &req.email, &password_hash, &req.display_name, ROLE_USER)
                .await?;

        open_session(&user, config)
    }

    /// Unknown email and wrong password both answer 401
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: LoginRequest,
    ) -> Result<Session, DirectoryError> {
        let user = match UserRepository::get_by_email(pool, &req.email).await? {
            Some(user) if verify_password(&req.password, &user.password_hash) => user,
            _ => {
                log::warn!("Failed login for {}", req.email.trim());
                return Err(DirectoryError::Unauthorized);
            }
        };

        log::info!("User {} signed in", user.id);
        open_session(&user, config)
    }

    pub async fn current_user(pool: &PgPool, user: &AuthUser) -> Result<UserResponse, DirectoryError> {
        match UserRepository::get_by_id(pool, user.id).await {
            Ok(user) => Ok(user.to_response()),
            // Token outlived its account
            Err(DirectoryError::NotFound(_)) => Err(DirectoryError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}
