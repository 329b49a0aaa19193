// src/db/user_repository.rs

use super::db_error;
use crate::errors::DirectoryError;
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    /// Insert a user; a duplicate email yields AlreadyExists
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<User, DirectoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, display_name, role)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(email.trim())
        .bind(password_hash)
        .bind(display_name.trim())
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(|e| match db_error("Failed to create user", e) {
            DirectoryError::AlreadyExists(_) => {
                DirectoryError::AlreadyExists(format!("account for {}", email.trim()))
            }
            other => other,
        })?;

        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DirectoryError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to fetch user by email", e))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<User, DirectoryError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("Failed to fetch user", e))?
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", id)))
    }
}
