// src/models/redirect.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// HTTP redirect rule looked up by the redirect middleware
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Redirect {
    pub id: Uuid,
    pub from_path: String,
    pub to_path: String,
    pub status_code: i32,
    pub is_active: bool,
    pub hit_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRedirectRequest {
    #[validate(length(min = 1, max = 500))]
    pub from_path: String,
    #[validate(length(min = 1, max = 1000))]
    pub to_path: String,
    #[serde(default = "default_status")]
    pub status_code: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRedirectRequest {
    #[validate(length(min = 1, max = 500))]
    pub from_path: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub to_path: Option<String>,
    pub status_code: Option<i32>,
    pub is_active: Option<bool>,
}

/// Minimal data the middleware needs to answer a redirected request
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectTarget {
    pub id: Uuid,
    pub to_path: String,
    pub status_code: u16,
}

impl Redirect {
    pub fn to_target(&self) -> RedirectTarget {
        RedirectTarget {
            id: self.id,
            to_path: self.to_path.clone(),
            status_code: self.status_code as u16,
        }
    }
}

fn default_status() -> i32 {
    301
}

fn default_active() -> bool {
    true
}
