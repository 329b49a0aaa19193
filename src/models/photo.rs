// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Listing photo referenced by URL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub listing_kind: String,
    pub listing_id: Uuid,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub is_primary: bool,
    pub is_approved: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /{kind}/{id}/photos
#[derive(Debug, Clone, Deserialize)]
pub struct AddPhotosRequest {
    pub urls: Vec<String>,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub is_primary: bool,
    pub display_order: i32,
}

impl Photo {
    pub fn to_response(&self) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            url: self.url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            is_primary: self.is_primary,
            display_order: self.display_order,
        }
    }
}
