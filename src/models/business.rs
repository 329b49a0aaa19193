// src/models/business.rs
// DOCUMENTATION: Organization listing data structures
// PURPOSE: Database row, request DTOs and API responses for businesses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{PageMeta, PhotoResponse, ReviewResponse, SeoFields};

/// Represents a complete business record from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,

    /// Free-form opening hours, e.g. {"mon": "10:00-22:00"}
    pub opening_hours: Option<Value>,

    pub is_approved: bool,
    pub is_verified: bool,
    pub is_featured: bool,
    pub source: Option<String>,
    pub source_id: Option<String>,

    #[serde(flatten)]
    #[sqlx(flatten)]
    pub seo: SeoFields,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a business (POST /businesses)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBusinessRequest {
    #[validate(length(min = 2, max = 160))]
    pub name: String,

    pub category: String,

    #[validate(length(min = 2, max = 80))]
    pub city: String,

    #[serde(default)]
    pub region: Option<String>,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub address: Option<String>,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,

    #[validate(url)]
    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub opening_hours: Option<Value>,
}

/// Partial update for PUT /businesses/{id}
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 2, max = 160))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(length(min = 2, max = 80))]
    pub city: Option<String>,
    pub region: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub opening_hours: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<Value>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BusinessDetailResponse {
    #[serde(flatten)]
    pub business: BusinessResponse,
    pub photos: Vec<PhotoResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub seo_content: Option<String>,
    pub meta: PageMeta,
}

/// One scraped business as accumulated by the import tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportBusinessRecord {
    pub source: String,
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<Value>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Business {
    pub fn to_response(&self) -> BusinessResponse {
        BusinessResponse {
            id: self.id,
            slug: self.slug.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            opening_hours: self.opening_hours.clone(),
            is_verified: self.is_verified,
            is_featured: self.is_featured,
            seo_title: self.seo.seo_title.clone(),
            seo_description: self.seo.selected_description().map(String::from),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
