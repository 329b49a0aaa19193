// src/models/profile.rs
// DOCUMENTATION: Individual listing data structures
// PURPOSE: Database row, request DTOs and API responses for profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::{PageMeta, PhotoResponse, ReviewResponse, SeoFields};

/// Represents a complete profile record from the database
/// DOCUMENTATION: Maps directly to the profiles table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,

    /// Owning user; None for imported listings
    pub user_id: Option<Uuid>,

    /// Unique URL slug derived from name and city
    pub slug: String,

    pub name: String,
    pub category: String,
    pub city: String,
    pub region: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub services: Vec<String>,

    /// Visible on public pages only once approved by a moderator
    pub is_approved: bool,
    pub is_verified: bool,
    pub is_featured: bool,

    /// Import origin (site name) and the identifier used there
    pub source: Option<String>,
    pub source_id: Option<String>,

    #[serde(flatten)]
    #[sqlx(flatten)]
    pub seo: SeoFields,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a profile
/// DOCUMENTATION: Body of POST /profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: String,

    pub category: String,

    #[validate(length(min = 2, max = 80))]
    pub city: String,

    #[serde(default)]
    pub region: Option<String>,

    #[validate(range(min = 18, max = 99))]
    #[serde(default)]
    pub age: Option<i32>,

    #[serde(default)]
    pub gender: Option<String>,

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
    pub services: Vec<String>,
}

/// Request DTO for updating an existing profile
/// DOCUMENTATION: All fields are optional - only provided fields are updated
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(length(min = 2, max = 80))]
    pub city: Option<String>,
    pub region: Option<String>,
    #[validate(range(min = 18, max = 99))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub services: Option<Vec<String>>,
}

/// Public view of a profile
/// DOCUMENTATION: Omits ownership/import columns and exposes only the
/// selected SEO description
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub region: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub services: Vec<String>,
    pub is_verified: bool,
    pub is_featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// GET /profiles/{slug}
#[derive(Debug, Serialize)]
pub struct ProfileDetailResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub photos: Vec<PhotoResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub seo_content: Option<String>,
    pub meta: PageMeta,
}

/// One scraped profile as accumulated by the import tool
/// DOCUMENTATION: Body item of POST /admin/import/profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportProfileRecord {
    pub source: String,
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Profile {
    /// Convert Profile to the public response DTO
    pub fn to_response(&self) -> ProfileResponse {
        ProfileResponse {
            id: self.id,
            slug: self.slug.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            age: self.age,
            gender: self.gender.clone(),
            description: self.description.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            services: self.services.clone(),
            is_verified: self.is_verified,
            is_featured: self.is_featured,
            seo_title: self.seo.seo_title.clone(),
            seo_description: self.seo.selected_description().map(String::from),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
