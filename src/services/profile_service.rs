// src/services/profile_service.rs
// DOCUMENTATION: Business logic for profiles
// PURPOSE: Intermediary between handlers and repositories; normalises input
// and assembles detail pages

use super::listing_service::{rating_summary, ListingService};
use super::seo::{LlmClient, SeoService};
use crate::auth::AuthUser;
use crate::db::{PhotoRepository, ProfileRepository, ReviewRepository};
use crate::errors::DirectoryError;
use crate::models::{
    average_rating, CreateProfileRequest, CreateReviewRequest, ListingKind, ListingPage,
    ListingSearchQuery, PhotoResponse, ProfileDetailResponse, ProfileResponse, ReviewResponse,
    UpdateProfileRequest,
};
use crate::services::branding::SiteBrand;
use crate::services::page_meta::profile_meta;
use crate::services::validation::{normalize_city, normalize_optional_phone, validate_category};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn clean_services(services: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(services.len());
    for service in services {
        let service = service.trim().to_lowercase();
        if !service.is_empty() && !cleaned.contains(&service) {
            cleaned.push(service);
        }
    }
    cleaned
}

/// Validate and normalise a create request in place
pub fn normalize_create(mut req: CreateProfileRequest) -> Result<CreateProfileRequest, DirectoryError> {
    req.validate()?;
    req.name = req.name.trim().to_string();
    req.category = validate_category(ListingKind::Profile, &req.category)?;
    req.city = normalize_city(&req.city);
    req.phone = normalize_optional_phone(req.phone.as_deref())?;
    req.services = clean_services(req.services);
    Ok(req)
}

/// Validate and normalise the provided fields of an update
pub fn normalize_update(mut req: UpdateProfileRequest) -> Result<UpdateProfileRequest, DirectoryError> {
    req.validate()?;
    req.name = req.name.map(|n| n.trim().to_string());
    req.category = req
        .category
        .map(|c| validate_category(ListingKind::Profile, &c))
        .transpose()?;
    req.city = req.city.map(|c| normalize_city(&c));
    req.phone = match req.phone {
        Some(phone) => normalize_optional_phone(Some(&phone))?,
        None => None,
    };
    req.services = req.services.map(clean_services);
    Ok(req)
}

pub struct ProfileService;

impl ProfileService {
    /// Create an unapproved profile owned by the caller and queue SEO generation
    pub async fn create_profile(
        pool: &PgPool,
        llm: &LlmClient,
        user: &AuthUser,
        req: CreateProfileRequest,
    ) -> Result<ProfileResponse, DirectoryError> {
        let req = normalize_create(req)?;
        let slug = ListingService::unique_slug(pool, ListingKind::Profile, &req.name, &req.city).await?;
        let profile = ProfileRepository::create(pool, Some(user.id), &slug, &req).await?;

        SeoService::spawn_generation(pool.clone(), llm.clone(), ListingKind::Profile, profile.id);

        Ok(profile.to_response())
    }

    pub async fn update_profile(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, DirectoryError> {
        let existing = ProfileRepository::get_by_id(pool, id).await?;
        user.ensure_can_edit(existing.user_id)?;

        let req = normalize_update(req)?;
        let profile = ProfileRepository::update(pool, id, &req).await?;
        Ok(profile.to_response())
    }

    pub async fn search_profiles(
        pool: &PgPool,
        query: ListingSearchQuery,
    ) -> Result<ListingPage<ProfileResponse>, DirectoryError> {
        let (profiles, total_count) = ProfileRepository::search(pool, &query).await?;
        Ok(ListingPage::new(
            profiles.iter().map(|p| p.to_response()).collect(),
            total_count,
            &query,
        ))
    }

    /// Public detail page: approved photos, approved reviews and SEO head
    pub async fn get_profile_detail(
        pool: &PgPool,
        brand: &SiteBrand,
        slug: &str,
    ) -> Result<ProfileDetailResponse, DirectoryError> {
        let profile = ProfileRepository::get_approved_by_slug(pool, slug).await?;
        let photos = PhotoRepository::get_photos(pool, ListingKind::Profile, profile.id).await?;
        let reviews = ReviewRepository::get_approved(pool, ListingKind::Profile, profile.id).await?;

        let image = photos.first().map(|p| p.url.as_str());
        let meta = profile_meta(brand, &profile, image, rating_summary(&reviews));

        Ok(ProfileDetailResponse {
            average_rating: average_rating(&reviews),
            review_count: reviews.len() as i64,
            seo_content: profile.seo.seo_content.clone(),
            profile: profile.to_response(),
            photos: photos.iter().map(|p| p.to_response()).collect(),
            reviews: reviews.iter().map(|r| r.to_response()).collect(),
            meta,
        })
    }

    pub async fn add_photos(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
        urls: &[String],
    ) -> Result<Vec<PhotoResponse>, DirectoryError> {
        let profile = ProfileRepository::get_by_id(pool, id).await?;
        user.ensure_can_edit(profile.user_id)?;
        ListingService::attach_photos(pool, ListingKind::Profile, profile.id, urls).await
    }

    pub async fn add_review(
        pool: &PgPool,
        slug: &str,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, DirectoryError> {
        let profile = ProfileRepository::get_approved_by_slug(pool, slug).await?;
        ListingService::add_review(pool, ListingKind::Profile, profile.id, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProfileRequest {
        CreateProfileRequest {
            name: "  Anna  ".to_string(),
            category: "Companion".to_string(),
            city: " Madrid ".to_string(),
            region: None,
            age: Some(27),
            gender: None,
            description: None,
            phone: Some("0034 612 345 678".to_string()),
            email: None,
            website: None,
            services: vec!["Dinner ".to_string(), "dinner".to_string(), " ".to_string()],
        }
    }

    #[test]
    fn test_normalize_create() {
        let req = normalize_create(request()).unwrap();
        assert_eq!(req.name, "Anna");
        assert_eq!(req.category, "companion");
        assert_eq!(req.city, "Madrid");
        assert_eq!(req.phone.as_deref(), Some("+34612345678"));
        assert_eq!(req.services, vec!["dinner"]);
    }

    #[test]
    fn test_underage_is_rejected() {
        let mut req = request();
        req.age = Some(17);
        assert!(matches!(
            normalize_create(req),
            Err(DirectoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_business_category_is_rejected_for_profiles() {
        let mut req = request();
        req.category = "spa".to_string();
        assert!(normalize_create(req).is_err());
    }

    #[test]
    fn test_normalize_update_only_touches_given_fields() {
        let req = normalize_update(UpdateProfileRequest {
            category: Some(" MASSAGE ".to_string()),
            phone: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(req.category.as_deref(), Some("massage"));
        assert_eq!(req.phone, None);
        assert_eq!(req.name, None);
        assert_eq!(req.services, None);
    }
}
