// src/services/business_service.rs
// DOCUMENTATION: Business logic for businesses

use super::listing_service::{rating_summary, ListingService};
use super::seo::{LlmClient, SeoService};
use crate::auth::AuthUser;
use crate::db::{BusinessRepository, PhotoRepository, ReviewRepository};
use crate::errors::DirectoryError;
use crate::models::{
    average_rating, BusinessDetailResponse, BusinessResponse, CreateBusinessRequest,
    CreateReviewRequest, ListingKind, ListingPage, ListingSearchQuery, PhotoResponse,
    ReviewResponse, UpdateBusinessRequest,
};
use crate::services::branding::SiteBrand;
use crate::services::page_meta::business_meta;
use crate::services::validation::{normalize_city, normalize_optional_phone, validate_category};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Opening hours must be a JSON object when present
fn check_opening_hours(hours: &Option<Value>) -> Result<(), DirectoryError> {
    match hours {
        None | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(DirectoryError::ValidationError(
            "opening_hours must be a JSON object".to_string(),
        )),
    }
}

pub fn normalize_create(mut req: CreateBusinessRequest) -> Result<CreateBusinessRequest, DirectoryError> {
    req.validate()?;
    check_opening_hours(&req.opening_hours)?;
    req.name = req.name.trim().to_string();
    req.category = validate_category(ListingKind::Business, &req.category)?;
    req.city = normalize_city(&req.city);
    req.phone = normalize_optional_phone(req.phone.as_deref())?;
    Ok(req)
}

pub fn normalize_update(mut req: UpdateBusinessRequest) -> Result<UpdateBusinessRequest, DirectoryError> {
    req.validate()?;
    check_opening_hours(&req.opening_hours)?;
    req.name = req.name.map(|n| n.trim().to_string());
    req.category = req
        .category
        .map(|c| validate_category(ListingKind::Business, &c))
        .transpose()?;
    req.city = req.city.map(|c| normalize_city(&c));
    req.phone = match req.phone {
        Some(phone) => normalize_optional_phone(Some(&phone))?,
        None => None,
    };
    Ok(req)
}

pub struct BusinessService;

impl BusinessService {
    pub async fn create_business(
        pool: &PgPool,
        llm: &LlmClient,
        user: &AuthUser,
        req: CreateBusinessRequest,
    ) -> Result<BusinessResponse, DirectoryError> {
        let req = normalize_create(req)?;
        let slug =
            ListingService::unique_slug(pool, ListingKind::Business, &req.name, &req.city).await?;
        let business = BusinessRepository::create(pool, Some(user.id), &slug, &req).await?;

        SeoService::spawn_generation(pool.clone(), llm.clone(), ListingKind::Business, business.id);

        Ok(business.to_response())
    }

    pub async fn update_business(
        pool: &PgPool,
        user: &AuthUser,
        id: Uuid,
        req: UpdateBusinessRequest,
    ) -> Result<BusinessResponse, DirectoryError> {
        let existing = BusinessRepository::get_by_id(pool, id).await?;
        user.ensure_can_edit(existing.user_id)?;

        let req = normalize_update(req)?;
        let business = BusinessRepository::update(pool, id, &req).await?;
        Ok(business.to_response())
    }

    pub async fn search_businesses(
        pool: &PgPool,
        query: ListingSearchQuery,
    ) -> Result<ListingPage<BusinessResponse>, DirectoryError> {
        let (businesses, total_count) = BusinessRepository::search(pool, &query).await?;
        Ok(ListingPage::new(
            businesses.iter().map(|b| b.to_response()).collect(),
            total_count,
            &query,
        ))
    }

    pub async fn get_business_detail(
        pool: &PgPool,
        brand: &SiteBrand,
        slug: &str,
    ) -> Result<BusinessDetailResponse, DirectoryError> {
        let business = BusinessRepository::get_approved_by_slug(pool, slug).await?;
        let photos = PhotoRepository::get_photos(pool, ListingKind::Business, business.id).await?;
        let reviews =
            ReviewRepository::get_approved(pool, ListingKind::Business, business.id).await?;

        let image = photos.first().map(|p| p.url.as_str());
        let meta = business_meta(brand, &business, image, rating_summary(&reviews));

        Ok(BusinessDetailResponse {
            average_rating: average_rating(&reviews),
            review_count: reviews.len() as i64,
            seo_content: business.seo.seo_content.clone(),
            business: business.to_response(),
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
        let business = BusinessRepository::get_by_id(pool, id).await?;
        user.ensure_can_edit(business.user_id)?;
        ListingService::attach_photos(pool, ListingKind::Business, business.id, urls).await
    }

    pub async fn add_review(
        pool: &PgPool,
        slug: &str,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, DirectoryError> {
        let business = BusinessRepository::get_approved_by_slug(pool, slug).await?;
        ListingService::add_review(pool, ListingKind::Business, business.id, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CreateBusinessRequest {
        CreateBusinessRequest {
            name: "Blue Lotus ".to_string(),
            category: "Massage-Parlour".to_string(),
            city: "Lisbon".to_string(),
            region: None,
            address: Some("Rua Augusta 1".to_string()),
            description: None,
            phone: Some("+351 21 000 0000".to_string()),
            email: Some("hello@bluelotus.pt".to_string()),
            website: Some("https://bluelotus.pt".to_string()),
            opening_hours: Some(json!({"mon": "10:00-22:00"})),
        }
    }

    #[test]
    fn test_normalize_create() {
        let req = normalize_create(request()).unwrap();
        assert_eq!(req.name, "Blue Lotus");
        assert_eq!(req.category, "massage-parlour");
        assert_eq!(req.phone.as_deref(), Some("+351210000000"));
    }

    #[test]
    fn test_opening_hours_must_be_object() {
        let mut req = request();
        req.opening_hours = Some(json!(["mon"]));
        assert!(matches!(
            normalize_create(req),
            Err(DirectoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut req = request();
        req.email = Some("not-an-email".to_string());
        assert!(normalize_create(req).is_err());
    }

    #[test]
    fn test_profile_category_is_rejected() {
        let req = normalize_update(UpdateBusinessRequest {
            category: Some("companion".to_string()),
            ..Default::default()
        });
        assert!(req.is_err());
    }
}
