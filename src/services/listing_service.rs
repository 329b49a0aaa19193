// src/services/listing_service.rs
// DOCUMENTATION: Logic shared by profiles and businesses
// PURPOSE: Unique slugs, photo batches, reviews and the city index

use crate::db::{
    BusinessRepository, PhotoRepository, ProfileRepository, ReviewRepository, StatsRepository,
};
use crate::errors::DirectoryError;
use crate::models::{
    average_rating, CityCount, CreateReviewRequest, ListingKind, PhotoResponse, Review,
    ReviewResponse,
};
use crate::services::schema_markup::RatingSummary;
use crate::services::validation::{is_http_url, listing_slug, slug_candidate, slugify};
use futures::future::join_all;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;
use validator::Validate;

/// Photos inserted concurrently per batch
pub const PHOTO_BATCH_SIZE: usize = 4;
/// Upper bound on URLs accepted in one request
pub const MAX_PHOTOS_PER_REQUEST: usize = 40;
const MAX_SLUG_ATTEMPTS: u32 = 50;

pub struct ListingService;

impl ListingService {
    /// First free slug among base, base-2, base-3, ...
    pub async fn unique_slug(
        pool: &PgPool,
        kind: ListingKind,
        name: &str,
        city: &str,
    ) -> Result<String, DirectoryError> {
        let base = listing_slug(name, city);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug_candidate(&base, attempt);
            let taken = match kind {
                ListingKind::Profile => ProfileRepository::slug_exists(pool, &candidate).await?,
                ListingKind::Business => BusinessRepository::slug_exists(pool, &candidate).await?,
            };
            if !taken {
                return Ok(candidate);
            }
        }

        let suffix = Uuid::new_v4().simple().to_string();
        log::warn!("Slug '{}' exhausted {} attempts", base, MAX_SLUG_ATTEMPTS);
        Ok(format!("{}-{}", base, &suffix[..8]))
    }

    /// Attach photo URLs in parallel batches
    /// DOCUMENTATION: URLs are trimmed and deduplicated; invalid ones are
    /// rejected up front. The first new photo becomes primary when the
    /// listing has none. Already attached URLs are skipped
    pub async fn attach_photos(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
        urls: &[String],
    ) -> Result<Vec<PhotoResponse>, DirectoryError> {
        let urls = clean_photo_urls(urls)?;
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let (has_primary, next_order) = PhotoRepository::photo_state(pool, kind, listing_id).await?;
        let mut added = Vec::with_capacity(urls.len());

        for (batch_idx, batch) in urls.chunks(PHOTO_BATCH_SIZE).enumerate() {
            let results = join_all(batch.iter().enumerate().map(|(i, url)| {
                let position = batch_idx * PHOTO_BATCH_SIZE + i;
                let is_primary = !has_primary && position == 0;
                PhotoRepository::add_photo(
                    pool,
                    kind,
                    listing_id,
                    url,
                    is_primary,
                    next_order + position as i32,
                )
            }))
            .await;

            for result in results {
                if let Some(photo) = result? {
                    added.push(photo.to_response());
                }
            }
        }

        log::info!(
            "Attached {} of {} photos to {} {}",
            added.len(),
            urls.len(),
            kind,
            listing_id
        );
        Ok(added)
    }

    pub async fn add_review(
        pool: &PgPool,
        kind: ListingKind,
        listing_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, DirectoryError> {
        req.validate()?;
        if req.author.trim().is_empty() {
            return Err(DirectoryError::ValidationError("author must not be blank".to_string()));
        }
        let review = ReviewRepository::create_review(pool, kind, listing_id, &req).await?;
        Ok(review.to_response())
    }

    pub async fn cities(pool: &PgPool) -> Result<Vec<CityCount>, DirectoryError> {
        let cities = StatsRepository::cities(pool).await?;
        Ok(merge_city_counts(cities))
    }
}

/// Fold spellings that share a /cities/{slug} page into one entry, busiest first
pub fn merge_city_counts(cities: Vec<CityCount>) -> Vec<CityCount> {
    let mut merged: Vec<CityCount> = Vec::with_capacity(cities.len());
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for city in cities {
        let slug = slugify(&city.city);
        if slug.is_empty() {
            continue;
        }
        match by_slug.get(&slug) {
            Some(&pos) => {
                merged[pos].profiles += city.profiles;
                merged[pos].businesses += city.businesses;
            }
            None => {
                by_slug.insert(slug, merged.len());
                merged.push(city);
            }
        }
    }

    merged.sort_by(|a, b| {
        (b.profiles + b.businesses)
            .cmp(&(a.profiles + a.businesses))
            .then_with(|| a.city.cmp(&b.city))
    });
    merged
}

/// Trim, validate and dedupe photo URLs, keeping the first occurrence
pub fn clean_photo_urls(urls: &[String]) -> Result<Vec<String>, DirectoryError> {
    if urls.len() > MAX_PHOTOS_PER_REQUEST {
        return Err(DirectoryError::ValidationError(format!(
            "at most {} photos per request",
            MAX_PHOTOS_PER_REQUEST
        )));
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(urls.len());
    for url in urls.iter().map(|u| u.trim()) {
        if url.is_empty() {
            continue;
        }
        if !is_http_url(url) {
            return Err(DirectoryError::ValidationError(format!(
                "'{}' is not an http(s) URL",
                url
            )));
        }
        if seen.insert(url.to_string()) {
            cleaned.push(url.to_string());
        }
    }
    Ok(cleaned)
}

/// Rating summary for schema markup; None without reviews
pub fn rating_summary(reviews: &[Review]) -> Option<RatingSummary> {
    average_rating(reviews).map(|average| RatingSummary {
        average,
        count: reviews.len() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn city(name: &str, profiles: i64, businesses: i64) -> CityCount {
        CityCount {
            city: name.to_string(),
            profiles,
            businesses,
        }
    }

    #[test]
    fn test_city_spellings_share_one_entry() {
        let merged = merge_city_counts(vec![
            city("Madrid", 3, 1),
            city("Berlin", 2, 1),
            city("madrid", 1, 0),
            city("  ", 5, 5),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].city, "Madrid");
        assert_eq!((merged[0].profiles, merged[0].businesses), (4, 1));
        assert_eq!(merged[1].city, "Berlin");
    }

    #[test]
    fn test_clean_photo_urls() {
        let urls = vec![
            " https://cdn.example.com/1.jpg ".to_string(),
            "https://cdn.example.com/1.jpg".to_string(),
            "".to_string(),
            "https://cdn.example.com/2.jpg".to_string(),
        ];
        assert_eq!(
            clean_photo_urls(&urls).unwrap(),
            vec!["https://cdn.example.com/1.jpg", "https://cdn.example.com/2.jpg"]
        );
    }

    #[test]
    fn test_invalid_photo_url_is_rejected() {
        let urls = vec!["file:///etc/passwd".to_string()];
        assert!(matches!(
            clean_photo_urls(&urls),
            Err(DirectoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_too_many_photos() {
        let urls: Vec<String> = (0..=MAX_PHOTOS_PER_REQUEST)
            .map(|i| format!("https://cdn.example.com/{}.jpg", i))
            .collect();
        assert!(clean_photo_urls(&urls).is_err());
    }

    #[test]
    fn test_rating_summary() {
        assert_eq!(rating_summary(&[]), None);

        let review = Review {
            id: Uuid::new_v4(),
            listing_kind: "profile".to_string(),
            listing_id: Uuid::new_v4(),
            author: "a".to_string(),
            rating: 4,
            text: None,
            is_approved: true,
            created_at: Utc::now(),
        };
        assert_eq!(
            rating_summary(&[review.clone(), review]),
            Some(RatingSummary { average: 4.0, count: 2 })
        );
    }
}
