// src/services/import_service.rs
// DOCUMENTATION: Bulk import of scraped listings
// PURPOSE: Upsert records on (source, source_id) and attach their photos
//
// Process per record:
// 1. Check required fields and normalise category, city and phone
// 2. Look up an existing listing from the same source
// 3. Existing: fill empty columns only. New: create unapproved with a fresh slug
// 4. Attach photo URLs

use super::listing_service::{ListingService, MAX_PHOTOS_PER_REQUEST};
use crate::db::{BusinessRepository, ProfileRepository};
use crate::errors::DirectoryError;
use crate::models::{ImportBusinessRecord, ImportProfileRecord, ListingKind};
use crate::services::validation::{
    is_http_url, normalize_city, normalize_optional_phone, validate_category,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

pub const DEFAULT_PROFILE_CATEGORY: &str = "independent";
pub const DEFAULT_BUSINESS_CATEGORY: &str = "agency";
/// Records accepted per request
pub const MAX_IMPORT_BATCH: usize = 500;

/// Import statistics
/// DOCUMENTATION: Tracks results of one import request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStats {
    pub kind: ListingKind,
    /// Records in the request
    pub received: u32,
    /// New listings created
    pub created: u32,
    /// Existing listings that had empty fields filled
    pub updated: u32,
    /// Records rejected or failed to store
    pub failed: u32,
    pub photos_added: u32,
    pub errors: Vec<String>,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl ImportStats {
    pub fn new(kind: ListingKind, received: usize) -> Self {
        Self {
            kind,
            received: received as u32,
            created: 0,
            updated: 0,
            failed: 0,
            photos_added: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    fn fail(&mut self, label: &str, e: DirectoryError) {
        log::warn!("Import of {} failed: {}", label, e);
        self.failed += 1;
        self.errors.push(format!("{}: {}", label, e));
    }

    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

/// Outcome of one upserted record
enum Upserted {
    Created(Uuid),
    Updated(Uuid),
}

fn required(field: &str, value: &str) -> Result<(), DirectoryError> {
    if value.trim().is_empty() {
        Err(DirectoryError::ValidationError(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Known category, otherwise the kind's default
fn import_category(kind: ListingKind, category: Option<&str>) -> String {
    let fallback = match kind {
        ListingKind::Profile => DEFAULT_PROFILE_CATEGORY,
        ListingKind::Business => DEFAULT_BUSINESS_CATEGORY,
    };
    category
        .and_then(|c| validate_category(kind, c).ok())
        .unwrap_or_else(|| fallback.to_string())
}

/// Scraped phones are best effort; unusable ones are dropped
fn import_phone(phone: Option<&str>) -> Option<String> {
    normalize_optional_phone(phone).unwrap_or_else(|e| {
        log::debug!("Dropping imported phone: {}", e);
        None
    })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim and normalise a scraped profile, returning its category
pub fn prepare_profile(rec: &mut ImportProfileRecord) -> Result<String, DirectoryError> {
    required("source", &rec.source)?;
    required("source_id", &rec.source_id)?;
    required("name", &rec.name)?;
    required("city", &rec.city)?;

    rec.source = rec.source.trim().to_string();
    rec.source_id = rec.source_id.trim().to_string();
    rec.name = rec.name.trim().to_string();
    rec.city = normalize_city(&rec.city);
    rec.region = blank_to_none(rec.region.take());
    rec.gender = blank_to_none(rec.gender.take());
    rec.description = blank_to_none(rec.description.take());
    rec.email = blank_to_none(rec.email.take());
    rec.website = blank_to_none(rec.website.take());
    rec.phone = import_phone(rec.phone.as_deref());
    rec.age = rec.age.filter(|age| (18..=99).contains(age));
    let mut seen = HashSet::new();
    rec.services = rec
        .services
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect();

    Ok(import_category(ListingKind::Profile, rec.category.as_deref()))
}

pub fn prepare_business(rec: &mut ImportBusinessRecord) -> Result<String, DirectoryError> {
    required("source", &rec.source)?;
    required("source_id", &rec.source_id)?;
    required("name", &rec.name)?;
    required("city", &rec.city)?;

    rec.source = rec.source.trim().to_string();
    rec.source_id = rec.source_id.trim().to_string();
    rec.name = rec.name.trim().to_string();
    rec.city = normalize_city(&rec.city);
    rec.region = blank_to_none(rec.region.take());
    rec.address = blank_to_none(rec.address.take());
    rec.description = blank_to_none(rec.description.take());
    rec.email = blank_to_none(rec.email.take());
    rec.website = blank_to_none(rec.website.take());
    rec.phone = import_phone(rec.phone.as_deref());
    if !matches!(rec.opening_hours, Some(serde_json::Value::Object(_))) {
        rec.opening_hours = None;
    }

    Ok(import_category(ListingKind::Business, rec.category.as_deref()))
}

fn check_batch_size(len: usize) -> Result<(), DirectoryError> {
    if len > MAX_IMPORT_BATCH {
        return Err(DirectoryError::ValidationError(format!(
            "at most {} records per import request",
            MAX_IMPORT_BATCH
        )));
    }
    Ok(())
}

pub struct ImportService;

impl ImportService {
    pub async fn import_profiles(
        pool: &PgPool,
        records: Vec<ImportProfileRecord>,
    ) -> Result<ImportStats, DirectoryError> {
        check_batch_size(records.len())?;
        let start_time = Instant::now();
        let mut stats = ImportStats::new(ListingKind::Profile, records.len());

        for mut rec in records {
            let label = format!("{}:{}", rec.source, rec.source_id);
            let upserted = match Self::upsert_profile(pool, &mut rec).await {
                Ok(upserted) => upserted,
                Err(e) => {
                    stats.fail(&label, e);
                    continue;
                }
            };
            Self::record(pool, &mut stats, ListingKind::Profile, upserted, &rec.photos, &label).await;
        }

        stats.complete(start_time.elapsed().as_secs());
        log::info!(
            "Profile import finished: {} created, {} updated, {} failed",
            stats.created,
            stats.updated,
            stats.failed
        );
        Ok(stats)
    }

    pub async fn import_businesses(
        pool: &PgPool,
        records: Vec<ImportBusinessRecord>,
    ) -> Result<ImportStats, DirectoryError> {
        check_batch_size(records.len())?;
        let start_time = Instant::now();
        let mut stats = ImportStats::new(ListingKind::Business, records.len());

        for mut rec in records {
            let label = format!("{}:{}", rec.source, rec.source_id);
            let upserted = match Self::upsert_business(pool, &mut rec).await {
                Ok(upserted) => upserted,
                Err(e) => {
                    stats.fail(&label, e);
                    continue;
                }
            };
            Self::record(pool, &mut stats, ListingKind::Business, upserted, &rec.photos, &label)
                .await;
        }

        stats.complete(start_time.elapsed().as_secs());
        log::info!(
            "Business import finished: {} created, {} updated, {} failed",
            stats.created,
            stats.updated,
            stats.failed
        );
        Ok(stats)
    }

    async fn upsert_profile(
        pool: &PgPool,
        rec: &mut ImportProfileRecord,
    ) -> Result<Upserted, DirectoryError> {
        let category = prepare_profile(rec)?;

        if let Some(existing) = ProfileRepository::get_by_source(pool, &rec.source, &rec.source_id).await? {
            let profile = ProfileRepository::fill_missing(pool, existing.id, rec).await?;
            return Ok(Upserted::Updated(profile.id));
        }

        let slug = ListingService::unique_slug(pool, ListingKind::Profile, &rec.name, &rec.city).await?;
        let profile = ProfileRepository::create_imported(pool, &slug, &category, rec).await?;
        Ok(Upserted::Created(profile.id))
    }

    async fn upsert_business(
        pool: &PgPool,
        rec: &mut ImportBusinessRecord,
    ) -> Result<Upserted, DirectoryError> {
        let category = prepare_business(rec)?;

        if let Some(existing) = BusinessRepository::get_by_source(pool, &rec.source, &rec.source_id).await? {
            let business = BusinessRepository::fill_missing(pool, existing.id, rec).await?;
            return Ok(Upserted::Updated(business.id));
        }

        let slug =
            ListingService::unique_slug(pool, ListingKind::Business, &rec.name, &rec.city).await?;
        let business = BusinessRepository::create_imported(pool, &slug, &category, rec).await?;
        Ok(Upserted::Created(business.id))
    }

    /// Count the upsert and attach photos; photo problems do not fail the record
    async fn record(
        pool: &PgPool,
        stats: &mut ImportStats,
        kind: ListingKind,
        upserted: Upserted,
        photos: &[String],
        label: &str,
    ) {
        let id = match upserted {
            Upserted::Created(id) => {
                stats.created += 1;
                id
            }
            Upserted::Updated(id) => {
                stats.updated += 1;
                id
            }
        };

        if photos.is_empty() {
            return;
        }

        let usable: Vec<String> = photos
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| is_http_url(p))
            .take(MAX_PHOTOS_PER_REQUEST)
            .collect();

        match ListingService::attach_photos(pool, kind, id, &usable).await {
            Ok(added) => stats.photos_added += added.len() as u32,
            Err(e) => {
                log::warn!("Photos for {} not attached: {}", label, e);
                stats.errors.push(format!("{} photos: {}", label, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> ImportProfileRecord {
        ImportProfileRecord {
            source: " scrapesite ".to_string(),
            source_id: "42".to_string(),
            name: " Lara ".to_string(),
            category: Some("Unknown".to_string()),
            city: "  Las   Palmas ".to_string(),
            age: Some(16),
            phone: Some("call me".to_string()),
            email: Some("  ".to_string()),
            services: vec!["Massage".to_string(), "massage ".to_string(), "".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_profile_normalises_and_defaults() {
        let mut rec = profile();
        let category = prepare_profile(&mut rec).unwrap();

        assert_eq!(category, DEFAULT_PROFILE_CATEGORY);
        assert_eq!(rec.source, "scrapesite");
        assert_eq!(rec.name, "Lara");
        assert_eq!(rec.city, "Las Palmas");
        assert_eq!(rec.age, None);
        assert_eq!(rec.phone, None);
        assert_eq!(rec.email, None);
        assert_eq!(rec.services, vec!["massage"]);
    }

    #[test]
    fn test_known_category_is_kept() {
        let mut rec = profile();
        rec.category = Some("Massage".to_string());
        assert_eq!(prepare_profile(&mut rec).unwrap(), "massage");
    }

    #[test]
    fn test_missing_source_id_is_rejected() {
        let mut rec = profile();
        rec.source_id = " ".to_string();
        assert!(matches!(
            prepare_profile(&mut rec),
            Err(DirectoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_prepare_business() {
        let mut rec = ImportBusinessRecord {
            source: "scrapesite".to_string(),
            source_id: "b-1".to_string(),
            name: "Club Nine".to_string(),
            category: Some("club".to_string()),
            city: "Berlin".to_string(),
            phone: Some("+49 30 1234567".to_string()),
            opening_hours: Some(json!("always")),
            ..Default::default()
        };

        assert_eq!(prepare_business(&mut rec).unwrap(), "club");
        assert_eq!(rec.phone.as_deref(), Some("+49301234567"));
        assert_eq!(rec.opening_hours, None);
    }

    #[test]
    fn test_stats_failures() {
        let mut stats = ImportStats::new(ListingKind::Business, 3);
        stats.fail("x:1", DirectoryError::ValidationError("name is required".to_string()));
        stats.complete(2);

        assert_eq!(stats.received, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors, vec!["x:1: Validation error: name is required"]);
        assert!(stats.completed_at.is_some());
    }

    #[test]
    fn test_batch_limit() {
        assert!(check_batch_size(MAX_IMPORT_BATCH).is_ok());
        assert!(check_batch_size(MAX_IMPORT_BATCH + 1).is_err());
    }
}
