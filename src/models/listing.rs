// src/models/listing.rs
// DOCUMENTATION: Types shared by profile and business listings
// PURPOSE: Listing kind discriminator, search query and paginated responses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which listing table a photo, review or SEO job refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Profile,
    Business,
}

impl ListingKind {
    /// Value stored in the listing_kind column of photos and reviews
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Profile => "profile",
            ListingKind::Business => "business",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            ListingKind::Profile => "profiles",
            ListingKind::Business => "businesses",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" | "profiles" => Ok(ListingKind::Profile),
            "business" | "businesses" => Ok(ListingKind::Business),
            other => Err(format!("unknown listing kind '{}'", other)),
        }
    }
}

/// Search query parameters
/// DOCUMENTATION: Query string for GET /profiles and GET /businesses
/// All parameters are optional; only approved listings are ever returned
#[derive(Debug, Default, Deserialize)]
pub struct ListingSearchQuery {
    /// Free text matched against name and description
    pub q: Option<String>,

    /// Filter by city (case-insensitive exact match)
    pub city: Option<String>,

    /// Filter by category slug
    pub category: Option<String>,

    /// Only verified listings when true
    pub verified: Option<bool>,

    /// Page number (1-based)
    pub page: Option<i64>,

    /// Results per page (max 100)
    pub limit: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 24;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE: i64 = 10_000;

impl ListingSearchQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Paginated search response
#[derive(Debug, Serialize)]
pub struct ListingPage<T> {
    pub data: Vec<T>,

    /// Total number of matches (regardless of pagination)
    pub total_count: i64,

    pub page: i64,
    pub limit: i64,

    /// Whether more results exist on next page
    pub has_more: bool,
}

impl<T> ListingPage<T> {
    pub fn new(data: Vec<T>, total_count: i64, query: &ListingSearchQuery) -> Self {
        let page = query.page();
        let limit = query.limit();
        Self {
            data,
            total_count,
            page,
            limit,
            has_more: total_count > page * limit,
        }
    }
}

/// City with the number of approved listings in it
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CityCount {
    pub city: String,
    pub profiles: i64,
    pub businesses: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_bounds() {
        let query = ListingSearchQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = ListingSearchQuery {
            page: Some(0),
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);

        let query = ListingSearchQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let query = ListingSearchQuery {
            page: Some(i64::MAX),
            limit: Some(MAX_PAGE_SIZE),
            ..Default::default()
        };
        assert_eq!(query.page(), MAX_PAGE);
        assert_eq!(query.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let page: ListingPage<u8> = ListingPage::new(vec![], 5, &query);
        assert!(!page.has_more);
    }

    #[test]
    fn test_has_more() {
        let query = ListingSearchQuery {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        let page: ListingPage<u8> = ListingPage::new(vec![], 21, &query);
        assert!(page.has_more);

        let page: ListingPage<u8> = ListingPage::new(vec![], 20, &query);
        assert!(!page.has_more);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("profiles".parse::<ListingKind>(), Ok(ListingKind::Profile));
        assert_eq!("business".parse::<ListingKind>(), Ok(ListingKind::Business));
        assert!("place".parse::<ListingKind>().is_err());
        assert_eq!(ListingKind::Business.table(), "businesses");
    }
}
