// src/services/page_meta.rs
// DOCUMENTATION: SEO head builders
// PURPOSE: Title, description, canonical URL, OG image and JSON-LD per page type

use crate::models::{Business, PageMeta, Profile, StaticPage};
use crate::services::branding::SiteBrand;
use crate::services::schema_markup::{
    breadcrumb_schema, local_business_schema, person_schema, website_schema, RatingSummary,
};
use crate::services::seo::generator::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};
use crate::services::text::{title_case, truncate_words};
use serde_json::Value;

const INDEX: &str = "index,follow";
const NOINDEX: &str = "noindex,follow";

#[allow(clippy::too_many_arguments)]
fn meta(
    brand: &SiteBrand,
    title: String,
    description: String,
    path: &str,
    og_image: Option<String>,
    robots: &str,
    keywords: Vec<String>,
    schema: Vec<Value>,
) -> PageMeta {
    PageMeta {
        title: truncate_words(&title, MAX_TITLE_CHARS),
        description: truncate_words(&description, MAX_DESCRIPTION_CHARS),
        canonical: brand.url(path),
        og_image,
        robots: robots.to_string(),
        keywords,
        schema,
        site_name: brand.brand.site_name.to_string(),
        theme_color: brand.brand.primary_color.to_string(),
    }
}

/// Description used when no SEO variant has been generated yet
pub fn default_listing_description(name: &str, category: &str, city: &str, site_name: &str) -> String {
    format!(
        "{}, {} in {}. See photos and reviews on {}.",
        name.trim(),
        title_case(category),
        city.trim(),
        site_name
    )
}

pub fn profile_meta(
    brand: &SiteBrand,
    profile: &Profile,
    image: Option<&str>,
    rating: Option<RatingSummary>,
) -> PageMeta {
    let path = format!("/profiles/{}", profile.slug);
    let url = brand.url(&path);
    let title = profile.seo.seo_title.clone().unwrap_or_else(|| {
        format!("{} | {} in {}", profile.name, title_case(&profile.category), profile.city)
    });
    let description = profile
        .seo
        .selected_description()
        .map(String::from)
        .unwrap_or_else(|| {
            default_listing_description(
                &profile.name,
                &profile.category,
                &profile.city,
                brand.brand.site_name,
            )
        });

    let schema = vec![
        person_schema(profile, &url, image, &description, rating),
        breadcrumb_schema(brand, &profile.city, Some((&profile.name, &url))),
    ];

    meta(
        brand,
        title,
        description,
        &path,
        Some(brand.url(&format!("/og/profiles/{}.svg", profile.slug))),
        INDEX,
        profile.seo.seo_keywords.clone(),
        schema,
    )
}

pub fn business_meta(
    brand: &SiteBrand,
    business: &Business,
    image: Option<&str>,
    rating: Option<RatingSummary>,
) -> PageMeta {
    let path = format!("/businesses/{}", business.slug);
    let url = brand.url(&path);
    let title = business.seo.seo_title.clone().unwrap_or_else(|| {
        format!("{} | {} in {}", business.name, title_case(&business.category), business.city)
    });
    let description = business
        .seo
        .selected_description()
        .map(String::from)
        .unwrap_or_else(|| {
            default_listing_description(
                &business.name,
                &business.category,
                &business.city,
                brand.brand.site_name,
            )
        });

    let schema = vec![
        local_business_schema(business, &url, image, &description, rating),
        breadcrumb_schema(brand, &business.city, Some((&business.name, &url))),
    ];

    meta(
        brand,
        title,
        description,
        &path,
        Some(brand.url(&format!("/og/businesses/{}.svg", business.slug))),
        INDEX,
        business.seo.seo_keywords.clone(),
        schema,
    )
}

pub fn static_page_meta(brand: &SiteBrand, page: &StaticPage) -> PageMeta {
    let title = page
        .seo_title
        .clone()
        .unwrap_or_else(|| format!("{} | {}", page.title, brand.brand.site_name));
    let description = page
        .seo_description
        .clone()
        .unwrap_or_else(|| format!("{} on {}.", page.title, brand.brand.site_name));

    meta(
        brand,
        title,
        description,
        &format!("/pages/{}", page.slug),
        None,
        INDEX,
        Vec::new(),
        vec![website_schema(brand)],
    )
}

/// Head for the home, city, index and search pages
/// DOCUMENTATION: Query strings never reach the canonical URL; search
/// result pages are marked noindex. Unknown paths get a generic noindex head
pub fn meta_for_path(brand: &SiteBrand, raw_path: &str) -> PageMeta {
    let path = raw_path.split(['?', '#']).next().unwrap_or("/");
    let path = if path.is_empty() { "/" } else { path };
    let trimmed = path.trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    let site = brand.brand.site_name;

    match segments.as_slice() {
        [] => meta(
            brand,
            format!("{} | {}", site, brand.brand.tagline),
            format!(
                "{}. Browse profiles and businesses in {} and other cities.",
                brand.brand.tagline, brand.brand.default_city
            ),
            "/",
            None,
            INDEX,
            Vec::new(),
            vec![website_schema(brand)],
        ),
        ["cities"] => meta(
            brand,
            format!("All cities | {}", site),
            format!("Every city with listings on {}.", site),
            "/cities",
            None,
            INDEX,
            Vec::new(),
            vec![website_schema(brand)],
        ),
        ["cities", city_slug] => {
            let city = title_case(city_slug);
            meta(
                brand,
                format!("Listings in {} | {}", city, site),
                format!("Verified profiles and businesses in {} on {}.", city, site),
                &format!("/cities/{}", city_slug),
                None,
                INDEX,
                vec![city.to_lowercase()],
                vec![breadcrumb_schema(brand, &city, None)],
            )
        }
        ["profiles"] => meta(
            brand,
            format!("Profiles | {}", site),
            format!("Browse approved profiles on {}.", site),
            "/profiles",
            None,
            INDEX,
            Vec::new(),
            Vec::new(),
        ),
        ["businesses"] => meta(
            brand,
            format!("Businesses | {}", site),
            format!("Browse approved businesses on {}.", site),
            "/businesses",
            None,
            INDEX,
            Vec::new(),
            Vec::new(),
        ),
        ["search"] => meta(
            brand,
            format!("Search | {}", site),
            format!("Search listings on {}.", site),
            "/search",
            None,
            NOINDEX,
            Vec::new(),
            vec![website_schema(brand)],
        ),
        _ => meta(
            brand,
            site.to_string(),
            brand.brand.tagline.to_string(),
            trimmed,
            None,
            NOINDEX,
            Vec::new(),
            Vec::new(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeoFields;
    use crate::services::branding::brand_for_host;
    use chrono::Utc;
    use uuid::Uuid;

    fn brand() -> SiteBrand {
        brand_for_host(None, "https://example.test")
    }

    fn profile(seo: SeoFields) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: None,
            slug: "anna-madrid".to_string(),
            name: "Anna".to_string(),
            category: "companion".to_string(),
            city: "Madrid".to_string(),
            region: None,
            age: None,
            gender: None,
            description: None,
            phone: None,
            email: None,
            website: None,
            services: vec![],
            is_approved: true,
            is_verified: false,
            is_featured: false,
            source: None,
            source_id: None,
            seo,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_meta_uses_selected_variant() {
        let seo = SeoFields {
            seo_title: Some("Anna, companion in Madrid".to_string()),
            seo_description_a: Some("Variant A".to_string()),
            seo_description_b: Some("Variant B".to_string()),
            seo_variant: "B".to_string(),
            ..Default::default()
        };
        let meta = profile_meta(&brand(), &profile(seo), None, None);

        assert_eq!(meta.title, "Anna, companion in Madrid");
        assert_eq!(meta.description, "Variant B");
        assert_eq!(meta.canonical, "https://example.test/profiles/anna-madrid");
        assert_eq!(
            meta.og_image.as_deref(),
            Some("https://example.test/og/profiles/anna-madrid.svg")
        );
        assert_eq!(meta.schema.len(), 2);
        assert_eq!(meta.schema[0]["@type"], "Person");
    }

    #[test]
    fn test_profile_meta_defaults_without_seo() {
        let meta = profile_meta(&brand(), &profile(SeoFields::default()), None, None);
        assert_eq!(meta.title, "Anna | Companion in Madrid");
        assert!(meta.description.starts_with("Anna, Companion in Madrid."));
        assert_eq!(meta.robots, INDEX);
    }

    #[test]
    fn test_meta_for_home_and_city() {
        let home = meta_for_path(&brand(), "/?utm_source=x");
        assert_eq!(home.canonical, "https://example.test/");
        assert_eq!(home.schema[0]["@type"], "WebSite");

        let city = meta_for_path(&brand(), "/cities/new-york/");
        assert!(city.title.starts_with("Listings in New York"));
        assert_eq!(city.canonical, "https://example.test/cities/new-york");
        assert_eq!(city.schema[0]["@type"], "BreadcrumbList");
    }

    #[test]
    fn test_search_and_unknown_are_noindex() {
        assert_eq!(meta_for_path(&brand(), "/search?q=spa").robots, NOINDEX);
        assert_eq!(meta_for_path(&brand(), "/whatever/else").robots, NOINDEX);
    }
}
