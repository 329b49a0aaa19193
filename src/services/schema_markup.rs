// src/services/schema_markup.rs
// DOCUMENTATION: JSON-LD structured data builders
// PURPOSE: schema.org documents embedded in listing and index pages

use crate::models::{Business, Profile};
use crate::services::branding::SiteBrand;
use crate::services::text::title_case;
use crate::services::validation::slugify;
use serde_json::{json, Map, Value};

/// Aggregate rating over approved reviews
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn aggregate_rating(rating: Option<RatingSummary>) -> Option<Value> {
    rating.filter(|r| r.count > 0).map(|r| {
        json!({
            "@type": "AggregateRating",
            "ratingValue": r.average,
            "reviewCount": r.count,
            "bestRating": 5,
            "worstRating": 1
        })
    })
}

/// Person document for a profile page
pub fn person_schema(
    profile: &Profile,
    url: &str,
    image: Option<&str>,
    description: &str,
    rating: Option<RatingSummary>,
) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert("@type".into(), json!("Person"));
    doc.insert("name".into(), json!(profile.name));
    doc.insert("url".into(), json!(url));
    doc.insert("description".into(), json!(description));
    insert_opt(&mut doc, "image", image);

    let mut address = Map::new();
    address.insert("@type".into(), json!("PostalAddress"));
    address.insert("addressLocality".into(), json!(profile.city));
    insert_opt(&mut address, "addressRegion", profile.region.as_deref());
    doc.insert("address".into(), Value::Object(address));

    if let Some(rating) = aggregate_rating(rating) {
        doc.insert("aggregateRating".into(), rating);
    }

    Value::Object(doc)
}

/// LocalBusiness document for a business page
pub fn local_business_schema(
    business: &Business,
    url: &str,
    image: Option<&str>,
    description: &str,
    rating: Option<RatingSummary>,
) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert("@type".into(), json!("LocalBusiness"));
    doc.insert("name".into(), json!(business.name));
    doc.insert("url".into(), json!(url));
    doc.insert("description".into(), json!(description));
    insert_opt(&mut doc, "image", image);
    insert_opt(&mut doc, "telephone", business.phone.as_deref());

    let mut address = Map::new();
    address.insert("@type".into(), json!("PostalAddress"));
    insert_opt(&mut address, "streetAddress", business.address.as_deref());
    address.insert("addressLocality".into(), json!(business.city));
    insert_opt(&mut address, "addressRegion", business.region.as_deref());
    doc.insert("address".into(), Value::Object(address));

    if let Some(rating) = aggregate_rating(rating) {
        doc.insert("aggregateRating".into(), rating);
    }

    Value::Object(doc)
}

/// Public path of a city page
pub fn city_path(city: &str) -> String {
    format!("/cities/{}", slugify(city))
}

/// BreadcrumbList: Home, City and optionally the listing itself
pub fn breadcrumb_schema(brand: &SiteBrand, city: &str, listing: Option<(&str, &str)>) -> Value {
    let mut items = vec![
        ("Home".to_string(), brand.url("/")),
        (title_case(city), brand.url(&city_path(city))),
    ];
    if let Some((name, url)) = listing {
        items.push((name.to_string(), url.to_string()));
    }

    let elements: Vec<Value> = items
        .into_iter()
        .enumerate()
        .map(|(idx, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": idx + 1,
                "name": name,
                "item": url
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements
    })
}

/// WebSite document with a sitelinks search box
pub fn website_schema(brand: &SiteBrand) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": brand.brand.site_name,
        "url": brand.url("/"),
        "potentialAction": {
            "@type": "SearchAction",
            "target": format!("{}/search?q={{search_term_string}}", brand.base_url),
            "query-input": "required name=search_term_string"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeoFields;
    use crate::services::branding::brand_for_host;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: None,
            slug: "anna-madrid".to_string(),
            name: "Anna".to_string(),
            category: "companion".to_string(),
            city: "Madrid".to_string(),
            region: None,
            age: Some(30),
            gender: None,
            description: None,
            phone: Some("+34600000000".to_string()),
            email: None,
            website: None,
            services: vec![],
            is_approved: true,
            is_verified: true,
            is_featured: false,
            source: None,
            source_id: None,
            seo: SeoFields::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn business() -> Business {
        Business {
            id: Uuid::new_v4(),
            user_id: None,
            slug: "blue-lotus-lisbon".to_string(),
            name: "Blue Lotus".to_string(),
            category: "spa".to_string(),
            city: "Lisbon".to_string(),
            region: Some("Lisboa".to_string()),
            address: Some("Rua Augusta 1".to_string()),
            description: None,
            phone: Some("+351210000000".to_string()),
            email: None,
            website: None,
            opening_hours: None,
            is_approved: true,
            is_verified: false,
            is_featured: false,
            source: None,
            source_id: None,
            seo: SeoFields::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_person_without_reviews_has_no_rating() {
        let doc = person_schema(&profile(), "https://x/profiles/anna-madrid", None, "desc", None);
        assert_eq!(doc["@type"], "Person");
        assert_eq!(doc["address"]["addressLocality"], "Madrid");
        assert!(doc.get("aggregateRating").is_none());
        assert!(doc.get("image").is_none());
        // Contact details of individuals are not published in markup
        assert!(doc.get("telephone").is_none());
    }

    #[test]
    fn test_person_with_rating() {
        let rating = RatingSummary { average: 4.5, count: 2 };
        let doc = person_schema(&profile(), "u", Some("https://img/1.jpg"), "d", Some(rating));
        assert_eq!(doc["aggregateRating"]["ratingValue"], 4.5);
        assert_eq!(doc["aggregateRating"]["reviewCount"], 2);
        assert_eq!(doc["image"], "https://img/1.jpg");
    }

    #[test]
    fn test_local_business_fields() {
        let doc = local_business_schema(&business(), "u", None, "d", None);
        assert_eq!(doc["@type"], "LocalBusiness");
        assert_eq!(doc["telephone"], "+351210000000");
        assert_eq!(doc["address"]["streetAddress"], "Rua Augusta 1");
        assert_eq!(doc["address"]["addressRegion"], "Lisboa");
    }

    #[test]
    fn test_breadcrumbs() {
        let brand = brand_for_host(None, "https://example.test");
        let doc = breadcrumb_schema(&brand, "new york", Some(("Anna", "https://example.test/p")));
        let items = doc["itemListElement"].as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["item"], "https://example.test/");
        assert_eq!(items[1]["name"], "New York");
        assert_eq!(items[1]["item"], "https://example.test/cities/new-york");
        assert_eq!(items[2]["position"], 3);
    }

    #[test]
    fn test_website_search_action() {
        let brand = brand_for_host(None, "https://example.test");
        let doc = website_schema(&brand);
        assert_eq!(
            doc["potentialAction"]["target"],
            "https://example.test/search?q={search_term_string}"
        );
    }
}
