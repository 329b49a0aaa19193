// src/services/seo/keywords.rs
// DOCUMENTATION: Keyword phrase tables per listing category
// PURPOSE: Seed keywords for prompts and fallback when the LLM returns none

use crate::models::ListingKind;

const CITY_PLACEHOLDER: &str = "{city}";

const PROFILE_INDEPENDENT: &[&str] = &[
    "independent escort {city}",
    "independent companion {city}",
    "private escort {city}",
    "verified escort {city}",
    "escort {city}",
];

const PROFILE_AGENCY: &[&str] = &[
    "agency escort {city}",
    "escort agency {city}",
    "companion agency {city}",
    "escort {city}",
];

const PROFILE_MASSAGE: &[&str] = &[
    "massage {city}",
    "private massage {city}",
    "relaxing massage {city}",
    "massage therapist {city}",
];

const PROFILE_COMPANION: &[&str] = &[
    "companion {city}",
    "dinner date {city}",
    "social companion {city}",
    "travel companion {city}",
];

const BUSINESS_AGENCY: &[&str] = &[
    "escort agency {city}",
    "companion agency {city}",
    "best agency {city}",
];

const BUSINESS_MASSAGE_PARLOUR: &[&str] = &[
    "massage parlour {city}",
    "massage salon {city}",
    "massage studio {city}",
    "massage {city}",
];

const BUSINESS_CLUB: &[&str] = &[
    "club {city}",
    "night club {city}",
    "gentlemen's club {city}",
];

const BUSINESS_SPA: &[&str] = &[
    "spa {city}",
    "wellness spa {city}",
    "day spa {city}",
    "massage and spa {city}",
];

const GENERIC: &[&str] = &["{city} directory", "listings {city}"];

/// Keyword templates for a category; unknown categories get generic phrases
pub fn keyword_templates(kind: ListingKind, category: &str) -> &'static [&'static str] {
    match (kind, category) {
        (ListingKind::Profile, "independent") => PROFILE_INDEPENDENT,
        (ListingKind::Profile, "agency") => PROFILE_AGENCY,
        (ListingKind::Profile, "massage") => PROFILE_MASSAGE,
        (ListingKind::Profile, "companion") => PROFILE_COMPANION,
        (ListingKind::Business, "agency") => BUSINESS_AGENCY,
        (ListingKind::Business, "massage-parlour") => BUSINESS_MASSAGE_PARLOUR,
        (ListingKind::Business, "club") => BUSINESS_CLUB,
        (ListingKind::Business, "spa") => BUSINESS_SPA,
        _ => GENERIC,
    }
}

/// Keyword phrases for a category with the city filled in
pub fn keywords_for(kind: ListingKind, category: &str, city: &str) -> Vec<String> {
    let city = city.trim().to_lowercase();
    keyword_templates(kind, category)
        .iter()
        .map(|template| template.replace(CITY_PLACEHOLDER, &city))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::{BUSINESS_CATEGORIES, PROFILE_CATEGORIES};

    #[test]
    fn test_every_category_has_keywords() {
        for category in PROFILE_CATEGORIES {
            assert_ne!(keyword_templates(ListingKind::Profile, category), GENERIC);
        }
        for category in BUSINESS_CATEGORIES {
            assert_ne!(keyword_templates(ListingKind::Business, category), GENERIC);
        }
    }

    #[test]
    fn test_templates_contain_city_placeholder() {
        for category in PROFILE_CATEGORIES {
            for template in keyword_templates(ListingKind::Profile, category) {
                assert!(template.contains(CITY_PLACEHOLDER), "{}", template);
            }
        }
    }

    #[test]
    fn test_city_is_substituted() {
        let keywords = keywords_for(ListingKind::Business, "spa", " Barcelona ");
        assert_eq!(keywords[0], "spa barcelona");
        assert!(keywords.iter().all(|k| !k.contains('{')));
    }

    #[test]
    fn test_unknown_category_is_generic() {
        let keywords = keywords_for(ListingKind::Profile, "unknown", "Oslo");
        assert_eq!(keywords, vec!["oslo directory", "listings oslo"]);
    }
}
