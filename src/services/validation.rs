// src/services/validation.rs
// DOCUMENTATION: Validation helpers that derive macros do not cover
// PURPOSE: Slugs, phone numbers, categories and redirect paths

use crate::errors::DirectoryError;
use crate::models::ListingKind;
use regex::Regex;
use std::sync::OnceLock;

pub const PROFILE_CATEGORIES: &[&str] = &["independent", "agency", "massage", "companion"];
pub const BUSINESS_CATEGORIES: &[&str] = &["agency", "massage-parlour", "club", "spa"];

const ALLOWED_REDIRECT_CODES: &[i32] = &[301, 302, 307, 308];

fn slug_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"))
}

/// Lowercase ASCII slug with single dashes between words
/// DOCUMENTATION: Accented Latin letters are folded to their base letter,
/// everything else non-alphanumeric becomes a separator
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(fold_accent) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn fold_accent(ch: char) -> Vec<char> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        'ý' | 'ÿ' | 'Ý' => 'y',
        'ß' => return vec!['s', 's'],
        'æ' | 'Æ' => return vec!['a', 'e'],
        other => other,
    };
    vec![folded]
}

/// Base slug for a listing: "{name} {city}"
pub fn listing_slug(name: &str, city: &str) -> String {
    let slug = slugify(&format!("{} {}", name, city));
    if slug.is_empty() {
        "listing".to_string()
    } else {
        slug
    }
}

/// Candidate slug for the n-th attempt: base, base-2, base-3, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= 120 && slug_regex().is_match(slug)
}

/// Normalise a phone number to "+" followed by 7-15 digits
/// DOCUMENTATION: Spaces, dashes, dots and parentheses are dropped;
/// a leading "00" international prefix becomes "+"
pub fn normalize_phone(raw: &str) -> Result<String, DirectoryError> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    let has_junk = trimmed
        .chars()
        .any(|c| !(c.is_ascii_digit() || " -.()+".contains(c)));
    if has_junk {
        return Err(DirectoryError::ValidationError(format!(
            "phone number '{}' contains invalid characters",
            trimmed
        )));
    }

    let digits = digits.strip_prefix("00").map(String::from).unwrap_or(digits);

    if !(7..=15).contains(&digits.len()) {
        return Err(DirectoryError::ValidationError(format!(
            "phone number '{}' must have between 7 and 15 digits",
            trimmed
        )));
    }

    Ok(format!("+{}", digits))
}

/// Normalise an optional phone, treating blank as absent
pub fn normalize_optional_phone(raw: Option<&str>) -> Result<Option<String>, DirectoryError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(phone) => normalize_phone(phone).map(Some),
        None => Ok(None),
    }
}

pub fn categories_for(kind: ListingKind) -> &'static [&'static str] {
    match kind {
        ListingKind::Profile => PROFILE_CATEGORIES,
        ListingKind::Business => BUSINESS_CATEGORIES,
    }
}

/// Validate and lowercase a category for the given listing kind
pub fn validate_category(kind: ListingKind, category: &str) -> Result<String, DirectoryError> {
    let normalized = category.trim().to_lowercase();
    if categories_for(kind).contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(DirectoryError::ValidationError(format!(
            "unknown {} category '{}' (expected one of: {})",
            kind,
            category,
            categories_for(kind).join(", ")
        )))
    }
}

/// Absolute http(s) URL without whitespace, as accepted for photos
pub fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => !rest.is_empty() && !rest.starts_with('/') && !url.chars().any(char::is_whitespace),
        None => false,
    }
}

/// Trim a city name and collapse inner whitespace
pub fn normalize_city(city: &str) -> String {
    city.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check a redirect rule before it is stored
pub fn validate_redirect(from_path: &str, to_path: &str, status_code: i32) -> Result<(), DirectoryError> {
    if !from_path.starts_with('/') {
        return Err(DirectoryError::ValidationError(
            "from_path must start with '/'".to_string(),
        ));
    }
    if from_path.contains('?') {
        return Err(DirectoryError::ValidationError(
            "from_path must not contain a query string".to_string(),
        ));
    }
    let to_ok = to_path.starts_with('/')
        || to_path.starts_with("https://")
        || to_path.starts_with("http://");
    if !to_ok {
        return Err(DirectoryError::ValidationError(
            "to_path must be an absolute path or URL".to_string(),
        ));
    }
    if normalize_path(from_path) == normalize_path(to_path) {
        return Err(DirectoryError::ValidationError(
            "from_path and to_path must differ".to_string(),
        ));
    }
    if !ALLOWED_REDIRECT_CODES.contains(&status_code) {
        return Err(DirectoryError::ValidationError(format!(
            "status_code must be one of {:?}",
            ALLOWED_REDIRECT_CODES
        )));
    }
    Ok(())
}

/// Path key used for redirect lookups: no trailing slash except for root
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.len() > 1 {
        trimmed.trim_end_matches('/').to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  --Crème  Brûlée!! "), "creme-brulee");
        assert_eq!(slugify("Straße 42"), "strasse-42");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_listing_slug_and_candidates() {
        assert_eq!(listing_slug("Anna", "São Paulo"), "anna-sao-paulo");
        assert_eq!(listing_slug("***", ""), "listing");
        assert_eq!(slug_candidate("anna-madrid", 1), "anna-madrid");
        assert_eq!(slug_candidate("anna-madrid", 3), "anna-madrid-3");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("about-us"));
        assert!(!is_valid_slug("About Us"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("double--dash"));
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+44 (20) 7946-0958").unwrap(), "+442079460958");
        assert_eq!(normalize_phone("0034 612 345 678").unwrap(), "+34612345678");
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("call me").is_err());
        assert_eq!(normalize_optional_phone(Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(
            validate_category(ListingKind::Profile, " Massage ").unwrap(),
            "massage"
        );
        assert!(validate_category(ListingKind::Profile, "club").is_err());
        assert_eq!(validate_category(ListingKind::Business, "club").unwrap(), "club");
    }

    #[test]
    fn test_validate_redirect() {
        assert!(validate_redirect("/old", "/new", 301).is_ok());
        assert!(validate_redirect("/old", "https://other.example/new", 308).is_ok());
        assert!(validate_redirect("old", "/new", 301).is_err());
        assert!(validate_redirect("/same/", "/same", 301).is_err());
        assert!(validate_redirect("/old", "/new", 200).is_err());
        assert!(validate_redirect("/old?x=1", "/new", 301).is_err());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://cdn.example.com/a.jpg"));
        assert!(is_http_url("http://img.example.com/b.png"));
        assert!(!is_http_url("ftp://example.com/a.jpg"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("https://a.com/with space.jpg"));
        assert!(!is_http_url("javascript:alert(1)"));
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("  New   York "), "New York");
    }
}
