// src/services/branding.rs
// DOCUMENTATION: Per-domain site branding
// PURPOSE: One deployment serves several domains; the Host header picks the brand

use serde::Serialize;

/// Static brand definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brand {
    pub domain: &'static str,
    pub site_name: &'static str,
    pub tagline: &'static str,
    pub primary_color: &'static str,
    pub accent_color: &'static str,
    pub default_city: &'static str,
    pub country: &'static str,
}

pub const DEFAULT_BRAND: Brand = Brand {
    domain: "",
    site_name: "City Listings",
    tagline: "Verified local listings",
    primary_color: "#7c3aed",
    accent_color: "#f472b6",
    default_city: "Madrid",
    country: "ES",
};

const BRANDS: &[Brand] = &[
    Brand {
        domain: "madridlistings.es",
        site_name: "Madrid Listings",
        tagline: "Verified listings in Madrid",
        primary_color: "#b91c1c",
        accent_color: "#f59e0b",
        default_city: "Madrid",
        country: "ES",
    },
    Brand {
        domain: "barcelonalistings.es",
        site_name: "Barcelona Listings",
        tagline: "Verified listings in Barcelona",
        primary_color: "#1d4ed8",
        accent_color: "#facc15",
        default_city: "Barcelona",
        country: "ES",
    },
    Brand {
        domain: "londonlistings.co.uk",
        site_name: "London Listings",
        tagline: "Verified listings across London",
        primary_color: "#0f172a",
        accent_color: "#e11d48",
        default_city: "London",
        country: "GB",
    },
    Brand {
        domain: "berlinlistings.de",
        site_name: "Berlin Listings",
        tagline: "Geprüfte Einträge in Berlin",
        primary_color: "#111827",
        accent_color: "#22c55e",
        default_city: "Berlin",
        country: "DE",
    },
];

/// Brand chosen for a request together with its public base URL
#[derive(Debug, Clone, Serialize)]
pub struct SiteBrand {
    #[serde(flatten)]
    pub brand: Brand,
    /// Scheme and host, no trailing slash
    pub base_url: String,
}

impl SiteBrand {
    /// Absolute URL for a site path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Lowercase, drop the port and a leading "www."
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    let host = host.split(':').next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Look up the brand for a Host header value
/// DOCUMENTATION: Exact domain match first, then subdomain suffix match
/// (e.g. "m.madridlistings.es"); anything else gets the default brand
/// served from `default_base_url`
pub fn brand_for_host(host: Option<&str>, default_base_url: &str) -> SiteBrand {
    let host = host.map(normalize_host).unwrap_or_default();

    let matched = BRANDS
        .iter()
        .find(|brand| brand.domain == host)
        .or_else(|| {
            BRANDS
                .iter()
                .find(|brand| host.ends_with(&format!(".{}", brand.domain)))
        });

    match matched {
        Some(brand) => SiteBrand {
            brand: brand.clone(),
            base_url: format!("https://{}", brand.domain),
        },
        None => SiteBrand {
            brand: DEFAULT_BRAND,
            base_url: default_base_url.trim_end_matches('/').to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("WWW.MadridListings.es:443"), "madridlistings.es");
        assert_eq!(normalize_host("localhost:8080"), "localhost");
    }

    #[test]
    fn test_exact_match() {
        let brand = brand_for_host(Some("www.londonlistings.co.uk"), "http://localhost:8080");
        assert_eq!(brand.brand.site_name, "London Listings");
        assert_eq!(brand.base_url, "https://londonlistings.co.uk");
        assert_eq!(brand.url("/cities"), "https://londonlistings.co.uk/cities");
    }

    #[test]
    fn test_subdomain_match() {
        let brand = brand_for_host(Some("m.berlinlistings.de"), "http://localhost:8080");
        assert_eq!(brand.brand.default_city, "Berlin");
    }

    #[test]
    fn test_lookalike_domain_is_not_matched() {
        let brand = brand_for_host(Some("evilberlinlistings.de"), "http://localhost:8080/");
        assert_eq!(brand.brand, DEFAULT_BRAND);
        assert_eq!(brand.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_host_uses_default() {
        let brand = brand_for_host(None, "https://example.test");
        assert_eq!(brand.brand.site_name, DEFAULT_BRAND.site_name);
        assert_eq!(brand.url("robots.txt"), "https://example.test/robots.txt");
    }
}
