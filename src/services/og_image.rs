// src/services/og_image.rs
// DOCUMENTATION: Open Graph card rendering
// PURPOSE: 1200x630 SVG share image for listings, filled by string interpolation

use crate::db::{BusinessRepository, ProfileRepository};
use crate::errors::DirectoryError;
use crate::models::ListingKind;
use crate::services::branding::SiteBrand;
use crate::services::text::{ellipsize, escape_xml, title_case};
use sqlx::PgPool;

pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;
pub const MAX_NAME_CHARS: usize = 40;

/// Everything printed on the card
#[derive(Debug, Clone)]
pub struct OgCard<'a> {
    pub kind: ListingKind,
    pub name: &'a str,
    pub category: &'a str,
    pub city: &'a str,
    pub is_verified: bool,
}

pub fn render_og_svg(card: &OgCard<'_>, brand: &SiteBrand) -> String {
    let name = escape_xml(&ellipsize(card.name, MAX_NAME_CHARS));
    let subtitle = escape_xml(&format!("{} in {}", title_case(card.category), card.city.trim()));
    let site_name = escape_xml(brand.brand.site_name);
    let kind_label = match card.kind {
        ListingKind::Profile => "PROFILE",
        ListingKind::Business => "BUSINESS",
    };

    let badge = if card.is_verified {
        r##"
  <g transform="translate(80,400)">
    <rect width="200" height="56" rx="28" fill="#ffffff" fill-opacity="0.95"/>
    <text x="100" y="37" text-anchor="middle" font-family="Helvetica, Arial, sans-serif" font-size="26" font-weight="700" fill="#15803d">&#10003; Verified</text>
  </g>"##
    } else {
        ""
    };

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0%" stop-color="{primary}"/>
      <stop offset="100%" stop-color="{accent}"/>
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="url(#bg)"/>
  <text x="80" y="140" font-family="Helvetica, Arial, sans-serif" font-size="28" letter-spacing="6" fill="#ffffff" fill-opacity="0.8">{kind_label}</text>
  <text x="80" y="260" font-family="Helvetica, Arial, sans-serif" font-size="72" font-weight="700" fill="#ffffff">{name}</text>
  <text x="80" y="340" font-family="Helvetica, Arial, sans-serif" font-size="40" fill="#ffffff" fill-opacity="0.9">{subtitle}</text>{badge}
  <rect y="{footer_y}" width="{w}" height="90" fill="#000000" fill-opacity="0.25"/>
  <text x="80" y="{footer_text_y}" font-family="Helvetica, Arial, sans-serif" font-size="32" font-weight="600" fill="#ffffff">{site_name}</text>
</svg>
"##,
        w = OG_WIDTH,
        h = OG_HEIGHT,
        primary = brand.brand.primary_color,
        accent = brand.brand.accent_color,
        kind_label = kind_label,
        name = name,
        subtitle = subtitle,
        badge = badge,
        footer_y = OG_HEIGHT - 90,
        footer_text_y = OG_HEIGHT - 35,
        site_name = site_name,
    )
}

pub struct OgImageService;

impl OgImageService {
    /// Card for an approved listing; unknown or unapproved slugs are NotFound
    pub async fn render_for_slug(
        pool: &PgPool,
        brand: &SiteBrand,
        kind: ListingKind,
        slug: &str,
    ) -> Result<String, DirectoryError> {
        let svg = match kind {
            ListingKind::Profile => {
                let p = ProfileRepository::get_approved_by_slug(pool, slug).await?;
                render_og_svg(
                    &OgCard {
                        kind,
                        name: &p.name,
                        category: &p.category,
                        city: &p.city,
                        is_verified: p.is_verified,
                    },
                    brand,
                )
            }
            ListingKind::Business => {
                let b = BusinessRepository::get_approved_by_slug(pool, slug).await?;
                render_og_svg(
                    &OgCard {
                        kind,
                        name: &b.name,
                        category: &b.category,
                        city: &b.city,
                        is_verified: b.is_verified,
                    },
                    brand,
                )
            }
        };
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::branding::brand_for_host;

    fn card(name: &str, verified: bool) -> OgCard<'_> {
        OgCard {
            kind: ListingKind::Business,
            name,
            category: "massage-parlour",
            city: "Lisbon",
            is_verified: verified,
        }
    }

    #[test]
    fn test_svg_dimensions_and_text() {
        let brand = brand_for_host(None, "https://example.test");
        let svg = render_og_svg(&card("Blue Lotus", true), &brand);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="1200" height="630""#));
        assert!(svg.contains(">Blue Lotus</text>"));
        assert!(svg.contains("Massage Parlour in Lisbon"));
        assert!(svg.contains("Verified"));
        assert!(svg.contains(brand.brand.primary_color));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_unverified_has_no_badge() {
        let brand = brand_for_host(None, "https://example.test");
        let svg = render_og_svg(&card("Blue Lotus", false), &brand);
        assert!(!svg.contains("Verified"));
    }

    #[test]
    fn test_name_is_escaped_and_truncated() {
        let brand = brand_for_host(None, "https://example.test");
        let long_name = format!("<script>{}", "x".repeat(60));
        let svg = render_og_svg(&card(&long_name, false), &brand);

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
        assert!(svg.contains("…</text>"));
    }
}
