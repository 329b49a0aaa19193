// src/models/seo.rs
// DOCUMENTATION: SEO metadata stored on every listing
// PURPOSE: Generated title/description variants and the selected variant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// One of the three generated meta-description alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeoVariant {
    #[default]
    A,
    B,
    C,
}

impl SeoVariant {
    pub const ALL: [SeoVariant; 3] = [SeoVariant::A, SeoVariant::B, SeoVariant::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeoVariant::A => "A",
            SeoVariant::B => "B",
            SeoVariant::C => "C",
        }
    }
}

impl fmt::Display for SeoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeoVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(SeoVariant::A),
            "B" => Ok(SeoVariant::B),
            "C" => Ok(SeoVariant::C),
            other => Err(format!("SEO variant must be A, B or C (got '{}')", other)),
        }
    }
}

/// SEO columns shared by the profiles and businesses tables
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct SeoFields {
    pub seo_title: Option<String>,
    pub seo_description_a: Option<String>,
    pub seo_description_b: Option<String>,
    pub seo_description_c: Option<String>,
    pub seo_keywords: Vec<String>,
    pub seo_content: Option<String>,
    /// Stored as a single letter; see [`SeoFields::variant`]
    pub seo_variant: String,
    pub seo_generated_at: Option<DateTime<Utc>>,
}

impl SeoFields {
    /// Currently selected variant; unknown values fall back to A
    pub fn variant(&self) -> SeoVariant {
        self.seo_variant.parse().unwrap_or_default()
    }

    pub fn description_for(&self, variant: SeoVariant) -> Option<&str> {
        let value = match variant {
            SeoVariant::A => &self.seo_description_a,
            SeoVariant::B => &self.seo_description_b,
            SeoVariant::C => &self.seo_description_c,
        };
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Description to display: the selected variant, else the first
    /// non-empty one in A, B, C order
    pub fn selected_description(&self) -> Option<&str> {
        self.description_for(self.variant()).or_else(|| {
            SeoVariant::ALL
                .iter()
                .find_map(|variant| self.description_for(*variant))
        })
    }
}

/// Normalised output of one LLM generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSeo {
    pub title: String,
    pub description_a: String,
    pub description_b: String,
    pub description_c: String,
    pub keywords: Vec<String>,
    pub content: String,
}

/// Request body for POST /admin/seo/{kind}/{id}/variant
#[derive(Debug, Deserialize)]
pub struct SelectVariantRequest {
    pub variant: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(a: Option<&str>, b: Option<&str>, c: Option<&str>, variant: &str) -> SeoFields {
        SeoFields {
            seo_description_a: a.map(String::from),
            seo_description_b: b.map(String::from),
            seo_description_c: c.map(String::from),
            seo_variant: variant.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_selected_variant_is_used() {
        let seo = fields(Some("first"), Some("second"), Some("third"), "B");
        assert_eq!(seo.selected_description(), Some("second"));
    }

    #[test]
    fn test_empty_variant_falls_back_in_order() {
        let seo = fields(None, Some("second"), Some("third"), "C");
        assert_eq!(seo.selected_description(), Some("third"));

        let seo = fields(Some("  "), None, Some("third"), "B");
        assert_eq!(seo.selected_description(), Some("third"));

        let seo = fields(None, None, None, "A");
        assert_eq!(seo.selected_description(), None);
    }

    #[test]
    fn test_unknown_variant_defaults_to_a() {
        let seo = fields(Some("first"), Some("second"), None, "Z");
        assert_eq!(seo.variant(), SeoVariant::A);
        assert_eq!(seo.selected_description(), Some("first"));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("b".parse::<SeoVariant>(), Ok(SeoVariant::B));
        assert!("D".parse::<SeoVariant>().is_err());
    }
}
