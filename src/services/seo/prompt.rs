// src/services/seo/prompt.rs
// DOCUMENTATION: Prompt construction for SEO generation
// PURPOSE: Turn listing facts and keyword phrases into a single text prompt

use crate::models::{Business, ListingKind, Profile};
use crate::services::text::title_case;
use std::fmt::Write;

const INSTRUCTIONS: &str = "You write search-engine metadata for a local directory website.
Write in English, in a neutral and factual tone. Never invent facts that are not listed below.
Never include explicit content, prices or contact details in the metadata.

Respond with a single JSON object and nothing else, using exactly these keys:
  \"title\": page title, at most 60 characters, including the city
  \"description_a\": meta description, at most 160 characters, factual
  \"description_b\": meta description, at most 160 characters, benefit-led
  \"description_c\": meta description, at most 160 characters, with a call to action
  \"keywords\": array of 5 to 12 short search phrases
  \"content\": two short paragraphs of introductory HTML using only <p> tags";

/// Listing fields the prompt is built from
#[derive(Debug, Clone)]
pub struct ListingFacts {
    pub kind: ListingKind,
    pub name: String,
    pub category: String,
    pub city: String,
    pub region: Option<String>,
    pub description: Option<String>,
    pub services: Vec<String>,
    pub address: Option<String>,
    pub is_verified: bool,
}

impl From<&Profile> for ListingFacts {
    fn from(profile: &Profile) -> Self {
        Self {
            kind: ListingKind::Profile,
            name: profile.name.clone(),
            category: profile.category.clone(),
            city: profile.city.clone(),
            region: profile.region.clone(),
            description: profile.description.clone(),
            services: profile.services.clone(),
            address: None,
            is_verified: profile.is_verified,
        }
    }
}

impl From<&Business> for ListingFacts {
    fn from(business: &Business) -> Self {
        Self {
            kind: ListingKind::Business,
            name: business.name.clone(),
            category: business.category.clone(),
            city: business.city.clone(),
            region: business.region.clone(),
            description: business.description.clone(),
            services: Vec::new(),
            address: business.address.clone(),
            is_verified: business.is_verified,
        }
    }
}

const MAX_DESCRIPTION_CHARS: usize = 1200;

/// Build the generation prompt
pub fn build_prompt(facts: &ListingFacts, keywords: &[String]) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nListing:\n");

    let kind_label = match facts.kind {
        ListingKind::Profile => "Profile",
        ListingKind::Business => "Business",
    };

    // Writing to a String cannot fail
    let _ = writeln!(prompt, "- Type: {}", kind_label);
    let _ = writeln!(prompt, "- Name: {}", facts.name.trim());
    let _ = writeln!(prompt, "- Category: {}", title_case(&facts.category));
    let _ = writeln!(prompt, "- City: {}", facts.city.trim());
    if let Some(region) = non_empty(&facts.region) {
        let _ = writeln!(prompt, "- Region: {}", region);
    }
    if let Some(address) = non_empty(&facts.address) {
        let _ = writeln!(prompt, "- Address: {}", address);
    }
    if !facts.services.is_empty() {
        let _ = writeln!(prompt, "- Services: {}", facts.services.join(", "));
    }
    let _ = writeln!(
        prompt,
        "- Verified: {}",
        if facts.is_verified { "yes" } else { "no" }
    );
    if let Some(description) = non_empty(&facts.description) {
        let description: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        let _ = writeln!(prompt, "- Description: {}", description);
    }

    if !keywords.is_empty() {
        prompt.push_str("\nTarget keywords:\n");
        for keyword in keywords {
            let _ = writeln!(prompt, "- {}", keyword);
        }
    }

    prompt
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> ListingFacts {
        ListingFacts {
            kind: ListingKind::Business,
            name: "Blue Lotus".to_string(),
            category: "massage-parlour".to_string(),
            city: "Lisbon".to_string(),
            region: Some("  ".to_string()),
            description: Some("Quiet studio near the river.".to_string()),
            services: Vec::new(),
            address: Some("Rua Augusta 1".to_string()),
            is_verified: true,
        }
    }

    #[test]
    fn test_prompt_lists_facts_and_keywords() {
        let prompt = build_prompt(&facts(), &["massage parlour lisbon".to_string()]);

        assert!(prompt.contains("- Name: Blue Lotus"));
        assert!(prompt.contains("- Category: Massage Parlour"));
        assert!(prompt.contains("- Address: Rua Augusta 1"));
        assert!(prompt.contains("- Verified: yes"));
        assert!(prompt.contains("Target keywords:\n- massage parlour lisbon"));
        assert!(!prompt.contains("- Region:"));
    }

    #[test]
    fn test_prompt_requests_every_json_key() {
        let prompt = build_prompt(&facts(), &[]);
        for key in [
            "\"title\"",
            "\"description_a\"",
            "\"description_b\"",
            "\"description_c\"",
            "\"keywords\"",
            "\"content\"",
        ] {
            assert!(prompt.contains(key), "missing {}", key);
        }
        assert!(!prompt.contains("Target keywords"));
    }

    #[test]
    fn test_long_description_is_capped() {
        let mut facts = facts();
        facts.description = Some("x".repeat(5000));
        let prompt = build_prompt(&facts, &[]);
        assert!(prompt.len() < 5000);
    }
}
