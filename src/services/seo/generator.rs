// src/services/seo/generator.rs
// DOCUMENTATION: SEO metadata generation pipeline
// PURPOSE: Prompt -> LLM call -> JSON extraction -> normalisation -> database write

use super::keywords::keywords_for;
use super::llm_client::LlmClient;
use super::prompt::{build_prompt, ListingFacts};
use crate::db::{BusinessRepository, ProfileRepository, SeoRepository};
use crate::errors::DirectoryError;
use crate::models::{GeneratedSeo, ListingKind};
use crate::services::text::{title_case, truncate_words};
use chrono::Utc;
use futures::future::join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 60;
pub const MAX_DESCRIPTION_CHARS: usize = 160;
pub const MAX_KEYWORDS: usize = 12;

/// Listings generated concurrently per batch chunk
pub const BATCH_CHUNK_SIZE: usize = 5;
/// Pause between batch chunks
pub const BATCH_CHUNK_DELAY: Duration = Duration::from_secs(2);

/// JSON object as the model returns it, before normalisation
#[derive(Debug, Default, Deserialize)]
pub struct RawSeoReply {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description_a: String,
    #[serde(default)]
    pub description_b: String,
    #[serde(default)]
    pub description_c: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub content: String,
}

/// Result of a batch regeneration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoBatchStats {
    pub kind: ListingKind,
    pub requested: u32,
    pub generated: u32,
    pub failed: u32,
    pub errors: Vec<String>,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl SeoBatchStats {
    pub fn new(kind: ListingKind, requested: usize) -> Self {
        Self {
            kind,
            requested: requested as u32,
            generated: 0,
            failed: 0,
            errors: Vec::new(),
            duration_seconds: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    pub fn record(&mut self, id: Uuid, result: Result<GeneratedSeo, DirectoryError>) {
        match result {
            Ok(_) => self.generated += 1,
            Err(e) => {
                self.failed += 1;
                self.errors.push(format!("{}: {}", id, e));
            }
        }
    }

    pub fn complete(&mut self, duration: u64) {
        self.duration_seconds = duration;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

fn json_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid JSON object regex"))
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*```[A-Za-z]*\s*$").expect("valid fence regex"))
}

/// Pull the JSON object out of a free-text model reply
/// DOCUMENTATION: Markdown fences are removed, then the span from the first
/// '{' to the last '}' is parsed
pub fn extract_json(reply: &str) -> Result<RawSeoReply, DirectoryError> {
    let unfenced = fence_regex().replace_all(reply, "");

    let span = json_object_regex()
        .find(&unfenced)
        .ok_or_else(|| {
            log::warn!("No JSON object in LLM reply ({} chars)", reply.len());
            DirectoryError::ExternalApiError("no JSON object in LLM reply".to_string())
        })?
        .as_str();

    serde_json::from_str::<RawSeoReply>(span).map_err(|e| {
        log::warn!("Malformed JSON in LLM reply: {}", e);
        DirectoryError::ExternalApiError(format!("malformed JSON in LLM reply: {}", e))
    })
}

/// Apply length limits and keyword rules to a raw reply
/// DOCUMENTATION: Empty title or descriptions are filled from templates so
/// every stored row is usable as-is
pub fn normalize(raw: RawSeoReply, facts: &ListingFacts) -> GeneratedSeo {
    let category = title_case(&facts.category);
    let city = facts.city.trim();

    let title = match raw.title.trim() {
        "" => format!("{} | {} in {}", facts.name.trim(), category, city),
        title => title.to_string(),
    };

    let fallback_description = format!("{}, {} in {}.", facts.name.trim(), category, city);
    let description = |value: &str| {
        let value = if value.trim().is_empty() {
            fallback_description.as_str()
        } else {
            value
        };
        truncate_words(value, MAX_DESCRIPTION_CHARS)
    };

    let mut keywords = normalize_keywords(raw.keywords);
    if keywords.is_empty() {
        keywords = normalize_keywords(keywords_for(facts.kind, &facts.category, city));
    }

    GeneratedSeo {
        title: truncate_words(&title, MAX_TITLE_CHARS),
        description_a: description(&raw.description_a),
        description_b: description(&raw.description_b),
        description_c: description(&raw.description_c),
        keywords,
        content: raw.content.trim().to_string(),
    }
}

/// Trim, drop blanks, dedupe case-insensitively and cap the list
pub fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// SEO generation service
pub struct SeoService;

impl SeoService {
    async fn load_facts(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
    ) -> Result<ListingFacts, DirectoryError> {
        Ok(match kind {
            ListingKind::Profile => ListingFacts::from(&ProfileRepository::get_by_id(pool, id).await?),
            ListingKind::Business => {
                ListingFacts::from(&BusinessRepository::get_by_id(pool, id).await?)
            }
        })
    }

    /// Generate and store SEO metadata for one listing
    pub async fn generate(
        pool: &PgPool,
        llm: &LlmClient,
        kind: ListingKind,
        id: Uuid,
    ) -> Result<GeneratedSeo, DirectoryError> {
        let facts = Self::load_facts(pool, kind, id).await?;
        let seed_keywords = keywords_for(kind, &facts.category, &facts.city);
        let prompt = build_prompt(&facts, &seed_keywords);

        log::info!("Generating SEO metadata for {} {} ({})", kind, id, facts.name);

        let reply = llm.generate(&prompt).await?;
        let seo = normalize(extract_json(&reply)?, &facts);

        SeoRepository::save_generated(pool, kind, id, &seo).await?;
        Ok(seo)
    }

    /// Regenerate a set of listings in parallel chunks
    /// DOCUMENTATION: When `ids` is None every listing of the kind is
    /// eligible, optionally only those never generated. Failures are
    /// recorded in the stats and do not stop the run
    pub async fn regenerate_batch(
        pool: &PgPool,
        llm: &LlmClient,
        kind: ListingKind,
        ids: Option<Vec<Uuid>>,
        only_missing: bool,
    ) -> Result<SeoBatchStats, DirectoryError> {
        let start_time = Instant::now();
        let ids = match ids {
            Some(ids) => ids,
            None => SeoRepository::ids_for_generation(pool, kind, only_missing).await?,
        };

        let mut stats = SeoBatchStats::new(kind, ids.len());
        log::info!("Starting SEO batch for {} {} listings", ids.len(), kind);

        let chunk_count = ids.len().div_ceil(BATCH_CHUNK_SIZE);
        for (idx, chunk) in ids.chunks(BATCH_CHUNK_SIZE).enumerate() {
            let results = join_all(
                chunk
                    .iter()
                    .map(|id| Self::generate(pool, llm, kind, *id)),
            )
            .await;

            for (id, result) in chunk.iter().zip(results) {
                if let Err(e) = &result {
                    log::warn!("SEO generation failed for {} {}: {}", kind, id, e);
                }
                stats.record(*id, result);
            }

            log::info!(
                "SEO batch chunk {}/{} done ({} generated, {} failed)",
                idx + 1,
                chunk_count,
                stats.generated,
                stats.failed
            );

            if idx + 1 < chunk_count {
                tokio::time::sleep(BATCH_CHUNK_DELAY).await;
            }
        }

        stats.complete(start_time.elapsed().as_secs());
        log::info!(
            "SEO batch for {} finished: {} generated, {} failed in {}s",
            kind,
            stats.generated,
            stats.failed,
            stats.duration_seconds
        );
        Ok(stats)
    }

    /// Fire-and-forget generation after a listing is created
    pub fn spawn_generation(pool: PgPool, llm: LlmClient, kind: ListingKind, id: Uuid) {
        if !llm.is_configured() {
            log::debug!("Skipping SEO generation for {} {}: no LLM key", kind, id);
            return;
        }

        tokio::spawn(async move {
            match Self::generate(&pool, &llm, kind, id).await {
                Ok(seo) => log::info!("Background SEO ready for {} {}: {}", kind, id, seo.title),
                Err(e) => log::error!("Background SEO failed for {} {}: {}", kind, id, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> ListingFacts {
        ListingFacts {
            kind: ListingKind::Profile,
            name: "Anna".to_string(),
            category: "companion".to_string(),
            city: "Madrid".to_string(),
            region: None,
            description: None,
            services: vec![],
            address: None,
            is_verified: false,
        }
    }

    #[test]
    fn test_extract_json_from_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"title\": \"Anna in Madrid\", \"keywords\": [\"a\"]}\n```\nEnjoy!";
        let raw = extract_json(reply).unwrap();
        assert_eq!(raw.title, "Anna in Madrid");
        assert_eq!(raw.keywords, vec!["a"]);
        assert!(raw.description_b.is_empty());
    }

    #[test]
    fn test_extract_json_handles_nested_braces() {
        let reply = r#"{"title": "T", "content": "<p>{braces}</p>"} trailing"#;
        let raw = extract_json(reply).unwrap();
        assert_eq!(raw.content, "<p>{braces}</p>");
    }

    #[test]
    fn test_extract_json_errors() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(DirectoryError::ExternalApiError(_))
        ));
        assert!(matches!(
            extract_json("{not json}"),
            Err(DirectoryError::ExternalApiError(_))
        ));
    }

    #[test]
    fn test_normalize_limits_lengths() {
        let raw = RawSeoReply {
            title: "word ".repeat(30),
            description_a: "long ".repeat(60),
            description_b: "Short one.".to_string(),
            description_c: String::new(),
            keywords: vec![],
            content: "  <p>Hi</p> ".to_string(),
        };
        let seo = normalize(raw, &facts());

        assert!(seo.title.chars().count() <= MAX_TITLE_CHARS);
        assert!(seo.description_a.chars().count() <= MAX_DESCRIPTION_CHARS);
        assert!(!seo.description_a.ends_with(' '));
        assert_eq!(seo.description_b, "Short one.");
        assert_eq!(seo.description_c, "Anna, Companion in Madrid.");
        assert_eq!(seo.content, "<p>Hi</p>");
        assert_eq!(seo.keywords[0], "companion madrid");
    }

    #[test]
    fn test_empty_title_is_templated() {
        let seo = normalize(RawSeoReply::default(), &facts());
        assert_eq!(seo.title, "Anna | Companion in Madrid");
    }

    #[test]
    fn test_normalize_keywords() {
        let mut input: Vec<String> = vec![
            " Escort  Madrid ".to_string(),
            "escort madrid".to_string(),
            "".to_string(),
        ];
        input.extend((0..20).map(|i| format!("kw {}", i)));

        let keywords = normalize_keywords(input);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[0], "Escort Madrid");
        assert_eq!(keywords[1], "kw 0");
    }

    #[test]
    fn test_batch_stats() {
        let mut stats = SeoBatchStats::new(ListingKind::Business, 2);
        stats.record(Uuid::new_v4(), Err(DirectoryError::RateLimitExceeded));
        stats.complete(3);

        assert_eq!(stats.requested, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors.len(), 1);
        assert!(stats.completed_at.is_some());
    }
}
