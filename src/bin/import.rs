// src/bin/import.rs
// DOCUMENTATION: Bulk importer for scraped listings
// PURPOSE: Merge scraped JSON files and push them to /admin/import/{kind}
//
// Usage: import <profiles|businesses> <file.json>...
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

const BATCH_SIZE: usize = 25;
const BATCH_PAUSE: Duration = Duration::from_millis(500);
const DEFAULT_SOURCE: &str = "import";

type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Profiles,
    Businesses,
}

impl Kind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "profiles" => Some(Kind::Profiles),
            "businesses" => Some(Kind::Businesses),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Kind::Profiles => "profiles",
            Kind::Businesses => "businesses",
        }
    }
}

/// Body returned by the import endpoint
#[derive(Deserialize, Debug, Default)]
struct ImportResponse {
    #[serde(default)]
    received: u32,
    #[serde(default)]
    created: u32,
    #[serde(default)]
    updated: u32,
    #[serde(default)]
    failed: u32,
    #[serde(default)]
    photos_added: u32,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug)]
struct BatchResult {
    index: usize,
    records: usize,
    success: bool,
    response: ImportResponse,
    duration_secs: f64,
}

// --- Merging ---

fn text_field<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}

fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Ids may be scraped as JSON numbers; they are keyed and sent as strings
fn id_field(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// (source, source_id) when both are present, otherwise name + city
fn dedupe_key(record: &Record) -> String {
    let source = id_field(record, "source");
    let source_id = id_field(record, "source_id");
    if !source.is_empty() && !source_id.is_empty() {
        return format!("id:{}:{}", source, source_id);
    }
    format!(
        "name:{}|{}",
        normalize_text(text_field(record, "name")),
        normalize_text(text_field(record, "city"))
    )
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Fill empty fields of `existing` from `later`; photos are unioned
fn merge_into(existing: &mut Record, later: Record) {
    for (key, value) in later {
        if key == "photos" {
            let mut photos: Vec<Value> = existing
                .get("photos")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let mut seen: HashSet<String> = photos
                .iter()
                .filter_map(|p| p.as_str().map(|s| s.trim().to_string()))
                .collect();
            for photo in value.as_array().into_iter().flatten() {
                if let Some(url) = photo.as_str().map(str::trim) {
                    if !url.is_empty() && seen.insert(url.to_string()) {
                        photos.push(Value::String(url.to_string()));
                    }
                }
            }
            existing.insert(key, Value::Array(photos));
            continue;
        }

        let missing = existing.get(&key).map_or(true, is_empty_value);
        if missing && !is_empty_value(&value) {
            existing.insert(key, value);
        }
    }
}

/// Records without a stable id get one derived from name and city
fn ensure_source(record: &mut Record) {
    let source = id_field(record, "source");
    let source = if source.is_empty() { DEFAULT_SOURCE.to_string() } else { source };
    record.insert("source".to_string(), Value::String(source));

    let source_id = id_field(record, "source_id");
    if !source_id.is_empty() {
        record.insert("source_id".to_string(), Value::String(source_id));
    } else {
        let derived = format!(
            "{}|{}",
            normalize_text(text_field(record, "name")),
            normalize_text(text_field(record, "city"))
        );
        record.insert("source_id".to_string(), Value::String(derived));
    }
}

/// Merge every file into one list, keeping first-seen order
fn merge_records(files: Vec<Vec<Record>>) -> Vec<Record> {
    let mut merged: Vec<Record> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in files.into_iter().flatten() {
        let key = dedupe_key(&record);
        match index.get(&key) {
            Some(&pos) => merge_into(&mut merged[pos], record),
            None => {
                index.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    merged.iter_mut().for_each(ensure_source);
    merged
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let values: Vec<Value> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect())
}

/// "scrape/madrid.json" -> "scrape/madrid.merged.json"
fn merged_path(first: &Path) -> PathBuf {
    let stem = first
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import".to_string());
    first.with_file_name(format!("{}.merged.json", stem))
}

fn write_merged(path: &Path, records: &[Record]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// --- Upload ---

struct ImportManager {
    base_url: String,
    admin_token: String,
    client: Client,
    results: Vec<BatchResult>,
}

impl ImportManager {
    fn new(base_url: String, admin_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token,
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn send_batch(&self, kind: Kind, batch: &[Record]) -> Result<ImportResponse, String> {
        let url = format!("{}/admin/import/{}", self.base_url, kind.as_str());

        let response = self
            .client
            .post(&url)
            .header("X-Admin-Token", &self.admin_token)
            .json(batch)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response
                .json::<ImportResponse>()
                .await
                .map_err(|e| format!("Failed to parse response JSON: {}", e))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(format!("HTTP {} - {}", status, body))
        }
    }

    async fn run(&mut self, kind: Kind, records: &[Record]) {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable at {}{}", RED, self.base_url, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let total_batches = records.len().div_ceil(BATCH_SIZE);
        println!(
            "{}🚀 Importing {} {} in {} batches...{}\n",
            BOLD,
            records.len(),
            kind.as_str(),
            total_batches,
            RESET
        );

        for (i, batch) in records.chunks(BATCH_SIZE).enumerate() {
            let start_time = Instant::now();
            let outcome = self.send_batch(kind, batch).await;
            let duration = start_time.elapsed().as_secs_f64();

            match outcome {
                Ok(resp) => {
                    println!(
                        "{}[{}/{}] ✅ {} created, {} updated, {} failed ({:.1}s){}",
                        GREEN,
                        i + 1,
                        total_batches,
                        resp.created,
                        resp.updated,
                        resp.failed,
                        duration,
                        RESET
                    );
                    if !resp.errors.is_empty() {
                        println!("{}⚠️  {}{}", YELLOW, resp.errors.join("; "), RESET);
                    }
                    self.results.push(BatchResult {
                        index: i + 1,
                        records: batch.len(),
                        success: true,
                        response: resp,
                        duration_secs: duration,
                    });
                }
                Err(err_msg) => {
                    println!(
                        "{}[{}/{}] ❌ Batch failed: {}{}",
                        RED,
                        i + 1,
                        total_batches,
                        err_msg,
                        RESET
                    );
                    self.results.push(BatchResult {
                        index: i + 1,
                        records: batch.len(),
                        success: false,
                        response: ImportResponse::default(),
                        duration_secs: duration,
                    });
                }
            }

            if i + 1 < total_batches {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
        }

        self.print_summary(kind);
    }

    fn print_summary(&self, kind: Kind) {
        println!("\n\n{}📋 Import Summary ({}){}", BOLD, kind.as_str(), RESET);
        println!("──────────────────────────────────────────────────────────────");
        println!(
            "{:<8} {:<8} {:>8} {:>8} {:>8} {:>10}",
            "Batch", "Status", "Created", "Updated", "Failed", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────");

        let mut totals = ImportResponse::default();
        let mut failed_batches = 0;
        let mut lost_records = 0;

        for res in &self.results {
            let status_icon = if res.success { "✅" } else { "❌" };
            println!(
                "{:<8} {:<8} {:>8} {:>8} {:>8} {:>9.1}s",
                res.index,
                status_icon,
                res.response.created,
                res.response.updated,
                res.response.failed,
                res.duration_secs
            );

            if res.success {
                totals.received += res.response.received;
                totals.created += res.response.created;
                totals.updated += res.response.updated;
                totals.failed += res.response.failed;
                totals.photos_added += res.response.photos_added;
            } else {
                failed_batches += 1;
                lost_records += res.records;
            }
        }

        println!("──────────────────────────────────────────────────────────────");
        println!("{}📊 Totals:{}", BOLD, RESET);
        println!("  • Received: {}", totals.received);
        println!("  • Created: {}{}{}", GREEN, totals.created, RESET);
        println!("  • Updated: {}{}{}", BLUE, totals.updated, RESET);
        println!("  • Failed records: {}{}{}", YELLOW, totals.failed, RESET);
        println!("  • Photos added: {}", totals.photos_added);
        if failed_batches > 0 {
            println!(
                "{}  • Failed batches: {} ({} records not sent){}",
                RED, failed_batches, lost_records, RESET
            );
        }
    }
}

fn usage() -> ! {
    eprintln!("Usage: import <profiles|businesses> <file.json>...");
    process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((kind_arg, files)) = args.split_first() else {
        usage();
    };
    let Some(kind) = Kind::parse(kind_arg) else {
        usage();
    };
    if files.is_empty() {
        usage();
    }

    let admin_token = env::var("ADMIN_TOKEN").context("ADMIN_TOKEN must be set")?;
    let base_url =
        env::var("DIRECTORY_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let mut loaded = Vec::with_capacity(paths.len());
    let mut read_total = 0;
    for path in &paths {
        let records = read_records(path)?;
        println!("{}📄 {}: {} records{}", CYAN, path.display(), records.len(), RESET);
        read_total += records.len();
        loaded.push(records);
    }

    let merged = merge_records(loaded);
    if merged.is_empty() {
        bail!("no records found in {} file(s)", paths.len());
    }

    let out = merged_path(&paths[0]);
    write_merged(&out, &merged)?;
    println!(
        "{}🧩 Merged {} records into {} ({}){}",
        BOLD,
        read_total,
        merged.len(),
        out.display(),
        RESET
    );

    let mut manager = ImportManager::new(base_url, admin_token)?;
    manager.run(kind, &merged).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_merge_by_source_id_fills_empty_fields() {
        let first = vec![record(json!({
            "source": "siteA", "source_id": "1", "name": "Anna", "city": "Madrid",
            "phone": "", "photos": ["https://cdn/1.jpg"]
        }))];
        let second = vec![record(json!({
            "source": "siteA", "source_id": "1", "name": "Anna M.", "city": "Madrid",
            "phone": "+34600000000", "photos": ["https://cdn/1.jpg", "https://cdn/2.jpg"]
        }))];

        let merged = merge_records(vec![first, second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["name"], "Anna");
        assert_eq!(merged[0]["phone"], "+34600000000");
        assert_eq!(merged[0]["photos"], json!(["https://cdn/1.jpg", "https://cdn/2.jpg"]));
    }

    #[test]
    fn test_merge_falls_back_to_name_and_city() {
        let files = vec![
            vec![record(json!({"source": "siteA", "name": "Club  Nine", "city": "Berlin"}))],
            vec![record(json!({"source": "siteB", "name": "club nine", "city": "BERLIN", "address": "Main 1"}))],
            vec![record(json!({"source": "siteB", "name": "Club Nine", "city": "Hamburg"}))],
        ];

        let merged = merge_records(files);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0]["address"], "Main 1");
        assert_eq!(merged[0]["source_id"], "club nine|berlin");
        assert_eq!(merged[1]["city"], "Hamburg");
    }

    #[test]
    fn test_numeric_source_id_is_kept_as_key() {
        let files = vec![
            vec![record(json!({"source": "siteA", "source_id": 42, "name": "Anna", "city": "Madrid"}))],
            vec![record(json!({"source": "siteA", "source_id": "42", "name": "Anna R.", "city": "Toledo", "phone": "+34600000000"}))],
        ];

        let merged = merge_records(files);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["source_id"], "42");
        assert_eq!(merged[0]["phone"], "+34600000000");
    }

    #[test]
    fn test_missing_source_gets_default() {
        let merged = merge_records(vec![vec![record(json!({"name": "Lara", "city": "Rome"}))]]);
        assert_eq!(merged[0]["source"], DEFAULT_SOURCE);
    }

    #[test]
    fn test_read_and_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("madrid.json");
        let mut file = fs::File::create(&input).unwrap();
        write!(
            file,
            r#"[{{"source": "s", "source_id": "1", "name": "A", "city": "Madrid"}}, 42]"#
        )
        .unwrap();

        let records = read_records(&input).unwrap();
        assert_eq!(records.len(), 1);

        let out = merged_path(&input);
        assert_eq!(out, dir.path().join("madrid.merged.json"));

        write_merged(&out, &records).unwrap();
        let reread = read_records(&out).unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(Kind::parse("profiles"), Some(Kind::Profiles));
        assert_eq!(Kind::parse("places"), None);
        assert_eq!(Kind::Businesses.as_str(), "businesses");
    }
}
