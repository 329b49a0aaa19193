// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database and caches, then start the HTTP server

mod auth;
mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;

use actix_web::middleware::{from_fn, Compress, Logger};
use actix_web::{web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, LlmClient, RedirectCache};
use std::io;
use std::sync::Arc;

/// Expired redirect cache entries are purged this often
const CACHE_CLEANUP_INTERVAL_SECS: u64 = 60;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting listings-directory service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool and schema
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config::run_migrations(&pool).await {
        log::error!("Failed to apply migrations: {}", e);
        std::process::exit(1);
    }

    // 5. Redirect lookup cache
    let redirect_cache = Arc::new(RedirectCache::new(config.redirect_cache_ttl_secs));
    start_cleanup_task(redirect_cache.clone(), CACHE_CLEANUP_INTERVAL_SECS);
    log::info!(
        "Initialized redirect cache (TTL: {}s, cleanup every {}s)",
        config.redirect_cache_ttl_secs,
        CACHE_CLEANUP_INTERVAL_SECS
    );

    // 6. LLM client for SEO generation
    let llm = LlmClient::from_config(&config);
    if llm.is_configured() {
        log::info!(
            "SEO generation enabled (model: {}, {} requests/min)",
            llm.model(),
            config.llm_requests_per_minute
        );
    }

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_data = web::Data::new(config);
    let pool_data = web::Data::new(pool);
    let cache_data = web::Data::new(redirect_cache);
    let llm_data = web::Data::new(llm);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(cache_data.clone())
            .app_data(llm_data.clone())
            // Middleware; the last wrap runs first
            .wrap(from_fn(middleware::redirects))
            .wrap(Compress::default())
            .wrap(Logger::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::profiles_config)
            .configure(handlers::businesses_config)
            .configure(handlers::pages_config)
            .configure(handlers::seo_assets_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
