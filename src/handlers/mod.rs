// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configuration and share request helpers

pub mod admin;
pub mod auth;
pub mod businesses;
pub mod health;
pub mod pages;
pub mod profiles;
pub mod seo_assets;

pub use admin::config as admin_config;
pub use auth::config as auth_config;
pub use businesses::config as businesses_config;
pub use health::config as health_config;
pub use pages::config as pages_config;
pub use profiles::config as profiles_config;
pub use seo_assets::config as seo_assets_config;

use crate::config::Config;
use crate::services::{brand_for_host, SiteBrand};
use actix_web::HttpRequest;

/// Brand for the Host the request was made to
pub fn site_brand(req: &HttpRequest, config: &Config) -> SiteBrand {
    let info = req.connection_info();
    brand_for_host(Some(info.host()), &config.site_base_url)
}
