// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin_service;
pub mod auth_service;
pub mod branding;
pub mod business_service;
pub mod cache;
pub mod content_service;
pub mod import_service;
pub mod listing_service;
pub mod og_image;
pub mod page_meta;
pub mod profile_service;
pub mod redirect_service;
pub mod schema_markup;
pub mod seo;
pub mod sitemap;
pub mod text;
pub mod validation;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use branding::{brand_for_host, SiteBrand};
pub use business_service::BusinessService;
pub use cache::{start_cleanup_task, RedirectCache};
pub use content_service::ContentService;
pub use import_service::ImportService;
pub use listing_service::ListingService;
pub use og_image::OgImageService;
pub use profile_service::ProfileService;
pub use redirect_service::RedirectService;
pub use seo::{LlmClient, SeoService};
pub use sitemap::SitemapService;
