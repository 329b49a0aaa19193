// src/middleware/mod.rs
// DOCUMENTATION: Middleware module organization

pub mod redirects;

pub use redirects::redirects;
