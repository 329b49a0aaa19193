// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod business;
pub mod content;
pub mod listing;
pub mod page;
pub mod photo;
pub mod profile;
pub mod redirect;
pub mod review;
pub mod seo;
pub mod user;

pub use business::*;
pub use content::*;
pub use listing::*;
pub use page::*;
pub use photo::*;
pub use profile::*;
pub use redirect::*;
pub use review::*;
pub use seo::*;
pub use user::*;
