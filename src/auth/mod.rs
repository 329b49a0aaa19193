// src/auth/mod.rs
// DOCUMENTATION: Authentication module organization
// PURPOSE: Password hashing, session tokens and request extractors

pub mod extractors;
pub mod jwt;
pub mod password;

pub use extractors::{AdminUser, AuthUser, ADMIN_TOKEN_HEADER};
pub use jwt::{clear_session_cookie, issue_token, session_cookie};
pub use password::{hash_password, verify_password};
