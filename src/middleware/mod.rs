//! # Middleware Module
//!
//! Middleware runs before the route handlers and can short-circuit a request
//! with an error response.
//!
//! ## Our Middleware
//! - `auth::require_auth`: any caller with a valid bearer token
//! - `auth::require_admin` / `require_tutor` / `require_student`: valid token
//!   AND a stored role equal to the one the route needs

pub mod auth;
