//! # HTTP Request Handlers
//!
//! One submodule per resource:
//! - `health`: Liveness endpoints
//! - `auth`: Token issuing and logout
//! - `users`: Sign-up, lookups, role management
//! - `sessions`: Session proposals and the admin approval workflow
//! - `bookings`: Student bookings
//! - `materials`: Tutor materials
//! - `notes`: Student notes
//! - `types`: JSON request bodies
//!
//! ## Handler Pattern
//! 1. Extract data from the request (state, path, JSON body, verified `Identity`, or the gated `User`)
//! 2. Call the `db` layer
//! 3. Return `AppResult<Json<_>>`; errors render through `AppError`

pub mod auth;
pub mod bookings;
pub mod health;
pub mod materials;
pub mod notes;
pub mod sessions;
pub mod types;
pub mod users;
