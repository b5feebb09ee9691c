//! # Authentication and Authorization
//!
//! ## Submodules
//! - `token`: Issuing and verifying bearer tokens (who is calling?)
//! - `gate`: Comparing the caller's stored role with a route's required role
//!   (may they do this?)
//!
//! ## Request Flow
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `token::TokenService::authenticate` turns it into an `Identity`
//! 3. `gate::authorize` loads the user by email and checks the role
//! 4. The handler runs with the `Identity` in its request extensions

pub mod gate;
pub mod token;
