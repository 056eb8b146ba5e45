//! Provider-agnostic user profile extraction for OAuth logins.
//!
//! A provider's profile response body goes in, a [`logic::UserProfile`]
//! with an identifier and converted attributes comes out.

pub mod logic;
