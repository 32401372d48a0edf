//! Infrastructure layer for Cerium.
//!
//! Contains implementations of the ports defined in `cerium-core`: SQLite
//! storage, the HS256 session codec, the OAuth identity-provider client and
//! random token generation, plus configuration loading.

pub mod config;
pub mod oauth;
pub mod session;
pub mod sqlite;
pub mod token;
